//! Connect string construction from host/port/service fields.
//!
//! An explicit connect string always wins. Without a host the database name
//! is used as a net service name. With a host, a full connect descriptor is
//! built:
//!
//! ```text
//! (DESCRIPTION=(ADDRESS=(PROTOCOL=TCP)(HOST=h)(PORT=p))(CONNECT_DATA=(SERVICE_NAME=s)))
//! ```

use std::fmt;

/// Listener port used when none is configured.
pub const DEFAULT_PORT: u16 = 1521;

/// Fields a connect string can be assembled from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EasyConnectComponents {
    /// Verbatim connect string, overrides every other field
    pub connect_string: Option<String>,
    /// Listener host
    pub host: Option<String>,
    /// Listener port, [`DEFAULT_PORT`] when unset
    pub port: Option<u16>,
    /// Database name, used as SID or service name fallback
    pub dbname: Option<String>,
    /// Explicit service name
    pub service_name: Option<String>,
    /// Use `SERVICE_NAME` instead of `SID` in the connect data
    pub service: bool,
    /// Instance name
    pub instance_name: Option<String>,
    /// Request a DRCP pooled server
    pub pooled: bool,
}

/// A rendered Easy Connect string or connect descriptor.
///
/// # Example
///
/// ```rust
/// use oratool_core::connection::{EasyConnect, EasyConnectComponents};
///
/// let easy = EasyConnect::from_components(&EasyConnectComponents {
///     host: Some("db.example.com".into()),
///     service_name: Some("ORCLPDB1".into()),
///     service: true,
///     ..Default::default()
/// });
///
/// assert_eq!(
///     easy.as_str(),
///     "(DESCRIPTION=(ADDRESS=(PROTOCOL=TCP)(HOST=db.example.com)(PORT=1521))\
///      (CONNECT_DATA=(SERVICE_NAME=ORCLPDB1)))"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EasyConnect(String);

impl EasyConnect {
    /// Wraps an already-rendered connect string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Builds the connect string from its components.
    pub fn from_components(components: &EasyConnectComponents) -> Self {
        if let Some(connect_string) = &components.connect_string {
            return Self::new(connect_string.clone());
        }

        let Some(host) = &components.host else {
            return Self::new(components.dbname.clone().unwrap_or_default());
        };

        let mut connect_data = Vec::new();

        if let Some(name) = components
            .service_name
            .as_ref()
            .or(components.dbname.as_ref())
        {
            let key = if components.service {
                "SERVICE_NAME"
            } else {
                "SID"
            };
            connect_data.push(Node::leaf(key, name));
        }

        if let Some(instance) = &components.instance_name {
            connect_data.push(Node::leaf("INSTANCE_NAME", instance));
        }

        if components.pooled {
            connect_data.push(Node::leaf("SERVER", "POOLED"));
        }

        let port = components.port.unwrap_or(DEFAULT_PORT).to_string();
        let descriptor = Node::branch(
            "DESCRIPTION",
            vec![
                Node::branch(
                    "ADDRESS",
                    vec![
                        Node::leaf("PROTOCOL", "TCP"),
                        Node::leaf("HOST", host),
                        Node::leaf("PORT", &port),
                    ],
                ),
                Node::branch("CONNECT_DATA", connect_data),
            ],
        );

        Self(descriptor.to_string())
    }

    /// Returns the connect string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the connect string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for EasyConnect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One `(KEY=value)` pair of a connect descriptor.
enum Node {
    Leaf(&'static str, String),
    Branch(&'static str, Vec<Self>),
}

impl Node {
    fn leaf(key: &'static str, value: &str) -> Self {
        Self::Leaf(key, value.to_string())
    }

    const fn branch(key: &'static str, children: Vec<Self>) -> Self {
        Self::Branch(key, children)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(key, value) => write!(f, "({key}={value})"),
            Self::Branch(key, children) => {
                write!(f, "({key}=")?;
                for child in children {
                    write!(f, "{child}")?;
                }
                write!(f, ")")
            }
        }
    }
}
