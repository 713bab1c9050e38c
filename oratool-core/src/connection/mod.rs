//! Connection strategy resolution.
//!
//! A [`ConnectionParameters`] bag is turned into exactly one call on a
//! [`NativeConnector`]: the default shared connect, a persistent connect or
//! an exclusive new connect. Every strategy receives the same
//! [`ConnectArgs`] tuple. Native failures surface as
//! [`OratoolError::ConnectionFailed`] with the driver's text untouched.
//!
//! # Module Structure
//! - `easy_connect`: connect string construction from host/port/service fields
//! - `oracle`: [`NativeConnector`] backed by the `oracle` crate (feature `oracle`)

pub mod easy_connect;
#[cfg(feature = "oracle")]
pub mod oracle;

pub use easy_connect::{DEFAULT_PORT, EasyConnect, EasyConnectComponents};
#[cfg(feature = "oracle")]
pub use self::oracle::OracleConnector;

use crate::{Result, error::OratoolError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use zeroize::Zeroizing;

/// Session mode bit set handed to the native connect primitive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionMode(u32);

impl SessionMode {
    /// Statements are not committed automatically
    pub const NO_AUTO_COMMIT: Self = Self(0);
    /// Alias of [`Self::NO_AUTO_COMMIT`]
    pub const DEFAULT: Self = Self(0);
    /// Connect with the SYSDBA privilege
    pub const SYSDBA: Self = Self(0x2);
    /// Connect with the SYSOPER privilege
    pub const SYSOPER: Self = Self(0x4);
    /// Use external (OS or wallet) authentication
    pub const CRED_EXT: Self = Self(0x8000_0000);

    /// Wraps raw mode bits.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw mode bits.
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Returns true if every bit of `other` is set.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Combines two modes.
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl FromStr for SessionMode {
    type Err = OratoolError;

    /// Parses `|` or `,` separated mode names or numbers, e.g.
    /// `SYSDBA|CRED_EXT` or `0x80000002`.
    fn from_str(s: &str) -> Result<Self> {
        s.split(['|', ','])
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .try_fold(Self::NO_AUTO_COMMIT, |mode, part| -> Result<Self> {
                let bits = match part.to_ascii_uppercase().as_str() {
                    "NO_AUTO_COMMIT" | "DEFAULT" => Self::NO_AUTO_COMMIT,
                    "SYSDBA" => Self::SYSDBA,
                    "SYSOPER" => Self::SYSOPER,
                    "CRED_EXT" => Self::CRED_EXT,
                    other => {
                        let parsed = match other.strip_prefix("0X") {
                            Some(hex) => u32::from_str_radix(hex, 16),
                            None => other.parse::<u32>(),
                        };
                        parsed.map(Self).map_err(|_| {
                            OratoolError::configuration(format!("unknown session mode '{part}'"))
                        })?
                    }
                };
                Ok(mode.union(bits))
            })
    }
}

/// Which native connect primitive to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStrategy {
    /// Shared connection, reused within the process
    Default,
    /// Persistent connection, survives across requests
    Persistent,
    /// Brand-new exclusive connection
    Exclusive,
}

impl ConnectionStrategy {
    /// Resolves the strategy from the two request flags.
    ///
    /// # Errors
    /// Returns a configuration error when both flags are set.
    pub fn resolve(persistent: bool, exclusive: bool) -> Result<Self> {
        match (persistent, exclusive) {
            (true, true) => Err(OratoolError::configuration(
                "persistent and exclusive connections are mutually exclusive",
            )),
            (true, false) => Ok(Self::Persistent),
            (false, true) => Ok(Self::Exclusive),
            (false, false) => Ok(Self::Default),
        }
    }
}

impl fmt::Display for ConnectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Persistent => write!(f, "persistent"),
            Self::Exclusive => write!(f, "exclusive"),
        }
    }
}

/// The fixed argument tuple shared by every native connect primitive.
#[derive(Clone)]
pub struct ConnectArgs {
    /// Database account username, empty when unset
    pub user: String,
    /// Database account password, empty when unset
    pub password: Zeroizing<String>,
    /// Connect string
    pub easy_connect: EasyConnect,
    /// Client character set, empty for the environment default
    pub charset: String,
    /// Session mode bits
    pub session_mode: SessionMode,
}

impl fmt::Debug for ConnectArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectArgs")
            .field("user", &self.user)
            .field("has_password", &!self.password.is_empty())
            .field("easy_connect", &self.easy_connect)
            .field("charset", &self.charset)
            .field("session_mode", &self.session_mode)
            .finish()
    }
}

/// Failure reported by a native connect primitive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct NativeError {
    /// Diagnostic text as produced by the driver
    pub message: String,
}

impl NativeError {
    /// Wraps a driver diagnostic.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The three native connect primitives.
pub trait NativeConnector {
    /// Live connection handle produced on success
    type Handle;

    /// Shared connect.
    ///
    /// # Errors
    /// Returns the driver diagnostic on failure.
    fn connect(&self, args: &ConnectArgs) -> std::result::Result<Self::Handle, NativeError>;

    /// Persistent connect.
    ///
    /// # Errors
    /// Returns the driver diagnostic on failure.
    fn persistent_connect(
        &self,
        args: &ConnectArgs,
    ) -> std::result::Result<Self::Handle, NativeError>;

    /// Exclusive new connect.
    ///
    /// # Errors
    /// Returns the driver diagnostic on failure.
    fn exclusive_connect(
        &self,
        args: &ConnectArgs,
    ) -> std::result::Result<Self::Handle, NativeError>;
}

/// An established connection and the strategy that produced it.
#[derive(Debug)]
pub struct Connection<H> {
    handle: H,
    strategy: ConnectionStrategy,
}

impl<H> Connection<H> {
    /// Borrows the native handle.
    pub const fn handle(&self) -> &H {
        &self.handle
    }

    /// Strategy used to open the connection.
    pub const fn strategy(&self) -> ConnectionStrategy {
        self.strategy
    }

    /// Releases the native handle to the caller.
    pub fn into_inner(self) -> H {
        self.handle
    }
}

/// Connection request as read from a parameter file or assembled by the CLI.
///
/// # Security
/// The password is held in a zeroizing container and never printed by
/// `Debug`.
#[derive(Clone, Default)]
pub struct ConnectionParameters {
    /// Database account username
    pub user: Option<String>,
    /// Database account password
    pub password: Zeroizing<Option<String>>,
    /// Fields the connect string is built from
    pub easy_connect: EasyConnectComponents,
    /// Client character set
    pub charset: Option<String>,
    /// Session mode, [`SessionMode::NO_AUTO_COMMIT`] when unset
    pub session_mode: Option<SessionMode>,
    /// Request a persistent connection
    pub persistent: bool,
    /// Request an exclusive new connection
    pub exclusive: bool,
}

/// On-disk shape of the parameter file.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawParameters {
    user: Option<String>,
    password: Option<String>,
    #[serde(rename = "connectstring")]
    connect_string: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    dbname: Option<String>,
    #[serde(rename = "servicename")]
    service_name: Option<String>,
    #[serde(default)]
    service: bool,
    #[serde(rename = "instancename")]
    instance_name: Option<String>,
    #[serde(default)]
    pooled: bool,
    charset: Option<String>,
    session_mode: Option<SessionMode>,
    #[serde(default)]
    persistent: bool,
    #[serde(default)]
    driver_options: DriverOptions,
}

#[derive(Debug, Default, Deserialize)]
struct DriverOptions {
    #[serde(default)]
    exclusive: bool,
}

impl From<RawParameters> for ConnectionParameters {
    fn from(raw: RawParameters) -> Self {
        Self {
            user: raw.user,
            password: Zeroizing::new(raw.password),
            easy_connect: EasyConnectComponents {
                connect_string: raw.connect_string,
                host: raw.host,
                port: raw.port,
                dbname: raw.dbname,
                service_name: raw.service_name,
                service: raw.service,
                instance_name: raw.instance_name,
                pooled: raw.pooled,
            },
            charset: raw.charset,
            session_mode: raw.session_mode,
            persistent: raw.persistent,
            exclusive: raw.driver_options.exclusive,
        }
    }
}

impl ConnectionParameters {
    /// Creates an empty parameter bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON parameter document.
    ///
    /// # Errors
    /// Returns a serialization error if the document is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str::<RawParameters>(json)
            .map(Self::from)
            .map_err(|source| OratoolError::Serialization {
                context: "invalid connection parameters".to_string(),
                source,
            })
    }

    /// Reads and parses a JSON parameter file.
    ///
    /// # Errors
    /// Returns an I/O error if the file cannot be read, or a serialization
    /// error if its content is malformed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            OratoolError::io(
                format!("failed to read connection parameters from {}", path.display()),
                e,
            )
        })?;
        Self::from_json(&json)
    }

    /// Builder method to set the username.
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Builder method to set the password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Zeroizing::new(Some(password.into()));
        self
    }

    /// Builder method to set the connect string fields.
    pub fn with_easy_connect(mut self, components: EasyConnectComponents) -> Self {
        self.easy_connect = components;
        self
    }

    /// Builder method to set the client character set.
    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    /// Builder method to set the session mode.
    pub const fn with_session_mode(mut self, mode: SessionMode) -> Self {
        self.session_mode = Some(mode);
        self
    }

    /// Builder method to request a persistent connection.
    pub const fn with_persistent(mut self, persistent: bool) -> Self {
        self.persistent = persistent;
        self
    }

    /// Builder method to request an exclusive connection.
    pub const fn with_exclusive(mut self, exclusive: bool) -> Self {
        self.exclusive = exclusive;
        self
    }

    /// Resolves which connect primitive these parameters select.
    ///
    /// # Errors
    /// Returns a configuration error when both persistent and exclusive are
    /// requested.
    pub fn strategy(&self) -> Result<ConnectionStrategy> {
        ConnectionStrategy::resolve(self.persistent, self.exclusive)
    }

    /// Builds the native argument tuple, filling unset fields with their
    /// defaults.
    pub fn connect_args(&self) -> ConnectArgs {
        ConnectArgs {
            user: self.user.clone().unwrap_or_default(),
            password: Zeroizing::new(self.password.as_deref().unwrap_or_default().to_string()),
            easy_connect: EasyConnect::from_components(&self.easy_connect),
            charset: self.charset.clone().unwrap_or_default(),
            session_mode: self.session_mode.unwrap_or(SessionMode::NO_AUTO_COMMIT),
        }
    }
}

impl fmt::Debug for ConnectionParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParameters")
            .field("user", &self.user)
            .field("has_password", &self.password.is_some())
            .field("easy_connect", &self.easy_connect)
            .field("charset", &self.charset)
            .field("session_mode", &self.session_mode)
            .field("persistent", &self.persistent)
            .field("exclusive", &self.exclusive)
            .finish()
    }
}

/// Dispatches connection requests to a [`NativeConnector`].
///
/// # Example
///
/// ```rust
/// use oratool_core::connection::{
///     ConnectArgs, ConnectionParameters, ConnectionResolver, ConnectionStrategy,
///     NativeConnector, NativeError,
/// };
///
/// struct Echo;
///
/// impl NativeConnector for Echo {
///     type Handle = String;
///
///     fn connect(&self, args: &ConnectArgs) -> Result<String, NativeError> {
///         Ok(format!("shared:{}", args.user))
///     }
///     fn persistent_connect(&self, args: &ConnectArgs) -> Result<String, NativeError> {
///         Ok(format!("persistent:{}", args.user))
///     }
///     fn exclusive_connect(&self, args: &ConnectArgs) -> Result<String, NativeError> {
///         Ok(format!("exclusive:{}", args.user))
///     }
/// }
///
/// let resolver = ConnectionResolver::new(Echo);
/// let params = ConnectionParameters::new().with_user("scott").with_persistent(true);
/// let connection = resolver.connect(&params).unwrap();
///
/// assert_eq!(connection.strategy(), ConnectionStrategy::Persistent);
/// assert_eq!(connection.into_inner(), "persistent:scott");
/// ```
#[derive(Debug, Clone)]
pub struct ConnectionResolver<C> {
    connector: C,
}

impl<C: NativeConnector> ConnectionResolver<C> {
    /// Creates a resolver over the given native connector.
    pub const fn new(connector: C) -> Self {
        Self { connector }
    }

    /// Borrows the native connector.
    pub const fn connector(&self) -> &C {
        &self.connector
    }

    /// Opens a connection with the strategy `params` select.
    ///
    /// Exactly one native primitive is invoked, and none when the strategy
    /// cannot be resolved.
    ///
    /// # Errors
    /// Returns a configuration error for persistent plus exclusive, or
    /// `ConnectionFailed` with the driver diagnostic.
    pub fn connect(&self, params: &ConnectionParameters) -> Result<Connection<C::Handle>> {
        let strategy = params.strategy()?;
        let args = params.connect_args();

        tracing::debug!(
            strategy = %strategy,
            user = %args.user,
            connect = %args.easy_connect,
            session_mode = %args.session_mode,
            "Opening database connection"
        );

        let handle = match strategy {
            ConnectionStrategy::Default => self.connector.connect(&args),
            ConnectionStrategy::Persistent => self.connector.persistent_connect(&args),
            ConnectionStrategy::Exclusive => self.connector.exclusive_connect(&args),
        }
        .map_err(|e| OratoolError::connection_failed(e.message))?;

        tracing::info!("Connected using {} strategy", strategy);

        Ok(Connection { handle, strategy })
    }
}
