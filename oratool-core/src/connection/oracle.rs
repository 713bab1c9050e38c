//! Native connector backed by the `oracle` crate (ODPI-C).
//!
//! Requires Oracle Instant Client at runtime. Strategy mapping:
//! - default: plain standalone connection
//! - persistent: session purity `SELF`, so a pooled server session is reused
//! - exclusive: session purity `NEW`, always a fresh session
//!
//! The client character set is fixed by the environment (`NLS_LANG`) for
//! ODPI-C, so a per-connection charset is only logged.

use super::{ConnectArgs, NativeConnector, NativeError, SessionMode};
use ::oracle::conn::Purity;
use ::oracle::{Connection, Connector, Privilege};

/// [`NativeConnector`] that opens real Oracle sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct OracleConnector;

impl OracleConnector {
    /// Creates the connector.
    pub const fn new() -> Self {
        Self
    }

    fn open(args: &ConnectArgs, purity: Option<Purity>) -> Result<Connection, NativeError> {
        let mut connector = Connector::new(
            args.user.as_str(),
            args.password.as_str(),
            args.easy_connect.as_str(),
        );

        if args.session_mode.contains(SessionMode::SYSDBA) {
            connector.privilege(Privilege::Sysdba);
        } else if args.session_mode.contains(SessionMode::SYSOPER) {
            connector.privilege(Privilege::Sysoper);
        }

        if args.session_mode.contains(SessionMode::CRED_EXT) {
            connector.external_auth(true);
        }

        if let Some(purity) = purity {
            connector.purity(purity);
        }

        if !args.charset.is_empty() {
            tracing::debug!(
                charset = %args.charset,
                "Client character set is taken from NLS_LANG; ignoring requested charset"
            );
        }

        connector
            .connect()
            .map_err(|e| NativeError::new(e.to_string()))
    }
}

impl NativeConnector for OracleConnector {
    type Handle = Connection;

    fn connect(&self, args: &ConnectArgs) -> Result<Self::Handle, NativeError> {
        Self::open(args, None)
    }

    fn persistent_connect(&self, args: &ConnectArgs) -> Result<Self::Handle, NativeError> {
        Self::open(args, Some(Purity::Self_))
    }

    fn exclusive_connect(&self, args: &ConnectArgs) -> Result<Self::Handle, NativeError> {
        Self::open(args, Some(Purity::New))
    }
}
