//! Logon credential rendering.
//!
//! Both Oracle client tools accept the account in one positional string of
//! the form `username/password@connect_identifier [AS role] [EDITION=value]`.
//! This module owns that rendering and the `/NOLOG` style "do not connect"
//! state.
//!
//! # Security
//! - The password is stored in a `Zeroizing` container
//! - `Debug` output never includes the password
//! - `redacted()` renders a log-safe variant with the password masked

use std::fmt;
use zeroize::Zeroizing;

const CONNECT_PREFIX: &str = "@";
const ROLE_PREFIX: &str = "AS ";
const EDITION_PREFIX: &str = "EDITION=";
const REDACTED_PASSWORD: &str = "****";

/// Database account username, password and connect identifier.
///
/// # Example
///
/// ```rust
/// use oratool_core::LogonCredential;
///
/// let logon = LogonCredential::new()
///     .with_username("scott")
///     .with_password("tiger")
///     .with_connect_identifier("orcl")
///     .with_role("SYSDBA");
///
/// assert_eq!(logon.render().as_deref(), Some("scott/tiger@orcl AS SYSDBA"));
/// assert_eq!(logon.redacted().as_deref(), Some("scott/****@orcl AS SYSDBA"));
/// ```
#[derive(Clone, Default)]
pub struct LogonCredential {
    /// Database account username
    pub username: Option<String>,
    /// Database account password
    pub password: Zeroizing<Option<String>>,
    /// Net service name or Easy Connect string
    pub connect_identifier: Option<String>,
    /// Administrative privilege, e.g. `SYSDBA` or `AS SYSOPER`
    pub role: Option<String>,
    /// Session edition
    pub edition: Option<String>,
    /// Run without connecting; overrides every other field
    pub skip_connect: bool,
}

impl LogonCredential {
    /// Creates an empty credential that renders as `/`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a credential that renders as absent (no connection).
    pub fn disconnected() -> Self {
        Self {
            skip_connect: true,
            ..Self::default()
        }
    }

    /// Builder method to set the username.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Builder method to set the password.
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Zeroizing::new(Some(password.into()));
        self
    }

    /// Builder method to set the connect identifier.
    pub fn with_connect_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.connect_identifier = Some(identifier.into());
        self
    }

    /// Builder method to set the administrative role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// Builder method to set the session edition.
    pub fn with_edition(mut self, edition: impl Into<String>) -> Self {
        self.edition = Some(edition.into());
        self
    }

    /// Builder method to set the no-connect flag.
    pub fn with_skip_connect(mut self, skip_connect: bool) -> Self {
        self.skip_connect = skip_connect;
        self
    }

    /// Checks if a password is present without exposing it.
    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    /// Renders the credential string passed to the external tool.
    ///
    /// Returns `None` when the credential is set to skip connecting, in which
    /// case callers decide how "no logon" is expressed for their tool.
    pub fn render(&self) -> Option<String> {
        let password = self.password.as_deref().unwrap_or_default();
        self.render_with_password(password)
    }

    /// Renders the credential string with the password masked.
    pub fn redacted(&self) -> Option<String> {
        let password = if self.has_password() {
            REDACTED_PASSWORD
        } else {
            ""
        };
        self.render_with_password(password)
    }

    fn render_with_password(&self, password: &str) -> Option<String> {
        if self.skip_connect {
            return None;
        }

        let mut logon = format!(
            "{}/{}",
            self.username.as_deref().unwrap_or_default(),
            password
        );

        if let Some(identifier) = &self.connect_identifier {
            logon.push_str(&with_prefix(CONNECT_PREFIX, identifier));
        }

        if let Some(role) = &self.role {
            logon.push(' ');
            logon.push_str(&with_prefix(ROLE_PREFIX, role));
        }

        if let Some(edition) = &self.edition {
            logon.push(' ');
            logon.push_str(&with_prefix(EDITION_PREFIX, edition));
        }

        Some(logon)
    }
}

/// Prepends `prefix` unless `value` already starts with it.
fn with_prefix(prefix: &str, value: &str) -> String {
    if value.starts_with(prefix) {
        value.to_string()
    } else {
        format!("{prefix}{value}")
    }
}

impl fmt::Debug for LogonCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogonCredential")
            .field("username", &self.username)
            .field("has_password", &self.has_password())
            .field("connect_identifier", &self.connect_identifier)
            .field("role", &self.role)
            .field("edition", &self.edition)
            .field("skip_connect", &self.skip_connect)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scott() -> LogonCredential {
        LogonCredential::new()
            .with_username("scott")
            .with_password("tiger")
    }

    #[test]
    fn test_skip_connect_renders_absent() {
        let logon = scott()
            .with_connect_identifier("orcl")
            .with_role("SYSDBA")
            .with_edition("e1")
            .with_skip_connect(true);

        assert_eq!(logon.render(), None);
        assert_eq!(logon.redacted(), None);
        assert_eq!(LogonCredential::disconnected().render(), None);
    }

    #[test]
    fn test_render_user_password_connect() {
        let logon = scott().with_connect_identifier("orcl");
        assert_eq!(logon.render().as_deref(), Some("scott/tiger@orcl"));
    }

    #[test]
    fn test_connect_identifier_keeps_existing_at() {
        let logon = scott().with_connect_identifier("@orcl");
        assert_eq!(logon.render().as_deref(), Some("scott/tiger@orcl"));
    }

    #[test]
    fn test_empty_connect_identifier_still_gets_at() {
        let logon = scott().with_connect_identifier("");
        assert_eq!(logon.render().as_deref(), Some("scott/tiger@"));
    }

    #[test]
    fn test_role_prefix() {
        let logon = scott().with_role("SYSDBA");
        assert_eq!(logon.render().as_deref(), Some("scott/tiger AS SYSDBA"));

        let logon = scott().with_role("AS SYSDBA");
        assert_eq!(logon.render().as_deref(), Some("scott/tiger AS SYSDBA"));
    }

    #[test]
    fn test_edition_prefix() {
        let logon = scott().with_edition("release_2");
        assert_eq!(
            logon.render().as_deref(),
            Some("scott/tiger EDITION=release_2")
        );

        let logon = scott().with_edition("EDITION=release_2");
        assert_eq!(
            logon.render().as_deref(),
            Some("scott/tiger EDITION=release_2")
        );
    }

    #[test]
    fn test_full_render_order() {
        let logon = scott()
            .with_connect_identifier("//db.example.com:1521/ORCLPDB1")
            .with_role("SYSOPER")
            .with_edition("e2");

        assert_eq!(
            logon.render().as_deref(),
            Some("scott/tiger@//db.example.com:1521/ORCLPDB1 AS SYSOPER EDITION=e2")
        );
    }

    #[test]
    fn test_unset_fields_render_empty() {
        assert_eq!(LogonCredential::new().render().as_deref(), Some("/"));
        assert_eq!(
            LogonCredential::new()
                .with_connect_identifier("orcl")
                .render()
                .as_deref(),
            Some("/@orcl")
        );
    }

    #[test]
    fn test_credential_content_is_not_escaped() {
        let logon = LogonCredential::new()
            .with_username("app")
            .with_password("p@ss w\"rd");
        assert_eq!(logon.render().as_deref(), Some("app/p@ss w\"rd"));
    }

    #[test]
    fn test_redacted_credential_masks_password() {
        let logon = scott().with_connect_identifier("orcl").with_role("SYSDBA");
        let redacted = logon.redacted().unwrap_or_default();

        assert_eq!(redacted, "scott/****@orcl AS SYSDBA");
        assert!(!redacted.contains("tiger"));
    }

    #[test]
    fn test_redacted_credential_without_password() {
        let logon = LogonCredential::new().with_username("scott");
        assert_eq!(logon.redacted().as_deref(), Some("scott/"));
    }

    #[test]
    fn test_credential_debug_hides_password() {
        let debug = format!("{:?}", scott());
        assert!(debug.contains("scott"));
        assert!(debug.contains("has_password: true"));
        assert!(!debug.contains("tiger"));
    }
}
