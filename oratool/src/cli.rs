//! Command-line surface.
//!
//! Fixed arguments (logon, launch behavior, executable paths) are declared
//! with clap derive. Tool options are registered from the descriptor tables
//! in `oratool_core`, so adding a row to a table adds the CLI flag too.

use clap::error::ErrorKind;
use clap::{Arg, ArgAction, ArgMatches, Args, FromArgMatches, Parser, Subcommand};
use oratool_core::connection::EasyConnectComponents;
use oratool_core::options::coerce::coerce;
use oratool_core::options::loader::DEFAULT_SQLLDR;
use oratool_core::options::runner::DEFAULT_SQLPLUS;
use oratool_core::{
    ConnectionParameters, LOADER_SCHEMA, LoaderOptions, LogonCredential, OptionDescriptor,
    OptionKind, OptionSchema, OptionValue, OptionValues, OratoolError, RUNNER_ARGUMENTS,
    RUNNER_SCHEMA, Result, RunnerOptions, SessionMode, ValueType,
};
use std::path::PathBuf;

/// Top-level command line.
#[derive(Debug, Parser)]
#[command(name = "oratool")]
#[command(about = "Run SQL*Loader and SQL*Plus from typed options")]
#[command(version)]
#[command(long_about = "
oratool - typed front end for Oracle client tools

Builds exact sqlldr and sqlplus command lines from named options and runs
them, or resolves and tests a native database connection.

SECURITY FEATURES:
- Passwords are masked in logs and --dry-run output
- Passwords can be read from ORACLE_PASSWORD or an interactive prompt

EXAMPLES:
  oratool sqlldr --USER scott --CONN orcl --control emp.ctl --direct
  oratool sqlplus --NOLOG --S report.sql 2024 Q1
  oratool connect --params connection.json --dry-run
")]
pub struct Cli {
    /// Verbosity flags accepted by every subcommand
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run SQL*Loader
    Sqlldr(LoaderArgs),
    /// Run SQL*Plus
    Sqlplus(RunnerArgs),
    /// Resolve and open a native database connection
    Connect(ConnectCommandArgs),
    /// List the options of both tools
    List,
}

/// Global logging flags.
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true, help = "Suppress all output except errors")]
    pub quiet: bool,
}

/// Account flags shared by both tools.
#[derive(Args)]
pub struct LogonArgs {
    /// Account username
    #[arg(long = "USER", help = "Database account username")]
    pub user: Option<String>,

    /// Account password, also read from `ORACLE_PASSWORD`
    #[arg(
        long = "PASS",
        env = "ORACLE_PASSWORD",
        hide_env_values = true,
        help = "Database account password"
    )]
    pub pass: Option<String>,

    /// Connect identifier
    #[arg(
        long = "CONN",
        help = "Net service name or Easy Connect string of the database"
    )]
    pub conn: Option<String>,

    /// Administrative privilege
    #[arg(
        long = "SYS",
        help = "Administrative privilege: SYSDBA, SYSOPER, SYSASM, SYSBACKUP, SYSDG, SYSKM"
    )]
    pub role: Option<String>,

    /// Session edition
    #[arg(long = "ED", help = "Edition to use for the session")]
    pub edition: Option<String>,

    /// Start without a logon
    #[arg(long = "NOLOG", help = "Start without connecting to a database")]
    pub no_log: bool,

    /// Prompt for the password
    #[arg(long, help = "Prompt for the password instead of passing it as an argument")]
    pub ask_pass: bool,
}

impl std::fmt::Debug for LogonArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogonArgs")
            .field("user", &self.user)
            .field("has_password", &self.pass.is_some())
            .field("conn", &self.conn)
            .field("role", &self.role)
            .field("edition", &self.edition)
            .field("no_log", &self.no_log)
            .field("ask_pass", &self.ask_pass)
            .finish()
    }
}

impl LogonArgs {
    /// Builds the credential, prompting for the password when requested.
    ///
    /// # Errors
    /// Returns an I/O error if the password prompt fails.
    pub fn into_credential(self) -> Result<LogonCredential> {
        let password = if self.ask_pass && !self.no_log {
            Some(
                rpassword::prompt_password("Password: ")
                    .map_err(|e| OratoolError::io("failed to read password", e))?,
            )
        } else {
            self.pass
        };

        let mut logon = LogonCredential::new().with_skip_connect(self.no_log);
        logon.username = self.user;
        logon.connect_identifier = self.conn;
        logon.role = self.role;
        logon.edition = self.edition;
        if let Some(password) = password {
            logon = logon.with_password(password);
        }

        Ok(logon)
    }
}

/// Launch behavior shared by both tools.
#[derive(Debug, Args)]
pub struct LaunchArgs {
    /// Print instead of running
    #[arg(long, help = "Print the command line with the password masked instead of running it")]
    pub dry_run: bool,

    /// Ignore a failing exit status
    #[arg(long, help = "Exit successfully even if the tool reports a failure")]
    pub no_fail: bool,
}

/// Arguments of `oratool sqlldr`.
#[derive(Debug, Args)]
pub struct LoaderArgs {
    /// Logon flags
    #[command(flatten)]
    pub logon: LogonArgs,

    /// Launch flags
    #[command(flatten)]
    pub launch: LaunchArgs,

    /// Executable path
    #[arg(
        long,
        env = "ORATOOL_SQLLDR",
        default_value = DEFAULT_SQLLDR,
        help = "Path to the sqlldr executable"
    )]
    pub sqlldr: String,

    /// Options from the SQL*Loader table
    #[command(flatten)]
    pub options: LoaderOptionArgs,
}

impl LoaderArgs {
    /// Builds the loader invocation.
    ///
    /// # Errors
    /// Returns an error if the password prompt fails.
    pub fn into_command(self) -> Result<LoaderOptions> {
        let logon = self.logon.into_credential()?;
        Ok(LoaderOptions::from_values(logon, &self.options.0)?.with_executable(self.sqlldr))
    }
}

/// Arguments of `oratool sqlplus`.
#[derive(Debug, Args)]
pub struct RunnerArgs {
    /// Logon flags
    #[command(flatten)]
    pub logon: LogonArgs,

    /// Launch flags
    #[command(flatten)]
    pub launch: LaunchArgs,

    /// Executable path
    #[arg(
        long,
        env = "ORATOOL_SQLPLUS",
        default_value = DEFAULT_SQLPLUS,
        help = "Path to the sqlplus executable"
    )]
    pub sqlplus: String,

    /// Flags from the SQL*Plus table
    #[command(flatten)]
    pub flags: RunnerFlagArgs,

    /// Script to run
    #[arg(help = RUNNER_ARGUMENTS[0].description)]
    pub script: String,

    /// Script parameters, passed through verbatim
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        help = RUNNER_ARGUMENTS[1].description
    )]
    pub parameters: Vec<String>,
}

impl RunnerArgs {
    /// Builds the runner invocation.
    ///
    /// # Errors
    /// Returns an error if the password prompt fails.
    pub fn into_command(self) -> Result<RunnerOptions> {
        let logon = self.logon.into_credential()?;
        Ok(RunnerOptions::from_values(logon, &self.flags.0)?
            .with_executable(self.sqlplus)
            .with_script(self.script)
            .with_parameters(self.parameters))
    }
}

/// SQL*Loader options registered from [`oratool_core::LOADER_OPTIONS`].
#[derive(Debug, Clone, Default)]
pub struct LoaderOptionArgs(pub OptionValues);

/// SQL*Plus flags registered from [`oratool_core::RUNNER_OPTIONS`].
#[derive(Debug, Clone, Default)]
pub struct RunnerFlagArgs(pub OptionValues);

macro_rules! schema_args {
    ($ty:ident, $schema:expr) => {
        impl Args for $ty {
            fn augment_args(cmd: clap::Command) -> clap::Command {
                register_schema(cmd, $schema)
            }

            fn augment_args_for_update(cmd: clap::Command) -> clap::Command {
                register_schema(cmd, $schema)
            }
        }

        impl FromArgMatches for $ty {
            fn from_arg_matches(matches: &ArgMatches) -> std::result::Result<Self, clap::Error> {
                collect_schema(matches, $schema).map(Self)
            }

            fn update_from_arg_matches(
                &mut self,
                matches: &ArgMatches,
            ) -> std::result::Result<(), clap::Error> {
                self.0 = collect_schema(matches, $schema)?;
                Ok(())
            }
        }
    };
}

schema_args!(LoaderOptionArgs, LOADER_SCHEMA);
schema_args!(RunnerFlagArgs, RUNNER_SCHEMA);

/// Builds the clap argument for one descriptor.
pub fn descriptor_arg(descriptor: &'static OptionDescriptor) -> Arg {
    let arg = Arg::new(descriptor.name)
        .long(descriptor.name)
        .help(descriptor.description);

    match (descriptor.kind, descriptor.value_type) {
        (OptionKind::Flag, _) => arg.action(ArgAction::SetTrue),
        (_, ValueType::Bool) => arg
            .value_name("BOOL")
            .num_args(0..=1)
            .default_missing_value("true")
            .value_parser(move |raw: &str| coerce(descriptor, raw)),
        (_, ValueType::Int) => arg
            .value_name("INT")
            .value_parser(move |raw: &str| coerce(descriptor, raw)),
        (_, ValueType::Text) => arg
            .value_name("TEXT")
            .value_parser(move |raw: &str| coerce(descriptor, raw)),
    }
}

fn register_schema(cmd: clap::Command, schema: OptionSchema) -> clap::Command {
    schema
        .descriptors()
        .iter()
        .fold(cmd, |cmd, descriptor| cmd.arg(descriptor_arg(descriptor)))
}

fn collect_schema(
    matches: &ArgMatches,
    schema: OptionSchema,
) -> std::result::Result<OptionValues, clap::Error> {
    let mut values = OptionValues::new();

    for descriptor in schema.descriptors() {
        let value = match descriptor.kind {
            OptionKind::Flag => OptionValue::from(matches.get_flag(descriptor.name).then_some(true)),
            _ => matches
                .get_one::<OptionValue>(descriptor.name)
                .cloned()
                .unwrap_or_default(),
        };

        schema
            .set(&mut values, descriptor.name, value)
            .map_err(|e| clap::Error::raw(ErrorKind::ValueValidation, e))?;
    }

    Ok(values)
}

/// Arguments of `oratool connect`.
#[derive(Args)]
pub struct ConnectCommandArgs {
    /// JSON parameter file
    #[arg(long, value_name = "FILE", help = "JSON connection parameter file")]
    pub params: Option<PathBuf>,

    /// Account username
    #[arg(long, help = "Database account username")]
    pub user: Option<String>,

    /// Account password, also read from `ORACLE_PASSWORD`
    #[arg(
        long,
        env = "ORACLE_PASSWORD",
        hide_env_values = true,
        help = "Database account password"
    )]
    pub password: Option<String>,

    /// Prompt for the password
    #[arg(long, help = "Prompt for the password")]
    pub ask_pass: bool,

    /// Verbatim connect string
    #[arg(long, help = "Connect string used verbatim")]
    pub connectstring: Option<String>,

    /// Listener host
    #[arg(long, help = "Listener host")]
    pub host: Option<String>,

    /// Listener port
    #[arg(long, help = "Listener port [default: 1521]")]
    pub port: Option<u16>,

    /// Database name
    #[arg(long, help = "Database name (SID, or service name fallback)")]
    pub dbname: Option<String>,

    /// Service name
    #[arg(long, help = "Service name")]
    pub servicename: Option<String>,

    /// Connect by service name
    #[arg(long, help = "Connect by SERVICE_NAME instead of SID")]
    pub service: bool,

    /// Instance name
    #[arg(long, help = "Instance name")]
    pub instancename: Option<String>,

    /// Pooled server
    #[arg(long, help = "Request a pooled (DRCP) server")]
    pub pooled: bool,

    /// Client character set
    #[arg(long, help = "Client character set")]
    pub charset: Option<String>,

    /// Session mode bits
    #[arg(
        long,
        help = "Session mode: NO_AUTO_COMMIT, SYSDBA, SYSOPER, CRED_EXT or a number, joined with '|'"
    )]
    pub session_mode: Option<SessionMode>,

    /// Reuse a persistent connection
    #[arg(long, help = "Open a persistent connection")]
    pub persistent: bool,

    /// Force a new exclusive connection
    #[arg(long, help = "Open a new exclusive connection")]
    pub exclusive: bool,

    /// Resolve without connecting
    #[arg(long, help = "Resolve the strategy and connect string without connecting")]
    pub dry_run: bool,
}

impl std::fmt::Debug for ConnectCommandArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectCommandArgs")
            .field("params", &self.params)
            .field("user", &self.user)
            .field("has_password", &self.password.is_some())
            .field("persistent", &self.persistent)
            .field("exclusive", &self.exclusive)
            .field("dry_run", &self.dry_run)
            .finish_non_exhaustive()
    }
}

impl ConnectCommandArgs {
    /// Builds the parameter bag: the parameter file first, then any flag
    /// given on the command line on top of it.
    ///
    /// `ORACLE_PASSWORD` counts as `--password`, so when set it replaces a
    /// password read from the parameter file. `--ask-pass` beats both.
    ///
    /// # Errors
    /// Returns an error if the parameter file cannot be read or parsed, or
    /// the password prompt fails.
    pub fn into_parameters(self) -> Result<ConnectionParameters> {
        let mut params = match &self.params {
            Some(path) => ConnectionParameters::from_file(path)?,
            None => ConnectionParameters::new(),
        };

        let password = if self.ask_pass {
            Some(
                rpassword::prompt_password("Password: ")
                    .map_err(|e| OratoolError::io("failed to read password", e))?,
            )
        } else {
            self.password
        };

        if let Some(user) = self.user {
            params.user = Some(user);
        }
        if let Some(password) = password {
            params = params.with_password(password);
        }

        let components = &mut params.easy_connect;
        override_field(&mut components.connect_string, self.connectstring);
        override_field(&mut components.host, self.host);
        override_field(&mut components.port, self.port);
        override_field(&mut components.dbname, self.dbname);
        override_field(&mut components.service_name, self.servicename);
        override_field(&mut components.instance_name, self.instancename);
        components.service |= self.service;
        components.pooled |= self.pooled;

        override_field(&mut params.charset, self.charset);
        override_field(&mut params.session_mode, self.session_mode);
        params.persistent |= self.persistent;
        params.exclusive |= self.exclusive;

        Ok(params)
    }
}

fn override_field<T>(field: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *field = value;
    }
}

/// Renders a descriptor table for `oratool list`.
pub fn option_table(title: &str, descriptors: &[OptionDescriptor]) -> String {
    let rows = descriptors.iter().map(|descriptor| {
        let kind = match descriptor.kind {
            OptionKind::Flag => "flag".to_string(),
            _ => descriptor.value_type.to_string(),
        };
        format!(
            "  --{:<24} {:<24} {:<12} {}\n",
            descriptor.name, descriptor.external_key, kind, descriptor.description
        )
    });
    std::iter::once(format!("{title}\n")).chain(rows).collect()
}

/// Connect string fields as given on the command line, for logging.
pub fn describe_target(components: &EasyConnectComponents) -> String {
    oratool_core::EasyConnect::from_components(components).into_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use oratool_core::ToolCommand;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_loader_options_registered_from_table() {
        let cli = parse(&[
            "oratool",
            "sqlldr",
            "--USER",
            "scott",
            "--control",
            "emp.ctl",
            "--rows",
            "500",
            "--direct",
            "--skipUnusableIndexes=false",
        ]);

        let Command::Sqlldr(args) = cli.command else {
            unreachable!("parsed sqlldr subcommand");
        };
        let values = &args.options.0;
        assert_eq!(values.get("control"), &OptionValue::Text("emp.ctl".into()));
        assert_eq!(values.get("rows"), &OptionValue::Int(500));
        assert_eq!(values.get("direct"), &OptionValue::Bool(true));
        assert_eq!(values.get("skipUnusableIndexes"), &OptionValue::Bool(false));
        assert!(values.get("bad").is_absent());
    }

    #[test]
    fn test_loader_rejects_bad_integer() {
        let err = Cli::try_parse_from(["oratool", "sqlldr", "--rows", "many"]).unwrap_err();
        assert!(err.to_string().contains("Invalid value 'many' for option 'rows'"));
    }

    #[test]
    fn test_runner_flags_script_and_parameters() {
        let cli = parse(&[
            "oratool", "sqlplus", "--NOLOG", "--S", "--R", "3", "report.sql", "2024", "-q1",
        ]);

        let Command::Sqlplus(args) = cli.command else {
            unreachable!("parsed sqlplus subcommand");
        };
        let runner = args.into_command().unwrap();
        assert_eq!(
            runner.render_redacted(),
            vec!["sqlplus", "-R 3", "-S", "/NOLOG", "@report.sql", "2024", "-q1"]
        );
    }

    #[test]
    fn test_runner_requires_script() {
        assert!(Cli::try_parse_from(["oratool", "sqlplus", "--S"]).is_err());
    }

    #[test]
    fn test_connect_flags_without_params_file() {
        let cli = parse(&[
            "oratool",
            "connect",
            "--user",
            "scott",
            "--host",
            "db",
            "--servicename",
            "PDB1",
            "--service",
            "--session-mode",
            "SYSDBA",
            "--persistent",
        ]);

        let Command::Connect(args) = cli.command else {
            unreachable!("parsed connect subcommand");
        };
        let params = args.into_parameters().unwrap();
        assert_eq!(params.user.as_deref(), Some("scott"));
        assert_eq!(params.session_mode, Some(SessionMode::SYSDBA));
        assert!(params.persistent);
        assert_eq!(
            describe_target(&params.easy_connect),
            "(DESCRIPTION=(ADDRESS=(PROTOCOL=TCP)(HOST=db)(PORT=1521))\
             (CONNECT_DATA=(SERVICE_NAME=PDB1)))"
        );
    }

    #[test]
    fn test_option_table_lists_every_descriptor() {
        let table = option_table("SQL*Plus", oratool_core::RUNNER_OPTIONS);
        assert!(table.starts_with("SQL*Plus\n"));
        assert_eq!(table.lines().count(), 8);
        assert!(table.contains("--NOLOGINTIME"));
        assert!(table.contains("flag"));
    }
}
