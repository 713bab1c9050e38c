//! SQL*Plus option set.
//!
//! SQL*Plus mixes short flags, a mandatory positional logon and a trailing
//! `@script` reference, so its rendering is a fixed sequence rather than a
//! table walk:
//!
//! `-C=v -F -L -M "v" -NOLOGINTIME -R v -S <logon|/NOLOG> @script params...`

use super::{
    OptionDescriptor, OptionSchema, OptionValue, OptionValues, ToolCommand, ValueType,
    command_line,
};
use crate::{LogonCredential, Result, error::OratoolError};

/// Default SQL*Plus executable.
pub const DEFAULT_SQLPLUS: &str = "sqlplus";

/// Logon sentinel used when the credential renders as absent.
pub const NOLOG: &str = "/NOLOG";

/// SQL*Plus flags in external argument order.
pub const RUNNER_OPTIONS: &[OptionDescriptor] = &[
    OptionDescriptor::optional(
        "C",
        "-C",
        ValueType::Text,
        "Sets the compatibility of affected commands to the specified version. \
         The version has form \"x.y[.z]\". For example, -C=10.2.0",
    ),
    OptionDescriptor::flag(
        "F",
        "-F",
        "This option improves performance in general. It changes the default values settings.",
    ),
    OptionDescriptor::flag(
        "L",
        "-L",
        "Attempts to log on just once, instead of reprompting on error.",
    ),
    OptionDescriptor::optional(
        "M",
        "-M",
        ValueType::Text,
        "Sets automatic HTML or CSV markup of output. The options have the form: \
         {HTML html_options|CSV csv_options}",
    ),
    OptionDescriptor::flag(
        "NOLOGINTIME",
        "-NOLOGINTIME",
        "Don't display Last Successful Login Time.",
    ),
    OptionDescriptor::optional(
        "R",
        "-R",
        ValueType::Int,
        "Sets restricted mode to disable SQL*Plus commands that interact with the file system. \
         The level can be 1, 2 or 3.",
    ),
    OptionDescriptor::flag(
        "S",
        "-S",
        "Sets silent mode which suppresses the display of the SQL*Plus banner, prompts, \
         and echoing of commands.",
    ),
];

/// SQL*Plus positional arguments.
pub const RUNNER_ARGUMENTS: &[OptionDescriptor] = &[
    OptionDescriptor::required(
        "script",
        "Runs the specified SQL*Plus script from a web server (URL) or the local file system \
         (filename.ext)",
    ),
    OptionDescriptor::array(
        "parameters",
        "Specified parameters that will be assigned to substitution variables in the script",
    ),
];

/// Schema wrapper over [`RUNNER_OPTIONS`].
pub const RUNNER_SCHEMA: OptionSchema = OptionSchema::new(RUNNER_OPTIONS);

/// A SQL*Plus invocation.
///
/// # Example
///
/// ```rust
/// use oratool_core::{LogonCredential, RunnerOptions, ToolCommand};
///
/// let runner = RunnerOptions::new(LogonCredential::disconnected())
///     .with_silent(true)
///     .with_script("report.sql");
///
/// assert_eq!(runner.render(), vec!["sqlplus", "-S", "/NOLOG", "@report.sql"]);
/// ```
#[derive(Debug, Clone)]
pub struct RunnerOptions {
    /// Account used for the positional logon
    pub logon: LogonCredential,
    /// Path to the SQL*Plus executable
    pub sqlplus: String,
    /// `-C`: compatibility version, `x.y[.z]`
    pub compatibility: Option<String>,
    /// `-F`: fast mode
    pub fast: bool,
    /// `-L`: attempt logon only once
    pub single_logon: bool,
    /// `-M`: HTML or CSV markup options
    pub markup: Option<String>,
    /// `-NOLOGINTIME`: hide the last successful login time
    pub no_login_time: bool,
    /// `-R`: restriction level
    pub restriction: Option<i64>,
    /// `-S`: silent mode
    pub silent: bool,
    /// Script reference, URL or file name
    pub script: Option<String>,
    /// Substitution parameters passed after the script
    pub parameters: Vec<String>,
}

impl RunnerOptions {
    /// Creates an invocation of the default `sqlplus` executable with no flags.
    pub fn new(logon: LogonCredential) -> Self {
        Self {
            logon,
            sqlplus: DEFAULT_SQLPLUS.to_string(),
            compatibility: None,
            fast: false,
            single_logon: false,
            markup: None,
            no_login_time: false,
            restriction: None,
            silent: false,
            script: None,
            parameters: Vec::new(),
        }
    }

    /// Creates an invocation from flag values collected against [`RUNNER_SCHEMA`].
    ///
    /// # Errors
    /// Returns a configuration error if a value names an undeclared flag or
    /// has the wrong type.
    pub fn from_values(logon: LogonCredential, values: &OptionValues) -> Result<Self> {
        let mut options = Self::new(logon);
        for (name, value) in values.iter() {
            options.set(name, value.clone())?;
        }
        Ok(options)
    }

    /// Builder method to override the executable path.
    pub fn with_executable(mut self, sqlplus: impl Into<String>) -> Self {
        self.sqlplus = sqlplus.into();
        self
    }

    /// Builder method to set `-C`.
    pub fn with_compatibility(mut self, version: impl Into<String>) -> Self {
        self.compatibility = Some(version.into());
        self
    }

    /// Builder method to set `-F`.
    pub const fn with_fast(mut self, fast: bool) -> Self {
        self.fast = fast;
        self
    }

    /// Builder method to set `-L`.
    pub const fn with_single_logon(mut self, single_logon: bool) -> Self {
        self.single_logon = single_logon;
        self
    }

    /// Builder method to set `-M`.
    pub fn with_markup(mut self, markup: impl Into<String>) -> Self {
        self.markup = Some(markup.into());
        self
    }

    /// Builder method to set `-NOLOGINTIME`.
    pub const fn with_no_login_time(mut self, no_login_time: bool) -> Self {
        self.no_login_time = no_login_time;
        self
    }

    /// Builder method to set `-R`.
    pub const fn with_restriction(mut self, level: i64) -> Self {
        self.restriction = Some(level);
        self
    }

    /// Builder method to set `-S`.
    pub const fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// Builder method to set the script reference.
    pub fn with_script(mut self, script: impl Into<String>) -> Self {
        self.script = Some(script.into());
        self
    }

    /// Builder method to set the trailing script parameters.
    pub fn with_parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters = parameters.into_iter().map(Into::into).collect();
        self
    }

    /// Sets a flag by its CLI name (`C`, `F`, `L`, `M`, `NOLOGINTIME`, `R`, `S`).
    ///
    /// # Errors
    /// Returns a configuration error for unknown names or mismatched types.
    pub fn set(&mut self, name: &str, value: impl Into<OptionValue>) -> Result<()> {
        let value = value.into();
        let descriptor = RUNNER_SCHEMA
            .find(name)
            .ok_or_else(|| OratoolError::configuration(format!("unknown option '{name}'")))?;

        match (descriptor.name, value) {
            ("C", OptionValue::Text(v)) => self.compatibility = Some(v),
            ("C", OptionValue::Absent) => self.compatibility = None,
            ("F", OptionValue::Bool(v)) => self.fast = v,
            ("L", OptionValue::Bool(v)) => self.single_logon = v,
            ("M", OptionValue::Text(v)) => self.markup = Some(v),
            ("M", OptionValue::Absent) => self.markup = None,
            ("NOLOGINTIME", OptionValue::Bool(v)) => self.no_login_time = v,
            ("R", OptionValue::Int(v)) => self.restriction = Some(v),
            ("R", OptionValue::Absent) => self.restriction = None,
            ("S", OptionValue::Bool(v)) => self.silent = v,
            ("F" | "L" | "NOLOGINTIME" | "S", OptionValue::Absent) => {
                self.set(name, false)?;
            }
            (name, other) => {
                return Err(OratoolError::configuration(format!(
                    "option '{name}' expects {}, got {:?}",
                    descriptor.value_type, other
                )));
            }
        }

        Ok(())
    }

    /// Script reference as passed to SQL*Plus, `@` prefixed.
    pub fn script_reference(&self) -> Option<String> {
        self.script.as_ref().map(|script| {
            if script.starts_with('@') {
                script.clone()
            } else {
                format!("@{script}")
            }
        })
    }
}

impl ToolCommand for RunnerOptions {
    fn program(&self) -> &str {
        &self.sqlplus
    }

    fn logon(&self) -> &LogonCredential {
        &self.logon
    }

    fn render_with_logon(&self, logon: Option<String>) -> Vec<String> {
        let flags = [
            self.compatibility.as_ref().map(|v| format!("-C={v}")),
            self.fast.then(|| "-F".to_string()),
            self.single_logon.then(|| "-L".to_string()),
            self.markup.as_ref().map(|v| format!("-M \"{v}\"")),
            self.no_login_time.then(|| "-NOLOGINTIME".to_string()),
            self.restriction.map(|v| format!("-R {v}")),
            self.silent.then(|| "-S".to_string()),
        ];

        let logon = logon.unwrap_or_else(|| NOLOG.to_string());

        command_line(
            &self.sqlplus,
            flags
                .into_iter()
                .flatten()
                .chain(std::iter::once(logon))
                .chain(self.script_reference())
                .chain(self.parameters.iter().cloned()),
        )
    }
}
