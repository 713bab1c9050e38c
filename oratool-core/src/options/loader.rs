//! SQL*Loader option set.
//!
//! Renders `sqlldr` invocations as `userid=<logon>` followed by one
//! `key=value` pair per supplied option, in declared order. Booleans are
//! written as the literals `true` and `false`; a `false` is still rendered.
//!
//! The table below is the only place option names, external keys and
//! types are declared. It produces both [`LOADER_OPTIONS`] (consumed by CLI
//! registration) and the typed builder methods on [`LoaderOptions`].

use super::{
    OptionDescriptor, OptionSchema, OptionValue, OptionValues, ToolCommand, ValueType,
    command_line,
};
use crate::{LogonCredential, Result};

/// Default SQL*Loader executable.
pub const DEFAULT_SQLLDR: &str = "sqlldr";

macro_rules! loader_setter {
    ($method:ident, Text, $name:literal) => {
        #[doc = concat!("Sets the `", $name, "` option.")]
        pub fn $method(mut self, value: impl Into<String>) -> Self {
            self.values.insert($name, OptionValue::Text(value.into()));
            self
        }
    };
    ($method:ident, Int, $name:literal) => {
        #[doc = concat!("Sets the `", $name, "` option.")]
        pub fn $method(mut self, value: i64) -> Self {
            self.values.insert($name, OptionValue::Int(value));
            self
        }
    };
    ($method:ident, Bool, $name:literal) => {
        #[doc = concat!("Sets the `", $name, "` option.")]
        pub fn $method(mut self, value: bool) -> Self {
            self.values.insert($name, OptionValue::Bool(value));
            self
        }
    };
}

macro_rules! loader_options {
    ($($method:ident: $ty:ident => $name:literal as $key:literal, $help:literal;)*) => {
        /// SQL*Loader options in external argument order.
        pub const LOADER_OPTIONS: &[OptionDescriptor] = &[
            $(OptionDescriptor::optional($name, $key, ValueType::$ty, $help),)*
        ];

        impl LoaderOptions {
            $(loader_setter!($method, $ty, $name);)*
        }
    };
}

loader_options! {
    control: Text => "control" as "control", "Control file name";
    log: Text => "log" as "log", "Log file name";
    bad: Text => "bad" as "bad", "Bad file name";
    data: Text => "data" as "data", "Data file name";
    discard: Text => "discard" as "discard", "Discard file name";
    discardmax: Int => "discardmax" as "discardmax", "Number of discards to allow";
    skip: Int => "skip" as "skip", "Number of logical records to skip";
    load: Int => "load" as "load", "Number of logical records to load";
    errors: Int => "errors" as "errors", "Number of errors to allow";
    rows: Int => "rows" as "rows",
        "Number of rows in conventional path bind array or between direct path data saves";
    bindsize: Int => "bindsize" as "bindsize", "Size of conventional path bind array in bytes";
    silent: Text => "silent" as "silent",
        "Suppress messages during run (header,feedback,errors,discards,partitions)";
    direct: Bool => "direct" as "direct", "Use direct path";
    parfile: Text => "parfile" as "parfile",
        "Parameter file: name of file that contains parameter specifications";
    parallel: Bool => "parallel" as "parallel", "Do parallel load";
    file: Text => "file" as "file", "File to allocate extents from";
    skip_unusable_indexes: Bool => "skipUnusableIndexes" as "skip_unusable_indexes",
        "Disallow/allow unusable indexes or index partitions";
    skip_index_maintenance: Bool => "skipIndexMaintenance" as "skip_index_maintenance",
        "Do not maintain indexes, mark affected indexes as unusable";
    commit_discontinued: Bool => "commitDiscontinued" as "commit_discontinued",
        "Commit loaded rows when load is discontinued";
    readsize: Int => "readsize" as "readsize", "Size of read buffer";
    external_table: Text => "externalTable" as "external_table",
        "Use external table for load; NOT_USED, GENERATE_ONLY, EXECUTE";
    columnarrayrows: Int => "columnarrayrows" as "columnarrayrows",
        "Number of rows for direct path column array";
    streamsize: Int => "streamsize" as "streamsize", "Size of direct path stream buffer in bytes";
    multithreading: Bool => "multithreading" as "multithreading",
        "Use multithreading in direct path";
    resumable: Bool => "resumable" as "resumable",
        "Enable or disable resumable for current session";
    resumable_name: Text => "resumableName" as "resumable_name",
        "Text string to help identify resumable statement";
    resumable_timeout: Int => "resumableTimeout" as "resumable_timeout",
        "Wait time (in seconds) for RESUMABLE";
    date_cache: Int => "dateCache" as "date_cache", "Size (in entries) of date conversion cache";
    no_index_errors: Bool => "noIndexErrors" as "no_index_errors", "Abort load on any index errors";
    partition_memory: Int => "partitionMemory" as "partition_memory",
        "Direct path partition memory limit to start spilling (kb)";
    table: Text => "table" as "table", "Table for express mode load";
    date_format: Text => "dateFormat" as "date_format", "Date format for express mode load";
    timestamp_format: Text => "timestampFormat" as "timestamp_format",
        "Timestamp format for express mode load";
    terminated_by: Text => "terminatedBy" as "terminated_by",
        "Terminated by character for express mode load";
    enclosed_by: Text => "enclosedBy" as "enclosed_by",
        "Enclosed by character for express mode load";
    optionally_enclosed_by: Text => "optionallyEnclosedBy" as "optionally_enclosed_by",
        "Optionally enclosed by character for express mode load";
    characterset: Text => "characterset" as "characterset", "Characterset for express mode load";
    degree_of_parallelism: Text => "degreeOfParallelism" as "degree_of_parallelism",
        "Degree of parallelism for express mode load and external table load";
    trim: Text => "trim" as "trim", "Trim type for express mode load and external table load";
    csv: Text => "csv" as "csv", "CSV format data files for express mode load";
    nullif: Text => "nullif" as "nullif", "Table level nullif clause for express mode load";
    field_names: Text => "fieldNames" as "field_names",
        "Field names setting for first record of data files for express mode load";
    dnfs_enable: Bool => "dnfsEnable" as "dnfs_enable",
        "Option for enabling or disabling Direct NFS (dNFS) for input data files";
    dnfs_readbuffers: Int => "dnfsReadbuffers" as "dnfs_readbuffers",
        "Number of Direct NFS (dNFS) read buffers";
    sdf_prefix: Text => "sdfPrefix" as "sdf_prefix",
        "Prefix to append to start of every LOB File and Secondary Data File";
    display_help: Bool => "displayHelp" as "help", "Display help messages";
    empty_lobs_are_null: Bool => "emptyLobsAreNull" as "empty_lobs_are_null",
        "Set empty LOBs to null";
    defaults: Text => "defaults" as "defaults",
        "Direct path default value loading; EVALUATE_ONCE, EVALUATE_EVERY_ROW, IGNORE, IGNORE_UNSUPPORTED_EVALUATE_ONCE, IGNORE_UNSUPPORTED_EVALUATE_EVERY_ROW";
    direct_path_lock_wait: Bool => "directPathLockWait" as "direct_path_lock_wait",
        "Wait for access to table when currently locked";
    credential: Text => "credential" as "credential", "Credential used for object store access";
    proxy: Text => "proxy" as "proxy", "Proxy used for object store access";
}

/// Schema wrapper over [`LOADER_OPTIONS`].
pub const LOADER_SCHEMA: OptionSchema = OptionSchema::new(LOADER_OPTIONS);

/// A SQL*Loader invocation.
///
/// # Example
///
/// ```rust
/// use oratool_core::{LogonCredential, LoaderOptions, ToolCommand};
///
/// let loader = LoaderOptions::new(
///     LogonCredential::new().with_username("scott").with_password("tiger"),
/// )
/// .control("emp.ctl")
/// .direct(false)
/// .skip_unusable_indexes(true);
///
/// assert_eq!(
///     loader.render(),
///     vec![
///         "sqlldr",
///         "userid=scott/tiger",
///         "control=emp.ctl",
///         "direct=false",
///         "skip_unusable_indexes=true",
///     ]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Account used as `userid`
    pub logon: LogonCredential,
    /// Path to the SQL*Loader executable
    pub sqlldr: String,
    values: OptionValues,
}

impl LoaderOptions {
    /// Creates an invocation of the default `sqlldr` executable with no options.
    pub fn new(logon: LogonCredential) -> Self {
        Self {
            logon,
            sqlldr: DEFAULT_SQLLDR.to_string(),
            values: OptionValues::new(),
        }
    }

    /// Creates an invocation from values collected against [`LOADER_SCHEMA`].
    ///
    /// # Errors
    /// Returns a configuration error if a value names an undeclared option or
    /// has the wrong type.
    pub fn from_values(logon: LogonCredential, values: &OptionValues) -> Result<Self> {
        let mut options = Self::new(logon);
        for (name, value) in values.iter() {
            options.set(name, value.clone())?;
        }
        Ok(options)
    }

    /// Builder method to override the executable path.
    pub fn with_executable(mut self, sqlldr: impl Into<String>) -> Self {
        self.sqlldr = sqlldr.into();
        self
    }

    /// Sets an option by its CLI name.
    ///
    /// # Errors
    /// Returns a configuration error for unknown names or mismatched types.
    pub fn set(&mut self, name: &str, value: impl Into<OptionValue>) -> Result<()> {
        LOADER_SCHEMA.set(&mut self.values, name, value)
    }

    /// Gets an option by its CLI name.
    pub fn get(&self, name: &str) -> &OptionValue {
        self.values.get(name)
    }

    /// Supplied option values.
    pub const fn values(&self) -> &OptionValues {
        &self.values
    }
}

/// Formats one present value as `key=value`.
fn format_key_value(descriptor: &OptionDescriptor, value: &OptionValue) -> Option<String> {
    let key = descriptor.external_key;
    match value {
        OptionValue::Absent => None,
        OptionValue::Bool(b) => Some(format!("{key}={b}")),
        OptionValue::Int(n) => Some(format!("{key}={n}")),
        OptionValue::Text(s) => Some(format!("{key}={s}")),
    }
}

impl ToolCommand for LoaderOptions {
    fn program(&self) -> &str {
        &self.sqlldr
    }

    fn logon(&self) -> &LogonCredential {
        &self.logon
    }

    fn render_with_logon(&self, logon: Option<String>) -> Vec<String> {
        let userid = logon.map(|logon| format!("userid={logon}"));
        let options = LOADER_SCHEMA.render(&self.values, format_key_value);
        command_line(&self.sqlldr, userid.into_iter().chain(options))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn scott() -> LogonCredential {
        LogonCredential::new()
            .with_username("scott")
            .with_password("tiger")
            .with_connect_identifier("orcl")
    }

    #[test]
    fn test_schema_has_every_loader_option_once() {
        assert_eq!(LOADER_OPTIONS.len(), 51);

        let names: HashSet<_> = LOADER_OPTIONS.iter().map(|d| d.name).collect();
        let keys: HashSet<_> = LOADER_OPTIONS.iter().map(|d| d.external_key).collect();
        assert_eq!(names.len(), LOADER_OPTIONS.len());
        assert_eq!(keys.len(), LOADER_OPTIONS.len());
    }

    #[test]
    fn test_external_key_translation() {
        let expected = [
            ("skipUnusableIndexes", "skip_unusable_indexes"),
            ("skipIndexMaintenance", "skip_index_maintenance"),
            ("commitDiscontinued", "commit_discontinued"),
            ("externalTable", "external_table"),
            ("resumableName", "resumable_name"),
            ("resumableTimeout", "resumable_timeout"),
            ("dateCache", "date_cache"),
            ("noIndexErrors", "no_index_errors"),
            ("partitionMemory", "partition_memory"),
            ("dateFormat", "date_format"),
            ("timestampFormat", "timestamp_format"),
            ("terminatedBy", "terminated_by"),
            ("enclosedBy", "enclosed_by"),
            ("optionallyEnclosedBy", "optionally_enclosed_by"),
            ("degreeOfParallelism", "degree_of_parallelism"),
            ("fieldNames", "field_names"),
            ("dnfsEnable", "dnfs_enable"),
            ("dnfsReadbuffers", "dnfs_readbuffers"),
            ("sdfPrefix", "sdf_prefix"),
            ("displayHelp", "help"),
            ("emptyLobsAreNull", "empty_lobs_are_null"),
            ("directPathLockWait", "direct_path_lock_wait"),
        ];

        for (name, key) in expected {
            assert_eq!(LOADER_SCHEMA.find(name).unwrap().external_key, key, "{name}");
        }
    }

    #[test]
    fn test_declared_types() {
        let type_of = |name| LOADER_SCHEMA.find(name).unwrap().value_type;
        assert_eq!(type_of("direct"), ValueType::Bool);
        assert_eq!(type_of("discardmax"), ValueType::Int);
        assert_eq!(type_of("silent"), ValueType::Text);
        assert_eq!(type_of("degreeOfParallelism"), ValueType::Text);
        assert_eq!(type_of("dnfsReadbuffers"), ValueType::Int);
    }

    #[test]
    fn test_render_userid_first() {
        let loader = LoaderOptions::new(scott()).log("emp.log").control("emp.ctl");
        assert_eq!(
            loader.render(),
            vec!["sqlldr", "userid=scott/tiger@orcl", "control=emp.ctl", "log=emp.log"]
        );
    }

    #[test]
    fn test_render_booleans_as_literals() {
        let loader = LoaderOptions::new(scott())
            .direct(true)
            .parallel(false)
            .display_help(false);

        let args = loader.render();
        assert!(args.contains(&"direct=true".to_string()));
        assert!(args.contains(&"parallel=false".to_string()));
        assert!(args.contains(&"help=false".to_string()));
    }

    #[test]
    fn test_render_omits_unset_options() {
        let loader = LoaderOptions::new(scott()).errors(0);
        assert_eq!(
            loader.render(),
            vec!["sqlldr", "userid=scott/tiger@orcl", "errors=0"]
        );
    }

    #[test]
    fn test_render_without_logon_omits_userid() {
        let loader = LoaderOptions::new(LogonCredential::disconnected()).display_help(true);
        assert_eq!(loader.render(), vec!["sqlldr", "help=true"]);
    }

    #[test]
    fn test_render_redacted_masks_password() {
        let loader = LoaderOptions::new(scott()).control("emp.ctl");
        assert_eq!(
            loader.render_redacted(),
            vec!["sqlldr", "userid=scott/****@orcl", "control=emp.ctl"]
        );
    }

    #[test]
    fn test_custom_executable() {
        let loader = LoaderOptions::new(LogonCredential::disconnected())
            .with_executable("/u01/app/oracle/bin/sqlldr");
        assert_eq!(loader.program(), "/u01/app/oracle/bin/sqlldr");
        assert_eq!(loader.render(), vec!["/u01/app/oracle/bin/sqlldr"]);
    }

    #[test]
    fn test_set_by_name_matches_builder() {
        let mut by_name = LoaderOptions::new(scott());
        by_name.set("resumableTimeout", 7200_i64).unwrap();
        by_name.set("resumable", true).unwrap();
        by_name.set("dateFormat", "YYYY-MM-DD").unwrap();

        let built = LoaderOptions::new(scott())
            .date_format("YYYY-MM-DD")
            .resumable(true)
            .resumable_timeout(7200);

        assert_eq!(by_name.render(), built.render());
        assert_eq!(by_name.get("resumable"), &OptionValue::Bool(true));
    }

    #[test]
    fn test_set_rejects_wrong_type() {
        let mut loader = LoaderOptions::new(scott());
        assert!(loader.set("direct", "yes").is_err());
        assert!(loader.set("errors", true).is_err());
        assert!(loader.set("userid", "scott/tiger").is_err());
    }

    #[test]
    fn test_from_values() {
        let mut values = OptionValues::new();
        LOADER_SCHEMA.set(&mut values, "data", "emp.dat").unwrap();
        LOADER_SCHEMA.set(&mut values, "rows", 64_i64).unwrap();

        let loader = LoaderOptions::from_values(LogonCredential::disconnected(), &values).unwrap();
        assert_eq!(loader.render(), vec!["sqlldr", "data=emp.dat", "rows=64"]);
    }
}
