//! CLI parsing tests, including environment overrides.
//!
//! Environment-dependent cases run inside `temp_env` closures so variables
//! never leak between tests.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use clap::Parser;
use oratool::cli::{Cli, Command};
use oratool::launch::dry_run;
use oratool_core::ToolCommand;
use std::io::Write;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).expect("arguments should parse")
}

#[test]
fn test_env_overrides_sqlldr_path() {
    temp_env::with_vars(
        [
            ("ORATOOL_SQLLDR", Some("/u01/app/oracle/bin/sqlldr")),
            ("ORACLE_PASSWORD", None),
        ],
        || {
            let Command::Sqlldr(args) = parse(&["oratool", "sqlldr", "--control", "x.ctl"]).command
            else {
                unreachable!("parsed sqlldr subcommand");
            };
            let command = args.into_command().unwrap();
            assert_eq!(command.program(), "/u01/app/oracle/bin/sqlldr");
            assert_eq!(
                command.render(),
                vec!["/u01/app/oracle/bin/sqlldr", "userid=/", "control=x.ctl"]
            );
        },
    );
}

#[test]
fn test_explicit_path_beats_env() {
    temp_env::with_var("ORATOOL_SQLPLUS", Some("/env/sqlplus"), || {
        let Command::Sqlplus(args) = parse(&[
            "oratool",
            "sqlplus",
            "--sqlplus",
            "/flag/sqlplus",
            "--NOLOG",
            "x.sql",
        ])
        .command
        else {
            unreachable!("parsed sqlplus subcommand");
        };
        let command = args.into_command().unwrap();
        assert_eq!(command.render(), vec!["/flag/sqlplus", "/NOLOG", "@x.sql"]);
    });
}

#[test]
fn test_env_password_is_used_and_redacted() {
    temp_env::with_var("ORACLE_PASSWORD", Some("s3cret"), || {
        let Command::Sqlplus(args) = parse(&[
            "oratool", "sqlplus", "--USER", "scott", "--CONN", "orcl", "--SYS", "SYSDBA",
            "--S", "report.sql",
        ])
        .command
        else {
            unreachable!("parsed sqlplus subcommand");
        };
        let command = args.into_command().unwrap();

        assert_eq!(
            command.render(),
            vec!["sqlplus", "-S", "scott/s3cret@orcl AS SYSDBA", "@report.sql"]
        );

        let masked = dry_run(&command);
        assert_eq!(masked, "sqlplus -S scott/****@orcl AS SYSDBA @report.sql");
        assert!(!masked.contains("s3cret"));
    });
}

#[test]
fn test_default_executables_without_env() {
    temp_env::with_vars_unset(["ORATOOL_SQLLDR", "ORACLE_PASSWORD"], || {
        let Command::Sqlldr(args) = parse(&["oratool", "sqlldr", "--NOLOG", "--direct=false"]).command
        else {
            unreachable!("parsed sqlldr subcommand");
        };
        let command = args.into_command().unwrap();
        assert_eq!(command.render(), vec!["sqlldr", "direct=false"]);
    });
}

#[test]
fn test_connect_params_file_with_flag_overrides() {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(br#"{"user": "app", "password": "pw", "dbname": "XE", "persistent": true}"#)
        .expect("Failed to write parameters");
    let path = file.path().to_str().expect("utf-8 temp path").to_string();

    temp_env::with_var_unset("ORACLE_PASSWORD", || {
        let Command::Connect(args) = parse(&[
            "oratool", "connect", "--params", path.as_str(), "--user", "admin", "--charset", "AL32UTF8",
        ])
        .command
        else {
            unreachable!("parsed connect subcommand");
        };

        let params = args.into_parameters().unwrap();
        assert_eq!(params.user.as_deref(), Some("admin"));
        assert_eq!(params.charset.as_deref(), Some("AL32UTF8"));
        assert!(params.persistent);
        assert!(params.password.is_some());
    });
}

#[test]
fn test_connect_env_password_replaces_params_file_password() {
    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(br#"{"user": "app", "password": "from-file", "dbname": "XE"}"#)
        .expect("Failed to write parameters");
    let path = file.path().to_str().expect("utf-8 temp path").to_string();

    temp_env::with_var("ORACLE_PASSWORD", Some("from-env"), || {
        let Command::Connect(args) = parse(&["oratool", "connect", "--params", path.as_str()]).command
        else {
            unreachable!("parsed connect subcommand");
        };

        let params = args.into_parameters().unwrap();
        assert_eq!(params.user.as_deref(), Some("app"));
        assert_eq!(params.password.as_deref(), Some("from-env"));
    });

    temp_env::with_var_unset("ORACLE_PASSWORD", || {
        let Command::Connect(args) = parse(&["oratool", "connect", "--params", path.as_str()]).command
        else {
            unreachable!("parsed connect subcommand");
        };

        let params = args.into_parameters().unwrap();
        assert_eq!(params.password.as_deref(), Some("from-file"));
    });
}

#[test]
fn test_connect_persistent_and_exclusive_rejected() {
    temp_env::with_var_unset("ORACLE_PASSWORD", || {
        let Command::Connect(args) =
            parse(&["oratool", "connect", "--persistent", "--exclusive"]).command
        else {
            unreachable!("parsed connect subcommand");
        };

        let params = args.into_parameters().unwrap();
        assert!(params.strategy().is_err());
    });
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = parse(&["oratool", "list", "-vv"]);
    assert_eq!(cli.global.verbose, 2);
    assert!(!cli.global.quiet);

    let cli = parse(&["oratool", "-q", "list"]);
    assert!(cli.global.quiet);
}
