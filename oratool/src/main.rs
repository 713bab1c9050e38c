//! Oracle client tool runner.
//!
//! Translates typed options into exact `sqlldr` and `sqlplus` command lines
//! and runs them, or resolves a native database connection.
//!
//! # Security Guarantees
//! - Passwords never appear in logs or dry-run output
//! - Native connectivity is only compiled in with the `oracle` feature

use anyhow::Context;
use clap::Parser;
use oratool::cli::{Cli, Command, ConnectCommandArgs, describe_target, option_table};
use oratool::launch;
use oratool_core::{
    ConnectionParameters, LOADER_OPTIONS, OratoolError, RUNNER_OPTIONS, ToolCommand, init_logging,
};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose, cli.global.quiet)?;

    let result = match cli.command {
        Command::Sqlldr(args) => {
            let dry_run = args.launch.dry_run;
            let no_fail = args.launch.no_fail;
            let command = args.into_command().context("invalid sqlldr options")?;
            execute(&command, dry_run, no_fail).await
        }
        Command::Sqlplus(args) => {
            let dry_run = args.launch.dry_run;
            let no_fail = args.launch.no_fail;
            let command = args.into_command().context("invalid sqlplus options")?;
            execute(&command, dry_run, no_fail).await
        }
        Command::Connect(args) => connect(args),
        Command::List => {
            print!("{}", option_table("SQL*Loader options:", LOADER_OPTIONS));
            println!();
            print!("{}", option_table("SQL*Plus flags:", RUNNER_OPTIONS));
            Ok(())
        }
    };

    match result {
        Err(OratoolError::ProcessFailed { program, code }) => {
            error!("{} failed", program);
            std::process::exit(code.unwrap_or(1));
        }
        other => Ok(other?),
    }
}

/// Prints or runs a tool invocation.
async fn execute<C: ToolCommand>(
    command: &C,
    dry_run: bool,
    no_fail: bool,
) -> oratool_core::Result<()> {
    if dry_run {
        println!("{}", launch::dry_run(command));
        return Ok(());
    }

    launch::run(command, no_fail).await.map_err(|e| {
        error!("Tool execution failed: {}", e);
        e
    })?;

    Ok(())
}

/// Resolves the connection strategy and, unless dry-running, connects.
fn connect(args: ConnectCommandArgs) -> oratool_core::Result<()> {
    let dry_run = args.dry_run;
    let params = args.into_parameters()?;

    let strategy = params.strategy().map_err(|e| {
        error!("Invalid connection parameters: {}", e);
        e
    })?;

    info!("Target: {}", describe_target(&params.easy_connect));

    if dry_run {
        println!("strategy: {strategy}");
        println!("{:?}", params.connect_args());
        return Ok(());
    }

    open_connection(&params)
}

#[cfg(feature = "oracle")]
fn open_connection(params: &ConnectionParameters) -> oratool_core::Result<()> {
    use oratool_core::ConnectionResolver;
    use oratool_core::connection::OracleConnector;

    let resolver = ConnectionResolver::new(OracleConnector::new());
    let connection = resolver.connect(params).map_err(|e| {
        error!("Connection test failed: {}", e);
        e
    })?;

    println!("Connection successful ({} strategy)", connection.strategy());
    Ok(())
}

#[cfg(not(feature = "oracle"))]
fn open_connection(_params: &ConnectionParameters) -> oratool_core::Result<()> {
    let e = OratoolError::configuration(
        "native Oracle connectivity is not compiled in; rebuild with --features oracle",
    );
    error!("{}", e);
    Err(e)
}
