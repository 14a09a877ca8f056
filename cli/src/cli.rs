// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::{error::Error, ffi::OsString, path::PathBuf};

use clap::{ArgMatches, Command, ValueHint, arg, builder::styling, crate_version, value_parser};
use colored::Colorize;
use futures::{FutureExt, future::BoxFuture};
use staysync_core::{APP_NAME, StaySync};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use crate::cmd_reservations::CmdReservations;
use crate::cmd_resolve::CmdResolve;
use crate::cmd_status::CmdStatus;
use crate::cmd_sync::CmdSync;
use crate::config::parse_config;

/// Run the staysync command-line interface.
pub async fn run() -> Result<(), Box<dyn Error>> {
    init_tracing();
    match Cli::parse() {
        Ok(cli) => {
            if let Err(e) = cli.run().await {
                eprintln!("{} {}", "Error:".red(), e);
            }
        }
        Err(e) => eprintln!("{} {}", "Error:".red(), e),
    }
    Ok(())
}

/// Logs go to stderr, `RUST_LOG` overrides the default `warn` level.
fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Command-line interface
#[derive(Debug)]
pub struct Cli {
    /// Path to the configuration file
    pub config: Option<PathBuf>,

    /// The command to execute
    pub command: Commands,
}

impl Cli {
    /// Create the command-line interface
    pub fn command() -> Command {
        const STYLES: styling::Styles = styling::Styles::styled()
            .header(styling::AnsiColor::Green.on_default().bold())
            .usage(styling::AnsiColor::Green.on_default().bold())
            .literal(styling::AnsiColor::Blue.on_default().bold())
            .placeholder(styling::AnsiColor::Cyan.on_default());

        Command::new(APP_NAME)
            .about("Mirror rental booking calendars (ICS) into a local reservation store.")
            .version(crate_version!())
            .styles(STYLES)
            .subcommand_required(true)
            .arg_required_else_help(true)
            .arg(
                arg!(-c --config [CONFIG] "Path to the configuration file")
                    .long_help(
                        "\
Path to the configuration file. Defaults to $STAYSYNC_CONFIG, then \
$XDG_CONFIG_HOME/staysync/config.toml on Linux and MacOS, %LOCALAPPDATA%/staysync/config.toml on Windows.",
                    )
                    .value_parser(value_parser!(PathBuf))
                    .value_hint(ValueHint::FilePath)
                    .global(true),
            )
            .subcommand(CmdSync::command())
            .subcommand(CmdStatus::command())
            .subcommand(CmdResolve::command())
            .subcommand(CmdReservations::command())
    }

    /// Parse the command-line arguments
    pub fn parse() -> Result<Self, Box<dyn Error>> {
        let commands = Self::command();
        let matches = commands.get_matches();
        Self::from(&matches)
    }

    /// Parse the specified arguments
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, Box<dyn Error>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let commands = Self::command();
        let matches = commands.try_get_matches_from(args)?;
        Self::from(&matches)
    }

    /// Create a CLI instance from the `ArgMatches`
    pub fn from(matches: &ArgMatches) -> Result<Self, Box<dyn Error>> {
        use Commands::*;
        let command = match matches.subcommand() {
            Some((CmdSync::NAME, matches)) => Sync(CmdSync::from(matches)),
            Some((CmdStatus::NAME, matches)) => Status(CmdStatus::from(matches)),
            Some((CmdResolve::NAME, matches)) => Resolve(CmdResolve::from(matches)),
            Some((CmdReservations::NAME, matches)) => {
                Reservations(CmdReservations::from(matches))
            }
            _ => return Err("a subcommand is required".into()),
        };

        let config = matches.get_one("config").cloned();
        Ok(Cli { config, command })
    }

    /// Run the command
    pub async fn run(self) -> Result<(), Box<dyn Error>> {
        self.command.run(self.config).await
    }
}

/// The commands available in the CLI
#[derive(Debug, Clone)]
pub enum Commands {
    /// Sync one or every property
    Sync(CmdSync),

    /// Show sync statuses
    Status(CmdStatus),

    /// Resolve a guest's booking
    Resolve(CmdResolve),

    /// List stored reservations
    Reservations(CmdReservations),
}

impl Commands {
    /// Run the command with the given configuration
    #[rustfmt::skip]
    pub async fn run(self, config: Option<PathBuf>) -> Result<(), Box<dyn Error>> {
        use Commands::*;
        match self {
            Sync(a)         => Self::run_with(config, |x| a.run(x).boxed()).await,
            Status(a)       => Self::run_with(config, |x| a.run(x).boxed()).await,
            Resolve(a)      => Self::run_with(config, |x| a.run(x).boxed()).await,
            Reservations(a) => Self::run_with(config, |x| a.run(x).boxed()).await,
        }
    }

    async fn run_with<F>(config: Option<PathBuf>, f: F) -> Result<(), Box<dyn Error>>
    where
        F: for<'a> FnOnce(&'a StaySync) -> BoxFuture<'a, Result<(), Box<dyn Error>>>,
    {
        tracing::debug!("parsing configuration...");
        let config = parse_config(config).await?;
        let engine = StaySync::new(config).await?;

        let result = f(&engine).await;

        engine.close().await?;
        result
    }
}
