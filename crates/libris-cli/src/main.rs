//! libris - terminal client for the library-management API.
//!
//! A thin wrapper over the `libris` library: every command runs through the
//! same session, token store and route guard a graphical client would use.

mod cli;
mod commands;
mod context;
mod output;
mod storage;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use commands::{authors, books, dashboard, genres, login, logout, navigate, register, whoami};
use context::Context;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    let ctx = Context::new(&cli.api, cli.timeout())?;

    match cli.command {
        Commands::Login(args) => login::run(&ctx, args).await,
        Commands::Register(args) => register::run(&ctx, args).await,
        Commands::Logout(args) => logout::run(&ctx, args).await,
        Commands::Whoami(args) => whoami::run(&ctx, args).await,
        Commands::Navigate(args) => navigate::run(&ctx, args).await,
        Commands::Dashboard(args) => dashboard::run(&ctx, args).await,
        Commands::Books(cmd) => books::handle(&ctx, cmd).await,
        Commands::Authors(cmd) => authors::handle(&ctx, cmd).await,
        Commands::Genres(cmd) => genres::handle(&ctx, cmd).await,
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
