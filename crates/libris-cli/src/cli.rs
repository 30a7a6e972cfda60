//! CLI argument definitions.

use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::commands::{authors, books, dashboard, genres, login, logout, navigate, register, whoami};

/// Terminal client for the library-management API.
#[derive(Parser, Debug)]
#[command(name = "libris")]
#[command(author, version = env!("LIBRIS_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// API base URL
    #[arg(long, global = true, env = "LIBRIS_API_URL", default_value = "http://localhost:8080")]
    pub api: String,

    /// Request timeout in seconds
    #[arg(long = "timeout", global = true, default_value_t = 10)]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the session token
    Login(login::LoginArgs),

    /// Create a new account
    Register(register::RegisterArgs),

    /// Forget the stored session
    Logout(logout::LogoutArgs),

    /// Display the signed-in user
    Whoami(whoami::WhoamiArgs),

    /// Check whether a view path is reachable with the current session
    Navigate(navigate::NavigateArgs),

    /// Show collection counts
    Dashboard(dashboard::DashboardArgs),

    /// Book operations
    #[command(subcommand)]
    Books(books::BooksCommand),

    /// Author operations
    #[command(subcommand)]
    Authors(authors::AuthorsCommand),

    /// Genre operations
    #[command(subcommand)]
    Genres(genres::GenresCommand),
}
