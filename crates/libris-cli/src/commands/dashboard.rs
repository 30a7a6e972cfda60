//! Dashboard command implementation.

use anyhow::{Context as _, Result};
use clap::Args;

use libris::DashboardSummary;
use libris::guard::DASHBOARD_PATH;

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct DashboardArgs {
    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(ctx: &Context, args: DashboardArgs) -> Result<()> {
    ctx.enter(DASHBOARD_PATH).await?;

    let summary = DashboardSummary::load(&ctx.session)
        .await
        .context("Failed to load dashboard")?;

    if args.json {
        return output::json_pretty(&summary);
    }

    output::field("Welcome back", &summary.username);
    println!();
    output::field("Books", &summary.books.to_string());
    output::field("Authors", &summary.authors.to_string());
    output::field("Genres", &summary.genres.to_string());
    if summary.is_admin {
        output::field("Admin", "you can create and edit books, authors and genres");
    }

    Ok(())
}
