//! Navigate command implementation.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use libris::Decision;

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct NavigateArgs {
    /// View path, e.g. /dashboard/books/create
    pub path: String,

    /// Print the decision as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    path: &'a str,
    allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect: Option<&'a str>,
}

pub async fn run(ctx: &Context, args: NavigateArgs) -> Result<()> {
    let decision = ctx.session.navigate(&ctx.guard, &args.path).await;

    if args.json {
        return output::json(&Report {
            path: &args.path,
            allowed: decision.is_allowed(),
            redirect: decision.redirect_target(),
        });
    }

    match &decision {
        Decision::Allow => output::success(&format!("{} is reachable", args.path)),
        Decision::Redirect(to) => output::field("Redirect", &format!("{} -> {}", args.path, to)),
    }

    Ok(())
}
