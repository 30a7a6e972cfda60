//! Login command implementation.

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;

use libris::Credentials;
use libris::guard::LOGIN_PATH;

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Username to authenticate with
    #[arg(long)]
    pub username: String,

    /// Account password
    #[arg(long, env = "LIBRIS_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Replace an existing session instead of keeping it
    #[arg(long)]
    pub force: bool,
}

pub async fn run(ctx: &Context, args: LoginArgs) -> Result<()> {
    ctx.quiet_redirects();

    let decision = ctx.session.navigate(&ctx.guard, LOGIN_PATH).await;
    if !decision.is_allowed() {
        if !args.force {
            if let Some(user) = ctx.session.user().await {
                output::field("Logged in as", &user.username);
            }
            eprintln!("{}", "Already logged in. Use --force to switch accounts.".dimmed());
            return Ok(());
        }
        ctx.session.logout().await;
    }

    eprintln!("{}", "Logging in...".dimmed());

    let outcome = ctx
        .session
        .login(&Credentials::new(&args.username, &args.password))
        .await;

    if !outcome.success {
        bail!(
            "{}",
            outcome.message.as_deref().unwrap_or(libris::auth::LOGIN_FAILED)
        );
    }

    output::success("Logged in successfully");
    println!();
    if let Some(user) = ctx.session.user().await {
        output::field("User", &user.username);
        if let Some(role) = &user.role {
            output::field("Role", role.as_str());
        }
    }
    output::field("API", ctx.session.client().config().base_url.as_str());

    Ok(())
}
