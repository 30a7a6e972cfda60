//! Whoami command implementation.

use anyhow::{Context as _, Result};
use clap::Args;

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct WhoamiArgs {
    /// Print the user as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(ctx: &Context, args: WhoamiArgs) -> Result<()> {
    ctx.session.initialize_auth().await;

    let user = ctx
        .session
        .user()
        .await
        .context("No active session. Run 'libris login' first.")?;

    if args.json {
        return output::json_pretty(&user);
    }

    output::field("User", &user.username);
    output::field("ID", &user.id.to_string());
    if let Some(email) = &user.email {
        output::field("Email", email);
    }
    output::field(
        "Role",
        user.role.as_ref().map(|r| r.as_str()).unwrap_or("(none)"),
    );
    output::field("Admin", if user.is_admin() { "yes" } else { "no" });

    Ok(())
}
