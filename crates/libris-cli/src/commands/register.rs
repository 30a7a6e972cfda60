//! Register command implementation.

use anyhow::{Result, bail};
use clap::Args;

use libris::guard::REGISTER_PATH;
use libris::{RegisterInput, RegistrationOutcome};

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Username for the new account
    #[arg(long)]
    pub username: String,

    /// Email address
    #[arg(long)]
    pub email: String,

    /// Account password (6 to 100 characters)
    #[arg(long, env = "LIBRIS_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Log in with the new account afterwards
    #[arg(long)]
    pub login: bool,
}

pub async fn run(ctx: &Context, args: RegisterArgs) -> Result<()> {
    ctx.quiet_redirects();

    if !ctx
        .session
        .navigate(&ctx.guard, REGISTER_PATH)
        .await
        .is_allowed()
    {
        bail!("Already logged in. Run 'libris logout' before registering a new account.");
    }

    let input = RegisterInput::new(&args.username, &args.email, &args.password);

    if !args.login {
        let outcome = ctx.session.register(&input).await;
        if !outcome.success {
            bail!(
                "{}",
                outcome
                    .message
                    .as_deref()
                    .unwrap_or(libris::auth::REGISTRATION_FAILED)
            );
        }
        output::success("Account created");
        output::field("User", &args.username);
        return Ok(());
    }

    match ctx.session.register_and_login(&input).await {
        RegistrationOutcome::Registered => {
            output::success("Account created and logged in");
            output::field("User", &args.username);
            Ok(())
        }
        RegistrationOutcome::RegisteredLoginFailed { message } => {
            output::success("Account created");
            bail!("Automatic login failed: {message}")
        }
        RegistrationOutcome::RegistrationFailed { message } => bail!("{message}"),
    }
}
