//! Author subcommands.

use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};

use libris::models::AuthorInput;

use super::{fetched, section_route};
use crate::context::Context;
use crate::output;

const SECTION: &str = "authors";

#[derive(Subcommand, Debug)]
pub enum AuthorsCommand {
    /// List all authors
    List,

    /// Show one author
    Get { id: i64 },

    /// Create an author (admin)
    Create(AuthorFields),

    /// Replace an author (admin)
    Update {
        id: i64,
        #[command(flatten)]
        fields: AuthorFields,
    },

    /// Delete an author (admin)
    Delete { id: i64 },
}

#[derive(Args, Debug)]
pub struct AuthorFields {
    #[arg(long)]
    pub name: String,

    #[arg(long, default_value = "")]
    pub biography: String,

    /// Birth date (YYYY-MM-DD)
    #[arg(long)]
    pub birth_date: Option<NaiveDate>,
}

impl From<AuthorFields> for AuthorInput {
    fn from(fields: AuthorFields) -> Self {
        AuthorInput {
            name: fields.name,
            biography: fields.biography,
            birth_date: fields.birth_date,
        }
    }
}

pub async fn handle(ctx: &Context, cmd: AuthorsCommand) -> Result<()> {
    let authors = ctx.session.client().authors();

    match cmd {
        AuthorsCommand::List => {
            ctx.enter(&section_route(SECTION, None)).await?;
            let items = authors.list().await.context("Failed to list authors")?;
            output::json_lines(&items)
        }
        AuthorsCommand::Get { id } => {
            ctx.enter(&section_route(SECTION, Some(&id.to_string())))
                .await?;
            let author = fetched(authors.get(id).await, "author", id)?;
            output::json_pretty(&author)
        }
        AuthorsCommand::Create(fields) => {
            ctx.enter(&section_route(SECTION, Some("create"))).await?;
            let author = authors
                .create(&fields.into())
                .await
                .context("Failed to create author")?;
            output::success(&format!("Created author {}", author.id));
            output::json_pretty(&author)
        }
        AuthorsCommand::Update { id, fields } => {
            ctx.enter(&section_route(SECTION, Some(&format!("{id}/edit"))))
                .await?;
            let author = authors
                .update(id, &fields.into())
                .await
                .context("Failed to update author")?;
            output::success(&format!("Updated author {}", author.id));
            output::json_pretty(&author)
        }
        AuthorsCommand::Delete { id } => {
            ctx.enter(&section_route(SECTION, Some(&format!("{id}/edit"))))
                .await?;
            authors.delete(id).await.context("Failed to delete author")?;
            output::success(&format!("Deleted author {id}"));
            Ok(())
        }
    }
}
