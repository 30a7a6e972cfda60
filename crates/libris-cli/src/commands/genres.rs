//! Genre subcommands.

use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};

use libris::models::GenreInput;

use super::{fetched, section_route};
use crate::context::Context;
use crate::output;

const SECTION: &str = "genres";

#[derive(Subcommand, Debug)]
pub enum GenresCommand {
    /// List all genres
    List,

    /// Show one genre
    Get { id: i64 },

    /// Create a genre (admin)
    Create(GenreFields),

    /// Replace a genre (admin)
    Update {
        id: i64,
        #[command(flatten)]
        fields: GenreFields,
    },

    /// Delete a genre (admin)
    Delete { id: i64 },
}

#[derive(Args, Debug)]
pub struct GenreFields {
    #[arg(long)]
    pub name: String,

    #[arg(long, default_value = "")]
    pub description: String,
}

impl From<GenreFields> for GenreInput {
    fn from(fields: GenreFields) -> Self {
        GenreInput {
            name: fields.name,
            description: fields.description,
        }
    }
}

pub async fn handle(ctx: &Context, cmd: GenresCommand) -> Result<()> {
    let genres = ctx.session.client().genres();

    match cmd {
        GenresCommand::List => {
            ctx.enter(&section_route(SECTION, None)).await?;
            let items = genres.list().await.context("Failed to list genres")?;
            output::json_lines(&items)
        }
        GenresCommand::Get { id } => {
            ctx.enter(&section_route(SECTION, Some(&id.to_string())))
                .await?;
            let genre = fetched(genres.get(id).await, "genre", id)?;
            output::json_pretty(&genre)
        }
        GenresCommand::Create(fields) => {
            ctx.enter(&section_route(SECTION, Some("create"))).await?;
            let genre = genres
                .create(&fields.into())
                .await
                .context("Failed to create genre")?;
            output::success(&format!("Created genre {}", genre.id));
            output::json_pretty(&genre)
        }
        GenresCommand::Update { id, fields } => {
            ctx.enter(&section_route(SECTION, Some(&format!("{id}/edit"))))
                .await?;
            let genre = genres
                .update(id, &fields.into())
                .await
                .context("Failed to update genre")?;
            output::success(&format!("Updated genre {}", genre.id));
            output::json_pretty(&genre)
        }
        GenresCommand::Delete { id } => {
            ctx.enter(&section_route(SECTION, Some(&format!("{id}/edit"))))
                .await?;
            genres.delete(id).await.context("Failed to delete genre")?;
            output::success(&format!("Deleted genre {id}"));
            Ok(())
        }
    }
}
