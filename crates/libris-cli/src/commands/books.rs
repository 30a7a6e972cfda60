//! Book subcommands.

use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};

use libris::models::BookInput;

use super::{fetched, section_route};
use crate::context::Context;
use crate::output;

const SECTION: &str = "books";

#[derive(Subcommand, Debug)]
pub enum BooksCommand {
    /// List all books
    List {
        /// Only books whose title, author or genre contains this text
        /// (case-insensitive)
        #[arg(long)]
        search: Option<String>,
    },

    /// Show one book
    Get { id: i64 },

    /// Create a book (admin)
    Create(BookFields),

    /// Replace a book (admin)
    Update {
        id: i64,
        #[command(flatten)]
        fields: BookFields,
    },

    /// Delete a book (admin)
    Delete { id: i64 },
}

#[derive(Args, Debug)]
pub struct BookFields {
    #[arg(long)]
    pub title: String,

    #[arg(long)]
    pub isbn: String,

    #[arg(long)]
    pub author_id: i64,

    #[arg(long)]
    pub genre_id: i64,

    /// Publication date (YYYY-MM-DD)
    #[arg(long)]
    pub publication_date: Option<NaiveDate>,

    #[arg(long, default_value = "")]
    pub description: String,
}

impl From<BookFields> for BookInput {
    fn from(fields: BookFields) -> Self {
        BookInput {
            title: fields.title,
            isbn: fields.isbn,
            publication_date: fields.publication_date,
            description: fields.description,
            author_id: fields.author_id,
            genre_id: fields.genre_id,
        }
    }
}

pub async fn handle(ctx: &Context, cmd: BooksCommand) -> Result<()> {
    let books = ctx.session.client().books();

    match cmd {
        BooksCommand::List { search } => {
            ctx.enter(&section_route(SECTION, None)).await?;
            let mut items = books.list().await.context("Failed to list books")?;
            if let Some(query) = search {
                items.retain(|book| book.matches(&query));
            }
            output::json_lines(&items)
        }
        BooksCommand::Get { id } => {
            ctx.enter(&section_route(SECTION, Some(&id.to_string())))
                .await?;
            let book = fetched(books.get(id).await, "book", id)?;
            output::json_pretty(&book)
        }
        BooksCommand::Create(fields) => {
            ctx.enter(&section_route(SECTION, Some("create"))).await?;
            let book = books
                .create(&fields.into())
                .await
                .context("Failed to create book")?;
            output::success(&format!("Created book {}", book.id));
            output::json_pretty(&book)
        }
        BooksCommand::Update { id, fields } => {
            ctx.enter(&section_route(SECTION, Some(&format!("{id}/edit"))))
                .await?;
            let book = books
                .update(id, &fields.into())
                .await
                .context("Failed to update book")?;
            output::success(&format!("Updated book {}", book.id));
            output::json_pretty(&book)
        }
        BooksCommand::Delete { id } => {
            ctx.enter(&section_route(SECTION, Some(&format!("{id}/edit"))))
                .await?;
            books.delete(id).await.context("Failed to delete book")?;
            output::success(&format!("Deleted book {id}"));
            Ok(())
        }
    }
}
