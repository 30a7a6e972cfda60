//! Wire models for the library API.
//!
//! Field names follow the API's camelCase JSON. Read models carry the
//! server-assigned `id`; the `*Input` types are the bodies sent on create
//! and update.

mod author;
mod book;
mod genre;
mod user;

pub use author::{Author, AuthorInput};
pub use book::{Book, BookInput};
pub use genre::{Genre, GenreInput};
pub use user::{Role, User};
