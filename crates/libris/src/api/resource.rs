//! Generic CRUD collection.

use std::marker::PhantomData;

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument};

use crate::Result;
use crate::http::ApiClient;
use crate::models::{Author, AuthorInput, Book, BookInput, Genre, GenreInput};

pub type Books = Resource<Book, BookInput>;
pub type Authors = Resource<Author, AuthorInput>;
pub type Genres = Resource<Genre, GenreInput>;

/// A REST collection at `path` with items of type `T`, written with `I`.
///
/// All calls go through the [`ApiClient`], so a 401 on any of them ends the
/// session.
#[derive(Debug, Clone)]
pub struct Resource<T, I> {
    client: ApiClient,
    path: &'static str,
    _marker: PhantomData<fn() -> (T, I)>,
}

impl<T, I> Resource<T, I>
where
    T: DeserializeOwned,
    I: Serialize,
{
    pub fn new(client: ApiClient, path: &'static str) -> Self {
        Self {
            client,
            path,
            _marker: PhantomData,
        }
    }

    pub fn path(&self) -> &'static str {
        self.path
    }

    fn item_path(&self, id: i64) -> String {
        format!("{}/{}", self.path, id)
    }

    #[instrument(skip(self), fields(resource = self.path))]
    pub async fn list(&self) -> Result<Vec<T>> {
        let items: Vec<T> = self.client.get(self.path).await?;
        debug!(count = items.len(), "Listed");
        Ok(items)
    }

    #[instrument(skip(self), fields(resource = self.path))]
    pub async fn get(&self, id: i64) -> Result<T> {
        self.client.get(&self.item_path(id)).await
    }

    #[instrument(skip(self, input), fields(resource = self.path))]
    pub async fn create(&self, input: &I) -> Result<T> {
        self.client.post(self.path, input).await
    }

    #[instrument(skip(self, input), fields(resource = self.path))]
    pub async fn update(&self, id: i64, input: &I) -> Result<T> {
        self.client.put(&self.item_path(id), input).await
    }

    #[instrument(skip(self), fields(resource = self.path))]
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.client.delete(&self.item_path(id)).await
    }
}
