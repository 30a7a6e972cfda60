use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub isbn: String,
    #[serde(default)]
    pub publication_date: Option<NaiveDate>,
    #[serde(default)]
    pub description: String,
    pub author_id: i64,
    pub genre_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre_name: Option<String>,
}

impl Book {
    /// Case-insensitive search over title, author name and genre name.
    ///
    /// The query is trimmed first; a blank query matches every book.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }

        [
            Some(self.title.as_str()),
            self.author_name.as_deref(),
            self.genre_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&query))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookInput {
    pub title: String,
    pub isbn: String,
    pub publication_date: Option<NaiveDate>,
    pub description: String,
    pub author_id: i64,
    pub genre_id: i64,
}
