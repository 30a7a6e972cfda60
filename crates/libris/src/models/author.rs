use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Book;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub biography: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub books: Option<Vec<Book>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorInput {
    pub name: String,
    pub biography: String,
    pub birth_date: Option<NaiveDate>,
}
