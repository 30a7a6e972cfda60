//! Typed access to the library's REST resources.

mod dashboard;
mod resource;

pub use dashboard::DashboardSummary;
pub use resource::{Authors, Books, Genres, Resource};

use crate::http::{AUTHORS, ApiClient, BOOKS, GENRES};

impl ApiClient {
    pub fn books(&self) -> Books {
        Resource::new(self.clone(), BOOKS)
    }

    pub fn authors(&self) -> Authors {
        Resource::new(self.clone(), AUTHORS)
    }

    pub fn genres(&self) -> Genres {
        Resource::new(self.clone(), GENRES)
    }
}
