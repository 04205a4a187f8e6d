use serde::{Deserialize, Serialize};

use kernel::prelude::entity::{Book, BookCategory, DestructBook};

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct BookDto {
    pub id: i64,
    pub name: String,
    pub category: BookCategory,
}

impl From<Book> for BookDto {
    fn from(value: Book) -> Self {
        let DestructBook { id, name, category } = value.into_destruct();
        Self {
            id: id.into(),
            name: name.into(),
            category,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookDto {
    pub name: String,
    pub category: BookCategory,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct BookStatDto {
    pub category: BookCategory,
    pub count: usize,
}
