use destructure::Destructure;
use vodca::References;

use crate::entity::{BookCategory, BookName};

/// A book that has not been persisted yet; the store assigns its id.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct CreateBook {
    name: BookName,
    category: BookCategory,
}

impl CreateBook {
    pub fn new(name: BookName, category: BookCategory) -> Self {
        Self { name, category }
    }
}
