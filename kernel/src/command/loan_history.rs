use destructure::Destructure;
use vodca::References;

use crate::entity::{BookName, UserId};

/// New loans always start in the `Loaned` state.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct CreateLoanHistory {
    user_id: UserId,
    book_name: BookName,
}

impl CreateLoanHistory {
    pub fn new(user_id: UserId, book_name: BookName) -> Self {
        Self { user_id, book_name }
    }
}
