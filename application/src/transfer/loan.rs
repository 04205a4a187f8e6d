use serde::{Deserialize, Serialize};

use kernel::prelude::entity::{DestructLoanHistory, LoanHistory, LoanStatus};

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct LoanHistoryDto {
    pub id: i64,
    pub user_id: i64,
    pub book_name: String,
    pub status: LoanStatus,
}

impl From<LoanHistory> for LoanHistoryDto {
    fn from(value: LoanHistory) -> Self {
        let DestructLoanHistory {
            id,
            user_id,
            book_name,
            status,
        } = value.into_destruct();
        Self {
            id: id.into(),
            user_id: user_id.into(),
            book_name: book_name.into(),
            status,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoanBookDto {
    pub user_name: String,
    pub book_name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReturnBookDto {
    pub user_name: String,
    pub book_name: String,
}
