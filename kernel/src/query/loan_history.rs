use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{BookName, LoanHistory, LoanStatus, UserId};
use crate::KernelError;

/// Every finder returns records ordered by id. `None` as status matches any status.
#[async_trait::async_trait]
pub trait LoanHistoryQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_all(
        &self,
        con: &mut Self::Transaction,
        status: Option<&LoanStatus>,
    ) -> error_stack::Result<Vec<LoanHistory>, KernelError>;
    async fn find_by_book_name(
        &self,
        con: &mut Self::Transaction,
        book_name: &BookName,
        status: Option<&LoanStatus>,
    ) -> error_stack::Result<Vec<LoanHistory>, KernelError>;
    async fn find_by_user_and_book_name(
        &self,
        con: &mut Self::Transaction,
        user_id: &UserId,
        book_name: &BookName,
        status: Option<&LoanStatus>,
    ) -> error_stack::Result<Vec<LoanHistory>, KernelError>;
}

pub trait DependOnLoanHistoryQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type LoanHistoryQuery: LoanHistoryQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn loan_history_query(&self) -> &Self::LoanHistoryQuery;
}
