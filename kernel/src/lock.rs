use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::BookName;
use crate::KernelError;

/// Serializes loan and return operations on the same book name.
///
/// The lock is held until the transaction it was taken in commits or rolls back.
#[async_trait::async_trait]
pub trait LoanLock: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn lock(
        &self,
        con: &mut Self::Transaction,
        book_name: &BookName,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnLoanLock: 'static + Sync + Send + DependOnDatabaseConnection {
    type LoanLock: LoanLock<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn loan_lock(&self) -> &Self::LoanLock;
}
