use crate::command::CreateLoanHistory;
use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::LoanHistory;
use crate::KernelError;

#[async_trait::async_trait]
pub trait LoanHistoryModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn create(
        &self,
        con: &mut Self::Transaction,
        history: &CreateLoanHistory,
    ) -> error_stack::Result<LoanHistory, KernelError>;
    async fn update(
        &self,
        con: &mut Self::Transaction,
        history: &LoanHistory,
    ) -> error_stack::Result<(), KernelError>;
    async fn delete_all(&self, con: &mut Self::Transaction)
        -> error_stack::Result<(), KernelError>;
}

pub trait DependOnLoanHistoryModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type LoanHistoryModifier: LoanHistoryModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn loan_history_modifier(&self) -> &Self::LoanHistoryModifier;
}
