use error_stack::Report;

use kernel::interface::query::LoanHistoryQuery;
use kernel::interface::update::{LoanHistoryModifier, LoanLock};
use kernel::prelude::entity::{
    BookName, CreateLoanHistory, DestructCreateLoanHistory, LoanHistory, LoanHistoryId,
    LoanStatus, UserId,
};
use kernel::KernelError;

use crate::database::InMemoryTransaction;

pub struct InMemoryLoanHistoryRepository;

impl InMemoryLoanHistoryRepository {
    fn select(
        con: &InMemoryTransaction,
        filter: impl Fn(&LoanHistory) -> bool,
        status: Option<&LoanStatus>,
    ) -> Vec<LoanHistory> {
        con.store()
            .loan_histories
            .values()
            .filter(|history| status.map_or(true, |status| history.status() == status))
            .filter(|history| filter(*history))
            .cloned()
            .collect()
    }
}

#[async_trait::async_trait]
impl LoanHistoryQuery for InMemoryLoanHistoryRepository {
    type Transaction = InMemoryTransaction;

    async fn find_all(
        &self,
        con: &mut InMemoryTransaction,
        status: Option<&LoanStatus>,
    ) -> error_stack::Result<Vec<LoanHistory>, KernelError> {
        Ok(Self::select(con, |_| true, status))
    }

    async fn find_by_book_name(
        &self,
        con: &mut InMemoryTransaction,
        book_name: &BookName,
        status: Option<&LoanStatus>,
    ) -> error_stack::Result<Vec<LoanHistory>, KernelError> {
        Ok(Self::select(
            con,
            |history| history.book_name() == book_name,
            status,
        ))
    }

    async fn find_by_user_and_book_name(
        &self,
        con: &mut InMemoryTransaction,
        user_id: &UserId,
        book_name: &BookName,
        status: Option<&LoanStatus>,
    ) -> error_stack::Result<Vec<LoanHistory>, KernelError> {
        Ok(Self::select(
            con,
            |history| history.user_id() == user_id && history.book_name() == book_name,
            status,
        ))
    }
}

#[async_trait::async_trait]
impl LoanHistoryModifier for InMemoryLoanHistoryRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        history: &CreateLoanHistory,
    ) -> error_stack::Result<LoanHistory, KernelError> {
        let DestructCreateLoanHistory { user_id, book_name } = history.clone().into_destruct();
        let store = con.store_mut();
        if !store.users.contains_key(&user_id) {
            return Err(Report::new(KernelError::not_found(format!(
                "user id {} not found",
                user_id.as_ref()
            ))));
        }
        let id = LoanHistoryId::new(store.next_id());
        let history = LoanHistory::new(id, user_id, book_name, LoanStatus::Loaned);
        store.loan_histories.insert(id, history.clone());
        Ok(history)
    }

    async fn update(
        &self,
        con: &mut InMemoryTransaction,
        history: &LoanHistory,
    ) -> error_stack::Result<(), KernelError> {
        match con.store_mut().loan_histories.get_mut(history.id()) {
            Some(stored) => {
                *stored = history.clone();
                Ok(())
            }
            None => Err(Report::new(KernelError::not_found(format!(
                "loan history id {} not found",
                history.id().as_ref()
            )))),
        }
    }

    async fn delete_all(&self, con: &mut InMemoryTransaction) -> error_stack::Result<(), KernelError> {
        con.store_mut().loan_histories.clear();
        Ok(())
    }
}

/// The transaction already holds the whole store, so there is nothing more to take.
#[async_trait::async_trait]
impl LoanLock for InMemoryLoanHistoryRepository {
    type Transaction = InMemoryTransaction;

    async fn lock(
        &self,
        _con: &mut InMemoryTransaction,
        book_name: &BookName,
    ) -> error_stack::Result<(), KernelError> {
        tracing::trace!(book = %book_name, "Loan lock held by transaction");
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::LoanHistoryQuery;
    use kernel::interface::update::{LoanHistoryModifier, UserModifier};
    use kernel::prelude::entity::{
        BookName, CreateLoanHistory, CreateUser, LoanStatus, UserId, UserName,
    };
    use kernel::KernelError;

    use crate::database::{
        InMemoryDatabase, InMemoryLoanHistoryRepository, InMemoryUserRepository,
    };

    #[tokio::test]
    async fn filter_by_status_and_owner() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let mut con = db.transact().await?;
        let daeun = InMemoryUserRepository
            .create(&mut con, &CreateUser::new(UserName::new("daeun"), None))
            .await?;
        let minji = InMemoryUserRepository
            .create(&mut con, &CreateUser::new(UserName::new("minji"), None))
            .await?;
        let name = BookName::new("긴긴밤");

        let first = InMemoryLoanHistoryRepository
            .create(&mut con, &CreateLoanHistory::new(*daeun.id(), name.clone()))
            .await?;
        InMemoryLoanHistoryRepository
            .update(&mut con, &first.clone().mark_returned()?)
            .await?;
        InMemoryLoanHistoryRepository
            .create(&mut con, &CreateLoanHistory::new(*minji.id(), name.clone()))
            .await?;

        let all = InMemoryLoanHistoryRepository
            .find_by_book_name(&mut con, &name, None)
            .await?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id(), first.id());

        let loaned = InMemoryLoanHistoryRepository
            .find_by_book_name(&mut con, &name, Some(&LoanStatus::Loaned))
            .await?;
        assert_eq!(loaned.len(), 1);
        assert_eq!(loaned[0].user_id(), minji.id());

        let mine = InMemoryLoanHistoryRepository
            .find_by_user_and_book_name(&mut con, daeun.id(), &name, Some(&LoanStatus::Loaned))
            .await?;
        assert!(mine.is_empty());

        let returned = InMemoryLoanHistoryRepository
            .find_all(&mut con, Some(&LoanStatus::Returned))
            .await?;
        assert_eq!(returned.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn reject_unknown_owner() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let mut con = db.transact().await?;

        let report = InMemoryLoanHistoryRepository
            .create(
                &mut con,
                &CreateLoanHistory::new(UserId::new(7), BookName::new("긴긴밤")),
            )
            .await
            .unwrap_err();
        assert!(matches!(report.current_context(), KernelError::NotFound(_)));
        Ok(())
    }

    #[tokio::test]
    async fn deleting_users_removes_their_histories() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        let mut con = db.transact().await?;
        let user = InMemoryUserRepository
            .create(&mut con, &CreateUser::new(UserName::new("daeun"), None))
            .await?;
        InMemoryLoanHistoryRepository
            .create(&mut con, &CreateLoanHistory::new(*user.id(), BookName::new("A")))
            .await?;

        InMemoryUserRepository.delete_all(&mut con).await?;

        let all = InMemoryLoanHistoryRepository.find_all(&mut con, None).await?;
        assert!(all.is_empty());
        Ok(())
    }
}
