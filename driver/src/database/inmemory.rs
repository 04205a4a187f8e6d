use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{DependOnBookQuery, DependOnLoanHistoryQuery, DependOnUserQuery};
use kernel::interface::update::{
    DependOnBookModifier, DependOnLoanHistoryModifier, DependOnLoanLock, DependOnUserModifier,
};
use kernel::prelude::entity::{Book, BookId, LoanHistory, LoanHistoryId, User, UserId};
use kernel::KernelError;

pub use self::{book::*, loan_history::*, user::*};

mod book;
mod loan_history;
mod user;

/// Process-local store. Transactions are serialized: one holds the store until it is
/// committed or dropped, and its writes are applied only on commit.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    store: Arc<Mutex<Store>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Store {
    sequence: i64,
    books: BTreeMap<BookId, Book>,
    users: BTreeMap<UserId, User>,
    loan_histories: BTreeMap<LoanHistoryId, LoanHistory>,
}

impl Store {
    fn next_id(&mut self) -> i64 {
        self.sequence += 1;
        self.sequence
    }
}

pub struct InMemoryTransaction {
    committed: OwnedMutexGuard<Store>,
    staged: Store,
}

impl InMemoryTransaction {
    pub(crate) fn store(&self) -> &Store {
        &self.staged
    }

    pub(crate) fn store_mut(&mut self) -> &mut Store {
        &mut self.staged
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for InMemoryDatabase {
    type Transaction = InMemoryTransaction;
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let committed = self.store.clone().lock_owned().await;
        let staged = committed.clone();
        tracing::trace!("In-memory transaction started");
        Ok(InMemoryTransaction { committed, staged })
    }
}

#[async_trait::async_trait]
impl Transaction for InMemoryTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        let InMemoryTransaction {
            mut committed,
            staged,
        } = self;
        *committed = staged;
        tracing::trace!("In-memory transaction committed");
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        tracing::trace!("In-memory transaction rolled back");
        Ok(())
    }
}

impl DependOnBookQuery for InMemoryDatabase {
    type BookQuery = InMemoryBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &InMemoryBookRepository
    }
}

impl DependOnBookModifier for InMemoryDatabase {
    type BookModifier = InMemoryBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &InMemoryBookRepository
    }
}

impl DependOnUserQuery for InMemoryDatabase {
    type UserQuery = InMemoryUserRepository;
    fn user_query(&self) -> &Self::UserQuery {
        &InMemoryUserRepository
    }
}

impl DependOnUserModifier for InMemoryDatabase {
    type UserModifier = InMemoryUserRepository;
    fn user_modifier(&self) -> &Self::UserModifier {
        &InMemoryUserRepository
    }
}

impl DependOnLoanHistoryQuery for InMemoryDatabase {
    type LoanHistoryQuery = InMemoryLoanHistoryRepository;
    fn loan_history_query(&self) -> &Self::LoanHistoryQuery {
        &InMemoryLoanHistoryRepository
    }
}

impl DependOnLoanHistoryModifier for InMemoryDatabase {
    type LoanHistoryModifier = InMemoryLoanHistoryRepository;
    fn loan_history_modifier(&self) -> &Self::LoanHistoryModifier {
        &InMemoryLoanHistoryRepository
    }
}

impl DependOnLoanLock for InMemoryDatabase {
    type LoanLock = InMemoryLoanHistoryRepository;
    fn loan_lock(&self) -> &Self::LoanLock {
        &InMemoryLoanHistoryRepository
    }
}
