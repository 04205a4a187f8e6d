use std::ops::{Deref, DerefMut};

use error_stack::Report;
use sqlx::migrate::MigrateError;
use sqlx::{Error, PgConnection, Pool, Postgres};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{DependOnBookQuery, DependOnLoanHistoryQuery, DependOnUserQuery};
use kernel::interface::update::{
    DependOnBookModifier, DependOnLoanHistoryModifier, DependOnLoanLock, DependOnUserModifier,
};
use kernel::KernelError;

use crate::env;
use crate::error::ConvertError;

pub use self::{book::*, loan_history::*, user::*};

mod book;
mod loan_history;
mod user;

static POSTGRES_URL: &str = "POSTGRES_URL";

pub struct PostgresDatabase {
    pool: Pool<Postgres>,
}

impl PostgresDatabase {
    pub async fn new() -> error_stack::Result<Self, KernelError> {
        let url = env(POSTGRES_URL)?;
        Self::connect(&url).await
    }

    pub async fn connect(url: &str) -> error_stack::Result<Self, KernelError> {
        let pool = Pool::connect(url).await.convert_error()?;
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .convert_error()?;
        tracing::debug!("Postgres migrations applied");
        Ok(Self { pool })
    }
}

impl Clone for PostgresDatabase {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
        }
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for PostgresDatabase {
    type Transaction = PostgresTransaction;
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let transaction = self.pool.begin().await.convert_error()?;
        Ok(PostgresTransaction(transaction))
    }
}

pub struct PostgresTransaction(sqlx::Transaction<'static, Postgres>);

#[async_trait::async_trait]
impl Transaction for PostgresTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        self.0.commit().await.convert_error()
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        self.0.rollback().await.convert_error()
    }
}

impl Deref for PostgresTransaction {
    type Target = PgConnection;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for PostgresTransaction {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl DependOnBookQuery for PostgresDatabase {
    type BookQuery = PostgresBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &PostgresBookRepository
    }
}

impl DependOnBookModifier for PostgresDatabase {
    type BookModifier = PostgresBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &PostgresBookRepository
    }
}

impl DependOnUserQuery for PostgresDatabase {
    type UserQuery = PostgresUserRepository;
    fn user_query(&self) -> &Self::UserQuery {
        &PostgresUserRepository
    }
}

impl DependOnUserModifier for PostgresDatabase {
    type UserModifier = PostgresUserRepository;
    fn user_modifier(&self) -> &Self::UserModifier {
        &PostgresUserRepository
    }
}

impl DependOnLoanHistoryQuery for PostgresDatabase {
    type LoanHistoryQuery = PostgresLoanHistoryRepository;
    fn loan_history_query(&self) -> &Self::LoanHistoryQuery {
        &PostgresLoanHistoryRepository
    }
}

impl DependOnLoanHistoryModifier for PostgresDatabase {
    type LoanHistoryModifier = PostgresLoanHistoryRepository;
    fn loan_history_modifier(&self) -> &Self::LoanHistoryModifier {
        &PostgresLoanHistoryRepository
    }
}

impl DependOnLoanLock for PostgresDatabase {
    type LoanLock = PostgresLoanHistoryRepository;
    fn loan_lock(&self) -> &Self::LoanLock {
        &PostgresLoanHistoryRepository
    }
}

impl<T> ConvertError for Result<T, Error> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| match error {
            Error::PoolTimedOut => Report::from(error).change_context(KernelError::Timeout),
            Error::Database(ref database)
                if database.is_unique_violation() || database.is_foreign_key_violation() =>
            {
                let context = if database.is_unique_violation() {
                    KernelError::Concurrency
                } else {
                    KernelError::not_found("referenced row not found")
                };
                Report::from(error).change_context(context)
            }
            _ => Report::from(error).change_context(KernelError::Internal),
        })
    }
}

impl<T> ConvertError for Result<T, MigrateError> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| Report::from(error).change_context(KernelError::Internal))
    }
}

#[cfg(test)]
mod test {
    use kernel::interface::database::{DatabaseConnection, Transaction};
    use kernel::interface::query::BookQuery;
    use kernel::interface::update::BookModifier;
    use kernel::prelude::entity::{BookCategory, BookName, CreateBook};
    use kernel::KernelError;

    use crate::database::{PostgresBookRepository, PostgresDatabase};

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn roll_back_discards_writes() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let name = BookName::new(format!("rollback-{}", uuid::Uuid::new_v4()));

        let mut con = db.transact().await?;
        PostgresBookRepository
            .create(&mut con, &CreateBook::new(name.clone(), BookCategory::Society))
            .await?;
        con.roll_back().await?;

        let mut con = db.transact().await?;
        let found = PostgresBookRepository.find_by_name(&mut con, &name).await?;
        assert!(found.is_none());
        Ok(())
    }
}
