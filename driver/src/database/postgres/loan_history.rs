use error_stack::{Report, ResultExt};
use sqlx::PgConnection;

use kernel::interface::query::LoanHistoryQuery;
use kernel::interface::update::{LoanHistoryModifier, LoanLock};
use kernel::prelude::entity::{
    BookName, CreateLoanHistory, LoanHistory, LoanHistoryId, LoanStatus, UserId,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresLoanHistoryRepository;

#[async_trait::async_trait]
impl LoanHistoryQuery for PostgresLoanHistoryRepository {
    type Transaction = PostgresTransaction;

    async fn find_all(
        &self,
        con: &mut PostgresTransaction,
        status: Option<&LoanStatus>,
    ) -> error_stack::Result<Vec<LoanHistory>, KernelError> {
        PgLoanHistoryInternal::find_all(con, status).await
    }

    async fn find_by_book_name(
        &self,
        con: &mut PostgresTransaction,
        book_name: &BookName,
        status: Option<&LoanStatus>,
    ) -> error_stack::Result<Vec<LoanHistory>, KernelError> {
        PgLoanHistoryInternal::find_by_book_name(con, book_name, status).await
    }

    async fn find_by_user_and_book_name(
        &self,
        con: &mut PostgresTransaction,
        user_id: &UserId,
        book_name: &BookName,
        status: Option<&LoanStatus>,
    ) -> error_stack::Result<Vec<LoanHistory>, KernelError> {
        PgLoanHistoryInternal::find_by_user_and_book_name(con, user_id, book_name, status).await
    }
}

#[async_trait::async_trait]
impl LoanHistoryModifier for PostgresLoanHistoryRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        history: &CreateLoanHistory,
    ) -> error_stack::Result<LoanHistory, KernelError> {
        PgLoanHistoryInternal::create(con, history).await
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        history: &LoanHistory,
    ) -> error_stack::Result<(), KernelError> {
        PgLoanHistoryInternal::update(con, history).await
    }

    async fn delete_all(&self, con: &mut PostgresTransaction) -> error_stack::Result<(), KernelError> {
        PgLoanHistoryInternal::delete_all(con).await
    }
}

#[async_trait::async_trait]
impl LoanLock for PostgresLoanHistoryRepository {
    type Transaction = PostgresTransaction;

    async fn lock(
        &self,
        con: &mut PostgresTransaction,
        book_name: &BookName,
    ) -> error_stack::Result<(), KernelError> {
        PgLoanHistoryInternal::lock(con, book_name).await
    }
}

#[derive(sqlx::FromRow)]
struct LoanHistoryRow {
    id: i64,
    user_id: i64,
    book_name: String,
    status: String,
}

impl TryFrom<LoanHistoryRow> for LoanHistory {
    type Error = Report<KernelError>;
    fn try_from(value: LoanHistoryRow) -> Result<Self, Self::Error> {
        let status = value
            .status
            .parse::<LoanStatus>()
            .attach_printable_lazy(|| format!("loan history id: {}", value.id))?;
        Ok(LoanHistory::new(
            LoanHistoryId::new(value.id),
            UserId::new(value.user_id),
            BookName::new(value.book_name),
            status,
        ))
    }
}

fn collect(rows: Vec<LoanHistoryRow>) -> error_stack::Result<Vec<LoanHistory>, KernelError> {
    rows.into_iter().map(LoanHistory::try_from).collect()
}

pub(in crate::database) struct PgLoanHistoryInternal;

impl PgLoanHistoryInternal {
    async fn find_all(
        con: &mut PgConnection,
        status: Option<&LoanStatus>,
    ) -> error_stack::Result<Vec<LoanHistory>, KernelError> {
        let rows = sqlx::query_as::<_, LoanHistoryRow>(
            // language=postgresql
            r#"
            SELECT id, user_id, book_name, status
            FROM loan_histories
            WHERE ($1::TEXT IS NULL OR status = $1)
            ORDER BY id
            "#,
        )
        .bind(status.map(LoanStatus::as_str))
        .fetch_all(con)
        .await
        .convert_error()?;
        collect(rows)
    }

    async fn find_by_book_name(
        con: &mut PgConnection,
        book_name: &BookName,
        status: Option<&LoanStatus>,
    ) -> error_stack::Result<Vec<LoanHistory>, KernelError> {
        let rows = sqlx::query_as::<_, LoanHistoryRow>(
            // language=postgresql
            r#"
            SELECT id, user_id, book_name, status
            FROM loan_histories
            WHERE book_name = $1 AND ($2::TEXT IS NULL OR status = $2)
            ORDER BY id
            "#,
        )
        .bind(book_name.as_ref())
        .bind(status.map(LoanStatus::as_str))
        .fetch_all(con)
        .await
        .convert_error()?;
        collect(rows)
    }

    async fn find_by_user_and_book_name(
        con: &mut PgConnection,
        user_id: &UserId,
        book_name: &BookName,
        status: Option<&LoanStatus>,
    ) -> error_stack::Result<Vec<LoanHistory>, KernelError> {
        let rows = sqlx::query_as::<_, LoanHistoryRow>(
            // language=postgresql
            r#"
            SELECT id, user_id, book_name, status
            FROM loan_histories
            WHERE user_id = $1 AND book_name = $2 AND ($3::TEXT IS NULL OR status = $3)
            ORDER BY id
            "#,
        )
        .bind(user_id.as_ref())
        .bind(book_name.as_ref())
        .bind(status.map(LoanStatus::as_str))
        .fetch_all(con)
        .await
        .convert_error()?;
        collect(rows)
    }

    async fn create(
        con: &mut PgConnection,
        history: &CreateLoanHistory,
    ) -> error_stack::Result<LoanHistory, KernelError> {
        let row = sqlx::query_as::<_, LoanHistoryRow>(
            // language=postgresql
            r#"
            INSERT INTO loan_histories (user_id, book_name, status)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, book_name, status
            "#,
        )
        .bind(history.user_id().as_ref())
        .bind(history.book_name().as_ref())
        .bind(LoanStatus::Loaned.as_str())
        .fetch_one(con)
        .await
        .convert_error()?;
        LoanHistory::try_from(row)
    }

    async fn update(
        con: &mut PgConnection,
        history: &LoanHistory,
    ) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        let result = sqlx::query(
            r#"
            UPDATE loan_histories
            SET status = $2
            WHERE id = $1
            "#,
        )
        .bind(history.id().as_ref())
        .bind(history.status().as_str())
        .execute(con)
        .await
        .convert_error()?;
        if result.rows_affected() == 0 {
            return Err(Report::new(KernelError::not_found(format!(
                "loan history id {} not found",
                history.id().as_ref()
            ))));
        }
        Ok(())
    }

    async fn delete_all(con: &mut PgConnection) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            DELETE FROM loan_histories
            "#,
        )
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn lock(con: &mut PgConnection, book_name: &BookName) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            SELECT pg_advisory_xact_lock(hashtext($1))
            "#,
        )
        .bind(book_name.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        tracing::trace!(book = %book_name, "Loan lock acquired");
        Ok(())
    }
}
