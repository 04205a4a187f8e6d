use error_stack::Report;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{
    BookQuery, DependOnBookQuery, DependOnLoanHistoryQuery, DependOnUserQuery, LoanHistoryQuery,
    UserQuery,
};
use kernel::interface::update::{
    DependOnLoanHistoryModifier, DependOnLoanLock, LoanHistoryModifier, LoanLock,
};
use kernel::prelude::entity::{
    BookName, CreateLoanHistory, LoanHistoryId, LoanStatus, User, UserName,
};
use kernel::KernelError;

use crate::transfer::{LoanBookDto, LoanHistoryDto, ReturnBookDto};

pub const ALREADY_LOANED: &str = "The book is already loaned";
pub const NOT_LOANED: &str = "The book is not loaned by this user";

/// Creates a `Loaned` record unless the book is currently loaned by anyone.
///
/// The existence check and the insert run in one transaction under the loan lock of the book.
#[async_trait::async_trait]
pub trait LoanBookService:
    'static
    + Sync
    + Send
    + DependOnLoanLock
    + DependOnBookQuery
    + DependOnUserQuery
    + DependOnLoanHistoryQuery
    + DependOnLoanHistoryModifier
{
    async fn loan_book(&self, dto: LoanBookDto) -> error_stack::Result<LoanHistoryId, KernelError> {
        let book_name = BookName::new(dto.book_name);
        let user_name = UserName::new(dto.user_name);

        let mut connection = self.database_connection().transact().await?;
        self.loan_lock().lock(&mut connection, &book_name).await?;

        if self
            .book_query()
            .find_by_name(&mut connection, &book_name)
            .await?
            .is_none()
        {
            return Err(Report::new(KernelError::not_found(format!(
                "book `{book_name}` not found"
            ))));
        }
        let user = find_user(self.user_query(), &mut connection, &user_name).await?;

        let loaned = self
            .loan_history_query()
            .find_by_book_name(&mut connection, &book_name, Some(&LoanStatus::Loaned))
            .await?;
        if let Some(current) = loaned.first() {
            tracing::warn!(book = %book_name, holder = ?current.user_id(), "Loan rejected");
            return Err(Report::new(KernelError::domain(ALREADY_LOANED))
                .attach_printable(format!("book: {book_name}")));
        }

        let history = self
            .loan_history_modifier()
            .create(
                &mut connection,
                &CreateLoanHistory::new(*user.id(), book_name),
            )
            .await?;

        connection.commit().await?;
        tracing::info!(history = ?history, "Book loaned");

        Ok(*history.id())
    }
}

impl<T> LoanBookService for T where
    T: DependOnLoanLock
        + DependOnBookQuery
        + DependOnUserQuery
        + DependOnLoanHistoryQuery
        + DependOnLoanHistoryModifier
{
}

/// Flips the user's active loan of a book to `Returned`.
///
/// When several active records match, the earliest created one is returned.
#[async_trait::async_trait]
pub trait ReturnBookService:
    'static
    + Sync
    + Send
    + DependOnLoanLock
    + DependOnUserQuery
    + DependOnLoanHistoryQuery
    + DependOnLoanHistoryModifier
{
    async fn return_book(&self, dto: ReturnBookDto) -> error_stack::Result<(), KernelError> {
        let book_name = BookName::new(dto.book_name);
        let user_name = UserName::new(dto.user_name);

        let mut connection = self.database_connection().transact().await?;
        self.loan_lock().lock(&mut connection, &book_name).await?;

        let user = find_user(self.user_query(), &mut connection, &user_name).await?;

        let history = self
            .loan_history_query()
            .find_by_user_and_book_name(
                &mut connection,
                user.id(),
                &book_name,
                Some(&LoanStatus::Loaned),
            )
            .await?
            .into_iter()
            .min_by_key(|history| *history.id())
            .ok_or_else(|| {
                tracing::warn!(user = %user_name, book = %book_name, "Return rejected");
                Report::new(KernelError::domain(NOT_LOANED))
                    .attach_printable(format!("user: {user_name}, book: {book_name}"))
            })?;

        let returned = history.mark_returned()?;
        self.loan_history_modifier()
            .update(&mut connection, &returned)
            .await?;

        connection.commit().await?;
        tracing::info!(history = ?returned, "Book returned");

        Ok(())
    }
}

impl<T> ReturnBookService for T where
    T: DependOnLoanLock + DependOnUserQuery + DependOnLoanHistoryQuery + DependOnLoanHistoryModifier
{
}

#[async_trait::async_trait]
pub trait GetLoanHistoryService: 'static + Sync + Send + DependOnLoanHistoryQuery {
    async fn get_loan_histories(&self) -> error_stack::Result<Vec<LoanHistoryDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let histories = self
            .loan_history_query()
            .find_all(&mut connection, None)
            .await?;

        Ok(histories.into_iter().map(LoanHistoryDto::from).collect())
    }
}

impl<T> GetLoanHistoryService for T where T: DependOnLoanHistoryQuery {}

async fn find_user<Q: UserQuery>(
    query: &Q,
    con: &mut Q::Transaction,
    name: &UserName,
) -> error_stack::Result<User, KernelError> {
    query
        .find_by_name(con, name)
        .await?
        .ok_or_else(|| Report::new(KernelError::not_found(format!("user `{name}` not found"))))
}
