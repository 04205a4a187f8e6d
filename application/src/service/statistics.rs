use std::collections::BTreeMap;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection};
use kernel::interface::query::{
    BookQuery, DependOnBookQuery, DependOnLoanHistoryQuery, LoanHistoryQuery,
};
use kernel::prelude::entity::{Book, BookCategory, LoanHistory};
use kernel::KernelError;

use crate::transfer::BookStatDto;

pub fn count_loaned(histories: &[LoanHistory]) -> usize {
    histories.iter().filter(|history| history.is_loaned()).count()
}

/// One entry per category that has at least one book, in category order.
pub fn group_by_category(books: &[Book]) -> Vec<BookStatDto> {
    books
        .iter()
        .fold(BTreeMap::<BookCategory, usize>::new(), |mut counts, book| {
            *counts.entry(*book.category()).or_insert(0) += 1;
            counts
        })
        .into_iter()
        .map(|(category, count)| BookStatDto { category, count })
        .collect()
}

#[async_trait::async_trait]
pub trait BookStatisticsService:
    'static + Sync + Send + DependOnBookQuery + DependOnLoanHistoryQuery
{
    async fn count_loaned_book(&self) -> error_stack::Result<usize, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let histories = self
            .loan_history_query()
            .find_all(&mut connection, None)
            .await?;

        Ok(count_loaned(&histories))
    }

    async fn get_book_statistics(&self) -> error_stack::Result<Vec<BookStatDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let books = self.book_query().find_all(&mut connection).await?;
        let statistics = group_by_category(&books);
        tracing::debug!(books = books.len(), categories = statistics.len(), "Book statistics");

        Ok(statistics)
    }
}

impl<T> BookStatisticsService for T where T: DependOnBookQuery + DependOnLoanHistoryQuery {}
