use error_stack::{Report, ResultExt};
use sqlx::PgConnection;

use kernel::interface::query::BookQuery;
use kernel::interface::update::BookModifier;
use kernel::prelude::entity::{Book, BookCategory, BookId, BookName, CreateBook};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresBookRepository;

#[async_trait::async_trait]
impl BookQuery for PostgresBookRepository {
    type Transaction = PostgresTransaction;

    async fn find_all(
        &self,
        con: &mut PostgresTransaction,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        PgBookInternal::find_all(con).await
    }

    async fn find_by_name(
        &self,
        con: &mut PostgresTransaction,
        name: &BookName,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::find_by_name(con, name).await
    }
}

#[async_trait::async_trait]
impl BookModifier for PostgresBookRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        book: &CreateBook,
    ) -> error_stack::Result<Book, KernelError> {
        PgBookInternal::create(con, book).await
    }

    async fn delete_all(&self, con: &mut PostgresTransaction) -> error_stack::Result<(), KernelError> {
        PgBookInternal::delete_all(con).await
    }
}

#[derive(sqlx::FromRow)]
struct BookRow {
    id: i64,
    name: String,
    category: String,
}

impl TryFrom<BookRow> for Book {
    type Error = Report<KernelError>;
    fn try_from(value: BookRow) -> Result<Self, Self::Error> {
        let category = value
            .category
            .parse::<BookCategory>()
            .change_context(KernelError::Internal)
            .attach_printable_lazy(|| format!("book id: {}", value.id))?;
        Ok(Book::new(
            BookId::new(value.id),
            BookName::new(value.name),
            category,
        ))
    }
}

pub(in crate::database) struct PgBookInternal;

impl PgBookInternal {
    async fn find_all(con: &mut PgConnection) -> error_stack::Result<Vec<Book>, KernelError> {
        let rows = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT id, name, category
            FROM books
            ORDER BY id
            "#,
        )
        .fetch_all(con)
        .await
        .convert_error()?;
        rows.into_iter().map(Book::try_from).collect()
    }

    async fn find_by_name(
        con: &mut PgConnection,
        name: &BookName,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT id, name, category
            FROM books
            WHERE name = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(name.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(Book::try_from).transpose()
    }

    async fn create(
        con: &mut PgConnection,
        book: &CreateBook,
    ) -> error_stack::Result<Book, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            INSERT INTO books (name, category)
            VALUES ($1, $2)
            RETURNING id, name, category
            "#,
        )
        .bind(book.name().as_ref())
        .bind(book.category().as_str())
        .fetch_one(con)
        .await
        .convert_error()?;
        Book::try_from(row)
    }

    async fn delete_all(con: &mut PgConnection) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            DELETE FROM books
            "#,
        )
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::BookQuery;
    use kernel::interface::update::BookModifier;
    use kernel::prelude::entity::{BookCategory, BookName, CreateBook};
    use kernel::KernelError;

    use crate::database::postgres::book::PostgresBookRepository;
    use crate::database::postgres::PostgresDatabase;

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn create_and_find() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;
        let name = BookName::new(format!("book-{}", uuid::Uuid::new_v4()));

        let first = PostgresBookRepository
            .create(&mut con, &CreateBook::new(name.clone(), BookCategory::Computer))
            .await?;
        let second = PostgresBookRepository
            .create(&mut con, &CreateBook::new(name.clone(), BookCategory::Economy))
            .await?;
        assert!(first.id() < second.id());
        assert_eq!(first.name(), &name);

        let found = PostgresBookRepository.find_by_name(&mut con, &name).await?;
        assert_eq!(found, Some(first.clone()));

        let all = PostgresBookRepository.find_all(&mut con).await?;
        assert!(all.contains(&first));
        assert!(all.contains(&second));
        Ok(())
    }
}
