use error_stack::Report;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{BookQuery, DependOnBookQuery};
use kernel::interface::update::{BookModifier, DependOnBookModifier};
use kernel::prelude::entity::{BookId, BookName, CreateBook};
use kernel::KernelError;

use crate::transfer::{BookDto, CreateBookDto};

#[async_trait::async_trait]
pub trait GetBookService: 'static + Sync + Send + DependOnBookQuery {
    async fn get_books(&self) -> error_stack::Result<Vec<BookDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let books = self.book_query().find_all(&mut connection).await?;

        Ok(books.into_iter().map(BookDto::from).collect())
    }
}

impl<T> GetBookService for T where T: DependOnBookQuery {}

/// Registers a book. Duplicate names are allowed.
#[async_trait::async_trait]
pub trait CreateBookService: 'static + Sync + Send + DependOnBookModifier {
    async fn save_book(&self, dto: CreateBookDto) -> error_stack::Result<BookId, KernelError> {
        let name = BookName::new(dto.name);
        if name.is_blank() {
            return Err(Report::new(KernelError::domain(
                "The book name must not be empty",
            )));
        }

        let mut connection = self.database_connection().transact().await?;

        let book = self
            .book_modifier()
            .create(&mut connection, &CreateBook::new(name, dto.category))
            .await?;

        connection.commit().await?;
        tracing::info!(book = ?book, "Book registered");

        Ok(*book.id())
    }
}

impl<T> CreateBookService for T where T: DependOnBookModifier {}

#[cfg(test)]
mod test {
    use driver::database::InMemoryDatabase;
    use kernel::prelude::entity::BookCategory;
    use kernel::KernelError;

    use crate::service::{CreateBookService, GetBookService};
    use crate::transfer::CreateBookDto;

    #[tokio::test]
    async fn save_book() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();

        let id = db
            .save_book(CreateBookDto {
                name: "긴긴밤".to_string(),
                category: BookCategory::Computer,
            })
            .await?;

        let books = db.get_books().await?;
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].id, i64::from(id));
        assert_eq!(books[0].name, "긴긴밤");
        assert_eq!(books[0].category, BookCategory::Computer);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_names_are_kept() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();
        for category in [BookCategory::Computer, BookCategory::Science] {
            db.save_book(CreateBookDto {
                name: "긴긴밤".to_string(),
                category,
            })
            .await?;
        }

        let books = db.get_books().await?;
        assert_eq!(books.len(), 2);
        assert!(books.iter().all(|book| book.name == "긴긴밤"));
        assert_ne!(books[0].id, books[1].id);
        Ok(())
    }

    #[tokio::test]
    async fn reject_blank_name() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();

        let report = db
            .save_book(CreateBookDto {
                name: "  ".to_string(),
                category: BookCategory::Economy,
            })
            .await
            .unwrap_err();
        assert!(matches!(report.current_context(), KernelError::Domain(_)));
        assert!(db.get_books().await?.is_empty());
        Ok(())
    }
}
