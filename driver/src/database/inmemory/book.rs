use kernel::interface::query::BookQuery;
use kernel::interface::update::BookModifier;
use kernel::prelude::entity::{Book, BookId, BookName, CreateBook, DestructCreateBook};
use kernel::KernelError;

use crate::database::InMemoryTransaction;

pub struct InMemoryBookRepository;

#[async_trait::async_trait]
impl BookQuery for InMemoryBookRepository {
    type Transaction = InMemoryTransaction;

    async fn find_all(
        &self,
        con: &mut InMemoryTransaction,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        Ok(con.store().books.values().cloned().collect())
    }

    async fn find_by_name(
        &self,
        con: &mut InMemoryTransaction,
        name: &BookName,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let found = con
            .store()
            .books
            .values()
            .find(|book| book.name() == name)
            .cloned();
        Ok(found)
    }
}

#[async_trait::async_trait]
impl BookModifier for InMemoryBookRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        book: &CreateBook,
    ) -> error_stack::Result<Book, KernelError> {
        let DestructCreateBook { name, category } = book.clone().into_destruct();
        let store = con.store_mut();
        let id = BookId::new(store.next_id());
        let book = Book::new(id, name, category);
        store.books.insert(id, book.clone());
        Ok(book)
    }

    async fn delete_all(&self, con: &mut InMemoryTransaction) -> error_stack::Result<(), KernelError> {
        con.store_mut().books.clear();
        Ok(())
    }
}
