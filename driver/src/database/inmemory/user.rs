use error_stack::Report;

use kernel::interface::query::UserQuery;
use kernel::interface::update::UserModifier;
use kernel::prelude::entity::{CreateUser, DestructCreateUser, User, UserId, UserName};
use kernel::KernelError;

use crate::database::InMemoryTransaction;

pub struct InMemoryUserRepository;

#[async_trait::async_trait]
impl UserQuery for InMemoryUserRepository {
    type Transaction = InMemoryTransaction;

    async fn find_all(
        &self,
        con: &mut InMemoryTransaction,
    ) -> error_stack::Result<Vec<User>, KernelError> {
        Ok(con.store().users.values().cloned().collect())
    }

    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &UserId,
    ) -> error_stack::Result<Option<User>, KernelError> {
        Ok(con.store().users.get(id).cloned())
    }

    async fn find_by_name(
        &self,
        con: &mut InMemoryTransaction,
        name: &UserName,
    ) -> error_stack::Result<Option<User>, KernelError> {
        let found = con
            .store()
            .users
            .values()
            .find(|user| user.name() == name)
            .cloned();
        Ok(found)
    }
}

#[async_trait::async_trait]
impl UserModifier for InMemoryUserRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        user: &CreateUser,
    ) -> error_stack::Result<User, KernelError> {
        let DestructCreateUser { name, age } = user.clone().into_destruct();
        let store = con.store_mut();
        let id = UserId::new(store.next_id());
        let user = User::new(id, name, age);
        store.users.insert(id, user.clone());
        Ok(user)
    }

    async fn update(
        &self,
        con: &mut InMemoryTransaction,
        user: &User,
    ) -> error_stack::Result<(), KernelError> {
        match con.store_mut().users.get_mut(user.id()) {
            Some(stored) => {
                *stored = user.clone();
                Ok(())
            }
            None => Err(Report::new(KernelError::not_found(format!(
                "user id {} not found",
                user.id().as_ref()
            )))),
        }
    }

    async fn delete_all(&self, con: &mut InMemoryTransaction) -> error_stack::Result<(), KernelError> {
        let store = con.store_mut();
        store.loan_histories.clear();
        store.users.clear();
        Ok(())
    }
}
