use error_stack::Report;

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::{DependOnUserQuery, UserQuery};
use kernel::interface::update::{DependOnUserModifier, UserModifier};
use kernel::prelude::entity::{CreateUser, UserAge, UserId, UserName};
use kernel::KernelError;

use crate::transfer::{CreateUserDto, UpdateUserDto, UserDto};

#[async_trait::async_trait]
pub trait GetUserService: 'static + Sync + Send + DependOnUserQuery {
    async fn get_users(&self) -> error_stack::Result<Vec<UserDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let users = self.user_query().find_all(&mut connection).await?;

        Ok(users.into_iter().map(UserDto::from).collect())
    }
}

impl<T> GetUserService for T where T: DependOnUserQuery {}

#[async_trait::async_trait]
pub trait CreateUserService: 'static + Sync + Send + DependOnUserModifier {
    async fn save_user(&self, dto: CreateUserDto) -> error_stack::Result<UserId, KernelError> {
        let name = validate_name(dto.name)?;

        let mut connection = self.database_connection().transact().await?;

        let user = self
            .user_modifier()
            .create(&mut connection, &CreateUser::new(name, dto.age.map(UserAge::new)))
            .await?;

        connection.commit().await?;
        tracing::info!(user = ?user, "User registered");

        Ok(*user.id())
    }
}

impl<T> CreateUserService for T where T: DependOnUserModifier {}

#[async_trait::async_trait]
pub trait UpdateUserService: 'static + Sync + Send + DependOnUserQuery + DependOnUserModifier {
    async fn update_user_name(&self, dto: UpdateUserDto) -> error_stack::Result<(), KernelError> {
        let name = validate_name(dto.name)?;
        let id = UserId::new(dto.id);

        let mut connection = self.database_connection().transact().await?;

        let user = self
            .user_query()
            .find_by_id(&mut connection, &id)
            .await?
            .ok_or_else(|| {
                Report::new(KernelError::not_found(format!(
                    "user id {} not found",
                    dto.id
                )))
            })?;

        let user = user.rename(name);
        self.user_modifier().update(&mut connection, &user).await?;

        connection.commit().await?;
        tracing::info!(user = ?user, "User renamed");

        Ok(())
    }
}

impl<T> UpdateUserService for T where T: DependOnUserQuery + DependOnUserModifier {}

fn validate_name(name: String) -> error_stack::Result<UserName, KernelError> {
    let name = UserName::new(name);
    if name.is_blank() {
        return Err(Report::new(KernelError::domain(
            "The user name must not be empty",
        )));
    }
    Ok(name)
}

#[cfg(test)]
mod test {
    use driver::database::InMemoryDatabase;
    use kernel::KernelError;

    use crate::service::{CreateUserService, GetUserService, UpdateUserService};
    use crate::transfer::{CreateUserDto, UpdateUserDto, UserDto};

    #[tokio::test]
    async fn save_and_rename() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();

        let id = db
            .save_user(CreateUserDto {
                name: "daeun".to_string(),
                age: None,
            })
            .await?;
        db.save_user(CreateUserDto {
            name: "minji".to_string(),
            age: Some(27),
        })
        .await?;

        db.update_user_name(UpdateUserDto {
            id: id.into(),
            name: "dan".to_string(),
        })
        .await?;

        let users = db.get_users().await?;
        assert_eq!(users.len(), 2);
        assert_eq!(
            users[0],
            UserDto {
                id: id.into(),
                name: "dan".to_string(),
                age: None,
            }
        );
        assert_eq!(users[1].name, "minji");
        assert_eq!(users[1].age, Some(27));
        Ok(())
    }

    #[tokio::test]
    async fn rename_unknown_user() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();

        let report = db
            .update_user_name(UpdateUserDto {
                id: 42,
                name: "dan".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(report.current_context(), KernelError::NotFound(_)));
        Ok(())
    }

    #[tokio::test]
    async fn reject_blank_user_name() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::new();

        let report = db
            .save_user(CreateUserDto {
                name: String::new(),
                age: Some(20),
            })
            .await
            .unwrap_err();
        assert!(matches!(report.current_context(), KernelError::Domain(_)));
        assert!(db.get_users().await?.is_empty());
        Ok(())
    }
}
