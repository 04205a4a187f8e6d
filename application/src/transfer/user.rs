use serde::{Deserialize, Serialize};

use kernel::prelude::entity::{DestructUser, User};

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct UserDto {
    pub id: i64,
    pub name: String,
    pub age: Option<i32>,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let DestructUser { id, name, age } = value.into_destruct();
        Self {
            id: id.into(),
            name: name.into(),
            age: age.map(Into::into),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserDto {
    pub name: String,
    pub age: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserDto {
    pub id: i64,
    pub name: String,
}
