mod age;
mod id;
mod name;

pub use self::{age::*, id::*, name::*};
use destructure::Destructure;
use serde::{Deserialize, Serialize};
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, Destructure, References)]
pub struct User {
    id: UserId,
    name: UserName,
    age: Option<UserAge>,
}

impl User {
    pub fn new(id: UserId, name: UserName, age: Option<UserAge>) -> Self {
        Self { id, name, age }
    }

    pub fn rename(self, name: UserName) -> Self {
        self.reconstruct(|user| user.name = name)
    }
}
