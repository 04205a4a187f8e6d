use destructure::Destructure;
use vodca::References;

use crate::entity::{UserAge, UserName};

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct CreateUser {
    name: UserName,
    age: Option<UserAge>,
}

impl CreateUser {
    pub fn new(name: UserName, age: Option<UserAge>) -> Self {
        Self { name, age }
    }
}
