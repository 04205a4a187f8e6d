mod book;
mod loan_history;
mod user;

pub use self::{book::*, loan_history::*, user::*};
