mod book;
mod loan;
mod statistics;
mod user;

pub use self::{book::*, loan::*, statistics::*, user::*};
