mod id;
mod status;

pub use self::{id::*, status::*};
use destructure::Destructure;
use error_stack::Report;
use vodca::References;

use crate::entity::{BookName, UserId};
use crate::KernelError;

/// One loan of a book by a user. Created `Loaned`, flipped to `Returned` once.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct LoanHistory {
    id: LoanHistoryId,
    user_id: UserId,
    book_name: BookName,
    status: LoanStatus,
}

impl LoanHistory {
    pub fn new(
        id: LoanHistoryId,
        user_id: UserId,
        book_name: BookName,
        status: LoanStatus,
    ) -> Self {
        Self {
            id,
            user_id,
            book_name,
            status,
        }
    }

    pub fn is_loaned(&self) -> bool {
        self.status == LoanStatus::Loaned
    }

    pub fn mark_returned(self) -> error_stack::Result<Self, KernelError> {
        if !self.is_loaned() {
            return Err(Report::new(KernelError::domain("The book is already returned"))
                .attach_printable(format!("loan history id: {}", self.id.as_ref())));
        }
        Ok(self.reconstruct(|history| history.status = LoanStatus::Returned))
    }
}

#[cfg(test)]
mod test {
    use crate::entity::{BookName, LoanHistory, LoanHistoryId, LoanStatus, UserId};
    use crate::KernelError;

    fn loaned() -> LoanHistory {
        LoanHistory::new(
            LoanHistoryId::new(1),
            UserId::new(1),
            BookName::new("긴긴밤"),
            LoanStatus::Loaned,
        )
    }

    #[test]
    fn return_flips_status_only() {
        let history = loaned();
        let returned = history.clone().mark_returned().unwrap();
        assert_eq!(returned.status(), &LoanStatus::Returned);
        assert_eq!(returned.id(), history.id());
        assert_eq!(returned.user_id(), history.user_id());
        assert_eq!(returned.book_name(), history.book_name());
        assert!(!returned.is_loaned());
    }

    #[test]
    fn return_twice_is_rejected() {
        let returned = loaned().mark_returned().unwrap();
        let report = returned.mark_returned().unwrap_err();
        assert_eq!(
            report.current_context(),
            &KernelError::domain("The book is already returned")
        );
    }
}
