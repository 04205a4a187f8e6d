use std::fmt::Display;

use error_stack::Context;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum KernelError {
    NotFound(String),
    Domain(String),
    Concurrency,
    Timeout,
    Internal,
}

impl KernelError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn domain(message: impl Into<String>) -> Self {
        Self::Domain(message.into())
    }
}

impl Display for KernelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KernelError::NotFound(message) => write!(f, "{message}"),
            KernelError::Domain(message) => write!(f, "{message}"),
            KernelError::Concurrency => write!(f, "Concurrency error"),
            KernelError::Timeout => write!(f, "Process timed out"),
            KernelError::Internal => write!(f, "Internal kernel error"),
        }
    }
}

impl Context for KernelError {}

#[cfg(test)]
mod test {
    use crate::KernelError;

    #[test]
    fn messages_are_displayed_verbatim() {
        let error = KernelError::domain("The book is already loaned");
        assert_eq!(error.to_string(), "The book is already loaned");

        let error = KernelError::not_found("user `daeun` not found");
        assert_eq!(error.to_string(), "user `daeun` not found");
        assert_eq!(KernelError::Timeout.to_string(), "Process timed out");
    }
}
