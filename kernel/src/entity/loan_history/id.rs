use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

/// Store-assigned, increasing in creation order.
#[derive(
    Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize, Fromln, AsRefln,
)]
pub struct LoanHistoryId(i64);

impl LoanHistoryId {
    pub fn new(id: impl Into<i64>) -> Self {
        Self(id.into())
    }
}
