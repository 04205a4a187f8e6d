use std::fmt::{Display, Formatter};
use std::str::FromStr;

use error_stack::Report;
use serde::{Deserialize, Serialize};

use crate::KernelError;

/// Declaration order is the order statistics are reported in.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookCategory {
    Computer,
    Economy,
    Society,
    Language,
    Science,
}

impl BookCategory {
    pub const ALL: [BookCategory; 5] = [
        BookCategory::Computer,
        BookCategory::Economy,
        BookCategory::Society,
        BookCategory::Language,
        BookCategory::Science,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookCategory::Computer => "COMPUTER",
            BookCategory::Economy => "ECONOMY",
            BookCategory::Society => "SOCIETY",
            BookCategory::Language => "LANGUAGE",
            BookCategory::Science => "SCIENCE",
        }
    }
}

impl Display for BookCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookCategory {
    type Err = Report<KernelError>;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| {
                Report::new(KernelError::domain(format!("unknown book category `{s}`")))
            })
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use crate::entity::BookCategory;
    use crate::KernelError;

    #[test]
    fn parse_stored_form() {
        for category in BookCategory::ALL {
            let parsed = BookCategory::from_str(category.as_str()).unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn reject_unknown_category() {
        let report = BookCategory::from_str("computer").unwrap_err();
        assert!(matches!(report.current_context(), KernelError::Domain(_)));
    }

    #[test]
    fn serialize_as_upper_case() {
        let json = serde_json::to_string(&BookCategory::Economy).unwrap();
        assert_eq!(json, r#""ECONOMY""#);
    }
}
