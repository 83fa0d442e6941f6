//! Human-readable sequential codes for orders and products.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which sequence a code is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodeKind {
    /// `O-` codes.
    Order,
    /// `P-` codes.
    Product,
}

impl CodeKind {
    /// Prefix prepended to the zero-padded number.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Order => "O-",
            Self::Product => "P-",
        }
    }
}

/// A business-facing code such as `O-000042`.
///
/// # Examples
/// ```
/// use market_backend::domain::{BusinessCode, CodeKind};
///
/// assert_eq!(BusinessCode::format(CodeKind::Order, 42).as_str(), "O-000042");
/// assert_eq!(BusinessCode::format(CodeKind::Product, 1_234_567).as_str(), "P-1234567");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BusinessCode(String);

impl BusinessCode {
    /// Render `value` with the kind's prefix, padded to six digits.
    #[must_use]
    pub fn format(kind: CodeKind, value: i64) -> Self {
        Self(format!("{}{value:06}", kind.prefix()))
    }

    /// Wrap a stored code without re-validating it.
    #[must_use]
    pub const fn from_stored(value: String) -> Self {
        Self(value)
    }

    /// Borrow the textual code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<BusinessCode> for String {
    fn from(value: BusinessCode) -> Self {
        value.0
    }
}

impl fmt::Display for BusinessCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
