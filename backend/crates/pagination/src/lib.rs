//! Limit/offset pagination primitives shared by market backend endpoints.
//!
//! List endpoints accept optional `limit` and `offset` query parameters and
//! answer with a page of items plus the total number of rows matching the
//! filter, independent of the page window. This crate owns the normalisation
//! rules for those parameters so every adapter applies the same defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page size used when the caller omits `limit` or supplies a non-positive value.
pub const DEFAULT_LIMIT: u32 = 10;

/// Page start used when the caller omits `offset` or supplies a non-positive value.
pub const DEFAULT_OFFSET: u64 = 0;

/// Errors raised while parsing raw pagination parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageParamsError {
    /// The `limit` parameter was present but not an integer.
    #[error("invalid query limit")]
    InvalidLimit {
        /// Raw value supplied by the caller.
        value: String,
    },
    /// The `offset` parameter was present but not an integer.
    #[error("invalid query offset")]
    InvalidOffset {
        /// Raw value supplied by the caller.
        value: String,
    },
}

/// Normalised page window.
///
/// # Examples
///
/// ```
/// use pagination::PageRequest;
///
/// let page = PageRequest::new(Some(-5), None);
/// assert_eq!(page.limit(), 10);
/// assert_eq!(page.offset(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    limit: u32,
    offset: u64,
}

impl PageRequest {
    /// Build a page window, replacing non-positive or missing values with the
    /// defaults.
    #[must_use]
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        let limit = limit
            .filter(|value| *value > 0)
            .map_or(DEFAULT_LIMIT, |value| {
                u32::try_from(value).unwrap_or(u32::MAX)
            });
        let offset = offset
            .filter(|value| *value > 0)
            .map_or(DEFAULT_OFFSET, |value| {
                u64::try_from(value).unwrap_or(DEFAULT_OFFSET)
            });
        Self { limit, offset }
    }

    /// Parse raw query-string values.
    ///
    /// Absent or empty values take the defaults; anything else must parse as
    /// an integer.
    ///
    /// # Errors
    ///
    /// Returns [`PageParamsError`] naming the first parameter that failed to
    /// parse.
    ///
    /// # Examples
    ///
    /// ```
    /// use pagination::{PageParamsError, PageRequest};
    ///
    /// let page = PageRequest::parse(Some("25"), Some("")).expect("valid params");
    /// assert_eq!(page.limit(), 25);
    /// assert!(matches!(
    ///     PageRequest::parse(Some("ten"), None),
    ///     Err(PageParamsError::InvalidLimit { .. })
    /// ));
    /// ```
    pub fn parse(limit: Option<&str>, offset: Option<&str>) -> Result<Self, PageParamsError> {
        let limit = parse_integer(limit).map_err(|value| PageParamsError::InvalidLimit { value })?;
        let offset =
            parse_integer(offset).map_err(|value| PageParamsError::InvalidOffset { value })?;
        Ok(Self::new(limit, offset))
    }

    /// Maximum number of items in the page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of matching rows skipped before the page starts.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: DEFAULT_OFFSET,
        }
    }
}

fn parse_integer(raw: Option<&str>) -> Result<Option<i64>, String> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<i64>()
            .map(Some)
            .map_err(|_| value.to_owned()),
    }
}

/// One page of results together with the total match count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items inside the requested window, in presentation order.
    pub items: Vec<T>,
    /// Number of rows matching the filter, ignoring the window.
    pub total_count: u64,
}

impl<T> Page<T> {
    /// Construct a page from its parts.
    #[must_use]
    pub const fn new(items: Vec<T>, total_count: u64) -> Self {
        Self { items, total_count }
    }

    /// A page with no items and a zero total.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
        }
    }

    /// Transform every item while keeping the total count.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
        }
    }

    /// Number of items in this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether this page carries no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
