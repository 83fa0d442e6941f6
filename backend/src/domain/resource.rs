//! Generic description of a persisted entity kind and its list criteria.
//!
//! Every entity the backend stores implements [`Resource`]. Repositories,
//! services and HTTP handlers are written once against the trait and
//! instantiated per entity.

use std::fmt;

use chrono::{DateTime, Utc};
use pagination::PageRequest;
use serde::Serialize;
use uuid::Uuid;

use super::WorkHour;

/// Tag naming an entity kind in logs and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Customers placing orders.
    Client,
    /// Physical shops fulfilling orders.
    Branch,
    /// Product grouping.
    Category,
    /// Catalogue item.
    Product,
    /// Customer order.
    Order,
    /// Product line on an order.
    OrderLineItem,
}

impl ResourceKind {
    /// Human-readable singular name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Branch => "branch",
            Self::Category => "category",
            Self::Product => "product",
            Self::Order => "order",
            Self::OrderLineItem => "order product",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An entity kind with create, overwrite and list shapes.
pub trait Resource: Clone + fmt::Debug + Serialize + Send + Sync + 'static {
    /// Payload submitted by callers to create a record.
    type Input: Send + Sync + 'static;
    /// Payload handed to storage on create, after server-side enrichment.
    type Draft: Send + Sync + 'static;
    /// Full-field overwrite payload.
    type Changes: Send + Sync + 'static;
    /// Shape of one item in a list response.
    type Listing: Serialize + Send + Sync + 'static;

    /// Kind tag.
    const KIND: ResourceKind;

    /// System-generated identifier.
    fn id(&self) -> Uuid;

    /// Creation timestamp, the primary list sort key.
    fn created_at(&self) -> DateTime<Utc>;
}

/// Foreign-key columns a [`Predicate::ReferenceEq`] can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceField {
    /// `categories.parent_id`.
    Parent,
    /// `products.category_id`.
    Category,
    /// `orders.client_id`.
    Client,
    /// `orders.branch_id`.
    Branch,
    /// `order_products.order_id`.
    Order,
    /// `order_products.product_id`.
    Product,
}

impl ReferenceField {
    /// Column name, used in error messages.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Parent => "parent_id",
            Self::Category => "category_id",
            Self::Client => "client_id",
            Self::Branch => "branch_id",
            Self::Order => "order_id",
            Self::Product => "product_id",
        }
    }
}

/// Typed filter clause added to a list query.
///
/// Adapters render predicates through bound parameters. A predicate that does
/// not apply to the queried entity is rejected rather than ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Primary key is one of the given ids.
    IdIn(Vec<Uuid>),
    /// Foreign key equals the given id.
    ReferenceEq {
        /// Column to compare.
        field: ReferenceField,
        /// Expected value.
        id: Uuid,
    },
    /// Branch operating window contains the given time.
    OpenAt(WorkHour),
}

/// Criteria for a paginated list query.
///
/// # Examples
/// ```
/// use market_backend::domain::ListRequest;
/// use pagination::PageRequest;
///
/// let request = ListRequest::new(PageRequest::default()).with_search(Some("  "));
/// assert_eq!(request.search(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRequest {
    page: PageRequest,
    search: Option<String>,
    predicates: Vec<Predicate>,
}

impl ListRequest {
    /// Unfiltered request for the given window.
    #[must_use]
    pub const fn new(page: PageRequest) -> Self {
        Self {
            page,
            search: None,
            predicates: Vec::new(),
        }
    }

    /// Attach free-text search; blank text clears it.
    #[must_use]
    pub fn with_search(mut self, search: Option<impl AsRef<str>>) -> Self {
        self.search = search
            .map(|value| value.as_ref().trim().to_owned())
            .filter(|value| !value.is_empty());
        self
    }

    /// Append a predicate.
    #[must_use]
    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    /// Page window.
    #[must_use]
    pub const fn page(&self) -> PageRequest {
        self.page
    }

    /// Trimmed search text, if any.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Search text parsed as an identifier, when it is one.
    #[must_use]
    pub fn search_id(&self) -> Option<Uuid> {
        self.search().and_then(|term| Uuid::parse_str(term).ok())
    }

    /// Extra filter clauses.
    #[must_use]
    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }
}
