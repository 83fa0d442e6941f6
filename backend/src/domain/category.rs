//! Product categories, optionally nested under a parent.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{Resource, ResourceKind};

/// Caller-editable category fields.
///
/// The parent chain is not checked for cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryFields {
    /// Display title.
    pub title: String,
    /// Parent category, if nested.
    pub parent_id: Option<Uuid>,
    /// Image reference.
    pub image: String,
}

/// A stored category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Identifier.
    pub id: Uuid,
    /// Editable fields.
    #[serde(flatten)]
    pub fields: CategoryFields,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Resource for Category {
    type Input = CategoryFields;
    type Draft = CategoryFields;
    type Changes = CategoryFields;
    type Listing = Self;

    const KIND: ResourceKind = ResourceKind::Category;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
