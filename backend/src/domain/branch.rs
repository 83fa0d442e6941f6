//! Branches and their read-time availability projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Money, Resource, ResourceKind, WorkHour};

const fn default_active() -> bool {
    true
}

/// Caller-editable branch fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchFields {
    /// Display name.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// Photo reference.
    #[serde(default)]
    pub photo: String,
    /// Opening time.
    pub work_start_hour: WorkHour,
    /// Closing time.
    pub work_end_hour: WorkHour,
    /// Street address.
    pub address: String,
    /// Fee charged per delivered order.
    #[serde(default)]
    pub delivery_price: Money,
    /// Administrative toggle.
    #[serde(default = "default_active")]
    pub active: bool,
}

/// A stored branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Branch {
    /// Identifier.
    pub id: Uuid,
    /// Editable fields.
    #[serde(flatten)]
    pub fields: BranchFields,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Branch {
    /// Whether the operating window contains `at`.
    #[must_use]
    pub fn is_open_at(&self, at: &WorkHour) -> bool {
        at.is_within(&self.fields.work_start_hour, &self.fields.work_end_hour)
    }

    /// Force `active` to false when the branch is closed at `at`.
    ///
    /// Only the returned value changes; the stored flag is untouched.
    ///
    /// # Examples
    /// ```
    /// # use chrono::Utc;
    /// # use uuid::Uuid;
    /// use market_backend::domain::{Branch, BranchFields, Money, WorkHour};
    ///
    /// let hour = |raw: &str| WorkHour::parse(raw).expect("valid hour");
    /// let branch = Branch {
    ///     id: Uuid::new_v4(),
    ///     fields: BranchFields {
    ///         name: "Central".into(),
    ///         phone: "+998901234567".into(),
    ///         photo: String::new(),
    ///         work_start_hour: hour("09:00"),
    ///         work_end_hour: hour("18:00"),
    ///         address: "Main st. 1".into(),
    ///         delivery_price: Money::zero(),
    ///         active: true,
    ///     },
    ///     created_at: Utc::now(),
    ///     updated_at: Utc::now(),
    /// };
    /// assert!(!branch.project_availability(&hour("20:00")).fields.active);
    /// ```
    #[must_use]
    pub fn project_availability(mut self, at: &WorkHour) -> Self {
        if !self.is_open_at(at) {
            self.fields.active = false;
        }
        self
    }
}

impl Resource for Branch {
    type Input = BranchFields;
    type Draft = BranchFields;
    type Changes = BranchFields;
    type Listing = Self;

    const KIND: ResourceKind = ResourceKind::Branch;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
