//! Customers placing orders.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Resource, ResourceKind};

/// Caller-editable client fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientFields {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact phone number.
    pub phone: String,
    /// Photo reference.
    #[serde(default)]
    pub photo: String,
    /// Date of birth, when known.
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
}

/// A stored client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Client {
    /// Identifier.
    pub id: Uuid,
    /// Editable fields.
    #[serde(flatten)]
    pub fields: ClientFields,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Resource for Client {
    type Input = ClientFields;
    type Draft = ClientFields;
    type Changes = ClientFields;
    type Listing = Self;

    const KIND: ResourceKind = ResourceKind::Client;

    fn id(&self) -> Uuid {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
