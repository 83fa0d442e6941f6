//! Per-entity materialisation and matching rules for the in-memory store.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    Branch, BranchFields, Category, CategoryFields, Client, ClientFields, LineItemFields, Order,
    OrderDraft, OrderFields, OrderLineItem, OrderStatus, Predicate, Product, ProductDraft,
    ProductFields, ReferenceField, Resource, ResourceKind,
};

use super::links::Reference;

/// How an entity is built, overwritten and matched without SQL.
pub trait MemoryRecord: Resource {
    /// Build the stored entity for a fresh insert.
    fn materialize(id: Uuid, draft: &Self::Draft, now: DateTime<Utc>) -> Self;

    /// Overwrite editable fields in place.
    fn apply(&mut self, changes: &Self::Changes, now: DateTime<Utc>);

    /// Whether the record matches the free-text search.
    ///
    /// `needle` is the lowercased search text; `id` is that text parsed as an
    /// identifier when it is one.
    fn matches_search(&self, needle: &str, id: Option<Uuid>) -> bool;

    /// Whether the record satisfies `predicate`, or `None` when the entity
    /// does not support it.
    fn matches_predicate(&self, predicate: &Predicate) -> Option<bool>;

    /// Rows this record points at.
    fn references(&self) -> Vec<Reference> {
        Vec::new()
    }

    /// Clear an optional reference to a deleted row, stamping `now` when
    /// anything changed.
    fn clear_reference(&mut self, _kind: ResourceKind, _id: Uuid, _now: DateTime<Utc>) {}
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn id_in(id: Uuid, predicate: &Predicate) -> Option<bool> {
    match predicate {
        Predicate::IdIn(ids) => Some(ids.contains(&id)),
        _ => None,
    }
}

impl MemoryRecord for Client {
    fn materialize(id: Uuid, draft: &ClientFields, now: DateTime<Utc>) -> Self {
        Self {
            id,
            fields: draft.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, changes: &ClientFields, now: DateTime<Utc>) {
        self.fields = changes.clone();
        self.updated_at = now;
    }

    fn matches_search(&self, needle: &str, _id: Option<Uuid>) -> bool {
        contains(&self.fields.first_name, needle)
            || contains(&self.fields.last_name, needle)
            || contains(&self.fields.phone, needle)
    }

    fn matches_predicate(&self, predicate: &Predicate) -> Option<bool> {
        id_in(self.id, predicate)
    }
}

impl MemoryRecord for Branch {
    fn materialize(id: Uuid, draft: &BranchFields, now: DateTime<Utc>) -> Self {
        Self {
            id,
            fields: draft.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, changes: &BranchFields, now: DateTime<Utc>) {
        self.fields = changes.clone();
        self.updated_at = now;
    }

    fn matches_search(&self, needle: &str, _id: Option<Uuid>) -> bool {
        contains(&self.fields.name, needle)
    }

    fn matches_predicate(&self, predicate: &Predicate) -> Option<bool> {
        match predicate {
            Predicate::OpenAt(at) => Some(self.is_open_at(at)),
            other => id_in(self.id, other),
        }
    }
}

impl MemoryRecord for Category {
    fn materialize(id: Uuid, draft: &CategoryFields, now: DateTime<Utc>) -> Self {
        Self {
            id,
            fields: draft.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, changes: &CategoryFields, now: DateTime<Utc>) {
        self.fields = changes.clone();
        self.updated_at = now;
    }

    fn matches_search(&self, needle: &str, _id: Option<Uuid>) -> bool {
        contains(&self.fields.title, needle)
    }

    fn matches_predicate(&self, predicate: &Predicate) -> Option<bool> {
        match predicate {
            Predicate::ReferenceEq {
                field: ReferenceField::Parent,
                id,
            } => Some(self.fields.parent_id == Some(*id)),
            other => id_in(self.id, other),
        }
    }

    fn references(&self) -> Vec<Reference> {
        self.fields
            .parent_id
            .map(|parent| Reference::optional(ResourceKind::Category, parent))
            .into_iter()
            .collect()
    }

    fn clear_reference(&mut self, kind: ResourceKind, id: Uuid, now: DateTime<Utc>) {
        if kind == ResourceKind::Category && self.fields.parent_id == Some(id) {
            self.fields.parent_id = None;
            self.updated_at = now;
        }
    }
}

impl MemoryRecord for Product {
    fn materialize(id: Uuid, draft: &ProductDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            product_code: draft.code.clone(),
            fields: draft.fields.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, changes: &ProductFields, now: DateTime<Utc>) {
        self.fields = changes.clone();
        self.updated_at = now;
    }

    fn matches_search(&self, needle: &str, id: Option<Uuid>) -> bool {
        match id {
            Some(category_id) => self.fields.category_id == Some(category_id),
            None => contains(&self.fields.title, needle),
        }
    }

    fn matches_predicate(&self, predicate: &Predicate) -> Option<bool> {
        match predicate {
            Predicate::ReferenceEq {
                field: ReferenceField::Category,
                id,
            } => Some(self.fields.category_id == Some(*id)),
            other => id_in(self.id, other),
        }
    }

    fn references(&self) -> Vec<Reference> {
        self.fields
            .category_id
            .map(|category| Reference::optional(ResourceKind::Category, category))
            .into_iter()
            .collect()
    }

    fn clear_reference(&mut self, kind: ResourceKind, id: Uuid, now: DateTime<Utc>) {
        if kind == ResourceKind::Category && self.fields.category_id == Some(id) {
            self.fields.category_id = None;
            self.updated_at = now;
        }
    }
}

impl MemoryRecord for Order {
    fn materialize(id: Uuid, draft: &OrderDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            order_code: draft.code.clone(),
            fields: draft.fields.clone(),
            delivery_price: draft.delivery_price.clone(),
            status: OrderStatus::New,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, changes: &OrderFields, now: DateTime<Utc>) {
        self.fields = changes.clone();
        self.updated_at = now;
    }

    fn matches_search(&self, needle: &str, id: Option<Uuid>) -> bool {
        match id {
            Some(id) => self.fields.client_id == id || self.fields.branch_id == id,
            None => contains(self.order_code.as_str(), needle),
        }
    }

    fn matches_predicate(&self, predicate: &Predicate) -> Option<bool> {
        match predicate {
            Predicate::ReferenceEq {
                field: ReferenceField::Client,
                id,
            } => Some(self.fields.client_id == *id),
            Predicate::ReferenceEq {
                field: ReferenceField::Branch,
                id,
            } => Some(self.fields.branch_id == *id),
            other => id_in(self.id, other),
        }
    }

    fn references(&self) -> Vec<Reference> {
        vec![
            Reference::required(ResourceKind::Client, self.fields.client_id),
            Reference::required(ResourceKind::Branch, self.fields.branch_id),
        ]
    }
}

impl MemoryRecord for OrderLineItem {
    fn materialize(id: Uuid, draft: &LineItemFields, now: DateTime<Utc>) -> Self {
        Self {
            id,
            fields: draft.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply(&mut self, changes: &LineItemFields, now: DateTime<Utc>) {
        self.fields = changes.clone();
        self.updated_at = now;
    }

    fn matches_search(&self, needle: &str, id: Option<Uuid>) -> bool {
        match id {
            Some(id) => self.fields.order_id == id || self.fields.product_id == id,
            None => contains(&self.fields.discount_type, needle),
        }
    }

    fn matches_predicate(&self, predicate: &Predicate) -> Option<bool> {
        match predicate {
            Predicate::ReferenceEq {
                field: ReferenceField::Order,
                id,
            } => Some(self.fields.order_id == *id),
            Predicate::ReferenceEq {
                field: ReferenceField::Product,
                id,
            } => Some(self.fields.product_id == *id),
            other => id_in(self.id, other),
        }
    }

    // `order_id` carries no foreign key; lines outlive their order.
    fn references(&self) -> Vec<Reference> {
        vec![Reference::required(
            ResourceKind::Product,
            self.fields.product_id,
        )]
    }
}
