//! Referential integrity between the stores of one in-memory database.
//!
//! Mirrors the foreign keys of the PostgreSQL schema: a record may only point
//! at rows that exist, a row still required by another cannot be deleted, and
//! optional references to a deleted row are cleared.

use std::sync::{Arc, Mutex, PoisonError, Weak};

use uuid::Uuid;

use crate::domain::ports::ResourceRepositoryError;
use crate::domain::ResourceKind;

/// What happens to a reference when its target row is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDelete {
    /// The delete fails while the reference exists.
    Restrict,
    /// The reference is cleared.
    SetNull,
}

/// A foreign-key style pointer held by a stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    /// Kind of the referenced row.
    pub kind: ResourceKind,
    /// Identifier of the referenced row.
    pub id: Uuid,
    /// Behaviour when the referenced row is deleted.
    pub on_delete: OnDelete,
}

impl Reference {
    /// A mandatory reference that blocks deletion of its target.
    #[must_use]
    pub const fn required(kind: ResourceKind, id: Uuid) -> Self {
        Self {
            kind,
            id,
            on_delete: OnDelete::Restrict,
        }
    }

    /// A nullable reference cleared when its target is deleted.
    #[must_use]
    pub const fn optional(kind: ResourceKind, id: Uuid) -> Self {
        Self {
            kind,
            id,
            on_delete: OnDelete::SetNull,
        }
    }

    fn targets(&self, kind: ResourceKind, id: Uuid) -> bool {
        self.kind == kind && self.id == id
    }
}

/// Store operations the registry runs across entity kinds.
pub(crate) trait LinkedStore: Send + Sync {
    fn kind(&self) -> ResourceKind;

    fn contains(&self, id: Uuid) -> Result<bool, ResourceRepositoryError>;

    /// Identifier of a record holding a restricting reference to the row.
    fn restricting(
        &self,
        kind: ResourceKind,
        id: Uuid,
    ) -> Result<Option<Uuid>, ResourceRepositoryError>;

    /// Clear optional references to the deleted row.
    fn release(&self, kind: ResourceKind, id: Uuid) -> Result<(), ResourceRepositoryError>;
}

/// Registry of the stores making up one in-memory database.
#[derive(Default)]
pub struct MemoryLinks {
    stores: Mutex<Vec<Weak<dyn LinkedStore>>>,
}

impl MemoryLinks {
    pub(crate) fn register(&self, store: Weak<dyn LinkedStore>) {
        self.stores
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(store);
    }

    fn live(&self) -> Vec<Arc<dyn LinkedStore>> {
        self.stores
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter_map(Weak::upgrade)
            .collect()
    }

    /// Fail unless every reference points at an existing row.
    ///
    /// Kinds without a registered store are not checked.
    pub(crate) fn ensure_targets(
        &self,
        references: &[Reference],
    ) -> Result<(), ResourceRepositoryError> {
        let stores = self.live();
        for reference in references {
            let Some(store) = stores.iter().find(|store| store.kind() == reference.kind) else {
                continue;
            };
            if !store.contains(reference.id)? {
                return Err(ResourceRepositoryError::reference(format!(
                    "{} {} does not exist",
                    reference.kind, reference.id
                )));
            }
        }
        Ok(())
    }

    /// Prepare the row for deletion: fail while another row requires it,
    /// otherwise clear every optional reference to it.
    pub(crate) fn detach(&self, kind: ResourceKind, id: Uuid) -> Result<(), ResourceRepositoryError> {
        let stores = self.live();
        for store in &stores {
            if let Some(holder) = store.restricting(kind, id)? {
                return Err(ResourceRepositoryError::reference(format!(
                    "{kind} {id} is still referenced by {} {holder}",
                    store.kind()
                )));
            }
        }
        for store in &stores {
            store.release(kind, id)?;
        }
        Ok(())
    }
}

/// Whether `references` holds a restricting pointer to the row.
pub(crate) fn restricts(references: &[Reference], kind: ResourceKind, id: Uuid) -> bool {
    references
        .iter()
        .any(|reference| reference.on_delete == OnDelete::Restrict && reference.targets(kind, id))
}
