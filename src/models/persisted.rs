use std::ops::Deref;

use serde::{Deserialize, Serialize};

/// A stored entity together with its storage identity.
///
/// The entity's own fields are flattened next to the identity fields, so a
/// persisted promotion serializes as one flat document. The identity key is
/// `_id` because vouchers carry their own business `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persisted<T> {
    #[serde(rename = "_id")]
    pub id: String,
    /// Bumped on every write of the document
    pub revision: i64,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(flatten)]
    pub entity: T,
}

impl<T> Persisted<T> {
    pub fn into_inner(self) -> T {
        self.entity
    }
}

impl<T> Deref for Persisted<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.entity
    }
}
