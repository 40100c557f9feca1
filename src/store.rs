//! Bulk deletion against the registry's backing entity store.
//!
//! The store itself lives elsewhere; this module only defines the two
//! operations it needs from one and the "delete everything a query matches"
//! helper built on them.

use crate::error::Result;
use crate::names::ResourceKind;
use async_trait::async_trait;

/// Identity of one stored entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key {
    pub kind: String,
    pub name: String,
}

impl Key {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
        }
    }
}

/// Equality-filtered query over one entity kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pub kind: String,
    pub filters: Vec<(String, String)>,
    pub distinct: bool,
}

impl Query {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Default::default()
        }
    }

    /// Every stored `kind` whose parent is `parent`.
    pub fn children(kind: ResourceKind, parent: &str) -> Self {
        Self::new(kind.singular()).filter("parent", parent)
    }

    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }
}

/// Lazy sequence of query results; `Ok(None)` marks the end.
#[async_trait]
pub trait KeyStream: Send {
    async fn next(&mut self) -> Result<Option<Key>>;
}

#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn run_query(&self, query: &Query) -> Result<Box<dyn KeyStream>>;
    async fn delete_multi(&self, keys: Vec<Key>) -> Result<()>;
}

/// Delete every entity matched by `query`, returning how many were deleted.
///
/// All keys are collected before anything is deleted, so a failure while
/// reading results deletes nothing.
pub async fn delete_all_matches(store: &dyn EntityStore, query: Query) -> Result<usize> {
    let query = query.distinct();
    let mut results = store.run_query(&query).await?;
    let mut keys = Vec::new();
    while let Some(key) = results.next().await? {
        keys.push(key);
    }
    let count = keys.len();
    tracing::debug!(kind = %query.kind, count, "deleting matched entities");
    store.delete_multi(keys).await?;
    Ok(count)
}
