//! Caller-supplied display ordering
//!
//! The management UI persists a user-arranged id sequence; it is always
//! passed in explicitly. Entities listed in the sequence come first in that
//! order, the rest follow by `position` and then by collection order.

use crate::catalog::Entity;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayOrder {
    ids: Vec<String>,
}

impl DisplayOrder {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DisplayOrder {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    fn ranks(&self) -> FxHashMap<&str, usize> {
        let mut ranks = FxHashMap::default();
        for (rank, id) in self.ids.iter().enumerate() {
            ranks.entry(id.as_str()).or_insert(rank);
        }
        ranks
    }

    /// Stable arrangement of `items` by (explicit rank, position, input index)
    pub fn arrange<'a, T: Entity + ?Sized>(&self, items: Vec<&'a T>) -> Vec<&'a T> {
        let ranks = self.ranks();
        let mut keyed: Vec<(usize, i64, usize, &'a T)> = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let rank = ranks.get(item.id()).copied().unwrap_or(usize::MAX);
                let position = item.position().unwrap_or(i64::MAX);
                (rank, position, index, item)
            })
            .collect();
        keyed.sort_by_key(|(rank, position, index, _)| (*rank, *position, *index));
        keyed.into_iter().map(|(_, _, _, item)| item).collect()
    }
}

impl From<Vec<String>> for DisplayOrder {
    fn from(ids: Vec<String>) -> Self {
        DisplayOrder { ids }
    }
}
