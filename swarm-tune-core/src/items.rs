//! Item identity and naming.
//!
//! The engine is keyed by stable integer [`ItemId`]s. Callers that address
//! items by name register the names in an [`ItemRoster`] and translate at the
//! boundary; ids are handed out in first-registration order.

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

/// Stable zero-based identifier of one swarm item
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct ItemId(pub u32);

impl ItemId {
    /// Zero-based index of this item
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Id-to-name lookup table in first-registration order
#[derive(Debug, Clone, Default)]
pub struct ItemRoster {
    names: Vec<String>,
    ids: BTreeMap<String, ItemId>,
}

impl ItemRoster {
    /// Create an empty roster
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a name, returning its id; an already-known name keeps its id
    pub fn register(&mut self, name: &str) -> ItemId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = ItemId(self.names.len() as u32);
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        id
    }

    /// Id previously registered for `name`
    pub fn id(&self, name: &str) -> Option<ItemId> {
        self.ids.get(name).copied()
    }

    /// Name registered for `id`
    pub fn name(&self, id: ItemId) -> Option<&str> {
        self.names.get(id.index()).map(String::as_str)
    }

    /// Number of registered items
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the roster is empty
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Ids in registration order
    pub fn ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        (0..self.names.len() as u32).map(ItemId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_order_defines_ids() {
        let mut roster = ItemRoster::new();
        assert_eq!(roster.register("b"), ItemId(0));
        assert_eq!(roster.register("a"), ItemId(1));
        assert_eq!(roster.register("c"), ItemId(2));
        assert_eq!(roster.name(ItemId(1)), Some("a"));
        assert_eq!(roster.id("c"), Some(ItemId(2)));
        assert_eq!(roster.len(), 3);
    }

    #[test]
    fn reregistering_keeps_the_original_id() {
        let mut roster = ItemRoster::new();
        let first = roster.register("x");
        let second = roster.register("x");
        assert_eq!(first, second);
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn unknown_lookups_return_none() {
        let roster = ItemRoster::new();
        assert_eq!(roster.id("missing"), None);
        assert_eq!(roster.name(ItemId(9)), None);
    }
}
