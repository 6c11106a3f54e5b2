//! Supplier-hierarchy traversal.
//!
//! A link's level is the number of supplier hops between it and the top of
//! its chain: a link with no supplier is level 0, anything else is one more
//! than its supplier. Levels are derived on every read and never stored.

use std::collections::{HashMap, HashSet};

use crate::types::DbId;

/// Resolves the supplier of a link by id.
///
/// Returning `None` means either "has no supplier" or "unknown link"; both
/// end the walk.
pub trait SupplierLookup {
    fn supplier_of(&self, id: DbId) -> Option<DbId>;
}

impl SupplierLookup for HashMap<DbId, Option<DbId>> {
    fn supplier_of(&self, id: DbId) -> Option<DbId> {
        self.get(&id).copied().flatten()
    }
}

/// In-memory snapshot of `id -> supplier_id` edges.
///
/// Holds at least the chains of the links whose level is asked for.
#[derive(Debug, Clone, Default)]
pub struct SupplierGraph {
    edges: HashMap<DbId, Option<DbId>>,
}

impl SupplierGraph {
    pub fn from_edges(edges: impl IntoIterator<Item = (DbId, Option<DbId>)>) -> Self {
        Self {
            edges: edges.into_iter().collect(),
        }
    }

    /// Level of a link that is already part of the graph.
    pub fn level(&self, id: DbId) -> u32 {
        hierarchy_level(id, self.supplier_of(id), self)
    }
}

impl SupplierLookup for SupplierGraph {
    fn supplier_of(&self, id: DbId) -> Option<DbId> {
        self.edges.supplier_of(id)
    }
}

/// Compute the level of link `id` whose direct supplier is `supplier`.
///
/// `supplier` is passed explicitly so a link can be evaluated against a
/// supplier it does not have in `lookup` yet (e.g. a pending update).
///
/// Walking stops at the first link seen twice, so any cycle terminates and
/// the level accumulated up to that point is returned.
pub fn hierarchy_level<L>(id: DbId, supplier: Option<DbId>, lookup: &L) -> u32
where
    L: SupplierLookup + ?Sized,
{
    let mut level = 0;
    let mut visited = HashSet::from([id]);
    let mut cursor = supplier;

    while let Some(current) = cursor {
        if !visited.insert(current) {
            break;
        }
        level += 1;
        cursor = lookup.supplier_of(current);
    }

    level
}

/// True if making `new_supplier` the supplier of `id` would put `id` into
/// its own supplier chain.
pub fn would_create_cycle<L>(id: DbId, new_supplier: DbId, lookup: &L) -> bool
where
    L: SupplierLookup + ?Sized,
{
    let mut visited = HashSet::new();
    let mut cursor = Some(new_supplier);

    while let Some(current) = cursor {
        if current == id {
            return true;
        }
        if !visited.insert(current) {
            // An existing cycle upstream that does not involve `id`.
            return false;
        }
        cursor = lookup.supplier_of(current);
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(DbId, Option<DbId>)]) -> SupplierGraph {
        SupplierGraph::from_edges(edges.iter().copied())
    }

    #[test]
    fn link_without_supplier_is_level_zero() {
        let g = graph(&[(1, None)]);
        assert_eq!(g.level(1), 0);
    }

    #[test]
    fn level_is_one_more_than_supplier() {
        let g = graph(&[(1, None), (2, Some(1)), (3, Some(2)), (4, Some(3))]);
        for id in 2..=4 {
            let supplier = g.supplier_of(id).unwrap();
            assert_eq!(g.level(id), 1 + g.level(supplier));
        }
        assert_eq!(g.level(4), 3);
    }

    #[test]
    fn self_supply_stops_immediately() {
        let g = graph(&[(1, Some(1))]);
        assert_eq!(g.level(1), 0);
    }

    #[test]
    fn cycle_through_origin_terminates() {
        // 1 -> 2 -> 3 -> 1
        let g = graph(&[(1, Some(2)), (2, Some(3)), (3, Some(1))]);
        assert_eq!(g.level(1), 2);
    }

    #[test]
    fn cycle_not_containing_origin_terminates() {
        // A(1) -> B(2) -> C(3) -> B(2)
        let g = graph(&[(1, Some(2)), (2, Some(3)), (3, Some(2))]);
        assert_eq!(g.level(1), 2);
    }

    #[test]
    fn unknown_supplier_ends_walk() {
        let g = graph(&[(1, Some(99))]);
        assert_eq!(g.level(1), 1);
    }

    #[test]
    fn pending_supplier_is_evaluated_without_the_graph_knowing_it() {
        let g = graph(&[(1, None), (2, Some(1))]);
        assert_eq!(hierarchy_level(10, Some(2), &g), 2);
        assert_eq!(hierarchy_level(10, None, &g), 0);
    }

    #[test]
    fn plain_hashmap_is_a_lookup() {
        let map: HashMap<DbId, Option<DbId>> = HashMap::from([(1, None), (2, Some(1))]);
        assert_eq!(hierarchy_level(2, Some(1), &map), 1);
    }

    #[test]
    fn detects_transitive_cycle() {
        // 3 -> 2 -> 1; making 1 supplied by 3 closes the loop.
        let g = graph(&[(1, None), (2, Some(1)), (3, Some(2))]);
        assert!(would_create_cycle(1, 3, &g));
        assert!(would_create_cycle(1, 1, &g));
        assert!(!would_create_cycle(3, 1, &g));
    }

    #[test]
    fn cycle_check_terminates_on_unrelated_cycle() {
        let g = graph(&[(2, Some(3)), (3, Some(2)), (5, None)]);
        assert!(!would_create_cycle(5, 2, &g));
    }
}
