//! Ordering helpers shared by the assembler and display paths.

use crate::Set;
use std::cmp::Ordering;

/// Compare two sets by their explicit order key.
///
/// Equal order values compare as equal so that a stable sort preserves
/// first-seen row order for duplicates.
pub fn cmp_set_order(a: &Set, b: &Set) -> Ordering {
    a.order.cmp(&b.order)
}

/// Stable-sort sets into display order by the order key.
///
/// Arrival order is never trusted for intra-exercise ordering; a join
/// without an explicit ORDER BY may interleave set rows arbitrarily.
pub fn sort_sets_by_order(sets: &mut [Set]) {
    sets.sort_by(cmp_set_order);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(order: i64, reps: u32) -> Set {
        Set {
            reps,
            weight: 0,
            duration_ms: 0,
            rest_ms: 0,
            order,
        }
    }

    #[test]
    fn test_sorts_by_order_key() {
        let mut sets = vec![set(2, 12), set(0, 10), set(1, 11)];
        sort_sets_by_order(&mut sets);
        let orders: Vec<i64> = sets.iter().map(|s| s.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn test_duplicate_orders_keep_first_seen_order() {
        let mut sets = vec![set(1, 30), set(0, 10), set(1, 20)];
        sort_sets_by_order(&mut sets);
        // The two order-1 entries keep their arrival order (30 before 20)
        let reps: Vec<u32> = sets.iter().map(|s| s.reps).collect();
        assert_eq!(reps, vec![10, 30, 20]);
    }
}
