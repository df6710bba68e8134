//! Property tests for the headless node tree and easing curves.
//!
//! 1. A node has at most one parent, and appears exactly once among its
//!    parent's children, whatever sequence of appends is applied.
//! 2. Appending an ancestor under its descendant is refused.
//! 3. Standard easing stays within [0, 1] and is monotonic.

#![forbid(unsafe_code)]

use easel_core::animation::Easing;
use easel_core::{MemoryNode, Node};
use proptest::prelude::*;

proptest! {
    #[test]
    fn appends_keep_single_parent(moves in prop::collection::vec((0usize..6, 0usize..6), 0..40)) {
        let nodes: Vec<MemoryNode> = (0..6).map(|_| MemoryNode::container()).collect();
        for (parent, child) in moves {
            nodes[parent].append_child(&nodes[child]);
        }

        for node in &nodes {
            if let Some(parent) = node.parent() {
                let occurrences = parent
                    .children()
                    .iter()
                    .filter(|c| c.id() == node.id())
                    .count();
                prop_assert_eq!(occurrences, 1);
            }
            // No cycles: walking up terminates within the node count.
            let mut cursor = node.parent();
            let mut steps = 0;
            while let Some(p) = cursor {
                steps += 1;
                prop_assert!(steps <= nodes.len());
                cursor = p.parent();
            }
        }
    }

    #[test]
    fn ancestor_cannot_move_under_descendant(depth in 1usize..6) {
        let top = MemoryNode::container();
        let mut leaf = top.clone();
        for _ in 0..depth {
            let next = MemoryNode::container();
            leaf.append_child(&next);
            leaf = next;
        }
        leaf.append_child(&top);
        prop_assert!(top.parent().is_none());
        prop_assert_eq!(leaf.child_count(), 0);
    }

    #[test]
    fn standard_easing_is_bounded_and_monotonic(a in 0.0f32..=1.0, b in 0.0f32..=1.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let (ylo, yhi) = (Easing::STANDARD.sample(lo), Easing::STANDARD.sample(hi));
        prop_assert!((0.0..=1.0).contains(&ylo));
        prop_assert!((0.0..=1.0).contains(&yhi));
        prop_assert!(ylo <= yhi + 1e-4);
    }
}
