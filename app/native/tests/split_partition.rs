//! Property tests for split span partitioning.
//!
//! Whatever the ratios and pinned sizes, the spans handed to the children of
//! a split must cover the split exactly: no pixel lost to rounding, none
//! counted twice.

use proptest::prelude::*;
use trellis_lib::tiling::NodeId;
use trellis_lib::tiling::node::SplitChild;
use trellis_lib::tiling::split::partition_spans;

fn children(weights: &[(f64, Option<i32>)]) -> Vec<SplitChild> {
    weights
        .iter()
        .zip(0u64..)
        .map(|(&(ratio, preferred), id)| {
            let mut child = SplitChild::new(NodeId(id), ratio);
            child.preferred_size = preferred;
            child
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn spans_sum_to_container_for_any_ratios(
        ratios in prop::collection::vec(0.0f64..10.0, 1..12),
        extra in 0i32..5000,
    ) {
        let weights: Vec<_> = ratios.iter().map(|&r| (r, None)).collect();
        let kids = children(&weights);
        let span = i32::try_from(kids.len()).unwrap() + extra;

        let spans = partition_spans(span, &kids);
        prop_assert_eq!(spans.len(), kids.len());
        prop_assert!(spans.iter().all(|&s| s >= 0));
        prop_assert_eq!(spans.iter().sum::<i32>(), span);
    }

    #[test]
    fn spans_sum_to_container_with_pinned_children(
        weights in prop::collection::vec((0.0f64..10.0, prop::option::of(0i32..3000)), 1..12),
        extra in 0i32..5000,
    ) {
        let kids = children(&weights);
        let span = i32::try_from(kids.len()).unwrap() + extra;

        let spans = partition_spans(span, &kids);
        prop_assert!(spans.iter().all(|&s| s >= 0));
        prop_assert_eq!(spans.iter().sum::<i32>(), span);
    }
}
