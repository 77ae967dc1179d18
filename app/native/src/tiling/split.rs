//! Split container layout math and child bookkeeping.
//!
//! Supports four modes:
//! - **`HSplit`**: children side by side, width partitioned left to right
//! - **`VSplit`**: children stacked, height partitioned top to bottom
//! - **`Tabbed`** / **`Stacked`**: every child receives the full rectangle
//!
//! Partitioning uses cumulative boundaries so the spans always sum to the
//! container span exactly; the last flexible child absorbs the rounding.

use smallvec::{SmallVec, smallvec};

use super::constants::size::MIN_VIEW_SIZE;
use super::geometry::Rect;
use super::node::{NodeId, SplitChild, SplitNode, SplitType};

/// Child rectangles produced by a layout pass.
pub type SplitLayout = SmallVec<[Rect; 4]>;

/// Per-child spans along the split axis.
pub type Spans = SmallVec<[i32; 4]>;

/// Tolerance added before flooring a boundary, so that ratios folded from
/// exact pixel spans reproduce the same spans.
const BOUNDARY_EPSILON: f64 = 1e-6;

// ============================================================================
// Layout Math
// ============================================================================

/// Partition `span` pixels among `children`.
///
/// Children with a `preferred_size` take that many pixels first (clamped to
/// what is left). The remaining pixels are shared by the flexible children in
/// proportion to their ratios with boundaries `floor(S * cum_k / total)`. If
/// every child is pinned, the last child absorbs the leftover.
///
/// # Arguments
///
/// * `span` - Total pixels along the split axis
/// * `children` - The container's children, in order
///
/// # Returns
///
/// One span per child; the spans sum to `span.max(0)`.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)] // Boundaries are bounded by `remaining`
#[must_use]
pub fn partition_spans(span: i32, children: &[SplitChild]) -> Spans {
    let mut spans: Spans = smallvec![0; children.len()];
    if children.is_empty() {
        return spans;
    }

    let mut remaining = span.max(0);
    for (i, child) in children.iter().enumerate() {
        if let Some(pref) = child.preferred_size {
            let size = pref.clamp(0, remaining);
            spans[i] = size;
            remaining -= size;
        }
    }

    let flexible: SmallVec<[usize; 4]> = children
        .iter()
        .enumerate()
        .filter(|(_, c)| c.preferred_size.is_none())
        .map(|(i, _)| i)
        .collect();

    let Some(&last_flexible) = flexible.last() else {
        if let Some(last) = spans.last_mut() {
            *last += remaining;
        }
        return spans;
    };

    let total: f64 = flexible.iter().map(|&i| children[i].ratio.max(0.0)).sum();
    let weight = |i: usize| if total > 0.0 { children[i].ratio.max(0.0) } else { 1.0 };
    let total = if total > 0.0 { total } else { flexible.len() as f64 };

    let mut cumulative = 0.0;
    let mut previous = 0;
    for &i in &flexible {
        cumulative += weight(i);
        let boundary = if i == last_flexible {
            remaining
        } else {
            let raw = (f64::from(remaining) * cumulative / total + BOUNDARY_EPSILON).floor();
            (raw as i32).clamp(previous, remaining)
        };
        spans[i] = boundary - previous;
        previous = boundary;
    }

    spans
}

/// Compute the rectangle of every child of a container laid out in `rect`.
#[must_use]
pub fn layout_children(rect: Rect, split_type: SplitType, children: &[SplitChild]) -> SplitLayout {
    match split_type {
        SplitType::Tabbed | SplitType::Stacked => smallvec![rect; children.len()],
        SplitType::HSplit => {
            let mut x = rect.x;
            partition_spans(rect.width, children)
                .into_iter()
                .map(|w| {
                    let child = Rect::new(x, rect.y, w, rect.height);
                    x += w;
                    child
                })
                .collect()
        }
        SplitType::VSplit => {
            let mut y = rect.y;
            partition_spans(rect.height, children)
                .into_iter()
                .map(|h| {
                    let child = Rect::new(rect.x, y, rect.width, h);
                    y += h;
                    child
                })
                .collect()
        }
    }
}

/// Span of `rect` along the axis `split_type` partitions.
#[must_use]
pub const fn axis_span(rect: &Rect, split_type: SplitType) -> i32 {
    match split_type {
        SplitType::HSplit | SplitType::Tabbed => rect.width,
        SplitType::VSplit | SplitType::Stacked => rect.height,
    }
}

/// Clamp a requested size to the minimum view size.
#[must_use]
pub const fn clamp_size(size: i32) -> i32 { if size < MIN_VIEW_SIZE { MIN_VIEW_SIZE } else { size } }

// ============================================================================
// Child Bookkeeping
// ============================================================================

impl SplitNode {
    /// Insert a child entry at `index`, giving it an equal share.
    ///
    /// The new child gets `1/(n+1)`; existing ratios are scaled by
    /// `n/(n+1)` so the total stays one. The active child index keeps
    /// pointing at the same node.
    #[allow(clippy::cast_precision_loss)] // Child counts are tiny
    pub(crate) fn insert_entry(&mut self, index: usize, node: NodeId) {
        let index = index.min(self.children.len());
        let n = self.children.len() as f64;
        let share = 1.0 / (n + 1.0);
        for child in &mut self.children {
            child.ratio *= n / (n + 1.0);
        }
        self.children.insert(index, SplitChild::new(node, share));

        if self.children.len() > 1 && index <= self.active_child {
            self.active_child += 1;
        }
    }

    /// Remove the child entry at `index` and renormalize the rest.
    ///
    /// Pinned sizes of the remaining children are dropped, so the split
    /// follows its ratios again.
    pub(crate) fn remove_entry(&mut self, index: usize) -> Option<SplitChild> {
        if index >= self.children.len() {
            return None;
        }
        let removed = self.children.remove(index);
        for child in &mut self.children {
            child.preferred_size = None;
        }
        self.normalize_ratios();

        if index < self.active_child {
            self.active_child -= 1;
        }
        self.active_child = self.active_child.min(self.children.len().saturating_sub(1));
        Some(removed)
    }

    /// Scale ratios so they sum to one; degenerate totals fall back to equal
    /// shares.
    #[allow(clippy::cast_precision_loss)] // Child counts are tiny
    pub(crate) fn normalize_ratios(&mut self) {
        if self.children.is_empty() {
            return;
        }
        let total: f64 = self.children.iter().map(|c| c.ratio.max(0.0)).sum();
        if total > 0.0 {
            for child in &mut self.children {
                child.ratio = child.ratio.max(0.0) / total;
            }
        } else {
            let share = 1.0 / self.children.len() as f64;
            for child in &mut self.children {
                child.ratio = share;
            }
        }
    }

    /// Turn the current spans into ratios and clear every preferred size.
    ///
    /// Called when a continuous resize ends so that the pinned pixel sizes
    /// become the container's new proportions.
    pub(crate) fn fold_preferred_sizes(&mut self, span: i32) {
        if !self.children.iter().any(|c| c.preferred_size.is_some()) {
            return;
        }
        if !self.split_type.is_overlapping() && span > 0 {
            let spans = partition_spans(span, &self.children);
            for (child, s) in self.children.iter_mut().zip(spans) {
                child.ratio = f64::from(s) / f64::from(span);
            }
        }
        for child in &mut self.children {
            child.preferred_size = None;
        }
        self.normalize_ratios();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn children(ratios: &[f64]) -> SmallVec<[SplitChild; 4]> {
        ratios
            .iter()
            .enumerate()
            .map(|(i, &r)| SplitChild::new(NodeId(i as u64), r))
            .collect()
    }

    // ========================================================================
    // Partitioning
    // ========================================================================

    #[test]
    fn test_partition_empty() {
        assert!(partition_spans(100, &[]).is_empty());
    }

    #[test]
    fn test_partition_last_absorbs_rounding() {
        let kids = children(&[1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0]);
        let spans = partition_spans(100, &kids);
        assert_eq!(spans.as_slice(), &[33, 33, 34]);
        assert_eq!(spans.iter().sum::<i32>(), 100);
    }

    #[test]
    fn test_partition_unequal_ratios() {
        let kids = children(&[0.25, 0.75]);
        assert_eq!(partition_spans(1000, &kids).as_slice(), &[250, 750]);
    }

    #[test]
    fn test_partition_preferred_sizes_pinned() {
        let mut kids = children(&[1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0]);
        kids[0].preferred_size = Some(400);
        kids[1].preferred_size = Some(200);
        assert_eq!(partition_spans(900, &kids).as_slice(), &[400, 200, 300]);
    }

    #[test]
    fn test_partition_all_pinned_last_absorbs() {
        let mut kids = children(&[0.5, 0.5]);
        kids[0].preferred_size = Some(100);
        kids[1].preferred_size = Some(100);
        assert_eq!(partition_spans(300, &kids).as_slice(), &[100, 200]);
    }

    #[test]
    fn test_partition_oversized_preference_clamped() {
        let mut kids = children(&[0.5, 0.5]);
        kids[0].preferred_size = Some(5000);
        let spans = partition_spans(300, &kids);
        assert_eq!(spans.as_slice(), &[300, 0]);
    }

    #[test]
    fn test_partition_zero_ratios_fall_back_to_equal() {
        let kids = children(&[0.0, 0.0]);
        assert_eq!(partition_spans(10, &kids).as_slice(), &[5, 5]);
    }

    // ========================================================================
    // Layout
    // ========================================================================

    #[test]
    fn test_hsplit_partitions_width() {
        let rect = Rect::new(10, 20, 100, 50);
        let layout = layout_children(rect, SplitType::HSplit, &children(&[0.5, 0.5]));
        assert_eq!(layout.as_slice(), &[Rect::new(10, 20, 50, 50), Rect::new(60, 20, 50, 50)]);
    }

    #[test]
    fn test_vsplit_partitions_height() {
        let rect = Rect::new(0, 0, 100, 90);
        let layout = layout_children(rect, SplitType::VSplit, &children(&[1.0 / 3.0; 3]));
        assert_eq!(layout.as_slice(), &[
            Rect::new(0, 0, 100, 30),
            Rect::new(0, 30, 100, 30),
            Rect::new(0, 60, 100, 30),
        ]);
    }

    #[test]
    fn test_overlapping_modes_give_full_rect() {
        let rect = Rect::new(0, 0, 100, 90);
        for split_type in [SplitType::Tabbed, SplitType::Stacked] {
            let layout = layout_children(rect, split_type, &children(&[0.2, 0.8]));
            assert!(layout.iter().all(|r| *r == rect));
        }
    }

    // ========================================================================
    // Bookkeeping
    // ========================================================================

    #[test]
    fn test_insert_gives_equal_share() {
        let mut split = SplitNode::new(SplitType::HSplit);
        split.insert_entry(0, NodeId(1));
        assert!((split.children[0].ratio - 1.0).abs() < 1e-9);

        split.insert_entry(1, NodeId(2));
        split.insert_entry(2, NodeId(3));
        for child in &split.children {
            assert!((child.ratio - 1.0 / 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_insert_keeps_active_child_pointing_at_same_node() {
        let mut split = SplitNode::new(SplitType::HSplit);
        split.insert_entry(0, NodeId(1));
        split.insert_entry(1, NodeId(2));
        split.active_child = 1;
        split.insert_entry(0, NodeId(3));
        assert_eq!(split.children[split.active_child].node, NodeId(2));
    }

    #[test]
    fn test_remove_renormalizes() {
        let mut split = SplitNode::new(SplitType::HSplit);
        split.insert_entry(0, NodeId(1));
        split.insert_entry(1, NodeId(2));
        split.insert_entry(2, NodeId(3));
        split.children[0].ratio = 0.5;
        split.children[1].ratio = 0.25;
        split.children[2].ratio = 0.25;

        let removed = split.remove_entry(0).unwrap();
        assert_eq!(removed.node, NodeId(1));
        let total: f64 = split.children.iter().map(|c| c.ratio).sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!((split.children[0].ratio - 0.5).abs() < 1e-9);
        assert!(split.remove_entry(5).is_none());
    }

    #[test]
    fn test_remove_unpins_remaining_children() {
        let mut split = SplitNode::new(SplitType::HSplit);
        for i in 0..3 {
            split.insert_entry(i, NodeId(i as u64));
        }
        split.children[0].preferred_size = Some(433);
        split.children[1].preferred_size = Some(233);

        let _ = split.remove_entry(0);
        assert!(split.children.iter().all(|c| c.preferred_size.is_none()));
        assert_eq!(partition_spans(2000, &split.children).as_slice(), &[1000, 1000]);
    }

    #[test]
    fn test_remove_clamps_active_child() {
        let mut split = SplitNode::new(SplitType::VSplit);
        split.insert_entry(0, NodeId(1));
        split.insert_entry(1, NodeId(2));
        split.active_child = 1;
        let _ = split.remove_entry(1);
        assert_eq!(split.active_child, 0);
        let _ = split.remove_entry(0);
        assert_eq!(split.active_child, 0);
        assert!(split.is_empty());
    }

    #[test]
    fn test_fold_preferred_sizes_preserves_spans() {
        let mut split = SplitNode::new(SplitType::HSplit);
        for i in 0..3 {
            split.insert_entry(i, NodeId(i as u64));
        }
        split.children[0].preferred_size = Some(401);
        split.children[1].preferred_size = Some(199);
        let before = partition_spans(900, &split.children);

        split.fold_preferred_sizes(900);
        assert!(split.children.iter().all(|c| c.preferred_size.is_none()));
        assert_eq!(partition_spans(900, &split.children), before);
    }
}
