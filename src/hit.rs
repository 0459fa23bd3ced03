use crate::layout::RegionLayout;
use crate::tree::DirNode;

/// A region interaction as the visual surface reports it: which sorted
/// position was hit, and which layout generation was on screen when the hit
/// was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionHit {
    pub generation: u64,
    pub child_index: usize,
}

/// Screen cells owned by one region, recorded while the strip is drawn.
/// Half-open on both axes: `x0 <= x < x1`, `y0 <= y < y1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitZone {
    pub x0: u16,
    pub y0: u16,
    pub x1: u16,
    pub y1: u16,
    pub hit: RegionHit,
}

impl HitZone {
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }
}

/// First zone under the given cell, if any.
pub fn zone_at(zones: &[HitZone], x: u16, y: u16) -> Option<RegionHit> {
    zones.iter().find(|zone| zone.contains(x, y)).map(|zone| zone.hit)
}

/// Resolve a hit back to the child node it pointed at.
///
/// Returns the child only when the hit is still live: captured against the
/// layout currently in force, built from the node currently shown, in range,
/// and naming a directory. Files are not navigable and stale or out-of-range
/// hits are expected, so every miss is None, never an error.
pub fn resolve<'a>(
    layout: &RegionLayout,
    parent: &'a DirNode,
    hit: RegionHit,
) -> Option<&'a DirNode> {
    if hit.generation != layout.generation || layout.source_id != parent.id {
        return None;
    }
    let position = *layout.child_order.get(hit.child_index)?;
    let child = parent.children.get(position)?;
    if child.is_dir {
        Some(child)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutEngine;

    fn parent() -> DirNode {
        DirNode::new_dir(1, "root".to_string(), 700).with_children(vec![
            DirNode::new_dir(10, "a".to_string(), 300),
            DirNode::new_file(11, "b".to_string(), 100),
            DirNode::new_dir(12, "c".to_string(), 300),
        ])
    }

    fn hit(generation: u64, child_index: usize) -> RegionHit {
        RegionHit {
            generation,
            child_index,
        }
    }

    #[test]
    fn test_resolves_directory_child() {
        let parent = parent();
        let mut engine = LayoutEngine::new(6);
        let layout = engine.rebuild(&parent);

        // Sorted order is a, c, b; index 1 is the tied directory c
        let child = resolve(&layout, &parent, hit(layout.generation, 1));
        assert_eq!(child.map(|c| c.id), Some(12));
    }

    #[test]
    fn test_files_are_not_navigable() {
        let parent = parent();
        let mut engine = LayoutEngine::new(6);
        let layout = engine.rebuild(&parent);

        // b sorts last
        assert!(resolve(&layout, &parent, hit(layout.generation, 2)).is_none());
    }

    #[test]
    fn test_out_of_range_index_is_none() {
        let parent = parent();
        let mut engine = LayoutEngine::new(6);
        let layout = engine.rebuild(&parent);
        assert!(resolve(&layout, &parent, hit(layout.generation, 3)).is_none());
    }

    #[test]
    fn test_stale_generation_is_none() {
        let parent = parent();
        let mut engine = LayoutEngine::new(6);
        let old = engine.rebuild(&parent);
        let captured = hit(old.generation, 0);

        // Layout rebuilt after the hit was captured
        let fresh = engine.rebuild(&parent);
        assert!(resolve(&fresh, &parent, captured).is_none());
    }

    #[test]
    fn test_layout_for_different_node_is_none() {
        let parent = parent();
        let other = DirNode::new_dir(99, "other".to_string(), 50)
            .with_children(vec![DirNode::new_dir(100, "x".to_string(), 50)]);
        let mut engine = LayoutEngine::new(6);
        let layout = engine.rebuild(&other);

        assert!(resolve(&layout, &parent, hit(layout.generation, 0)).is_none());
    }

    #[test]
    fn test_zone_containment_is_half_open() {
        let zone = HitZone {
            x0: 2,
            y0: 1,
            x1: 6,
            y1: 2,
            hit: hit(1, 0),
        };
        assert!(zone.contains(2, 1));
        assert!(zone.contains(5, 1));
        assert!(!zone.contains(6, 1));
        assert!(!zone.contains(2, 2));
        assert!(!zone.contains(1, 1));
    }

    #[test]
    fn test_zone_at_finds_owning_region() {
        let zones = vec![
            HitZone {
                x0: 0,
                y0: 1,
                x1: 4,
                y1: 2,
                hit: hit(7, 0),
            },
            HitZone {
                x0: 4,
                y0: 1,
                x1: 9,
                y1: 2,
                hit: hit(7, 1),
            },
        ];
        assert_eq!(zone_at(&zones, 3, 1), Some(hit(7, 0)));
        assert_eq!(zone_at(&zones, 4, 1), Some(hit(7, 1)));
        assert_eq!(zone_at(&zones, 9, 1), None);
        assert_eq!(zone_at(&zones, 3, 0), None);
    }
}
