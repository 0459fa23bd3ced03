use crate::tree::DirNode;

/// One proportional slice of the current directory.
///
/// `child_index` is the position in the sorted sequence the regions were
/// built from. It is the hit-test key; both the listing and the proportional
/// strip present regions in exactly this order.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualRegion {
    pub child_index: usize,
    pub label: String,
    pub size: u64,
    /// Fraction of the parent's reported size, 0.0 for zero-sized children.
    pub share: f64,
    /// Palette slot, cycled so colors stay stable across re-renders.
    pub color_slot: usize,
}

/// The regions derived from one directory, plus the index contract the hit
/// tester needs: `child_order[child_index]` is the child's position in the
/// parent's backend-ordered children.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionLayout {
    /// Monotonically increasing rebuild counter, used to detect stale hits.
    pub generation: u64,
    /// Id of the node the layout was built from.
    pub source_id: i64,
    pub regions: Vec<VisualRegion>,
    pub child_order: Vec<usize>,
}

impl RegionLayout {
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Turns a directory's children into sized regions with a stable ordering:
/// size descending, ties kept in backend order.
#[derive(Debug)]
pub struct LayoutEngine {
    generation: u64,
    palette_len: usize,
}

impl LayoutEngine {
    pub fn new(palette_len: usize) -> Self {
        Self {
            generation: 0,
            // A degenerate palette still has to cycle somewhere
            palette_len: palette_len.max(1),
        }
    }

    /// Rebuild the layout for `node`. Every call bumps the generation, so
    /// hits captured against earlier layouts resolve to nothing.
    pub fn rebuild(&mut self, node: &DirNode) -> RegionLayout {
        self.generation += 1;

        // Parent size zero would divide by zero; such a node gets no regions
        if node.size == 0 || node.children.is_empty() {
            return RegionLayout {
                generation: self.generation,
                source_id: node.id,
                regions: Vec::new(),
                child_order: Vec::new(),
            };
        }

        let mut child_order: Vec<usize> = (0..node.children.len()).collect();
        // Stable sort: equal sizes keep their backend order
        child_order.sort_by(|&a, &b| node.children[b].size.cmp(&node.children[a].size));

        let regions = child_order
            .iter()
            .enumerate()
            .map(|(child_index, &position)| {
                let child = &node.children[position];
                VisualRegion {
                    child_index,
                    label: child.name.clone(),
                    size: child.size,
                    share: child.size as f64 / node.size as f64,
                    color_slot: child_index % self.palette_len,
                }
            })
            .collect();

        RegionLayout {
            generation: self.generation,
            source_id: node.id,
            regions,
            child_order,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
