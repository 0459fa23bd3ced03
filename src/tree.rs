/// Represents a single entry in a file-system snapshot, file or directory.
///
/// A subtree is built wholesale from one backend response and never mutated
/// afterwards, except for the cosmetic root relabeling applied by the
/// navigation stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirNode {
    /// Backend node id, unique within one backend's node space.
    pub id: i64,
    pub name: String,
    pub is_dir: bool,
    /// Backend-reported aggregate size of the subtree, never recomputed here.
    pub size: u64,
    /// Ordered children, owned exclusively by this node.
    pub children: Vec<DirNode>,
}

impl DirNode {
    /// Create a new node
    pub fn new(id: i64, name: String, is_dir: bool, size: u64) -> Self {
        Self {
            id,
            name,
            is_dir,
            size,
            children: Vec::new(),
        }
    }

    /// Create a new directory node
    pub fn new_dir(id: i64, name: String, size: u64) -> Self {
        Self::new(id, name, true, size)
    }

    /// Create a new file node
    pub fn new_file(id: i64, name: String, size: u64) -> Self {
        Self::new(id, name, false, size)
    }

    /// Attach children in backend order
    pub fn with_children(mut self, children: Vec<DirNode>) -> Self {
        self.children = children;
        self
    }

    /// Child at the given position in backend order
    pub fn child(&self, index: usize) -> Option<&DirNode> {
        self.children.get(index)
    }

    /// Find a child node by id
    pub fn child_by_id(&self, id: i64) -> Option<&DirNode> {
        self.children.iter().find(|child| child.id == id)
    }

    /// Check if this node has children
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}
