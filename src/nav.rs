use crate::tree::DirNode;

/// Name given to the stack bottom while it is the only element.
pub const ROOT_LABEL: &str = "/";
/// Name given to the stack bottom once deeper entries hide it, so the
/// breadcrumb line does not show a duplicate root label.
pub const BURIED_ROOT_LABEL: &str = " ";

/// Where the stack is in its lifecycle: nothing visited yet, sitting on the
/// file system root, or somewhere below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackState {
    Empty,
    Rooted,
    Nested,
}

/// The path from a file system root down to the directory currently shown.
///
/// Bottom is the root, top is the current directory. Each element owns the
/// subtree that was fetched when it was visited, so navigating up never
/// re-fetches. Every element except the bottom was a child of the element
/// below it at push time.
#[derive(Debug, Default)]
pub struct NavigationStack {
    entries: Vec<DirNode>,
}

impl NavigationStack {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn state(&self) -> StackState {
        match self.entries.len() {
            0 => StackState::Empty,
            1 => StackState::Rooted,
            _ => StackState::Nested,
        }
    }

    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a node as the new top. The caller must already have verified
    /// that the node is a child of the current top, or that the stack is
    /// empty and this is the initial root.
    pub fn push(&mut self, node: DirNode) {
        self.entries.push(node);
        self.relabel_bottom();
    }

    /// Remove the top element. Returns false without touching the stack when
    /// fewer than two elements remain; the root may never be popped.
    pub fn pop(&mut self) -> bool {
        if self.entries.len() < 2 {
            return false;
        }
        self.entries.pop();
        self.relabel_bottom();
        true
    }

    /// The directory currently shown, if navigation has started.
    pub fn current(&self) -> Option<&DirNode> {
        self.entries.last()
    }

    /// Drop everything, back to the Empty state. Used when a different file
    /// system (image or layer) is opened.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// `(id, name)` pairs from bottom to top. Restartable: every call starts
    /// a fresh pass over the current path.
    pub fn breadcrumbs(&self) -> impl Iterator<Item = (i64, &str)> + '_ {
        self.entries.iter().map(|node| (node.id, node.name.as_str()))
    }

    // The bottom element reads "/" while it is alone and blank once buried.
    fn relabel_bottom(&mut self) {
        let label = if self.entries.len() == 1 {
            ROOT_LABEL
        } else {
            BURIED_ROOT_LABEL
        };
        if let Some(bottom) = self.entries.first_mut() {
            bottom.name = label.to_string();
        }
    }
}
