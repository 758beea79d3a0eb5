//! Logo uploads kept beside the draft, keyed by branch identity.

use std::collections::HashMap;

/// Stable identity of an additional branch, minted when the branch is added
/// and never reused by the same form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BranchId(pub(crate) u64);

impl BranchId {
    /// Raw id, usable as a render key.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// An in-memory logo upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoFile {
    /// Name sent as the part's file name.
    pub file_name: String,
    /// MIME type of the part.
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl LogoFile {
    /// Wraps already-read file contents.
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

/// Logo slots for the main branch and for each additional branch.
///
/// `F` is whatever handle the host platform uses for a picked file.
#[derive(Debug, Clone)]
pub struct AttachmentTracker<F> {
    main: Option<F>,
    branches: HashMap<BranchId, F>,
}

impl<F> Default for AttachmentTracker<F> {
    fn default() -> Self {
        Self {
            main: None,
            branches: HashMap::new(),
        }
    }
}

impl<F> AttachmentTracker<F> {
    /// No logos.
    pub fn new() -> Self {
        Self::default()
    }

    /// Main branch logo.
    pub fn main(&self) -> Option<&F> {
        self.main.as_ref()
    }

    /// Sets the main branch logo, returning the one it replaced.
    pub fn set_main(&mut self, file: F) -> Option<F> {
        self.main.replace(file)
    }

    /// Takes the main branch logo out.
    pub fn clear_main(&mut self) -> Option<F> {
        self.main.take()
    }

    /// Logo of branch `id`.
    pub fn branch(&self, id: BranchId) -> Option<&F> {
        self.branches.get(&id)
    }

    /// Sets the logo of branch `id`, returning the one it replaced.
    pub fn set_branch(&mut self, id: BranchId, file: F) -> Option<F> {
        self.branches.insert(id, file)
    }

    /// Takes the logo of branch `id` out.
    pub fn remove_branch(&mut self, id: BranchId) -> Option<F> {
        self.branches.remove(&id)
    }

    /// Drops every branch logo, keeping the main one.
    pub fn clear_branches(&mut self) {
        self.branches.clear();
    }

    /// Drops every logo.
    pub fn clear(&mut self) {
        self.main = None;
        self.branches.clear();
    }

    /// No slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.main.is_none() && self.branches.is_empty()
    }

    /// Number of occupied slots, main included.
    pub fn len(&self) -> usize {
        usize::from(self.main.is_some()) + self.branches.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_replace_and_clear() {
        let mut tracker = AttachmentTracker::new();
        assert!(tracker.is_empty());
        assert_eq!(tracker.set_main("a.png"), None);
        assert_eq!(tracker.set_main("b.png"), Some("a.png"));
        tracker.set_branch(BranchId(1), "c.png");
        tracker.set_branch(BranchId(4), "d.png");
        assert_eq!(tracker.len(), 3);

        assert_eq!(tracker.remove_branch(BranchId(1)), Some("c.png"));
        assert_eq!(tracker.branch(BranchId(1)), None);
        assert_eq!(tracker.branch(BranchId(4)), Some(&"d.png"));

        tracker.clear();
        assert!(tracker.is_empty());
        assert_eq!(tracker.main(), None);
    }
}
