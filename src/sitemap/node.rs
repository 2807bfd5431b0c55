use chrono::{DateTime, Utc};
use url::Url;

/// Handle to a node stored in a sitemap's arena
///
/// Handles are only meaningful for the sitemap that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in discovery order (the root is 0)
    pub fn index(self) -> usize {
        self.0
    }
}

/// One discovered page
#[derive(Debug, Clone)]
pub struct Node {
    address: Url,
    created_at: DateTime<Utc>,
    children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(address: Url) -> Self {
        Self {
            address,
            created_at: Utc::now(),
            children: Vec::new(),
        }
    }

    /// Absolute address of the page
    pub fn address(&self) -> &Url {
        &self.address
    }

    /// When the page was first discovered
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Pages first discovered from this one, in insertion order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub(crate) fn push_child(&mut self, child: NodeId) {
        self.children.push(child);
    }
}
