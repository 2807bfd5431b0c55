//! Sitemap tree with a per-crawl deduplicating index
//!
//! Nodes live in an arena owned by the sitemap. Parent to child edges are
//! stored as `NodeId`s on the parent, and the index maps every address to the
//! handle of its node. Because an address can be attached only once, the tree
//! stays an arborescence even when the site's link graph has cycles.

use super::node::{Node, NodeId};
use crate::url::registrable_domain;
use crate::TreeError;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use url::Url;

/// Result of a successful edge insertion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOutcome {
    /// A new node was created and attached to the source page
    Added(NodeId),
    /// The target was already in the sitemap; nothing changed
    AlreadyPresent,
}

impl EdgeOutcome {
    /// Returns true if the insertion grew the tree
    pub fn is_added(&self) -> bool {
        matches!(self, Self::Added(_))
    }
}

/// The aggregate result of one crawl
#[derive(Debug, Clone)]
pub struct Sitemap {
    nodes: Vec<Node>,
    root: Option<NodeId>,
    registrable_domain: Option<String>,
    max_depth: usize,
    achieved_depth: usize,
    created_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    index: HashMap<String, NodeId>,
}

impl Sitemap {
    /// Creates an empty, rootless sitemap for a crawl bounded by `max_depth`
    pub fn new(max_depth: usize) -> Self {
        Self {
            nodes: Vec::new(),
            root: None,
            registrable_domain: None,
            max_depth,
            achieved_depth: 0,
            created_at: Utc::now(),
            finished_at: None,
            index: HashMap::new(),
        }
    }

    /// Sets the root node from the seed address
    ///
    /// Returns false, leaving the sitemap untouched, if a root already exists.
    /// If the seed's registrable domain cannot be computed the root is still
    /// set, but every discovered link will be rejected as off-site.
    pub fn set_root(&mut self, address: Url) -> bool {
        if self.root.is_some() {
            return false;
        }

        match registrable_domain(&address) {
            Ok(domain) => self.registrable_domain = Some(domain),
            Err(e) => {
                tracing::warn!(
                    "Could not compute the registrable domain of {}: {}. Only the root page will be mapped",
                    address,
                    e
                );
            }
        }

        let id = self.push_node(address);
        self.root = Some(id);
        true
    }

    /// Inserts a parent to child edge
    ///
    /// `to` may be relative, in which case it is resolved against the root
    /// address. Only the first edge ever observed for a target is recorded.
    ///
    /// # Returns
    ///
    /// * `Ok(EdgeOutcome::Added(id))` - a new node was attached to `from`
    /// * `Ok(EdgeOutcome::AlreadyPresent)` - `to` is already in the sitemap
    /// * `Err(TreeError)` - no root, unknown source page, or unresolvable `to`
    pub fn add_edge(&mut self, from: &Url, to: &str) -> Result<EdgeOutcome, TreeError> {
        let root = self.root.ok_or(TreeError::NoRoot)?;

        let from_id = *self
            .index
            .get(from.as_str())
            .ok_or_else(|| TreeError::UnknownSource(from.to_string()))?;

        let to = self.nodes[root.0]
            .address()
            .join(to)
            .map_err(|source| TreeError::InvalidAddress {
                address: to.to_string(),
                source,
            })?;

        if self.index.contains_key(to.as_str()) {
            return Ok(EdgeOutcome::AlreadyPresent);
        }

        let id = self.push_node(to);
        self.nodes[from_id.0].push_child(id);
        Ok(EdgeOutcome::Added(id))
    }

    fn push_node(&mut self, address: Url) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.index.insert(address.as_str().to_string(), id);
        self.nodes.push(Node::new(address));
        id
    }

    /// Returns every node exactly `depth` edges below the root
    ///
    /// Depth 0 yields the root alone. Nodes come back in tree order, so the
    /// children of one parent keep their insertion order.
    pub fn nodes_at_depth(&self, depth: usize) -> Vec<&Node> {
        let mut found = Vec::new();
        if let Some(root) = self.root {
            self.collect_at_depth(root, 0, depth, &mut found);
        }
        found.into_iter().map(|id| self.node_at(id)).collect()
    }

    fn collect_at_depth(&self, id: NodeId, current: usize, target: usize, found: &mut Vec<NodeId>) {
        if current == target {
            found.push(id);
            return;
        }
        for &child in self.node_at(id).children() {
            self.collect_at_depth(child, current + 1, target, found);
        }
    }

    /// Walks the tree depth-first in pre-order, yielding each node with its depth
    pub fn walk(&self) -> Vec<(usize, &Node)> {
        let mut visited = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(usize, NodeId)> = self.root.map(|root| (0, root)).into_iter().collect();

        while let Some((depth, id)) = stack.pop() {
            let node = self.node_at(id);
            visited.push((depth, node));
            for &child in node.children().iter().rev() {
                stack.push((depth + 1, child));
            }
        }

        visited
    }

    /// Looks up a node by handle
    ///
    /// Returns `None` for a handle that does not belong to this sitemap.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Handles stored in the tree always point into `nodes`
    pub(crate) fn node_at(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Looks up a node by its exact address string
    pub fn get(&self, address: &str) -> Option<&Node> {
        self.index.get(address).map(|&id| self.node_at(id))
    }

    /// Returns true if the address already has a node
    pub fn contains(&self, address: &str) -> bool {
        self.index.contains_key(address)
    }

    /// Iterates over a node's children
    pub fn children<'a>(&'a self, node: &'a Node) -> impl Iterator<Item = &'a Node> + 'a {
        node.children().iter().filter_map(move |&id| self.node(id))
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.map(|id| self.node_at(id))
    }

    pub fn root_id(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of pages in the sitemap
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Registrable domain of the root, if it could be computed
    pub fn registrable_domain(&self) -> Option<&str> {
        self.registrable_domain.as_deref()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn achieved_depth(&self) -> usize {
        self.achieved_depth
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Freezes the achieved depth and stamps the finish time
    pub(crate) fn finish(&mut self, achieved_depth: usize) {
        self.achieved_depth = achieved_depth;
        self.finished_at = Some(Utc::now());
    }
}
