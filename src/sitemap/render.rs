//! Textual and structured renderings of a sitemap

use super::node::NodeId;
use super::tree::Sitemap;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::fmt;

/// Number of spaces each depth level is indented by in the text rendering
pub const INDENT_SPACES: usize = 2;

impl fmt::Display for Sitemap {
    /// One address per line, pre-order, indented by depth
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (depth, node) in self.walk() {
            writeln!(
                f,
                "{:indent$}{}",
                "",
                node.address(),
                indent = depth * INDENT_SPACES
            )?;
        }
        Ok(())
    }
}

impl Serialize for Sitemap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Sitemap", 6)?;
        state.serialize_field(
            "root",
            &self.root_id().map(|id| NodeTree { sitemap: self, id }),
        )?;
        state.serialize_field("registrable_domain", &self.registrable_domain())?;
        state.serialize_field("max_depth", &self.max_depth())?;
        state.serialize_field("achieved_depth", &self.achieved_depth())?;
        state.serialize_field("created_at", &self.created_at())?;
        state.serialize_field("finished_at", &self.finished_at())?;
        state.end()
    }
}

/// A node together with its subtree, borrowed from the owning sitemap
struct NodeTree<'a> {
    sitemap: &'a Sitemap,
    id: NodeId,
}

impl Serialize for NodeTree<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let node = self.sitemap.node_at(self.id);
        let children: Vec<NodeTree<'_>> = node
            .children()
            .iter()
            .map(|&id| NodeTree {
                sitemap: self.sitemap,
                id,
            })
            .collect();

        let mut state = serializer.serialize_struct("Node", 3)?;
        state.serialize_field("address", node.address().as_str())?;
        state.serialize_field("created_at", &node.created_at())?;
        state.serialize_field("children", &children)?;
        state.end()
    }
}
