//! Sitemap module: the tree a crawl accumulates
//!
//! # Components
//!
//! - `Node`: one discovered page and the handles of the pages first found from it
//! - `Sitemap`: the root, the node arena, and the per-crawl address index
//! - Rendering: `Display` gives the indented text listing, `Serialize` the
//!   nested structured form

mod node;
mod render;
mod tree;

// Re-export main types
pub use node::{Node, NodeId};
pub use render::INDENT_SPACES;
pub use tree::{EdgeOutcome, Sitemap};
