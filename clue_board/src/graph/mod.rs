//! Board graph - the node and edge registries behind the board.
//!
//! The graph consists of:
//! - **Nodes**: one per discovered clue, keyed by clue id
//! - **Edges**: one per related pair, keyed by the canonical [`EdgeKey`]
//! - **Adjacency**: an index from clue id to the edges touching it
//!
//! [`EdgeKey`]: clue_model::EdgeKey

mod builder;
mod edge;
mod node;
mod registry;

pub use builder::*;
pub use edge::*;
pub use node::*;
pub use registry::*;
