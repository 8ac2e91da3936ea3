mod graph;
mod normalize;
mod parse;

pub use graph::{DEFAULT_RELATION, Edge, Graph, Node, Normalized};
pub use normalize::{normalize, normalize_payload, normalize_str};
pub use parse::{Payload, RawLink, RawNode, Schema};
