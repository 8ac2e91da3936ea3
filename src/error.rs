use thiserror::Error;

/// Internal invariant violations raised by normalization.
///
/// Bad input never produces one of these; it degrades to an empty or partial graph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("duplicate node id {id:?} after id synthesis")]
    DuplicateNodeId { id: String },
}
