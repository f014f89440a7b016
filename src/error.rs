use thiserror::Error;

use crate::record::RecordId;

/// Errors surfaced by the merge engine.
///
/// Topology failures and isolated records are not errors: a rejected merge
/// candidate is skipped and the record is left as-is.
#[derive(Debug, Error)]
pub enum MergeError {
    /// A record lacks an attribute the engine needs.
    #[error("record {id} is missing required attribute `{attribute}`")]
    MissingAttribute { id: RecordId, attribute: String },

    /// The input partition does not satisfy the expected schema.
    #[error("invalid input partition: {0}")]
    Schema(String),

    /// The threshold configuration is inconsistent or out of range.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A partition invariant was broken by a pass.
    #[error("partition invariant violated: {0}")]
    Invariant(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
