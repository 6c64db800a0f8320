use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors for a pipeline run.
///
/// Per-candidate enrichment failures never surface here — they degrade to
/// sentinel values inside the resolvers. Only serialization and the final
/// file write can abort a run once the search has produced candidates.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The record collection could not be serialized.
    #[error("failed to serialize store records: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The destination file could not be written.
    #[error("failed to write store records to {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
