pub mod error;
pub mod pipeline;
pub mod sink;

pub use error::PipelineError;
pub use pipeline::{Pipeline, RunOutcome};
pub use sink::JsonFileSink;
