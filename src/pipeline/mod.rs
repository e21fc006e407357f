pub mod advice; // Follow-up and advice lines
pub mod classify; // Keyword diagnosis classifier
pub mod controller; // Polling, refresh, fallback, snapshot publishing
pub mod recommend; // Medication and test tables
pub mod summary;

pub use controller::{
    ConsultationPipeline, Fallback, FallbackLoader, PipelineHandle, PipelineSnapshot,
};
pub use summary::ConsultationSummary;
