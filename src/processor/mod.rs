//! Multi-track silence detection, excision and the batch pipeline

/// Common silence detection
pub mod detect;
/// Silence region removal
pub mod excise;
/// Batch processing pipeline
pub mod pipeline;
/// Track compatibility checks
pub mod validate;

pub use detect::{detect, CommonSilenceDetector, DetectionConfig, DetectionResult, SilenceRegion};
pub use excise::{excise, excise_all, CuttingResult, RegionExcisor};
pub use pipeline::{Pipeline, PipelineReport};
pub use validate::validate_compatible;
