pub mod detector_config;
pub mod job_page;
pub mod scheduler;

pub use detector_config::{DetectorConfig, DetectorWeights, TextKeywords};
pub use job_page::{DetectionResult, JobPageSignal, Location, has_job_posting_type, score_page};
pub use scheduler::{DebouncedDetector, DetectionScheduler, DetectionTrigger, VisibilityChange};
