pub mod controller;
pub mod navigation;
pub mod pacing;
pub mod platform;
pub mod report;
pub mod text_generation;

pub use controller::{FlowConfig, FlowController};
pub use navigation::find_next_control;
pub use pacing::{NoopSleeper, RecordingSleeper, Sleeper, StopHandle, ThreadSleeper};
pub use platform::{Platform, PlatformConfig, detect_platform, platform_config};
pub use report::{FlowReport, StepSummary, StopReason, UnfillReason, UnfilledField};
pub use text_generation::{NoTextGenerator, OllamaTextGenerator, StaticTextGenerator, TextGenerator};
