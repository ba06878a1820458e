use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info};

use crate::detector::detector_config::DetectorConfig;
use crate::detector::job_page::{DetectionResult, Location, score_page};
use crate::dom::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DetectionTrigger {
    DomMutated,
    HistoryNavigated,
    HashChanged,
}

/// Trailing-edge debounce: each trigger pushes the deadline back by the
/// quiet period, and `poll` reports a due evaluation once per burst.
#[derive(Debug, Clone)]
pub struct DetectionScheduler {
    quiet_period: Duration,
    deadline: Option<Instant>,
    coalesced: usize,
}

impl DetectionScheduler {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            deadline: None,
            coalesced: 0,
        }
    }

    pub fn notify(&mut self, trigger: DetectionTrigger, now: Instant) {
        self.deadline = Some(now + self.quiet_period);
        self.coalesced += 1;
        debug!(?trigger, pending = self.coalesced, "Detection re-armed");
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// `true` exactly once when the quiet period has elapsed since the last
    /// trigger.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.coalesced = 0;
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VisibilityChange {
    Show,
    Hide,
}

/// Detector driven by page notifications; reports only verdict changes.
#[derive(Debug)]
pub struct DebouncedDetector {
    config: DetectorConfig,
    scheduler: DetectionScheduler,
    last_result: Option<DetectionResult>,
}

impl DebouncedDetector {
    pub fn new(config: DetectorConfig) -> Self {
        let scheduler = DetectionScheduler::new(Duration::from_millis(config.debounce_ms));
        Self {
            config,
            scheduler,
            last_result: None,
        }
    }

    pub fn notify(&mut self, trigger: DetectionTrigger, now: Instant) {
        self.scheduler.notify(trigger, now);
    }

    pub fn is_pending(&self) -> bool {
        self.scheduler.is_pending()
    }

    pub fn last_result(&self) -> Option<&DetectionResult> {
        self.last_result.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.last_result.as_ref().is_some_and(DetectionResult::is_job_page)
    }

    /// Evaluate immediately (initial page load).
    pub fn evaluate_now(&mut self, page: &Page, location: &Location) -> Option<VisibilityChange> {
        let result = score_page(page, location, &self.config);
        let was_visible = self.is_visible();
        let first = self.last_result.is_none();
        let visible = result.is_job_page();
        self.last_result = Some(result);

        match (first, was_visible, visible) {
            (true, _, true) | (false, false, true) => {
                info!("Job page detected, showing assistant");
                Some(VisibilityChange::Show)
            }
            (false, true, false) => {
                info!("Page no longer looks like a job page, hiding assistant");
                Some(VisibilityChange::Hide)
            }
            _ => None,
        }
    }

    /// Re-evaluate if a debounced evaluation is due.
    pub fn poll(&mut self, page: &Page, location: &Location, now: Instant) -> Option<VisibilityChange> {
        if !self.scheduler.poll(now) {
            return None;
        }
        self.evaluate_now(page, location)
    }
}
