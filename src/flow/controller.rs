use std::cell::{Ref, RefCell};
use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::canonical::CanonicalFieldType;
use crate::detector::{DetectorConfig, Location, score_page};
use crate::discovery::{ControlKind, FieldCandidate, discover};
use crate::dom::page::collapse_whitespace;
use crate::dom::{FileBlob, NodeId, Page, Selector};
use crate::fill::{FieldValue, StrategyTable};
use crate::flow::navigation::{control_text, find_next_control};
use crate::flow::pacing::{Sleeper, StopHandle, ThreadSleeper};
use crate::flow::platform::{PlatformConfig, detect_platform, platform_config};
use crate::flow::report::{FlowReport, StepSummary, StopReason, UnfillReason, UnfilledField, fingerprint};
use crate::flow::text_generation::{NoTextGenerator, TextGenerator};
use crate::matching::Matcher;
use crate::profile::CanonicalProfile;
use crate::session::{SessionTracker, now_millis};
use crate::trace::{TraceEvent, TraceKind, TraceLogger};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Step limits, settle delays and navigation keywords.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    pub max_steps: usize,
    pub fill_settle_ms: u64,
    pub navigation_settle_ms: u64,
    pub field_delay_ms: u64,
    pub next_keywords: Vec<String>,
    pub stop_keywords: Vec<String>,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            max_steps: 10,
            fill_settle_ms: 1_000,
            navigation_settle_ms: 3_000,
            field_delay_ms: 100,
            next_keywords: strings(&["next", "continue", "proceed"]),
            stop_keywords: strings(&["submit", "finish"]),
        }
    }
}

impl FlowConfig {
    pub fn fill_settle(&self) -> Duration {
        Duration::from_millis(self.fill_settle_ms)
    }

    pub fn navigation_settle(&self) -> Duration {
        Duration::from_millis(self.navigation_settle_ms)
    }

    pub fn field_delay(&self) -> Duration {
        Duration::from_millis(self.field_delay_ms)
    }
}

// ============================================================================
// Flow controller
// ============================================================================

/// Fields and rendered text of one step. A step with fields whose signature
/// equals the previous step's means the navigation click went nowhere.
#[derive(Debug, PartialEq, Eq)]
struct StepSignature {
    fields: BTreeSet<String>,
    text: String,
}

impl StepSignature {
    fn capture(page: &Page, container: NodeId, candidates: &[FieldCandidate]) -> Self {
        Self {
            fields: candidates.iter().map(fingerprint).collect(),
            text: collapse_whitespace(&page.inner_text(container)),
        }
    }
}

/// Drives discovery, matching and filling through a multi-step application.
pub struct FlowController {
    config: FlowConfig,
    detector: DetectorConfig,
    matcher: Matcher,
    strategies: StrategyTable,
    generator: Box<dyn TextGenerator>,
    sleeper: Box<dyn Sleeper>,
    stop: StopHandle,
    tracer: TraceLogger,
    sessions: RefCell<SessionTracker>,
}

impl Default for FlowController {
    fn default() -> Self {
        Self::new(FlowConfig::default())
    }
}

impl FlowController {
    pub fn new(config: FlowConfig) -> Self {
        Self {
            config,
            detector: DetectorConfig::default(),
            matcher: Matcher::default(),
            strategies: StrategyTable::default(),
            generator: Box::new(NoTextGenerator),
            sleeper: Box::new(ThreadSleeper),
            stop: StopHandle::new(),
            tracer: TraceLogger::disabled(),
            sessions: RefCell::new(SessionTracker::new()),
        }
    }

    pub fn with_detector(mut self, detector: DetectorConfig) -> Self {
        self.detector = detector;
        self
    }

    pub fn with_matcher(mut self, matcher: Matcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_strategies(mut self, strategies: StrategyTable) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn with_generator(mut self, generator: impl TextGenerator + 'static) -> Self {
        self.generator = Box::new(generator);
        self
    }

    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Box::new(sleeper);
        self
    }

    pub fn with_tracer(mut self, tracer: TraceLogger) -> Self {
        self.tracer = tracer;
        self
    }

    /// Continue the sessions of an earlier run (loaded from storage).
    pub fn with_sessions(mut self, sessions: SessionTracker) -> Self {
        self.sessions = RefCell::new(sessions);
        self
    }

    /// Sessions recorded so far, keyed by hostname.
    pub fn sessions(&self) -> Ref<'_, SessionTracker> {
        self.sessions.borrow()
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    /// Handle that stops the run before its next step.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn stop(&self) {
        self.stop.stop();
    }

    /// Run the flow on `page` until navigation runs out, the step limit is
    /// hit, the page stops changing, or the controller is stopped. Nothing
    /// here fails: problems end up in the report's unfilled list.
    pub fn run(&self, page: &mut Page, profile: &CanonicalProfile) -> FlowReport {
        let location = Location::from_url(page.url());
        let platform = detect_platform(&location.hostname);
        let platform_config = platform_config(platform);
        let detection = score_page(page, &location, &self.detector);

        info!(
            url = %location.href,
            platform = %platform,
            job_score = detection.score,
            "Starting application flow"
        );

        let mut report = FlowReport::new(platform, detection);
        let mut previous: Option<StepSignature> = None;

        // The platform's own submit/review buttons end the run like "submit" does.
        let stop_keywords: Vec<String> = self
            .config
            .stop_keywords
            .iter()
            .chain(&platform_config.submit_texts)
            .cloned()
            .collect();

        for step in 0..self.config.max_steps {
            if self.stop.is_stopped() {
                info!(step, "Flow stopped");
                return self.finish(page, &location, report, StopReason::Stopped);
            }

            self.sessions
                .borrow_mut()
                .update_step(&location.hostname, page.url().as_str(), now_millis());

            let (container, scoped_to_modal) = self.step_container(page, &platform_config);
            let candidates = discover(page, container);
            let signature = StepSignature::capture(page, container, &candidates);

            if !signature.fields.is_empty() && previous.as_ref() == Some(&signature) {
                warn!(step, "Page did not change after navigation, stopping");
                return self.finish(page, &location, report, StopReason::Stalled);
            }

            self.tracer.log(&TraceEvent::now(step, TraceKind::StepStarted).with_candidates(candidates.len()));
            let (matched, filled) = self.fill_step(page, profile, step, &candidates, &mut report);
            info!(step, candidates = candidates.len(), matched, filled, "Step filled");

            self.sleeper.sleep(self.config.fill_settle());

            let next = find_next_control(
                page,
                container,
                &self.config.next_keywords,
                &stop_keywords,
            );

            report.steps.push(StepSummary {
                index: step,
                scoped_to_modal,
                candidates: candidates.len(),
                matched,
                filled,
                advanced: next.is_some(),
            });

            let Some(next) = next else {
                info!(step, "No navigation control found, flow complete");
                return self.finish(page, &location, report, StopReason::NoNavigation);
            };

            let label = control_text(page, next);
            info!(step, control = %label, "Advancing to next step");
            if let Err(err) = page.click(next) {
                warn!(error = %err, "Navigation click failed");
                return self.finish(page, &location, report, StopReason::NoNavigation);
            }
            self.tracer.log(&TraceEvent::now(step, TraceKind::Navigated).with_field(None, label));

            self.sleeper.sleep(self.config.navigation_settle());
            previous = Some(signature);
        }

        info!(max_steps = self.config.max_steps, "Step limit reached");
        self.finish(page, &location, report, StopReason::MaxSteps)
    }

    /// Close the run. Only a run that reached the last step completes its
    /// session; stopped or cut-short runs leave it open for the next visit.
    fn finish(&self, page: &Page, location: &Location, mut report: FlowReport, reason: StopReason) -> FlowReport {
        report.stop_reason = reason;

        let mut sessions = self.sessions.borrow_mut();
        if reason == StopReason::NoNavigation {
            sessions.mark_completed(&location.hostname, page.url().as_str(), now_millis());
        }
        report.session = sessions.get(&location.hostname).cloned();
        drop(sessions);

        self.tracer.log(
            &TraceEvent::now(report.step_count(), TraceKind::FlowFinished).with_stop_reason(reason),
        );
        report
    }

    /// Platform modal when present, else the whole document.
    fn step_container(&self, page: &Page, config: &PlatformConfig) -> (NodeId, bool) {
        let document = page.document();
        let Some(selector) = config.modal_selector.as_deref() else {
            return (document, false);
        };

        match Selector::parse(selector) {
            Ok(selector) => match page.query_selector(document, &selector) {
                Some(modal) => (modal, true),
                None => {
                    debug!(selector = selector.as_str(), "Platform modal not present, using document");
                    (document, false)
                }
            },
            Err(err) => {
                warn!(error = %err, "Invalid platform modal selector");
                (document, false)
            }
        }
    }

    /// Match and fill one step. Returns (matched, filled).
    fn fill_step(
        &self,
        page: &mut Page,
        profile: &CanonicalProfile,
        step: usize,
        candidates: &[FieldCandidate],
        report: &mut FlowReport,
    ) -> (usize, usize) {
        let matches = self.matcher.match_fields(candidates);
        let mut filled = 0;

        for assignment in matches.assignments() {
            let candidate = assignment.candidate;
            let field_type = assignment.field_type;
            let label = candidate.display_label();

            let Some(value) = self.resolve_value(field_type, candidate, profile) else {
                debug!(field = %field_type, label = %label, "No value for field");
                self.skip(report, step, candidate, Some(field_type), UnfillReason::NoValue);
                continue;
            };

            if !page.is_connected(candidate.element) {
                warn!(field = %field_type, label = %label, "Field detached before fill");
                self.skip(report, step, candidate, Some(field_type), UnfillReason::FillRejected);
                continue;
            }

            if self.strategies.fill(page, candidate, &value) {
                filled += 1;
                report.filled += 1;
                report.resolve(&fingerprint(candidate));
                self.tracer.log(
                    &TraceEvent::now(step, TraceKind::FieldFilled)
                        .with_field(Some(field_type), &label)
                        .with_score(assignment.score),
                );
            } else {
                self.skip(report, step, candidate, Some(field_type), UnfillReason::FillRejected);
            }

            self.sleeper.sleep(self.config.field_delay());
        }

        for candidate in candidates {
            if candidate.required && !matches.is_used(candidate.element) {
                self.skip(report, step, candidate, None, UnfillReason::NoMatch);
            }
        }

        (matches.len(), filled)
    }

    fn skip(
        &self,
        report: &mut FlowReport,
        step: usize,
        candidate: &FieldCandidate,
        field_type: Option<CanonicalFieldType>,
        reason: UnfillReason,
    ) {
        let field = UnfilledField::new(candidate, field_type, reason);
        self.tracer.log(
            &TraceEvent::now(step, TraceKind::FieldSkipped)
                .with_field(field_type, &field.label)
                .with_unfill_reason(reason),
        );
        report.push_unfilled(field);
    }

    /// Value for one matched field: the profile's deterministic value,
    /// shaped for the control, or generated text for open questions.
    fn resolve_value(
        &self,
        field_type: CanonicalFieldType,
        candidate: &FieldCandidate,
        profile: &CanonicalProfile,
    ) -> Option<FieldValue> {
        match field_type {
            CanonicalFieldType::FreeText => self.generate(candidate, profile),
            CanonicalFieldType::CoverLetter => {
                let value = profile
                    .value_for(field_type)
                    .or_else(|| self.generate(candidate, profile))?;
                match (candidate.kind, value) {
                    (ControlKind::File, FieldValue::Text(text)) => Some(FieldValue::File(FileBlob::new(
                        "cover_letter.txt",
                        "text/plain",
                        text.into_bytes(),
                    ))),
                    (_, value) => Some(value),
                }
            }
            _ => profile.value_for(field_type),
        }
    }

    fn generate(&self, candidate: &FieldCandidate, profile: &CanonicalProfile) -> Option<FieldValue> {
        if !candidate.kind.is_free_text() {
            return None;
        }
        self.generator
            .generate(&candidate.display_label(), profile.summary())
            .map(FieldValue::Text)
    }
}
