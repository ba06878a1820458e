use std::cell::Cell;
use std::net::TcpListener;
use std::rc::Rc;
use std::time::{Duration, Instant};

use job_autofill::canonical::CanonicalFieldType;
use job_autofill::dom::{EventType, NodeId, Page};
use job_autofill::fill::events::COMMIT_SEQUENCE;
use job_autofill::flow::{
    FlowConfig, FlowController, NoopSleeper, OllamaTextGenerator, Platform, RecordingSleeper, StaticTextGenerator,
    StopReason, TextGenerator, UnfillReason, detect_platform, platform_config,
};
use job_autofill::flow::text_generation::DEFAULT_OLLAMA_TIMEOUT_SECS;
use job_autofill::session::{SessionStatus, SessionTracker};

use crate::common::fixtures::{CLASSIC_FORM, by_id, load, load_at, sample_profile};

mod common;

fn quick_controller() -> FlowController {
    FlowController::default().with_sleeper(NoopSleeper)
}

fn append_labelled_input(page: &mut Page, parent: NodeId, id: &str, input_type: &str, label: &str) -> NodeId {
    let label_node = page.append(parent, "label", &[("for", id)]);
    page.append_text(label_node, label);
    page.append(parent, "input", &[("id", id), ("name", id), ("type", input_type)])
}

// ============================================================================
// Single step
// ============================================================================

#[test]
fn classic_form_is_filled_in_one_step() {
    let mut page = load(CLASSIC_FORM);
    let sleeper = RecordingSleeper::new();
    let controller = FlowController::default().with_sleeper(sleeper.clone());

    let report = controller.run(&mut page, &sample_profile());

    assert_eq!(page.value(by_id(&page, "first")), "Jamie");
    assert_eq!(page.value(by_id(&page, "last")), "Rivera");
    assert_eq!(page.value(by_id(&page, "email")), "jamie@x.com");
    assert_eq!(page.value(by_id(&page, "city")), "Seattle");

    assert_eq!(report.filled, 4);
    assert!(report.unfilled.is_empty(), "unfilled: {:?}", report.unfilled);
    assert_eq!(report.stop_reason, StopReason::NoNavigation);
    assert_eq!(report.step_count(), 1);
    assert!(!report.steps[0].advanced);
    assert_eq!(report.platform, Platform::Unknown);

    let field_delay = Duration::from_millis(100);
    assert_eq!(
        sleeper.recorded(),
        vec![field_delay, field_delay, field_delay, field_delay, Duration::from_millis(1000)],
        "one delay per fill, then the settle wait"
    );
}

#[test]
fn shadow_root_field_fills_like_a_top_level_one() {
    let mut page = load(
        r#"<html><body><form>
            <x-first-name><template shadowrootmode="open">
              <label for="fn">First name</label><input id="fn" name="first">
            </template></x-first-name>
            <label for="ln">Last name</label><input id="ln" name="last">
        </form></body></html>"#,
    );

    let report = quick_controller().run(&mut page, &sample_profile());

    let shadow_input = by_id(&page, "fn");
    let top_level = by_id(&page, "ln");
    assert_ne!(page.root_of(shadow_input), page.document());
    assert_eq!(page.value(shadow_input), "Jamie");
    assert_eq!(page.value(top_level), "Rivera");
    assert_eq!(page.events_for(shadow_input), COMMIT_SEQUENCE.to_vec());
    assert_eq!(page.events_for(shadow_input), page.events_for(top_level));
    assert_eq!(report.filled, 2);
}

#[test]
fn resume_is_uploaded_from_profile_data() {
    let mut page = load(
        r#"<html><body><form>
            <label for="cv">Resume</label><input type="file" id="cv" name="resume">
        </form></body></html>"#,
    );

    let report = quick_controller().run(&mut page, &sample_profile());

    let cv = by_id(&page, "cv");
    let files = page.files(cv);
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "jamie_rivera_resume.pdf");
    assert_eq!(files[0].mime_type, "application/pdf");
    assert_eq!(files[0].bytes, b"%PDF-1.4".to_vec());
    assert_eq!(report.filled, 1);
}

#[test]
fn cover_letter_text_becomes_a_file_for_file_inputs() {
    let mut page = load(
        r#"<html><body><label for="cl">Cover letter</label><input type="file" id="cl"></body></html>"#,
    );
    let mut profile = sample_profile();
    profile.files.cover_letter = Some("Dear hiring team".into());

    quick_controller().run(&mut page, &profile);

    let files = page.files(by_id(&page, "cl"));
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].name, "cover_letter.txt");
    assert_eq!(files[0].bytes, b"Dear hiring team".to_vec());
}

// ============================================================================
// Unfilled fields
// ============================================================================

#[test]
fn missing_profile_value_is_reported() {
    let mut page = load(r#"<html><body><input type="tel" name="phone" aria-label="Phone"></body></html>"#);
    let mut profile = sample_profile();
    profile.personal.phone.clear();

    let report = quick_controller().run(&mut page, &profile);

    assert_eq!(report.filled, 0);
    assert_eq!(report.unfilled.len(), 1);
    assert_eq!(report.unfilled[0].field_type, Some(CanonicalFieldType::Phone));
    assert_eq!(report.unfilled[0].reason, UnfillReason::NoValue);
}

#[test]
fn required_field_without_match_is_reported() {
    let mut page = load(
        r#"<html><body>
            <input name="badge" aria-label="Badge number" required>
            <input name="notes" aria-label="Internal notes">
        </body></html>"#,
    );

    let report = quick_controller().run(&mut page, &sample_profile());

    assert_eq!(report.unfilled.len(), 1, "optional unmatched fields are not reported");
    let badge = &report.unfilled[0];
    assert_eq!(badge.reason, UnfillReason::NoMatch);
    assert_eq!(badge.field_type, None);
    assert_eq!(badge.label, "Badge number");
    assert!(badge.required);
}

#[test]
fn free_text_uses_generator() {
    let html = r#"<html><body>
        <textarea id="why" name="why" aria-label="Why do you want to work here?"></textarea>
    </body></html>"#;

    let mut without = load(html);
    let report = quick_controller().run(&mut without, &sample_profile());
    assert_eq!(report.unfilled.len(), 1);
    assert_eq!(report.unfilled[0].field_type, Some(CanonicalFieldType::FreeText));
    assert_eq!(report.unfilled[0].reason, UnfillReason::NoValue);

    let mut with = load(html);
    let controller = quick_controller().with_generator(StaticTextGenerator::new("I like the mission."));
    let report = controller.run(&mut with, &sample_profile());
    assert_eq!(with.value(by_id(&with, "why")), "I like the mission.");
    assert!(report.unfilled.is_empty());
}

#[test]
fn silent_ollama_server_times_out_and_leaves_field_unfilled() {
    assert_eq!(
        OllamaTextGenerator::default().timeout,
        Duration::from_secs(DEFAULT_OLLAMA_TIMEOUT_SECS)
    );

    // Accepts connections into the backlog but never answers.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("http://{}/api/generate", listener.local_addr().unwrap());
    let generator = OllamaTextGenerator::new(&endpoint, "qwen2.5:1.5b").with_timeout(Duration::from_millis(300));

    let started = Instant::now();
    assert_eq!(generator.generate("Why do you want to work here?", "Backend engineer"), None);
    assert!(started.elapsed() < Duration::from_secs(10), "took {:?}", started.elapsed());

    let mut page = load(
        r#"<html><body><textarea id="why" name="why" aria-label="Why do you want to work here?"></textarea></body></html>"#,
    );
    let report = quick_controller().with_generator(generator).run(&mut page, &sample_profile());
    assert_eq!(page.value(by_id(&page, "why")), "");
    assert_eq!(report.unfilled[0].reason, UnfillReason::NoValue);
    drop(listener);
}

// ============================================================================
// Multi-step navigation
// ============================================================================

#[test]
fn next_button_advances_to_following_step() {
    let mut page = load(
        r#"<html><body><form id="app">
            <div id="step1">
              <input id="first" name="first" aria-label="First name">
              <input id="last" name="last" aria-label="Last name">
              <button type="button" id="next">Next</button>
            </div>
        </form></body></html>"#,
    );
    let form = by_id(&page, "app");
    let step1 = by_id(&page, "step1");
    let next = by_id(&page, "next");

    page.add_event_listener(next, EventType::Click, move |page, _| {
        page.remove(step1);
        let step2 = page.append(form, "div", &[("id", "step2")]);
        append_labelled_input(page, step2, "email", "email", "Email");
        append_labelled_input(page, step2, "phone", "tel", "Phone");
        let submit = page.append(step2, "button", &[("type", "submit")]);
        page.append_text(submit, "Submit application");
    });

    let report = quick_controller().run(&mut page, &sample_profile());

    assert_eq!(report.step_count(), 2);
    assert!(report.steps[0].advanced);
    assert!(!report.steps[1].advanced, "submit is never clicked");
    assert_eq!(report.steps[1].filled, 2);
    assert_eq!(report.filled, 4);
    assert_eq!(report.stop_reason, StopReason::NoNavigation);
    assert_eq!(page.value(by_id(&page, "email")), "jamie@x.com");
    assert_eq!(page.value(by_id(&page, "phone")), "+1 206 555 0100");
    assert!(page.events_for(form).is_empty(), "form was not submitted");
}

#[test]
fn unchanged_page_after_next_stops_as_stalled() {
    let mut page = load(
        r#"<html><body>
            <input id="first" name="first" aria-label="First name">
            <button type="button">Continue</button>
        </body></html>"#,
    );

    let report = quick_controller().run(&mut page, &sample_profile());

    assert_eq!(report.stop_reason, StopReason::Stalled);
    assert_eq!(report.step_count(), 1);
    assert_eq!(report.filled, 1);
}

#[test]
fn field_less_intro_steps_do_not_stall() {
    let mut page = load(
        r#"<html><body><form id="app">
            <div id="intro">
              <p id="blurb">Welcome to the Acme application.</p>
              <button type="button" id="next">Continue</button>
            </div>
        </form></body></html>"#,
    );
    let form = by_id(&page, "app");
    let intro = by_id(&page, "intro");
    let blurb = by_id(&page, "blurb");
    let next = by_id(&page, "next");
    let clicks = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&clicks);
    page.add_event_listener(next, EventType::Click, move |page, _| {
        counter.set(counter.get() + 1);
        if counter.get() == 1 {
            let _ = page.set_text_content(blurb, "Please read the instructions before you start.");
        } else {
            page.remove(intro);
            append_labelled_input(page, form, "first", "text", "First name");
        }
    });

    let report = quick_controller().run(&mut page, &sample_profile());

    assert_eq!(clicks.get(), 2);
    assert_eq!(report.step_count(), 3, "welcome, instructions, form");
    assert_eq!(report.filled, 1);
    assert_eq!(report.stop_reason, StopReason::NoNavigation);
    assert_eq!(page.value(by_id(&page, "first")), "Jamie");
}

#[test]
fn step_limit_bounds_the_run() {
    let mut page = load(
        r#"<html><body><form id="app">
            <button type="button" id="next">Next</button>
        </form></body></html>"#,
    );
    let form = by_id(&page, "app");
    let next = by_id(&page, "next");
    let clicks = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&clicks);
    page.add_event_listener(next, EventType::Click, move |page, _| {
        counter.set(counter.get() + 1);
        let name = format!("extra{}", counter.get());
        page.append(form, "input", &[("name", name.as_str())]);
    });

    let config = FlowConfig {
        max_steps: 3,
        ..FlowConfig::default()
    };
    let report = FlowController::new(config).with_sleeper(NoopSleeper).run(&mut page, &sample_profile());

    assert_eq!(report.stop_reason, StopReason::MaxSteps);
    assert_eq!(report.step_count(), 3);
    assert_eq!(clicks.get(), 3);
}

#[test]
fn stop_handle_ends_run_before_next_step() {
    let mut page = load(
        r#"<html><body><form id="app">
            <input id="first" name="first" aria-label="First name">
            <button type="button" id="next">Next</button>
        </form></body></html>"#,
    );
    let form = by_id(&page, "app");
    let next = by_id(&page, "next");

    let controller = quick_controller();
    let stop = controller.stop_handle();
    page.add_event_listener(next, EventType::Click, move |page, _| {
        page.append(form, "input", &[("name", "email"), ("type", "email")]);
        stop.stop();
    });

    let report = controller.run(&mut page, &sample_profile());

    assert_eq!(report.stop_reason, StopReason::Stopped);
    assert_eq!(report.step_count(), 1);
    assert_eq!(report.filled, 1, "the field added after stopping is left alone");
}

#[test]
fn stopped_controller_does_nothing() {
    let mut page = load(CLASSIC_FORM);
    let controller = quick_controller();
    controller.stop();

    let report = controller.run(&mut page, &sample_profile());
    assert_eq!(report.stop_reason, StopReason::Stopped);
    assert_eq!(report.filled, 0);
    assert_eq!(page.value(by_id(&page, "first")), "");

    controller.stop_handle().reset();
    let report = controller.run(&mut page, &sample_profile());
    assert_eq!(report.filled, 4);
}

// ============================================================================
// Sessions
// ============================================================================

#[test]
fn session_records_each_step_url_and_completes() {
    let mut page = load_at(
        r#"<html><body><form id="app">
            <div id="step1">
              <input id="first" name="first" aria-label="First name">
              <button type="button" id="next">Next</button>
            </div>
        </form></body></html>"#,
        "https://careers.acme.test/apply",
    );
    let form = by_id(&page, "app");
    let step1 = by_id(&page, "step1");
    let next = by_id(&page, "next");
    page.add_event_listener(next, EventType::Click, move |page, _| {
        let _ = page.push_state("/apply/contact");
        page.remove(step1);
        append_labelled_input(page, form, "email", "email", "Email");
    });

    let controller = quick_controller();
    let report = controller.run(&mut page, &sample_profile());

    let session = report.session.expect("session is reported");
    assert_eq!(
        session.steps_visited,
        vec![
            "https://careers.acme.test/apply".to_string(),
            "https://careers.acme.test/apply/contact".to_string(),
        ]
    );
    assert_eq!(session.current_step, "https://careers.acme.test/apply/contact");
    assert_eq!(session.status, SessionStatus::Completed);
    assert_eq!(controller.sessions().get("careers.acme.test"), Some(&session));
}

#[test]
fn cut_short_run_keeps_session_open_for_the_next_run() {
    let html = r#"<html><body>
        <input id="first" name="first" aria-label="First name">
        <button type="button">Continue</button>
    </body></html>"#;

    let mut page = load(html);
    let first = quick_controller().with_sessions(SessionTracker::new());
    let report = first.run(&mut page, &sample_profile());
    assert_eq!(report.stop_reason, StopReason::Stalled);
    let open = report.session.expect("session is reported");
    assert_eq!(open.status, SessionStatus::InProgress);

    let stored = first.sessions().clone();
    let mut again = load(html);
    let second = quick_controller().with_sessions(stored);
    let report = second.run(&mut again, &sample_profile());
    assert_eq!(report.session.map(|s| s.id), Some(open.id), "same session continues");
}

// ============================================================================
// Platforms
// ============================================================================

#[test]
fn linkedin_steps_are_scoped_to_the_modal() {
    let mut page = load_at(
        r#"<html><body>
            <input id="outside" name="email" type="email" aria-label="Email">
            <div class="jobs-easy-apply-content">
              <input id="inside" name="email" type="email" aria-label="Email">
            </div>
        </body></html>"#,
        "https://www.linkedin.com/jobs/view/123",
    );

    let report = quick_controller().run(&mut page, &sample_profile());

    assert_eq!(report.platform, Platform::LinkedIn);
    assert!(report.steps[0].scoped_to_modal);
    assert_eq!(page.value(by_id(&page, "inside")), "jamie@x.com");
    assert_eq!(page.value(by_id(&page, "outside")), "", "fields outside the modal are ignored");
}

#[test]
fn linkedin_review_button_is_not_clicked() {
    let html = r#"<html><body>
        <div class="jobs-easy-apply-content">
          <input id="email" name="email" type="email" aria-label="Email">
          <button type="button" id="review">Continue to review</button>
        </div>
    </body></html>"#;

    let mut linkedin = load_at(html, "https://www.linkedin.com/jobs/view/123");
    let report = quick_controller().run(&mut linkedin, &sample_profile());
    assert_eq!(report.stop_reason, StopReason::NoNavigation);
    assert!(!report.steps[0].advanced);
    assert!(linkedin.events_for(by_id(&linkedin, "review")).is_empty());

    let mut elsewhere = load(html);
    let report = quick_controller().run(&mut elsewhere, &sample_profile());
    assert!(report.steps[0].advanced, "other sites treat it as a next button");
}

#[test]
fn platforms_are_recognized_by_host() {
    assert_eq!(detect_platform("www.LinkedIn.com"), Platform::LinkedIn);
    assert_eq!(detect_platform("acme.wd5.myworkdayjobs.com"), Platform::Workday);
    assert_eq!(detect_platform("boards.greenhouse.io"), Platform::Greenhouse);
    assert_eq!(detect_platform("jobs.lever.co"), Platform::Lever);
    assert_eq!(detect_platform("careers.example.com"), Platform::Unknown);

    assert_eq!(
        platform_config(Platform::LinkedIn).modal_selector.as_deref(),
        Some(".jobs-easy-apply-content")
    );
    assert!(platform_config(Platform::Indeed).modal_selector.is_none());
}
