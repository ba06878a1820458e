use job_autofill::session::{SessionStatus, SessionTracker};
use job_autofill::session::application_session::SESSION_TTL_MS;

const HOST: &str = "boards.greenhouse.io";
const STEP_1: &str = "https://boards.greenhouse.io/acme/jobs/1";
const STEP_2: &str = "https://boards.greenhouse.io/acme/jobs/1/questions";

#[test]
fn steps_are_recorded_once_in_visit_order() {
    let mut tracker = SessionTracker::new();

    tracker.update_step(HOST, STEP_1, 1_000);
    tracker.update_step(HOST, STEP_2, 2_000);
    let session = tracker.update_step(HOST, STEP_1, 3_000);

    assert_eq!(session.steps_visited, vec![STEP_1.to_string(), STEP_2.to_string()]);
    assert_eq!(session.current_step, STEP_1);
    assert_eq!(session.created_at, 1_000);
    assert_eq!(tracker.len(), 1);
}

#[test]
fn session_ids_are_short_hex() {
    let mut tracker = SessionTracker::new();
    let id = tracker.get_or_create(HOST, STEP_1, 42).id.clone();

    assert_eq!(id.len(), 16);
    assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(tracker.get_or_create(HOST, STEP_2, 43).id, id, "live session is reused");
}

#[test]
fn expired_session_is_replaced() {
    let mut tracker = SessionTracker::new();
    let first_id = tracker.update_step(HOST, STEP_1, 0).id.clone();

    let within = tracker.get_or_create(HOST, STEP_1, SESSION_TTL_MS).id.clone();
    assert_eq!(within, first_id, "a session lives for the whole TTL");

    let later = tracker.update_step(HOST, STEP_2, SESSION_TTL_MS + 1);
    assert_ne!(later.id, first_id);
    assert_eq!(later.steps_visited, vec![STEP_2.to_string()]);
    assert_eq!(later.created_at, SESSION_TTL_MS + 1);
}

#[test]
fn completed_session_starts_over_on_next_visit() {
    let mut tracker = SessionTracker::new();
    tracker.update_step(HOST, STEP_1, 10);
    tracker.mark_completed(HOST, STEP_2, 20);
    assert_eq!(tracker.get(HOST).map(|s| s.status), Some(SessionStatus::Completed));

    let next = tracker.update_step(HOST, STEP_1, 30);
    assert_eq!(next.status, SessionStatus::InProgress);
    assert_eq!(next.created_at, 30);
}

#[test]
fn hosts_are_tracked_separately_and_serialize_as_a_map() {
    let mut tracker = SessionTracker::new();
    assert!(tracker.is_empty());
    tracker.update_step(HOST, STEP_1, 1);
    tracker.update_step("www.linkedin.com", "https://www.linkedin.com/jobs/view/9", 2);
    assert_eq!(tracker.len(), 2);

    let json = serde_json::to_value(&tracker).unwrap();
    assert_eq!(json[HOST]["status"], "in_progress");
    assert_eq!(json["www.linkedin.com"]["steps_visited"][0], "https://www.linkedin.com/jobs/view/9");

    let restored: SessionTracker = serde_json::from_value(json).unwrap();
    assert_eq!(restored.get(HOST), tracker.get(HOST));
}
