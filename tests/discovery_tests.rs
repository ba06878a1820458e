use job_autofill::discovery::{ControlKind, discover};

use crate::common::fixtures::{CLASSIC_FORM, by_id, candidate_for, load, load_at, scan};

mod common;

#[test]
fn classic_form_yields_one_candidate_per_control() {
    let page = load(CLASSIC_FORM);
    let candidates = scan(&page);

    assert_eq!(candidates.len(), 4, "first, last, email and city");
    let kinds: Vec<ControlKind> = candidates.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![ControlKind::Text, ControlKind::Text, ControlKind::Text, ControlKind::Select]
    );

    let first = candidate_for(&candidates, by_id(&page, "first"));
    assert_eq!(first.labels.label.as_deref(), Some("First name"));
    assert_eq!(first.name.as_deref(), Some("first"));

    let email = candidate_for(&candidates, by_id(&page, "email"));
    assert_eq!(email.input_type.as_deref(), Some("email"));
    assert!(email.name.is_none());
}

#[test]
fn select_options_are_listed_in_document_order() {
    let page = load(CLASSIC_FORM);
    let candidates = scan(&page);
    let city = candidate_for(&candidates, by_id(&page, "city"));

    let labels: Vec<&str> = city.options.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(labels, vec!["Select a city", "Seattle", "Portland", "San Francisco"]);
    assert_eq!(city.options[0].value, "");
    assert_eq!(city.options[1].value, "Seattle", "option without value uses its text");
    assert!(city.options[0].selected, "first option is selected by default");
}

#[test]
fn hidden_honeypot_and_button_inputs_are_excluded() {
    let page = load(
        r#"<html><body><form>
            <input type="hidden" name="csrf" value="t">
            <input name="trap" aria-hidden="true">
            <input name="trap2" tabindex="-1">
            <input name="offscreen" style="display:none">
            <input type="submit" value="Send">
            <input type="button" value="Back">
            <input type="reset">
            <input type="image" src="x.png">
            <input name="real" aria-label="Phone">
        </form></body></html>"#,
    );

    let candidates = scan(&page);
    assert_eq!(candidates.len(), 1, "only the real input survives: {:#?}", candidates);
    assert_eq!(candidates[0].name.as_deref(), Some("real"));
    assert_eq!(candidates[0].labels.aria_label.as_deref(), Some("Phone"));
}

#[test]
fn radio_group_collapses_to_one_candidate_with_caption() {
    let page = load(
        r#"<html><body><form>
            <fieldset>
              <legend>Are you authorized to work in the US?</legend>
              <label><input type="radio" name="auth" value="yes" id="auth-yes" required> Yes</label>
              <label><input type="radio" name="auth" value="no" id="auth-no"> No</label>
            </fieldset>
        </form></body></html>"#,
    );

    let candidates = scan(&page);
    assert_eq!(candidates.len(), 1);
    let group = &candidates[0];
    assert_eq!(group.kind, ControlKind::Radio);
    assert!(group.is_group());
    assert_eq!(group.members(), vec![by_id(&page, "auth-yes"), by_id(&page, "auth-no")]);
    assert!(group.required, "one required member makes the group required");
    assert_eq!(group.labels.legend.as_deref(), Some("Are you authorized to work in the US?"));

    let options: Vec<(&str, &str)> =
        group.options.iter().map(|o| (o.value.as_str(), o.label.as_str())).collect();
    assert_eq!(options, vec![("yes", "Yes"), ("no", "No")]);
}

#[test]
fn radio_caption_falls_back_to_preceding_text() {
    let page = load(
        r#"<html><body><form>
            <div class="question">
              <p>Will you relocate?</p>
              <input type="radio" name="reloc" id="r1" value="Yes"><label for="r1">Yes</label>
              <input type="radio" name="reloc" id="r2" value="No"><label for="r2">No</label>
            </div>
        </form></body></html>"#,
    );

    let candidates = scan(&page);
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].labels.legend.as_deref(), Some("Will you relocate?"));
}

#[test]
fn aria_listbox_with_popup_is_one_candidate() {
    let page = load(
        r#"<html><body>
            <span id="country-label">Country</span>
            <div id="country" role="combobox" aria-labelledby="country-label" aria-controls="country-list">Choose</div>
            <ul id="country-list" role="listbox">
              <li role="option" data-value="US">United States</li>
              <li role="option" data-value="CA">Canada</li>
            </ul>
        </body></html>"#,
    );

    let candidates = scan(&page);
    assert_eq!(candidates.len(), 1, "popup listbox belongs to the combobox: {:#?}", candidates);
    let widget = &candidates[0];
    assert_eq!(widget.kind, ControlKind::CustomListbox);
    assert_eq!(widget.labels.aria_labelledby.as_deref(), Some("Country"));
    let values: Vec<&str> = widget.options.iter().map(|o| o.value.as_str()).collect();
    assert_eq!(values, vec!["US", "CA"]);
}

#[test]
fn shadow_roots_and_same_origin_frames_are_searched() {
    let page = load(
        r#"<html><body>
            <x-name><template shadowrootmode="open">
              <label for="fn">First name</label><input id="fn">
            </template></x-name>
            <iframe id="local" srcdoc="<label for='em'>Email</label><input id='em' type='email'>"></iframe>
            <iframe src="https://widgets.other.com/form"></iframe>
        </body></html>"#,
    );

    let candidates = scan(&page);
    assert_eq!(candidates.len(), 2, "cross-origin frame is skipped");

    let shadow_input = candidate_for(&candidates, by_id(&page, "fn"));
    assert_eq!(
        shadow_input.labels.label.as_deref(),
        Some("First name"),
        "label lookup stays inside the shadow root"
    );
    assert_ne!(shadow_input.root, page.document());

    let framed = candidate_for(&candidates, by_id(&page, "em"));
    assert_eq!(framed.labels.label.as_deref(), Some("Email"));
}

#[test]
fn label_sources_are_kept_apart() {
    let page = load(
        r#"<html><body>
            <p id="q1">Desired</p><p id="q2">salary</p>
            <input id="salary" aria-labelledby="q1 q2" placeholder="USD" autocomplete="off">
            <textarea id="bio" aria-label="Tell us about yourself"></textarea>
            <div contenteditable="true" id="notes"></div>
        </body></html>"#,
    );

    let candidates = scan(&page);
    let salary = candidate_for(&candidates, by_id(&page, "salary"));
    assert_eq!(salary.labels.aria_labelledby.as_deref(), Some("Desired salary"));
    assert_eq!(salary.labels.placeholder.as_deref(), Some("USD"));
    assert_eq!(salary.autocomplete.as_deref(), Some("off"));
    assert_eq!(salary.combined_label(), "Desired salary USD");

    let bio = candidate_for(&candidates, by_id(&page, "bio"));
    assert_eq!(bio.kind, ControlKind::Text);
    assert_eq!(bio.tag, "textarea");

    let notes = candidate_for(&candidates, by_id(&page, "notes"));
    assert_eq!(notes.kind, ControlKind::ContentEditable);
    assert!(notes.content_editable);
}

#[test]
fn discovery_can_be_scoped_to_a_container() {
    let page = load_at(
        r#"<html><body>
            <input name="search" aria-label="Search jobs">
            <div id="modal"><input name="phone" type="tel"></div>
        </body></html>"#,
        "https://www.linkedin.com/jobs/view/1",
    );

    let modal = by_id(&page, "modal");
    let scoped = discover(&page, modal);
    assert_eq!(scoped.len(), 1);
    assert_eq!(scoped[0].name.as_deref(), Some("phone"));
    assert_eq!(scan(&page).len(), 2);
}
