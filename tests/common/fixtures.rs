use job_autofill::discovery::{FieldCandidate, discover};
use job_autofill::dom::{NodeId, Page, parse_html};
use job_autofill::profile::CanonicalProfile;
use job_autofill::profile::profile_model::{
    ApplicationDefaults, ComputedProfile, PersonalInfo, ProfileFiles, ResumeFile,
};

pub const APPLY_URL: &str = "https://careers.example.com/jobs/42/apply";

pub const CLASSIC_FORM: &str = r#"
<html><body>
  <form id="application">
    <label for="first">First name</label>
    <input id="first" name="first">
    <label for="last">Last name</label>
    <input id="last" name="last">
    <label for="email">Email</label>
    <input id="email" type="email">
    <label for="city">City</label>
    <select id="city" name="city">
      <option value="">Select a city</option>
      <option>Seattle</option>
      <option>Portland</option>
      <option>San Francisco</option>
    </select>
  </form>
</body></html>
"#;

pub fn load(html: &str) -> Page {
    parse_html(html, APPLY_URL).expect("fixture HTML should parse")
}

pub fn load_at(html: &str, url: &str) -> Page {
    parse_html(html, url).expect("fixture HTML should parse")
}

pub fn scan(page: &Page) -> Vec<FieldCandidate> {
    discover(page, page.document())
}

/// Every element reachable from the document, including shadow roots and
/// same-origin frame documents.
pub fn all_elements(page: &Page) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut roots = vec![page.document()];
    while let Some(root) = roots.pop() {
        for node in page.descendant_elements(root) {
            out.push(node);
            if let Some(shadow) = page.shadow_root(node) {
                roots.push(shadow);
            }
            if let Ok(Some(document)) = page.frame_document(node) {
                roots.push(document);
            }
        }
    }
    out
}

pub fn by_id(page: &Page, id: &str) -> NodeId {
    all_elements(page)
        .into_iter()
        .find(|n| page.attr(*n, "id") == Some(id))
        .unwrap_or_else(|| panic!("no element with id '{}'", id))
}

pub fn candidate_for<'a>(candidates: &'a [FieldCandidate], element: NodeId) -> &'a FieldCandidate {
    candidates
        .iter()
        .find(|c| c.element == element || c.group.contains(&element))
        .unwrap_or_else(|| panic!("no candidate for element {}", element))
}

pub fn sample_profile() -> CanonicalProfile {
    CanonicalProfile {
        personal: PersonalInfo {
            first_name: "Jamie".into(),
            last_name: "Rivera".into(),
            full_name: "Jamie Rivera".into(),
            email: "jamie@x.com".into(),
            phone: "+1 206 555 0100".into(),
            country: Some("United States".into()),
            city: Some("Seattle".into()),
            location: "Seattle, WA".into(),
            linkedin_url: Some("https://www.linkedin.com/in/jamierivera".into()),
            portfolio_url: None,
            website_url: Some("https://github.com/jrivera".into()),
        },
        application_defaults: ApplicationDefaults {
            work_authorization: true,
            sponsorship_required: false,
            willing_to_relocate: true,
            willing_to_remote: true,
            desired_salary: Some("150000".into()),
            years_experience: Some(7),
        },
        files: ProfileFiles {
            // "%PDF-1.4" base64-encoded
            resume: Some(ResumeFile {
                data: "data:application/pdf;base64,JVBERi0xLjQ=".into(),
                name: "jamie_rivera_resume.pdf".into(),
            }),
            cover_letter: None,
        },
        computed: ComputedProfile {
            skills: vec!["Rust".into(), "Distributed systems".into()],
            full_text_summary: "Backend engineer with seven years of experience.".into(),
        },
    }
}
