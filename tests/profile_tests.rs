use job_autofill::EngineError;
use job_autofill::canonical::CanonicalFieldType;
use job_autofill::fill::FieldValue;
use job_autofill::profile::{
    RawUserProfile, ResumeFile, UserPreferences, load_profile, map_user_to_canonical, parse_profile,
};

use crate::common::fixtures::sample_profile;

mod common;

#[test]
fn stored_profile_maps_to_canonical() {
    let user = RawUserProfile {
        full_name: Some("Ada Mae Lovelace".into()),
        email: Some("ada@example.org".into()),
        github: Some("https://github.com/ada".into()),
        website: Some("https://ada.dev".into()),
        location: "London, UK".into(),
        summary: "Analyst".into(),
        skills: vec!["Math".into()],
        ..RawUserProfile::default()
    };
    let prefs = UserPreferences {
        visa_sponsorship_required: true,
        salary_min: 120_000,
        years_of_experience: 12,
        ..UserPreferences::default()
    };

    let profile = map_user_to_canonical(&user, &prefs);

    assert_eq!(profile.personal.first_name, "Ada");
    assert_eq!(profile.personal.last_name, "Mae Lovelace");
    assert_eq!(profile.personal.website_url.as_deref(), Some("https://github.com/ada"), "GitHub wins");
    assert!(!profile.application_defaults.work_authorization);
    assert!(profile.application_defaults.sponsorship_required);
    assert!(profile.application_defaults.willing_to_relocate, "relocation defaults to yes");
    assert_eq!(profile.application_defaults.desired_salary.as_deref(), Some("120000"));
    assert_eq!(profile.application_defaults.years_experience, Some(12));
    assert!(profile.files.resume.is_none());
    assert_eq!(profile.summary(), "Analyst");
}

#[test]
fn zero_salary_means_no_salary() {
    let profile = map_user_to_canonical(&RawUserProfile::default(), &UserPreferences::default());
    assert_eq!(profile.value_for(CanonicalFieldType::DesiredSalary), None);
    assert_eq!(profile.value_for(CanonicalFieldType::FirstName), None, "empty strings are no value");
}

#[test]
fn value_for_covers_profile_slots() {
    let profile = sample_profile();

    assert_eq!(profile.value_for(CanonicalFieldType::Email), Some(FieldValue::text("jamie@x.com")));
    assert_eq!(profile.value_for(CanonicalFieldType::FullName), Some(FieldValue::text("Jamie Rivera")));
    assert_eq!(profile.value_for(CanonicalFieldType::RelocationWillingness), Some(FieldValue::Bool(true)));
    assert_eq!(profile.value_for(CanonicalFieldType::SponsorshipRequired), Some(FieldValue::Bool(false)));
    assert_eq!(profile.value_for(CanonicalFieldType::YearsExperience), Some(FieldValue::text("7")));
    assert_eq!(profile.value_for(CanonicalFieldType::PortfolioUrl), None);
    assert_eq!(profile.value_for(CanonicalFieldType::FreeText), None);

    match profile.value_for(CanonicalFieldType::Resume) {
        Some(FieldValue::File(blob)) => {
            assert_eq!(blob.name, "jamie_rivera_resume.pdf");
            assert_eq!(blob.bytes, b"%PDF-1.4".to_vec());
        }
        other => panic!("expected resume file, got {:?}", other),
    }
}

#[test]
fn full_name_falls_back_to_parts() {
    let mut profile = sample_profile();
    profile.personal.full_name.clear();
    assert_eq!(profile.value_for(CanonicalFieldType::FullName), Some(FieldValue::text("Jamie Rivera")));
}

#[test]
fn invalid_resume_payload_keeps_file_name() {
    let resume = ResumeFile {
        data: "data:application/pdf;base64,@@not base64@@".into(),
        name: "cv.docx".into(),
    };
    let blob = resume.to_blob();
    assert_eq!(blob.name, "cv.docx");
    assert_eq!(
        blob.mime_type,
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    );
    assert_eq!(blob.size(), 0);
}

#[test]
fn parses_canonical_layout() {
    let yaml = r#"
personal:
  first_name: Sam
  last_name: Lee
  email: sam@example.com
application_defaults:
  work_authorization: true
  years_experience: 3
files:
  resume:
    data: "JVBERi0xLjQ="
    name: sam.pdf
"#;
    let profile = parse_profile(yaml, "inline.yaml").unwrap();

    assert_eq!(profile.personal.first_name, "Sam");
    assert_eq!(profile.personal.email, "sam@example.com");
    assert!(profile.application_defaults.work_authorization);
    assert_eq!(profile.application_defaults.years_experience, Some(3));
    assert_eq!(profile.files.resume.as_ref().map(|r| r.name.as_str()), Some("sam.pdf"));
}

#[test]
fn parses_stored_layout_as_json() {
    let json = r#"{
        "user": {"full_name": "Kim Park", "email": "kim@example.com", "city": "Austin"},
        "preferences": {"remote_only": true, "years_of_experience": 4}
    }"#;
    let profile = parse_profile(json, "profile.json").unwrap();

    assert_eq!(profile.personal.first_name, "Kim");
    assert_eq!(profile.personal.last_name, "Park");
    assert_eq!(profile.personal.city.as_deref(), Some("Austin"));
    assert!(profile.application_defaults.willing_to_remote);
    assert!(profile.application_defaults.work_authorization);
}

#[test]
fn malformed_profile_is_an_error() {
    let err = parse_profile("- just\n- a list", "bad.yaml").unwrap_err();
    assert!(matches!(err, EngineError::ProfileParse { ref path, .. } if path == "bad.yaml"), "got {}", err);
}

#[test]
fn missing_profile_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");
    let err = load_profile(path.to_str().unwrap()).unwrap_err();
    assert!(matches!(err, EngineError::Io { .. }));
}

#[test]
fn loads_profile_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("profile.yaml");
    std::fs::write(&path, "user:\n  full_name: Lee Chen\n  email: lee@example.com\n").unwrap();

    let profile = load_profile(path.to_str().unwrap()).unwrap();
    assert_eq!(profile.personal.full_name, "Lee Chen");
    assert_eq!(profile.personal.email, "lee@example.com");
}
