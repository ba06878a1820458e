use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::canonical::CanonicalFieldType;
use crate::dom::FileBlob;
use crate::dom::transfer::guess_mime_type;
use crate::fill::FieldValue;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub country: Option<String>,
    pub city: Option<String>,
    pub location: String,
    pub linkedin_url: Option<String>,
    pub portfolio_url: Option<String>,
    pub website_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationDefaults {
    pub work_authorization: bool,
    pub sponsorship_required: bool,
    pub willing_to_relocate: bool,
    pub willing_to_remote: bool,
    pub desired_salary: Option<String>,
    pub years_experience: Option<u32>,
}

/// Resume payload as stored: base64 data (optionally a `data:` URL) plus
/// the original file name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeFile {
    pub data: String,
    pub name: String,
}

impl ResumeFile {
    /// Decode into a file. Undecodable data still yields an empty file with
    /// the right name.
    pub fn to_blob(&self) -> FileBlob {
        let payload = self
            .data
            .split_once("base64,")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.data)
            .trim();

        match STANDARD.decode(payload) {
            Ok(bytes) => FileBlob::new(&self.name, guess_mime_type(&self.name), bytes),
            Err(err) => {
                warn!(name = %self.name, error = %err, "Resume payload is not valid base64");
                FileBlob::placeholder(&self.name)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileFiles {
    pub resume: Option<ResumeFile>,
    pub cover_letter: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComputedProfile {
    pub skills: Vec<String>,
    pub full_text_summary: String,
}

/// Everything the flow controller knows about the applicant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanonicalProfile {
    pub personal: PersonalInfo,
    pub application_defaults: ApplicationDefaults,
    pub files: ProfileFiles,
    pub computed: ComputedProfile,
}

fn text(value: &str) -> Option<FieldValue> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| FieldValue::text(trimmed))
}

fn optional_text(value: &Option<String>) -> Option<FieldValue> {
    value.as_deref().and_then(text)
}

impl CanonicalProfile {
    /// Deterministic value for `field_type`, if the profile has one.
    /// Free text has none; it is generated per question.
    pub fn value_for(&self, field_type: CanonicalFieldType) -> Option<FieldValue> {
        let personal = &self.personal;
        let defaults = &self.application_defaults;

        match field_type {
            CanonicalFieldType::FirstName => text(&personal.first_name),
            CanonicalFieldType::LastName => text(&personal.last_name),
            CanonicalFieldType::FullName => text(&personal.full_name).or_else(|| {
                text(&format!("{} {}", personal.first_name, personal.last_name))
            }),
            CanonicalFieldType::Email => text(&personal.email),
            CanonicalFieldType::Phone => text(&personal.phone),
            CanonicalFieldType::City => optional_text(&personal.city),
            CanonicalFieldType::Country => optional_text(&personal.country),
            CanonicalFieldType::Location => text(&personal.location),
            CanonicalFieldType::LinkedinUrl => optional_text(&personal.linkedin_url),
            CanonicalFieldType::PortfolioUrl => optional_text(&personal.portfolio_url),
            CanonicalFieldType::WebsiteUrl => optional_text(&personal.website_url),
            CanonicalFieldType::WorkAuthorization => Some(FieldValue::Bool(defaults.work_authorization)),
            CanonicalFieldType::SponsorshipRequired => Some(FieldValue::Bool(defaults.sponsorship_required)),
            CanonicalFieldType::RelocationWillingness => Some(FieldValue::Bool(defaults.willing_to_relocate)),
            CanonicalFieldType::RemotePreference => Some(FieldValue::Bool(defaults.willing_to_remote)),
            CanonicalFieldType::DesiredSalary => optional_text(&defaults.desired_salary),
            CanonicalFieldType::YearsExperience => defaults
                .years_experience
                .map(|years| FieldValue::text(years.to_string())),
            CanonicalFieldType::Resume => self.files.resume.as_ref().map(|r| FieldValue::File(r.to_blob())),
            CanonicalFieldType::CoverLetter => optional_text(&self.files.cover_letter),
            CanonicalFieldType::FreeText => None,
        }
    }

    pub fn summary(&self) -> &str {
        &self.computed.full_text_summary
    }
}
