use serde::{Deserialize, Serialize};

use crate::profile::profile_model::{
    ApplicationDefaults, CanonicalProfile, ComputedProfile, PersonalInfo, ProfileFiles, ResumeFile,
};

/// Stored user profile, reduced to the fields the engine maps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawUserProfile {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub portfolio: Option<String>,
    pub website: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub location: String,
    pub summary: String,
    pub skills: Vec<String>,
    pub resume_data: Option<String>,
    pub resume_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserPreferences {
    pub remote_only: bool,
    pub relocation_ok: bool,
    pub salary_min: u64,
    pub salary_max: u64,
    pub currency: String,
    pub years_of_experience: u32,
    pub visa_sponsorship_required: bool,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            remote_only: false,
            relocation_ok: true,
            salary_min: 0,
            salary_max: 0,
            currency: "USD".to_string(),
            years_of_experience: 0,
            visa_sponsorship_required: false,
        }
    }
}

/// Build the canonical profile from stored profile + preferences.
///
/// The full name splits into first token / remaining tokens; GitHub stands
/// in as the personal website; work authorization is assumed whenever no
/// sponsorship is needed.
pub fn map_user_to_canonical(user: &RawUserProfile, prefs: &UserPreferences) -> CanonicalProfile {
    let full_name = user.full_name.clone().unwrap_or_default();
    let mut parts = full_name.split_whitespace();
    let first_name = parts.next().unwrap_or_default().to_string();
    let last_name = parts.collect::<Vec<_>>().join(" ");

    let resume = match (&user.resume_data, &user.resume_name) {
        (Some(data), Some(name)) if !data.is_empty() && !name.is_empty() => Some(ResumeFile {
            data: data.clone(),
            name: name.clone(),
        }),
        _ => None,
    };

    CanonicalProfile {
        personal: PersonalInfo {
            first_name,
            last_name,
            full_name: full_name.trim().to_string(),
            email: user.email.clone().unwrap_or_default(),
            phone: user.phone.clone().unwrap_or_default(),
            country: user.country.clone(),
            city: user.city.clone(),
            location: user.location.clone(),
            linkedin_url: user.linkedin.clone(),
            portfolio_url: user.portfolio.clone(),
            website_url: user.github.clone().or_else(|| user.website.clone()),
        },
        application_defaults: ApplicationDefaults {
            work_authorization: !prefs.visa_sponsorship_required,
            sponsorship_required: prefs.visa_sponsorship_required,
            willing_to_relocate: prefs.relocation_ok,
            willing_to_remote: prefs.remote_only,
            desired_salary: (prefs.salary_min > 0).then(|| prefs.salary_min.to_string()),
            years_experience: Some(prefs.years_of_experience),
        },
        files: ProfileFiles {
            resume,
            cover_letter: None,
        },
        computed: ComputedProfile {
            skills: user.skills.clone(),
            full_text_summary: user.summary.clone(),
        },
    }
}
