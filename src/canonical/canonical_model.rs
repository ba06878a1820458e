use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic slot of the candidate profile a form field can represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CanonicalFieldType {
    FirstName,
    LastName,
    FullName,
    Email,
    Phone,
    City,
    Country,
    Location,
    LinkedinUrl,
    PortfolioUrl,
    WebsiteUrl,
    WorkAuthorization,
    SponsorshipRequired,
    RelocationWillingness,
    RemotePreference,
    DesiredSalary,
    YearsExperience,
    Resume,
    CoverLetter,
    FreeText,
}

/// Matcher scan order: specific, high-value slots first.
pub const PRIORITY_ORDER: [CanonicalFieldType; 20] = [
    CanonicalFieldType::Email,
    CanonicalFieldType::Phone,
    CanonicalFieldType::FirstName,
    CanonicalFieldType::LastName,
    CanonicalFieldType::FullName,
    CanonicalFieldType::Resume,
    CanonicalFieldType::CoverLetter,
    CanonicalFieldType::LinkedinUrl,
    CanonicalFieldType::PortfolioUrl,
    CanonicalFieldType::WebsiteUrl,
    CanonicalFieldType::City,
    CanonicalFieldType::Country,
    CanonicalFieldType::Location,
    CanonicalFieldType::WorkAuthorization,
    CanonicalFieldType::SponsorshipRequired,
    CanonicalFieldType::RelocationWillingness,
    CanonicalFieldType::RemotePreference,
    CanonicalFieldType::DesiredSalary,
    CanonicalFieldType::YearsExperience,
    CanonicalFieldType::FreeText,
];

impl CanonicalFieldType {
    pub fn name(self) -> &'static str {
        match self {
            CanonicalFieldType::FirstName => "firstName",
            CanonicalFieldType::LastName => "lastName",
            CanonicalFieldType::FullName => "fullName",
            CanonicalFieldType::Email => "email",
            CanonicalFieldType::Phone => "phone",
            CanonicalFieldType::City => "city",
            CanonicalFieldType::Country => "country",
            CanonicalFieldType::Location => "location",
            CanonicalFieldType::LinkedinUrl => "linkedinUrl",
            CanonicalFieldType::PortfolioUrl => "portfolioUrl",
            CanonicalFieldType::WebsiteUrl => "websiteUrl",
            CanonicalFieldType::WorkAuthorization => "workAuthorization",
            CanonicalFieldType::SponsorshipRequired => "sponsorshipRequired",
            CanonicalFieldType::RelocationWillingness => "relocationWillingness",
            CanonicalFieldType::RemotePreference => "remotePreference",
            CanonicalFieldType::DesiredSalary => "desiredSalary",
            CanonicalFieldType::YearsExperience => "yearsExperience",
            CanonicalFieldType::Resume => "resume",
            CanonicalFieldType::CoverLetter => "coverLetter",
            CanonicalFieldType::FreeText => "freeText",
        }
    }

    /// Yes/no application defaults.
    pub fn is_boolean_preference(self) -> bool {
        matches!(
            self,
            CanonicalFieldType::WorkAuthorization
                | CanonicalFieldType::SponsorshipRequired
                | CanonicalFieldType::RelocationWillingness
                | CanonicalFieldType::RemotePreference
        )
    }

    pub fn is_url(self) -> bool {
        matches!(
            self,
            CanonicalFieldType::LinkedinUrl
                | CanonicalFieldType::PortfolioUrl
                | CanonicalFieldType::WebsiteUrl
        )
    }

    /// Types whose value is typed text about the person.
    pub fn is_identity_or_contact(self) -> bool {
        matches!(
            self,
            CanonicalFieldType::FirstName
                | CanonicalFieldType::LastName
                | CanonicalFieldType::FullName
                | CanonicalFieldType::Email
                | CanonicalFieldType::Phone
        )
    }

    pub fn is_long_text(self) -> bool {
        matches!(self, CanonicalFieldType::FreeText | CanonicalFieldType::CoverLetter)
    }
}

impl fmt::Display for CanonicalFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
