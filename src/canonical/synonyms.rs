use crate::canonical::canonical_model::CanonicalFieldType;

/// Keyword lists for one canonical type.
///
/// `attributes` match normalized `name`/`id` tokens, `labels` match
/// word-aligned inside label/placeholder/ARIA text, `autocomplete` matches
/// tokens of the HTML `autocomplete` attribute.
#[derive(Debug)]
pub struct SynonymEntry {
    pub attributes: &'static [&'static str],
    pub labels: &'static [&'static str],
    pub autocomplete: &'static [&'static str],
}

static FIRST_NAME: SynonymEntry = SynonymEntry {
    attributes: &["firstname", "first_name", "givenname", "given_name", "fname", "name_first", "first"],
    labels: &["first name", "given name", "first"],
    autocomplete: &["given-name"],
};

static LAST_NAME: SynonymEntry = SynonymEntry {
    attributes: &[
        "lastname",
        "last_name",
        "surname",
        "familyname",
        "family_name",
        "lname",
        "name_last",
        "last",
    ],
    labels: &["last name", "surname", "family name", "last"],
    autocomplete: &["family-name"],
};

static FULL_NAME: SynonymEntry = SynonymEntry {
    attributes: &["fullname", "full_name", "name", "your_name", "candidate_name"],
    labels: &["full name", "your name", "legal name", "name"],
    autocomplete: &["name"],
};

static EMAIL: SynonymEntry = SynonymEntry {
    attributes: &["email", "e-mail", "emailaddress", "email_address", "mail"],
    labels: &["email", "e-mail", "email address"],
    autocomplete: &["email"],
};

static PHONE: SynonymEntry = SynonymEntry {
    attributes: &["phone", "phonenumber", "phone_number", "mobile", "cell", "tel", "telephone"],
    labels: &["phone", "mobile", "cell", "telephone", "phone number"],
    autocomplete: &["tel", "tel-national"],
};

static CITY: SynonymEntry = SynonymEntry {
    attributes: &["city", "town"],
    labels: &["city", "town"],
    autocomplete: &["address-level2"],
};

static COUNTRY: SynonymEntry = SynonymEntry {
    attributes: &["country", "nation", "country_code"],
    labels: &["country", "nation"],
    autocomplete: &["country", "country-name"],
};

static LOCATION: SynonymEntry = SynonymEntry {
    attributes: &["location", "address", "current_location"],
    labels: &["location", "address", "where are you based", "current location"],
    autocomplete: &["street-address", "address-line1"],
};

static LINKEDIN_URL: SynonymEntry = SynonymEntry {
    attributes: &["linkedin", "linkedin_url", "linkedin_profile"],
    labels: &["linkedin", "linkedin profile", "linkedin url"],
    autocomplete: &[],
};

static PORTFOLIO_URL: SynonymEntry = SynonymEntry {
    attributes: &["portfolio", "portfolio_url", "portfolio_link"],
    labels: &["portfolio", "link to portfolio", "work samples"],
    autocomplete: &[],
};

static WEBSITE_URL: SynonymEntry = SynonymEntry {
    attributes: &["website", "personal_website", "homepage", "github", "blog", "url"],
    labels: &["website", "personal site", "personal website", "homepage", "github"],
    autocomplete: &["url"],
};

static WORK_AUTHORIZATION: SynonymEntry = SynonymEntry {
    attributes: &[
        "work_authorization",
        "workauthorization",
        "authorized",
        "legally_authorized",
        "work_permit",
    ],
    labels: &[
        "authorized to work",
        "legally authorized",
        "work authorization",
        "right to work",
        "eligible to work",
        "work permit",
    ],
    autocomplete: &[],
};

static SPONSORSHIP_REQUIRED: SynonymEntry = SynonymEntry {
    attributes: &["sponsorship", "visa_sponsorship", "require_sponsorship", "visa"],
    labels: &["sponsorship", "visa", "require sponsorship"],
    autocomplete: &[],
};

static RELOCATION_WILLINGNESS: SynonymEntry = SynonymEntry {
    attributes: &["relocate", "relocation", "willing_to_relocate"],
    labels: &["relocate", "relocation"],
    autocomplete: &[],
};

static REMOTE_PREFERENCE: SynonymEntry = SynonymEntry {
    attributes: &["remote", "remote_work", "work_remotely", "remote_preference"],
    labels: &["remote", "work from home", "work remotely"],
    autocomplete: &[],
};

static DESIRED_SALARY: SynonymEntry = SynonymEntry {
    attributes: &["salary", "desired_salary", "expected_salary", "compensation", "salary_expectation"],
    labels: &["salary", "compensation", "expected pay", "pay expectation"],
    autocomplete: &[],
};

static YEARS_EXPERIENCE: SynonymEntry = SynonymEntry {
    attributes: &["years_experience", "experience_years", "years_of_experience", "yoe", "experience"],
    labels: &["years of experience", "how many years", "experience"],
    autocomplete: &[],
};

static RESUME: SynonymEntry = SynonymEntry {
    attributes: &["resume", "cv", "curriculum_vitae", "resume_upload", "upload"],
    labels: &["resume", "cv", "curriculum vitae", "upload resume"],
    autocomplete: &[],
};

static COVER_LETTER: SynonymEntry = SynonymEntry {
    attributes: &["coverletter", "cover_letter", "letter"],
    labels: &["cover letter", "add a cover letter", "motivation letter"],
    autocomplete: &[],
};

static FREE_TEXT: SynonymEntry = SynonymEntry {
    attributes: &["message", "comments", "additional_info", "summary", "about"],
    labels: &[
        "why",
        "tell us",
        "describe",
        "additional information",
        "anything else",
        "about yourself",
        "motivation",
        "summary",
    ],
    autocomplete: &[],
};

pub fn synonyms(field_type: CanonicalFieldType) -> Option<&'static SynonymEntry> {
    let entry = match field_type {
        CanonicalFieldType::FirstName => &FIRST_NAME,
        CanonicalFieldType::LastName => &LAST_NAME,
        CanonicalFieldType::FullName => &FULL_NAME,
        CanonicalFieldType::Email => &EMAIL,
        CanonicalFieldType::Phone => &PHONE,
        CanonicalFieldType::City => &CITY,
        CanonicalFieldType::Country => &COUNTRY,
        CanonicalFieldType::Location => &LOCATION,
        CanonicalFieldType::LinkedinUrl => &LINKEDIN_URL,
        CanonicalFieldType::PortfolioUrl => &PORTFOLIO_URL,
        CanonicalFieldType::WebsiteUrl => &WEBSITE_URL,
        CanonicalFieldType::WorkAuthorization => &WORK_AUTHORIZATION,
        CanonicalFieldType::SponsorshipRequired => &SPONSORSHIP_REQUIRED,
        CanonicalFieldType::RelocationWillingness => &RELOCATION_WILLINGNESS,
        CanonicalFieldType::RemotePreference => &REMOTE_PREFERENCE,
        CanonicalFieldType::DesiredSalary => &DESIRED_SALARY,
        CanonicalFieldType::YearsExperience => &YEARS_EXPERIENCE,
        CanonicalFieldType::Resume => &RESUME,
        CanonicalFieldType::CoverLetter => &COVER_LETTER,
        CanonicalFieldType::FreeText => &FREE_TEXT,
    };
    Some(entry)
}
