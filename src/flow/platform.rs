use std::fmt;

use serde::Serialize;

/// Job boards with known page structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    LinkedIn,
    Indeed,
    Glassdoor,
    Monster,
    ZipRecruiter,
    Workday,
    Greenhouse,
    Lever,
    Unknown,
}

impl Platform {
    pub fn name(self) -> &'static str {
        match self {
            Platform::LinkedIn => "linkedin",
            Platform::Indeed => "indeed",
            Platform::Glassdoor => "glassdoor",
            Platform::Monster => "monster",
            Platform::ZipRecruiter => "ziprecruiter",
            Platform::Workday => "workday",
            Platform::Greenhouse => "greenhouse",
            Platform::Lever => "lever",
            Platform::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const HOST_PATTERNS: [(&str, Platform); 8] = [
    ("linkedin.com", Platform::LinkedIn),
    ("indeed.com", Platform::Indeed),
    ("glassdoor.com", Platform::Glassdoor),
    ("monster.com", Platform::Monster),
    ("ziprecruiter.com", Platform::ZipRecruiter),
    ("myworkdayjobs.com", Platform::Workday),
    ("boards.greenhouse.io", Platform::Greenhouse),
    ("jobs.lever.co", Platform::Lever),
];

pub fn detect_platform(hostname: &str) -> Platform {
    let host = hostname.to_lowercase();
    HOST_PATTERNS
        .iter()
        .find(|(pattern, _)| host.contains(pattern))
        .map(|(_, platform)| *platform)
        .unwrap_or(Platform::Unknown)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformConfig {
    pub platform: Platform,
    /// Container holding the current application step
    pub modal_selector: Option<String>,
    /// Buttons that submit or review the application; never clicked
    pub submit_texts: Vec<String>,
}

pub fn platform_config(platform: Platform) -> PlatformConfig {
    match platform {
        Platform::LinkedIn => PlatformConfig {
            platform,
            modal_selector: Some(".jobs-easy-apply-content".to_string()),
            submit_texts: vec!["Submit application".to_string(), "Review".to_string()],
        },
        _ => PlatformConfig {
            platform,
            modal_selector: None,
            submit_texts: Vec::new(),
        },
    }
}
