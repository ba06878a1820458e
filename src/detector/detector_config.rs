use serde::{Deserialize, Serialize};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorWeights {
    pub structured_data: i32,
    pub ats_domain: i32,
    pub url_keyword: i32,
    pub text_job_description: i32,
    pub text_apply: i32,
    pub text_resume: i32,
    pub text_combo_bonus: i32,
    pub form_large: i32,
    pub form_file_input: i32,
    pub form_resume_text: i32,
    pub form_apply_button: i32,
}

impl Default for DetectorWeights {
    fn default() -> Self {
        Self {
            structured_data: 8,
            ats_domain: 4,
            url_keyword: 2,
            text_job_description: 2,
            text_apply: 2,
            text_resume: 3,
            text_combo_bonus: 1,
            form_large: 2,
            form_file_input: 3,
            form_resume_text: 2,
            form_apply_button: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextKeywords {
    pub job_description: Vec<String>,
    pub apply_actions: Vec<String>,
    pub resume: Vec<String>,
}

impl Default for TextKeywords {
    fn default() -> Self {
        Self {
            job_description: strings(&[
                "job description",
                "about the role",
                "role description",
                "responsibilities",
                "what you will do",
                "what you'll do",
                "requirements",
                "qualifications",
                "skills",
                "benefits",
                "compensation",
                "salary range",
                "iş tanımı",
                "pozisyon",
                "pozisyon detayları",
                "sorumluluklar",
                "görev tanımı",
                "görevleriniz",
                "aranan nitelikler",
                "genel nitelikler",
                "başvuru koşulları",
            ]),
            apply_actions: strings(&[
                "apply",
                "apply now",
                "submit application",
                "start application",
                "apply for this job",
                "başvur",
                "şimdi başvur",
                "başvuru formu",
                "online başvuru",
            ]),
            resume: strings(&[
                "resume",
                "résumé",
                "cv ",
                "cv.",
                "curriculum vitae",
                "cover letter",
                "linkedin profile",
                "attach your resume",
                "özgeçmiş",
                "cv'nizi",
                "özgeçmişinizi yükleyin",
            ]),
        }
    }
}

/// Tunables of the job-page detector. Every field has a default, so a
/// partial YAML section only overrides what it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub threshold: i32,
    pub max_text_length: usize,
    pub max_form_text_length: usize,
    pub form_min_fields: usize,
    pub debounce_ms: u64,
    pub url_keywords: Vec<String>,
    pub ats_domains: Vec<String>,
    pub text_keywords: TextKeywords,
    pub form_apply_texts: Vec<String>,
    pub weights: DetectorWeights,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            threshold: 6,
            max_text_length: 45_000,
            max_form_text_length: 8_000,
            form_min_fields: 5,
            debounce_ms: 300,
            url_keywords: strings(&[
                "job",
                "jobs",
                "career",
                "careers",
                "position",
                "positions",
                "vacancy",
                "vacancies",
                "recruit",
                "apply",
                "join-us",
                "work-with-us",
                "opening",
                "openings",
            ]),
            ats_domains: strings(&[
                "greenhouse.io",
                "boards.greenhouse.io",
                "lever.co",
                "jobs.lever.co",
                "myworkdayjobs.com",
                "workdayjobs.com",
                "smartrecruiters.com",
                "ashbyhq.com",
                "jobs.ashbyhq.com",
                "bamboohr.com",
                "icims.com",
                "jobvite.com",
                "workable.com",
                "personio.de",
                "recruitee.com",
                "teamtailor.com",
            ]),
            text_keywords: TextKeywords::default(),
            form_apply_texts: strings(&[
                "apply",
                "apply now",
                "submit",
                "submit application",
                "başvur",
                "şimdi başvur",
            ]),
            weights: DetectorWeights::default(),
        }
    }
}
