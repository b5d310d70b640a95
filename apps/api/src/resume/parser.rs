//! Resume Parser: extracts a structured profile from raw resume text via the LLM.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::llm_client::prompts::fill_template;
use crate::llm_client::GenerationRequest;
use crate::normalize::fields::{items, opt_text, text, text_list, KeyPath};
use crate::normalize::retry::StructuredRequest;
use crate::normalize::Shape;
use crate::resume::prompts::{RESUME_PARSE_PROMPT_TEMPLATE, RESUME_PARSE_SYSTEM};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceItem {
    pub company: String,
    pub title: String,
    pub start: String,
    pub end: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationItem {
    pub institution: String,
    pub degree: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectItem {
    pub name: String,
    pub summary: String,
}

/// Structured profile extracted from a resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedResume {
    pub name: String,
    pub email: String,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceItem>,
    pub education: Vec<EducationItem>,
    pub projects: Vec<ProjectItem>,
}

const NAME: &[KeyPath] = &[&["name"], &["full_name"], &["fullName"], &["candidate_name"]];
const EMAIL: &[KeyPath] = &[&["email"], &["Email"], &["contact", "email"]];
const SKILLS: &[KeyPath] = &[
    &["skills"],
    &["Skills"],
    &["technical_skills"],
    &["technicalSkills"],
];
const EXPERIENCE: &[KeyPath] = &[
    &["experience"],
    &["Experience"],
    &["work_experience"],
    &["workExperience"],
];
const COMPANY: &[KeyPath] = &[&["company"], &["Company"], &["organization"], &["employer"]];
const TITLE: &[KeyPath] = &[&["title"], &["Title"], &["role"], &["position"]];
const START: &[KeyPath] = &[&["start"], &["start_date"], &["startDate"], &["from"]];
const END: &[KeyPath] = &[&["end"], &["end_date"], &["endDate"], &["to"]];
const BULLETS: &[KeyPath] = &[
    &["bullets"],
    &["highlights"],
    &["responsibilities"],
    &["achievements"],
];
const DESCRIPTION: &[KeyPath] = &[&["description"], &["summary"]];
const EDUCATION: &[KeyPath] = &[&["education"], &["Education"]];
const INSTITUTION: &[KeyPath] = &[
    &["institution"],
    &["school"],
    &["university"],
    &["college"],
];
const DEGREE: &[KeyPath] = &[&["degree"], &["qualification"]];
const YEAR: &[KeyPath] = &[
    &["year"],
    &["graduation_year"],
    &["graduationYear"],
    &["end"],
    &["end_date"],
];
const PROJECTS: &[KeyPath] = &[&["projects"], &["Projects"]];
const PROJECT_NAME: &[KeyPath] = &[&["name"], &["title"], &["project_name"]];
const PROJECT_SUMMARY: &[KeyPath] = &[&["summary"], &["description"]];

impl ParsedResume {
    /// Maps any parsed model output onto the profile shape. Never fails.
    pub fn normalize(value: &Value) -> Self {
        let experience = items(value, EXPERIENCE)
            .iter()
            .map(|e| {
                let mut bullets = text_list(e, BULLETS);
                if bullets.is_empty() {
                    bullets.extend(opt_text(e, DESCRIPTION));
                }
                ExperienceItem {
                    company: text(e, COMPANY, ""),
                    title: text(e, TITLE, ""),
                    start: text(e, START, ""),
                    end: text(e, END, ""),
                    bullets,
                }
            })
            .filter(|e| *e != ExperienceItem::default())
            .collect();

        let education = items(value, EDUCATION)
            .iter()
            .map(|e| EducationItem {
                institution: text(e, INSTITUTION, ""),
                degree: text(e, DEGREE, ""),
                year: text(e, YEAR, ""),
            })
            .filter(|e| *e != EducationItem::default())
            .collect();

        let projects = items(value, PROJECTS)
            .iter()
            .map(|p| ProjectItem {
                name: text(p, PROJECT_NAME, ""),
                summary: text(p, PROJECT_SUMMARY, ""),
            })
            .filter(|p| *p != ProjectItem::default())
            .collect();

        Self {
            name: text(value, NAME, ""),
            email: text(value, EMAIL, ""),
            skills: text_list(value, SKILLS),
            experience,
            education,
            projects,
        }
    }

    /// Flattens the profile to plain text, used when the stored resume text is unusable.
    pub fn to_plain_text(&self) -> String {
        let mut parts = Vec::new();
        if !self.name.is_empty() {
            parts.push(format!("Name: {}", self.name));
        }
        if !self.email.is_empty() {
            parts.push(format!("Email: {}", self.email));
        }
        if !self.skills.is_empty() {
            parts.push(format!("Skills: {}", self.skills.join(", ")));
        }
        for e in &self.experience {
            let heading = [e.title.as_str(), e.company.as_str()]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" @ ");
            let bullets = e
                .bullets
                .iter()
                .map(|b| format!("- {b}"))
                .collect::<Vec<_>>()
                .join("\n");
            parts.push(format!("Experience: {heading}\n{bullets}"));
        }
        for ed in &self.education {
            let line = [ed.degree.as_str(), ed.institution.as_str(), ed.year.as_str()]
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", ");
            parts.push(format!("Education: {line}"));
        }
        for p in &self.projects {
            parts.push(format!("Project: {} - {}", p.name, p.summary));
        }
        parts.join("\n")
    }
}

/// Builds the extraction request for `resume_text`.
pub fn resume_parse_request(resume_text: &str) -> StructuredRequest {
    let prompt = fill_template(RESUME_PARSE_PROMPT_TEMPLATE, &[("resume_text", resume_text)]);
    StructuredRequest::new(
        GenerationRequest::new(prompt, RESUME_PARSE_SYSTEM),
        Shape::Object,
    )
}
