//! Learning Resources: curated links for the key skills of a JD.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::generation::prompts::{RESOURCES_PROMPT_TEMPLATE, RESOURCES_SYSTEM};
use crate::llm_client::prompts::fill_template;
use crate::llm_client::GenerationRequest;
use crate::normalize::fields::{items, opt_text, text, KeyPath};
use crate::normalize::retry::StructuredRequest;
use crate::normalize::Shape;

pub const MAX_SKILLS: usize = 6;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Video,
    #[default]
    Article,
    Doc,
    Course,
    Repo,
}

impl ResourceType {
    fn from_label(label: &str) -> Self {
        let label = label.to_lowercase();
        if label.contains("video") || label.contains("youtube") {
            Self::Video
        } else if label.contains("course") {
            Self::Course
        } else if label.contains("repo") || label.contains("github") {
            Self::Repo
        } else if label.starts_with("doc") || label.contains("documentation") {
            Self::Doc
        } else {
            Self::Article
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
    pub url: String,
    pub resource_type: ResourceType,
    pub summary: String,
    pub estimated_time: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillResources {
    pub skill: String,
    pub resources: Vec<Resource>,
}

const SKILL: &[KeyPath] = &[&["skill"], &["Skill"], &["name"], &["skill_name"]];
const RESOURCES: &[KeyPath] = &[&["resources"], &["Resources"], &["links"]];
const TITLE: &[KeyPath] = &[&["title"], &["Title"], &["name"]];
const URL: &[KeyPath] = &[&["url"], &["URL"], &["link"], &["href"]];
const RESOURCE_TYPE: &[KeyPath] = &[&["resource_type"], &["resourceType"], &["type"]];
const SUMMARY: &[KeyPath] = &[&["summary"], &["description"]];
const ESTIMATED_TIME: &[KeyPath] = &[
    &["estimated_time"],
    &["estimatedTime"],
    &["duration"],
    &["time"],
];
/// Some answers wrap the list: `{"skills": [...]}`.
const SKILL_LIST: &[KeyPath] = &[&["skills"], &["Skills"]];

impl Resource {
    fn normalize(value: &Value) -> Option<Self> {
        let url = opt_text(value, URL)?;
        Some(Self {
            title: opt_text(value, TITLE).unwrap_or_else(|| url.clone()),
            url,
            resource_type: opt_text(value, RESOURCE_TYPE)
                .map(|t| ResourceType::from_label(&t))
                .unwrap_or_default(),
            summary: text(value, SUMMARY, ""),
            estimated_time: text(value, ESTIMATED_TIME, "30m"),
        })
    }
}

impl SkillResources {
    fn normalize(value: &Value) -> Option<Self> {
        Some(Self {
            skill: opt_text(value, SKILL)?,
            resources: items(value, RESOURCES)
                .iter()
                .filter_map(Resource::normalize)
                .collect(),
        })
    }
}

pub fn normalize_resources(value: &Value) -> Vec<SkillResources> {
    let entries = match value {
        Value::Array(entries) => entries.as_slice(),
        _ => items(value, SKILL_LIST),
    };
    entries
        .iter()
        .filter_map(SkillResources::normalize)
        .take(MAX_SKILLS)
        .collect()
}

pub fn resources_request(jd_text: &str) -> StructuredRequest {
    let prompt = fill_template(RESOURCES_PROMPT_TEMPLATE, &[("jd_text", jd_text)]);
    StructuredRequest::new(
        GenerationRequest::new(prompt, RESOURCES_SYSTEM).with_max_output_tokens(4096),
        Shape::Array,
    )
}
