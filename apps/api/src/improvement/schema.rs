//! Resume improvement analysis: the canonical output shape and its normalizer.
//!
//! Prompt revisions have produced this analysis with different key sets: the
//! canonical snake_case shape, a camelCase nested shape (`analysis` / `jdMatch` /
//! `improvedResume`), the flat evaluator shape (`ATS_Score`, `Improvement_Recommendations`,
//! `Improved_Resume`, ...) and the strict retry shape (`overallScore`, `recommendations[]`
//! with `current` / `improved` / `reason`). Every candidate table below lists the
//! canonical path first, so a normalized value normalizes to itself.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::normalize::fields::{
    fraction, fraction_key, items, object, opt_text, opt_text_list, percent, percent_key, round2,
    text, KeyPath, NumericKey,
};

pub const DEFAULT_OVERALL_SCORE: u32 = 75;
pub const DEFAULT_SUMMARY: &str = "AI analysis completed successfully.";
const DEFAULT_SECTION: &str = "Summary";
const DEFAULT_ISSUE: &str = "Unspecified issue";
const DEFAULT_IMPROVEMENT: &str = "No improvement text provided.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub section: String,
    pub issue: String,
    pub improvement: String,
    /// 0-100
    pub confidence_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub overall_score: u32,
    pub ats_score: u32,
    pub grammar_score: u32,
    pub clarity_score: u32,
    pub keyword_coverage: u32,
    pub summary: String,
    pub missing_skills: Vec<String>,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JdMatch {
    pub score: u32,
    pub missing_skills: Vec<String>,
}

/// A rewritten fragment. `confidence` is 0.0-1.0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImprovedText {
    pub original: String,
    pub improved: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImprovedExperience {
    pub title: String,
    pub original_description: String,
    pub improved_description: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImprovedResume {
    pub summary: ImprovedText,
    pub skills: Vec<ImprovedText>,
    pub experience: Vec<ImprovedExperience>,
    pub education: Vec<ImprovedText>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeImprovement {
    pub analysis: Analysis,
    pub jd_match: JdMatch,
    pub improved_resume: ImprovedResume,
    pub improved_merged: String,
}

// analysis
const OVERALL: &[NumericKey] = &[
    percent_key(&["analysis", "overall_score"]),
    percent_key(&["analysis", "overallScore"]),
    percent_key(&["overallScore"]),
    percent_key(&["Overall_Score"]),
    percent_key(&["overall_score"]),
];
const ATS: &[NumericKey] = &[
    percent_key(&["analysis", "ats_score"]),
    percent_key(&["analysis", "atsScore"]),
    percent_key(&["ATS_Score"]),
    percent_key(&["atsScore"]),
];
const GRAMMAR: &[NumericKey] = &[
    percent_key(&["analysis", "grammar_score"]),
    percent_key(&["analysis", "grammarScore"]),
    percent_key(&["Grammar_Score"]),
    percent_key(&["grammarScore"]),
];
const CLARITY: &[NumericKey] = &[
    percent_key(&["analysis", "clarity_score"]),
    percent_key(&["analysis", "clarityScore"]),
    percent_key(&["Clarity_Score"]),
    percent_key(&["clarityScore"]),
];
const KEYWORD_COVERAGE: &[NumericKey] = &[
    percent_key(&["analysis", "keyword_coverage"]),
    percent_key(&["analysis", "keywordCoverage"]),
    percent_key(&["Keyword_Match_Percentage"]),
    percent_key(&["keywordCoverage"]),
];
const SUMMARY: &[KeyPath] = &[
    &["analysis", "summary"],
    &["JD_Fit_Summary"],
    &["analysis", "jdFitSummary"],
    &["summary"],
];
const MISSING_SKILLS: &[KeyPath] = &[
    &["analysis", "missing_skills"],
    &["analysis", "missingSkills"],
    &["Missing_Keywords"],
    &["missingKeywords"],
    &["jdMatch", "missingSkills"],
];
const RECOMMENDATIONS: &[KeyPath] = &[
    &["analysis", "recommendations"],
    &["Improvement_Recommendations"],
    &["recommendations"],
    &["improvementRecommendations"],
];
const REC_SECTION: &[KeyPath] = &[&["section"], &["Section"], &["field"]];
const REC_ISSUE: &[KeyPath] = &[&["issue"], &["Issue"], &["reason"], &["current"]];
const REC_IMPROVEMENT: &[KeyPath] = &[
    &["improvement"],
    &["AI_Suggestion"],
    &["fix"],
    &["improved"],
    &["suggestion"],
];
const REC_CONFIDENCE: &[NumericKey] = &[
    percent_key(&["confidence_score"]),
    percent_key(&["confidenceScore"]),
    fraction_key(&["Confidence"]),
    fraction_key(&["confidence"]),
];

// jd_match
const JD_SCORE: &[NumericKey] = &[
    percent_key(&["jd_match", "score"]),
    percent_key(&["jdMatch", "score"]),
    percent_key(&["JD_Match_Score"]),
    percent_key(&["jdMatchScore"]),
];
const JD_MISSING: &[KeyPath] = &[
    &["jd_match", "missing_skills"],
    &["jdMatch", "missingSkills"],
];

// improved_resume
const IMPROVED_RESUME: &[KeyPath] = &[&["improved_resume"], &["improvedResume"]];
const IMPROVED_SKILLS: &[KeyPath] = &[&["skills"]];
const IMPROVED_EXPERIENCE: &[KeyPath] = &[&["experience"]];
const IMPROVED_EDUCATION: &[KeyPath] = &[&["education"]];
const ORIGINAL: &[KeyPath] = &[&["original"], &["current"]];
const IMPROVED: &[KeyPath] = &[&["improved"], &["rewritten"]];
const FRAGMENT_CONFIDENCE: &[NumericKey] = &[
    fraction_key(&["confidence"]),
    percent_key(&["confidence_score"]),
    percent_key(&["confidenceScore"]),
];
const EXP_TITLE: &[KeyPath] = &[&["title"], &["role"]];
const EXP_ORIGINAL: &[KeyPath] = &[
    &["original_description"],
    &["originalDescription"],
    &["original"],
];
const EXP_IMPROVED: &[KeyPath] = &[
    &["improved_description"],
    &["improvedDescription"],
    &["improved"],
];
const IMPROVED_MERGED: &[KeyPath] = &[
    &["improved_merged"],
    &["improvedMerged"],
    &["Improved_Resume"],
    // Only taken when it is a string; the object form is `improved_resume`.
    &["improvedResume"],
];

impl Recommendation {
    fn normalize(value: &Value) -> Self {
        if let Value::String(s) = value {
            return Self {
                section: DEFAULT_SECTION.to_string(),
                issue: DEFAULT_ISSUE.to_string(),
                improvement: if s.trim().is_empty() {
                    DEFAULT_IMPROVEMENT.to_string()
                } else {
                    s.trim().to_string()
                },
                confidence_score: 0,
            };
        }
        Self {
            section: text(value, REC_SECTION, DEFAULT_SECTION),
            issue: text(value, REC_ISSUE, DEFAULT_ISSUE),
            improvement: text(value, REC_IMPROVEMENT, DEFAULT_IMPROVEMENT),
            confidence_score: percent(value, REC_CONFIDENCE).unwrap_or(0),
        }
    }
}

impl ImprovedText {
    fn normalize(value: &Value) -> Self {
        if let Value::String(s) = value {
            return Self {
                improved: s.trim().to_string(),
                ..Self::default()
            };
        }
        Self {
            original: text(value, ORIGINAL, ""),
            improved: text(value, IMPROVED, ""),
            confidence: round2(fraction(value, FRAGMENT_CONFIDENCE).unwrap_or(0.0)),
        }
    }

    fn is_empty(&self) -> bool {
        self.original.is_empty() && self.improved.is_empty()
    }

    /// The rewritten text, falling back to the original.
    pub fn best(&self) -> &str {
        if self.improved.is_empty() {
            &self.original
        } else {
            &self.improved
        }
    }
}

impl ImprovedExperience {
    fn normalize(value: &Value) -> Self {
        Self {
            title: text(value, EXP_TITLE, ""),
            original_description: text(value, EXP_ORIGINAL, ""),
            improved_description: text(value, EXP_IMPROVED, ""),
            confidence: round2(fraction(value, FRAGMENT_CONFIDENCE).unwrap_or(0.0)),
        }
    }
}

impl ImprovedResume {
    fn normalize(root: &Value) -> Self {
        let Some(resume) = object(root, IMPROVED_RESUME) else {
            return Self::default();
        };
        let fragments = |candidates: &[KeyPath]| -> Vec<ImprovedText> {
            items(resume, candidates)
                .iter()
                .map(ImprovedText::normalize)
                .filter(|t| !t.is_empty())
                .collect()
        };
        Self {
            summary: resume
                .get("summary")
                .map(ImprovedText::normalize)
                .unwrap_or_default(),
            skills: fragments(IMPROVED_SKILLS),
            experience: items(resume, IMPROVED_EXPERIENCE)
                .iter()
                .map(ImprovedExperience::normalize)
                .filter(|e| *e != ImprovedExperience::default())
                .collect(),
            education: fragments(IMPROVED_EDUCATION),
        }
    }

    /// Plain-text resume built from the rewritten fragments.
    pub fn merged_text(&self) -> String {
        let mut parts = Vec::new();
        if !self.summary.improved.is_empty() {
            parts.push(format!("Summary\n{}", self.summary.improved));
        }
        if !self.skills.is_empty() {
            let skills = self
                .skills
                .iter()
                .map(ImprovedText::best)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", ");
            parts.push(format!("Skills\n{skills}"));
        }
        if !self.experience.is_empty() {
            let lines = self
                .experience
                .iter()
                .map(|e| {
                    let description = if e.improved_description.is_empty() {
                        &e.original_description
                    } else {
                        &e.improved_description
                    };
                    if e.title.is_empty() {
                        format!("- {description}")
                    } else {
                        format!("- {}: {description}", e.title)
                    }
                })
                .collect::<Vec<_>>()
                .join("\n");
            parts.push(format!("Experience\n{lines}"));
        }
        if !self.education.is_empty() {
            let lines = self
                .education
                .iter()
                .map(|ed| format!("- {}", ed.best()))
                .collect::<Vec<_>>()
                .join("\n");
            parts.push(format!("Education\n{lines}"));
        }
        parts.join("\n\n")
    }
}

impl ResumeImprovement {
    /// Maps any parsed analysis onto the canonical shape. Never fails.
    pub fn normalize(root: &Value) -> Self {
        let ats = percent(root, ATS);
        let grammar = percent(root, GRAMMAR);
        let clarity = percent(root, CLARITY);
        let keywords = percent(root, KEYWORD_COVERAGE);
        let jd_score = percent(root, JD_SCORE);

        let overall_score = percent(root, OVERALL).unwrap_or_else(|| {
            let present: Vec<u32> = [ats, grammar, clarity, keywords, jd_score]
                .into_iter()
                .flatten()
                .collect();
            if present.is_empty() {
                DEFAULT_OVERALL_SCORE
            } else {
                let sum: u32 = present.iter().sum();
                (f64::from(sum) / present.len() as f64).round() as u32
            }
        });

        let missing_skills = opt_text_list(root, MISSING_SKILLS).unwrap_or_default();

        let analysis = Analysis {
            overall_score,
            ats_score: ats.unwrap_or(0),
            grammar_score: grammar.unwrap_or(0),
            clarity_score: clarity.unwrap_or(0),
            keyword_coverage: keywords.or(jd_score).unwrap_or(0),
            summary: text(root, SUMMARY, DEFAULT_SUMMARY),
            missing_skills: missing_skills.clone(),
            recommendations: items(root, RECOMMENDATIONS)
                .iter()
                .map(Recommendation::normalize)
                .collect(),
        };

        let jd_match = JdMatch {
            score: jd_score.unwrap_or(overall_score),
            missing_skills: opt_text_list(root, JD_MISSING).unwrap_or(missing_skills),
        };

        let improved_resume = ImprovedResume::normalize(root);
        let improved_merged = opt_text(root, IMPROVED_MERGED)
            .unwrap_or_else(|| improved_resume.merged_text());

        Self {
            analysis,
            jd_match,
            improved_resume,
            improved_merged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn evaluator_answer() -> Value {
        json!({
            "JD_Match_Score": 68,
            "ATS_Score": "82",
            "Grammar_Score": 90,
            "Clarity_Score": 74,
            "Keyword_Match_Percentage": "61%",
            "JD_Fit_Summary": "Solid backend profile, light on cloud.",
            "Missing_Keywords": ["AWS", "Terraform"],
            "Improvement_Recommendations": [
                {"Section": "Experience", "Issue": "No metrics", "AI_Suggestion": "Quantify impact", "Confidence": "High"},
                {"Section": "Skills", "Issue": "Outdated", "AI_Suggestion": "Drop jQuery", "Confidence": "low"},
                {"Section": "Summary", "Issue": "Vague", "AI_Suggestion": "Name the stack", "Confidence": "Medium"}
            ],
            "Improved_Resume": "  Jane Doe\nBackend Engineer  "
        })
    }

    #[test]
    fn test_evaluator_shape() {
        let out = ResumeImprovement::normalize(&evaluator_answer());
        let a = &out.analysis;
        assert_eq!(a.ats_score, 82);
        assert_eq!(a.grammar_score, 90);
        assert_eq!(a.clarity_score, 74);
        assert_eq!(a.keyword_coverage, 61);
        // mean of 82, 90, 74, 61, 68
        assert_eq!(a.overall_score, 75);
        assert_eq!(a.summary, "Solid backend profile, light on cloud.");
        assert_eq!(a.missing_skills, vec!["AWS", "Terraform"]);
        assert_eq!(a.recommendations.len(), 3);
        assert_eq!(a.recommendations[0].improvement, "Quantify impact");
        assert_eq!(out.jd_match.score, 68);
        assert_eq!(out.jd_match.missing_skills, vec!["AWS", "Terraform"]);
        assert_eq!(out.improved_merged, "Jane Doe\nBackend Engineer");
    }

    #[test]
    fn test_confidence_labels_keep_order() {
        let out = ResumeImprovement::normalize(&evaluator_answer());
        let scores: Vec<u32> = out
            .analysis
            .recommendations
            .iter()
            .map(|r| r.confidence_score)
            .collect();
        assert_eq!(scores, vec![90, 40, 70]);
    }

    #[test]
    fn test_nested_camel_case_shape() {
        let value = json!({
            "analysis": {"summary": "Good match", "overallScore": 81},
            "jdMatch": {"score": 77, "missingSkills": ["Kafka"]},
            "improvedResume": {
                "summary": {"original": "Dev", "improved": "Backend engineer", "confidence": 0.85},
                "skills": [{"original": "js", "improved": "JavaScript", "confidence": 0.9}, {}],
                "experience": [{"title": "SWE", "originalDescription": "did stuff", "improvedDescription": "Shipped payments API", "confidence": 85}],
                "education": [{"original": "BS CS", "improved": "", "confidence": 0.4}]
            },
            "recommendations": [{"field": "Projects", "issue": "Missing", "fix": "Add one", "confidence": 0.6}]
        });
        let out = ResumeImprovement::normalize(&value);
        assert_eq!(out.analysis.overall_score, 81);
        assert_eq!(out.analysis.ats_score, 0);
        assert_eq!(out.analysis.keyword_coverage, 77);
        assert_eq!(out.analysis.missing_skills, vec!["Kafka"]);
        assert_eq!(out.analysis.recommendations[0].section, "Projects");
        assert_eq!(out.analysis.recommendations[0].confidence_score, 60);
        assert_eq!(out.jd_match.score, 77);
        let improved = &out.improved_resume;
        assert_eq!(improved.summary.confidence, 0.85);
        assert_eq!(improved.skills.len(), 1);
        assert_eq!(improved.experience[0].confidence, 0.85);
        assert_eq!(
            out.improved_merged,
            "Summary\nBackend engineer\n\nSkills\nJavaScript\n\nExperience\n- SWE: Shipped payments API\n\nEducation\n- BS CS"
        );
    }

    #[test]
    fn test_strict_retry_shape() {
        let value = json!({
            "summary": "Needs work",
            "overallScore": 58,
            "recommendations": [
                {"section": "Experience", "current": "Worked on apps", "improved": "Built 3 Android apps", "confidence": 0.7, "reason": "Weak verb"}
            ],
            "improvedResume": "Full rewritten resume"
        });
        let out = ResumeImprovement::normalize(&value);
        assert_eq!(out.analysis.overall_score, 58);
        assert_eq!(out.analysis.summary, "Needs work");
        let rec = &out.analysis.recommendations[0];
        assert_eq!(rec.issue, "Weak verb");
        assert_eq!(rec.improvement, "Built 3 Android apps");
        assert_eq!(rec.confidence_score, 70);
        assert_eq!(out.jd_match.score, 58);
        assert_eq!(out.improved_resume, ImprovedResume::default());
        assert_eq!(out.improved_merged, "Full rewritten resume");
    }

    #[test]
    fn test_empty_object_is_fully_populated() {
        let out = ResumeImprovement::normalize(&json!({}));
        assert_eq!(out.analysis.overall_score, DEFAULT_OVERALL_SCORE);
        assert_eq!(out.analysis.summary, DEFAULT_SUMMARY);
        assert!(out.analysis.missing_skills.is_empty());
        assert!(out.analysis.recommendations.is_empty());
        assert_eq!(out.jd_match.score, DEFAULT_OVERALL_SCORE);
        assert_eq!(out.improved_merged, "");
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let value = json!({
            "ATS_Score": 140,
            "Grammar_Score": -20,
            "Improvement_Recommendations": [{"Confidence": 250}, "Use action verbs"],
            "improvedResume": {"summary": {"improved": "x", "confidence": 7}}
        });
        let out = ResumeImprovement::normalize(&value);
        assert_eq!(out.analysis.ats_score, 100);
        assert_eq!(out.analysis.grammar_score, 0);
        assert_eq!(out.analysis.overall_score, 50);
        let recs = &out.analysis.recommendations;
        assert_eq!(recs[0].confidence_score, 100);
        assert_eq!(recs[0].section, "Summary");
        assert_eq!(recs[0].improvement, DEFAULT_IMPROVEMENT);
        assert_eq!(recs[1].improvement, "Use action verbs");
        assert_eq!(out.improved_resume.summary.confidence, 0.07);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for value in [
            evaluator_answer(),
            json!({}),
            json!({"analysis": {"overallScore": 12}, "improvedResume": {"skills": ["Rust"]}}),
        ] {
            let once = ResumeImprovement::normalize(&value);
            let twice = ResumeImprovement::normalize(&serde_json::to_value(&once).unwrap());
            assert_eq!(once, twice);
        }
    }
}
