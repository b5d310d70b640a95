use chrono::{DateTime, Utc};

use crate::improvement::schema::Analysis;

/// Renders one stored analysis as a markdown report.
pub fn render_report_md(analysis: &Analysis, created_at: DateTime<Utc>) -> String {
    let mut md = String::from("# PrepMate - Resume Analysis Report\n\n");
    md.push_str(&format!(
        "_Date: {}_\n\n",
        created_at.format("%Y-%m-%d %H:%M UTC")
    ));

    md.push_str("## Scores\n\n");
    md.push_str(&format!("- **Overall:** {}\n", analysis.overall_score));
    md.push_str(&format!("- **ATS:** {}\n", analysis.ats_score));
    md.push_str(&format!("- **Grammar:** {}\n", analysis.grammar_score));
    md.push_str(&format!("- **Clarity:** {}\n", analysis.clarity_score));
    md.push_str(&format!(
        "- **Keyword Coverage:** {}\n\n",
        analysis.keyword_coverage
    ));

    md.push_str("## Summary\n\n");
    md.push_str(&analysis.summary);
    md.push_str("\n\n");

    md.push_str("## Missing Skills\n\n");
    if analysis.missing_skills.is_empty() {
        md.push_str("-\n\n");
    } else {
        md.push_str(&analysis.missing_skills.join(", "));
        md.push_str("\n\n");
    }

    md.push_str("## Recommendations\n\n");
    for (i, r) in analysis.recommendations.iter().enumerate() {
        md.push_str(&format!(
            "{}. **[{}]** {} (Confidence: {}%)\n",
            i + 1,
            r.section,
            r.improvement,
            r.confidence_score
        ));
        md.push_str(&format!("   - Issue: {}\n", r.issue));
    }
    md.push_str("\n---\nGenerated by PrepMate via Gemini\n");
    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::improvement::schema::ResumeImprovement;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_report_sections() {
        let improvement = ResumeImprovement::normalize(&json!({
            "ATS_Score": 80,
            "JD_Fit_Summary": "Strong fit.",
            "Missing_Keywords": ["AWS"],
            "Improvement_Recommendations": [
                {"Section": "Experience", "Issue": "No metrics", "AI_Suggestion": "Add numbers", "Confidence": "high"}
            ]
        }));
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let md = render_report_md(&improvement.analysis, at);
        assert!(md.starts_with("# PrepMate - Resume Analysis Report"));
        assert!(md.contains("_Date: 2024-03-01 09:30 UTC_"));
        assert!(md.contains("- **ATS:** 80\n"));
        assert!(md.contains("## Summary\n\nStrong fit."));
        assert!(md.contains("## Missing Skills\n\nAWS"));
        assert!(md.contains("1. **[Experience]** Add numbers (Confidence: 90%)\n   - Issue: No metrics"));
    }

    #[test]
    fn test_report_without_missing_skills() {
        let improvement = ResumeImprovement::normalize(&json!({}));
        let md = render_report_md(&improvement.analysis, Utc::now());
        assert!(md.contains("## Missing Skills\n\n-\n"));
    }
}
