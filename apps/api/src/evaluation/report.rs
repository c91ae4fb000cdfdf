//! Turns a match score and the two keyword sets into the verdict and the short
//! narrative lists shown to the recruiter.

use serde::{Deserialize, Serialize};

use crate::evaluation::keywords::KeywordSet;

pub const HIRE_THRESHOLD: u8 = 75;
pub const HOLD_THRESHOLD: u8 = 50;

const MAX_STRENGTHS: usize = 3;
const MAX_GAPS: usize = 3;
const MAX_SUGGESTIONS: usize = 2;
/// Keywords quoted in a strength or gap sentence.
const TERMS_PER_LINE: usize = 3;
/// Keywords quoted in the suggestion sentence, so it never repeats the gap line verbatim.
const TERMS_PER_SUGGESTION: usize = 2;

/// Hiring recommendation derived from the match score alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Hire,
    Hold,
    Reject,
}

impl Verdict {
    /// score ≥ 75 → Hire, 50..75 → Hold, below 50 → Reject.
    pub fn from_score(score: u8) -> Self {
        if score >= HIRE_THRESHOLD {
            Verdict::Hire
        } else if score >= HOLD_THRESHOLD {
            Verdict::Hold
        } else {
            Verdict::Reject
        }
    }
}

/// Everything in an evaluation result except the score itself.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub verdict: Verdict,
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
    pub reasons_for: Vec<String>,
    pub reasons_against: Vec<String>,
    pub improvement_suggestions: Vec<String>,
}

/// Builds the report. Overlap and gap terms are quoted in the job description's rank
/// order, so the most frequent job terms come first.
pub fn generate_report(score: u8, job_keywords: &KeywordSet, resume_keywords: &KeywordSet) -> Report {
    let verdict = Verdict::from_score(score);
    let overlap = job_keywords.shared_with(resume_keywords);
    let missing = job_keywords.missing_from(resume_keywords);

    let reasons_for = build_reasons_for(verdict, score, overlap.len(), job_keywords.len());
    let reasons_against = build_reasons_against(verdict, &missing);

    Report {
        verdict,
        strengths: build_strengths(verdict, score, &overlap),
        gaps: build_gaps(&missing),
        reasons_for,
        reasons_against,
        improvement_suggestions: build_suggestions(&missing),
    }
}

fn top_terms(terms: &[&str], count: usize) -> String {
    terms
        .iter()
        .take(count)
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

fn build_strengths(verdict: Verdict, score: u8, overlap: &[&str]) -> Vec<String> {
    let mut strengths = Vec::new();
    if !overlap.is_empty() {
        strengths.push(format!(
            "Strong alignment with required skills: {}",
            top_terms(overlap, TERMS_PER_LINE)
        ));
    }
    let fit = match verdict {
        Verdict::Hire => "indicates strong potential fit",
        Verdict::Hold => "indicates good potential fit",
        Verdict::Reject => "shows some common ground with the role",
    };
    strengths.push(format!("Overall semantic similarity score of {score}% {fit}"));
    strengths.push("Resume demonstrates relevant experience matching job requirements".to_string());
    strengths.truncate(MAX_STRENGTHS);
    strengths
}

fn build_gaps(missing: &[&str]) -> Vec<String> {
    let mut gaps = Vec::new();
    if !missing.is_empty() {
        gaps.push(format!(
            "Missing key skills or keywords: {}",
            top_terms(missing, TERMS_PER_LINE)
        ));
    }
    gaps.push("Some job requirements may not be explicitly addressed in the resume".to_string());
    gaps.push("Could benefit from more specific examples or quantifiable achievements".to_string());
    gaps.truncate(MAX_GAPS);
    gaps
}

fn build_suggestions(missing: &[&str]) -> Vec<String> {
    let mut suggestions = Vec::new();
    if !missing.is_empty() {
        suggestions.push(format!(
            "Add experience or certifications related to: {}",
            top_terms(missing, TERMS_PER_SUGGESTION)
        ));
    }
    suggestions.push(
        "Include more quantifiable achievements and specific examples of relevant work".to_string(),
    );
    suggestions.truncate(MAX_SUGGESTIONS);
    suggestions
}

fn build_reasons_for(verdict: Verdict, score: u8, shared: usize, total: usize) -> Vec<String> {
    let score_line = match verdict {
        Verdict::Hire => format!("High match score of {score}% demonstrates strong alignment"),
        Verdict::Hold => format!("Moderate match score of {score}% shows potential fit"),
        Verdict::Reject => format!(
            "Match score of {score}% is low, but the candidate may have transferable skills not immediately obvious"
        ),
    };
    let ratio = if total == 0 {
        0
    } else {
        (shared as f32 / total as f32 * 100.0).round() as u32
    };
    vec![
        score_line,
        format!("Resume covers {shared} of {total} key job terms ({ratio}%)"),
    ]
}

fn build_reasons_against(verdict: Verdict, missing: &[&str]) -> Vec<String> {
    let gap_line = if missing.is_empty() {
        "All key job terms appear in the resume, but claimed experience should be verified in interview"
            .to_string()
    } else {
        format!("Job terms not evidenced in the resume: {}", top_terms(missing, TERMS_PER_LINE))
    };
    let caution = match verdict {
        Verdict::Hire => "Consider conducting a technical assessment to validate claimed skills",
        Verdict::Hold => "Several key requirements are not clearly demonstrated and may need training",
        Verdict::Reject => "Resume does not demonstrate the required qualifications for this position",
    };
    vec![gap_line, caution.to_string()]
}
