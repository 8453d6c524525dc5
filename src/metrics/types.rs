//! Data types produced by the metrics pipeline.
//!
//! Every map is keyed by a group or question name and ordered by key.
//! Missing statistics (empty groups, single-value deviations) are `None`.

use serde::Serialize;
use std::collections::BTreeMap;

/// Group name to (rounded) mean score.
pub type GroupScores = BTreeMap<String, Option<f64>>;

/// Dataset-wide satisfaction figures.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverallEvaluation {
    pub mean: Option<f64>,
    pub response_rate: Option<f64>,
}

/// Statistics for a single survey question.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuestionStats {
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std: Option<f64>,
    pub response_rate: Option<f64>,
}

/// Share of answers (in percent) falling in each score band.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreDistribution {
    pub high: Option<f64>,
    pub medium: Option<f64>,
    pub low: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EvaluationMetrics {
    pub overall: OverallEvaluation,
    pub per_question: BTreeMap<String, QuestionStats>,
    pub score_distribution: ScoreDistribution,
    /// College to question to mean score.
    pub college_scores: BTreeMap<String, GroupScores>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverallPerformance {
    pub mean_gpa: Option<f64>,
    pub std_gpa: Option<f64>,
}

/// GPA-equivalent summary for one group.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupPerformance {
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub count: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PerformanceMetrics {
    pub overall: OverallPerformance,
    pub college_performance: BTreeMap<String, GroupPerformance>,
    /// Keyed by course section (GroupCode).
    pub course_performance: BTreeMap<String, GroupPerformance>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CollegeDistribution {
    pub section_count: usize,
    pub course_count: usize,
}

/// Descriptive statistics of the number of responses per course section.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CourseSize {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    #[serde(rename = "25%")]
    pub p25: Option<f64>,
    #[serde(rename = "50%")]
    pub p50: Option<f64>,
    #[serde(rename = "75%")]
    pub p75: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DemographicMetrics {
    pub college_distribution: BTreeMap<String, CollegeDistribution>,
    pub campus_distribution: BTreeMap<String, usize>,
    pub course_size: CourseSize,
}

/// Per-question mean scores broken down by each grouping dimension.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AverageScores {
    pub by_department: GroupScores,
    pub by_college: GroupScores,
    pub by_campus: GroupScores,
}

/// One entry of a top-N ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedGroup {
    pub key: String,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub frequency: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AdditionalMetrics {
    pub average_scores: BTreeMap<String, AverageScores>,
    pub top_10_colleges: BTreeMap<String, Vec<RankedGroup>>,
    /// Keyed by question, ranked by CourseCode.
    pub top_10_courses: BTreeMap<String, Vec<RankedGroup>>,
    pub course_name_keywords: Vec<KeywordCount>,
}
