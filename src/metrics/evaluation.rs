use std::collections::BTreeMap;

use crate::dataset::{SurveyDataset, survey_columns};
use crate::metrics::types::{
    EvaluationMetrics, GroupScores, OverallEvaluation, QuestionStats, ScoreDistribution,
};
use crate::metrics::utility::{group_means, mean, median, pct, present, round_to, sample_stddev};

/// Scores at or above this count as high satisfaction.
pub const HIGH_SCORE: f64 = 4.5;
/// Scores below this count as low satisfaction.
pub const LOW_SCORE: f64 = 3.0;

impl EvaluationMetrics {
    /// Per-question statistics, score bands, and per-college means.
    pub fn compute(dataset: &SurveyDataset) -> Self {
        let rows = dataset.len();

        let mut per_question = BTreeMap::new();
        let mut question_means = Vec::new();
        let mut response_rates = Vec::new();
        let mut high = Vec::new();
        let mut medium = Vec::new();
        let mut low = Vec::new();
        let mut college_scores: BTreeMap<String, GroupScores> = BTreeMap::new();

        for (q, column) in survey_columns().enumerate() {
            let values = present(dataset.question(q));
            let question_mean = mean(&values);
            let response_rate = pct(values.len(), rows);

            question_means.extend(question_mean);
            response_rates.extend(response_rate);

            // Shares are taken over every row, so unanswered questions dilute them.
            let band = |f: fn(f64) -> bool| pct(values.iter().filter(|v| f(**v)).count(), rows);
            high.extend(band(|v| v >= HIGH_SCORE));
            medium.extend(band(|v| (LOW_SCORE..HIGH_SCORE).contains(&v)));
            low.extend(band(|v| v < LOW_SCORE));

            let by_college = group_means(
                dataset
                    .responses()
                    .iter()
                    .map(|r| (r.college.as_deref(), r.scores[q])),
                2,
            );
            for (college, score) in by_college {
                college_scores
                    .entry(college)
                    .or_default()
                    .insert(column.clone(), score);
            }

            per_question.insert(
                column,
                QuestionStats {
                    mean: question_mean,
                    median: median(&values),
                    std: sample_stddev(&values),
                    response_rate: response_rate.map(|r| round_to(r, 2)),
                },
            );
        }

        EvaluationMetrics {
            overall: OverallEvaluation {
                mean: mean(&question_means),
                response_rate: mean(&response_rates).map(|r| round_to(r, 2)),
            },
            per_question,
            score_distribution: ScoreDistribution {
                high: mean(&high),
                medium: mean(&medium),
                low: mean(&low),
            },
            college_scores,
        }
    }
}
