use std::collections::BTreeMap;

use crate::dataset::{SurveyDataset, SurveyResponse};
use crate::metrics::gpa::gpa_equivalent;
use crate::metrics::types::{GroupPerformance, OverallPerformance, PerformanceMetrics};
use crate::metrics::utility::{group_values, mean, present, round_to, sample_stddev};

/// GPA equivalent of a single response, from the mean of its answered questions.
pub fn response_gpa(response: &SurveyResponse) -> Option<f64> {
    let answered: Vec<f64> = response.answered().collect();
    mean(&answered).map(gpa_equivalent)
}

impl PerformanceMetrics {
    /// GPA-equivalent summaries overall, per college, and per course section.
    pub fn compute(dataset: &SurveyDataset) -> Self {
        let gpas: Vec<Option<f64>> = dataset.responses().iter().map(response_gpa).collect();
        let all = present(gpas.iter().copied());

        let by = |key: fn(&SurveyResponse) -> Option<&str>| {
            let rows = dataset.responses().iter().map(key).zip(gpas.iter().copied());
            summarize(group_values(rows))
        };

        PerformanceMetrics {
            overall: OverallPerformance {
                mean_gpa: mean(&all),
                std_gpa: sample_stddev(&all),
            },
            college_performance: by(|r| r.college.as_deref()),
            course_performance: by(|r| r.group_code.as_deref()),
        }
    }
}

fn summarize(groups: BTreeMap<String, Vec<f64>>) -> BTreeMap<String, GroupPerformance> {
    groups
        .into_iter()
        .map(|(key, series)| {
            let stats = GroupPerformance {
                mean: mean(&series).map(|v| round_to(v, 3)),
                std: sample_stddev(&series).map(|v| round_to(v, 3)),
                count: series.len(),
            };
            (key, stats)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::fixtures::{approx, sample_dataset};

    #[test]
    fn test_response_gpa_skips_unanswered() {
        let response = SurveyResponse {
            scores: [Some(5.0), None, Some(3.0), None, None, None, None],
            ..Default::default()
        };
        approx(response_gpa(&response), 3.6);
        assert_eq!(response_gpa(&SurveyResponse::default()), None);
    }

    #[test]
    fn test_overall_gpa() {
        let m = PerformanceMetrics::compute(&sample_dataset());

        approx(m.overall.mean_gpa, 3.15);
        approx(m.overall.std_gpa, 1.35f64.sqrt());
    }

    #[test]
    fn test_college_performance() {
        let m = PerformanceMetrics::compute(&sample_dataset());

        let a = &m.college_performance["A"];
        approx(a.mean, 3.6);
        approx(a.std, 0.9);
        assert_eq!(a.count, 3);

        let b = &m.college_performance["B"];
        approx(b.mean, 1.8);
        assert_eq!(b.std, None);
        assert_eq!(b.count, 1);
    }

    #[test]
    fn test_course_performance_keyed_by_group_code() {
        let m = PerformanceMetrics::compute(&sample_dataset());

        assert_eq!(
            m.course_performance.keys().collect::<Vec<_>>(),
            vec!["G1", "G2", "G3"]
        );
        let g1 = &m.course_performance["G1"];
        approx(g1.mean, 4.05);
        approx(g1.std, 0.636);
        assert_eq!(g1.count, 2);
    }
}
