use std::collections::BTreeSet;

use crate::dataset::{SurveyDataset, SurveyResponse};
use crate::metrics::gpa::{GPA_MAX, SURVEY_MAX};
use crate::metrics::types::{DemographicMetrics, EvaluationMetrics, PerformanceMetrics};

/// Renders the plain-text summary report.
pub fn summary_report(
    dataset: &SurveyDataset,
    evaluation: &EvaluationMetrics,
    performance: &PerformanceMetrics,
    demographic: &DemographicMetrics,
) -> String {
    let distinct = |key: fn(&SurveyResponse) -> Option<&str>| {
        dataset
            .responses()
            .iter()
            .filter_map(key)
            .collect::<BTreeSet<_>>()
            .len()
    };

    let mut lines = vec![
        "Summary Report".to_string(),
        "===============".to_string(),
        format!("Total Students: {}", dataset.len()),
        format!(
            "Unique Courses: {}",
            distinct(|r| r.course_code.as_deref())
        ),
        format!(
            "Course Sections: {}",
            distinct(|r| r.group_code.as_deref())
        ),
        format!(
            "Overall Satisfaction: {}/{}",
            two_digits(evaluation.overall.mean),
            SURVEY_MAX
        ),
        format!(
            "Average GPA Equivalent: {}/{}",
            two_digits(performance.overall.mean_gpa),
            GPA_MAX
        ),
        "\nCollege Distribution".to_string(),
        "-------------------".to_string(),
    ];

    for (college, dist) in &demographic.college_distribution {
        lines.push(format!("{college}: {} sections", dist.section_count));
    }

    lines.join("\n")
}

fn two_digits(value: Option<f64>) -> String {
    value.map_or_else(|| "nan".to_string(), |v| format!("{v:.2}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::fixtures::sample_dataset;

    #[test]
    fn test_summary_report_layout() {
        let ds = sample_dataset();
        let report = summary_report(
            &ds,
            &EvaluationMetrics::compute(&ds),
            &PerformanceMetrics::compute(&ds),
            &DemographicMetrics::compute(&ds),
        );
        let lines: Vec<_> = report.lines().collect();

        assert_eq!(lines[0], "Summary Report");
        assert_eq!(lines[2], "Total Students: 4");
        assert_eq!(lines[3], "Unique Courses: 3");
        assert_eq!(lines[4], "Course Sections: 3");
        assert_eq!(lines[5], "Overall Satisfaction: 3.57/5");
        assert!(lines[6].starts_with("Average GPA Equivalent: "));
        assert!(lines[6].ends_with("/4.5"));
        assert_eq!(lines[7], "");
        assert_eq!(lines[8], "College Distribution");
        assert_eq!(&lines[10..], ["A: 2 sections", "B: 1 sections"]);
        assert!(!report.ends_with('\n'));
    }

    #[test]
    fn test_summary_report_empty_dataset() {
        let ds = SurveyDataset::default();
        let report = summary_report(
            &ds,
            &EvaluationMetrics::compute(&ds),
            &PerformanceMetrics::compute(&ds),
            &DemographicMetrics::compute(&ds),
        );

        assert!(report.contains("Total Students: 0"));
        assert!(report.contains("Overall Satisfaction: nan/5"));
    }
}
