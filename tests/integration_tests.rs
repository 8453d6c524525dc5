use std::fs;
use std::path::Path;

use survey_report::dataset::{DatasetError, SurveyDataset};
use survey_report::metrics::{self, MetricsCalculator};
use survey_report::pages::{PageConfig, PageGenerator};
use tempfile::tempdir;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

#[test]
fn test_full_metrics_pipeline() {
    let dataset = SurveyDataset::load(fixture("survey_sample.csv")).expect("Failed to load survey");
    assert_eq!(dataset.len(), 8);
    assert!(dataset.has_department());

    let dir = tempdir().unwrap();
    let out = dir.path().join("computed_metrics");
    let calculator = MetricsCalculator::new(dataset);
    let written = calculator.write_all(&out).unwrap();

    assert_eq!(written.len(), metrics::output_layout().len());
    for name in metrics::output_layout() {
        assert!(out.join(&name).is_file(), "{name} was not written");
    }

    let summary = fs::read_to_string(out.join(metrics::SUMMARY_REPORT)).unwrap();
    assert!(summary.contains("Total Students: 8"));
    assert!(summary.contains("Unique Courses: 5"));
    assert!(summary.contains("Course Sections: 6"));
    assert!(summary.contains("Arts: 3 sections"));
    assert!(summary.contains("Engineering: 2 sections"));

    let campus = fs::read_to_string(out.join(metrics::DEMOGRAPHICS_CAMPUS)).unwrap();
    assert_eq!(campus, "Metric,Value\nHumanities,5\nSciences,3\n");
}

#[test]
fn test_missing_required_column_fails() {
    let err = SurveyDataset::load(fixture("survey_missing_columns.csv")).unwrap_err();

    match err {
        DatasetError::MissingColumns(cols) => {
            assert_eq!(cols, vec!["Campus", "CourseName"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_department_degrades() {
    let dataset = SurveyDataset::load(fixture("survey_no_department.csv")).unwrap();
    assert!(!dataset.has_department());

    let dir = tempdir().unwrap();
    let calculator = MetricsCalculator::new(dataset);
    calculator.write_all(dir.path()).unwrap();

    let scores =
        fs::read_to_string(dir.path().join(metrics::average_scores_file("Survey1"))).unwrap();
    assert!(!scores.contains("department,"));
    assert!(scores.contains("college,Arts,5.0"));
}

#[test]
fn test_pages_from_partial_metadata() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("output_pages");
    let templates = Path::new(env!("CARGO_MANIFEST_DIR")).join("templates");

    let generator = PageGenerator::new(
        fixture("output_metadata"),
        templates,
        &out,
        PageConfig::default(),
    );
    let report = generator.run().unwrap();

    assert_eq!(report.loaded, vec!["core_metrics", "detailed_stats"]);
    assert_eq!(report.failed.len(), 3);
    assert_eq!(report.written.len(), 2);

    let demographics = fs::read_to_string(out.join("demographics.html")).unwrap();
    assert!(demographics.contains("<h1>Demographics Analysis</h1>"));
    assert!(demographics.contains("<th>College</th><th>Sections</th>"));
    assert!(demographics.contains("<td>Engineering</td>"));

    let evaluation = fs::read_to_string(out.join("evaluation.html")).unwrap();
    assert!(evaluation.contains("<td>Survey3</td><td>3.71</td>"));
}
