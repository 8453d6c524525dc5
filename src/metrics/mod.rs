//! Survey metrics calculation.
//!
//! This module groups responses by college, campus, course section, course
//! code, and department, computes means, spreads, rankings, and distributions
//! for every survey question, and writes them to a fixed set of CSV files plus
//! a text summary report.

pub mod additional;
pub mod demographic;
pub mod evaluation;
pub mod gpa;
pub mod performance;
pub mod summary;
pub mod types;
pub mod utility;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::dataset::{COLLEGE, COURSE_CODE, GROUP_CODE, SurveyDataset, survey_columns};
use crate::output::{cell, write_key_values, write_table, write_text};
use types::{
    AdditionalMetrics, DemographicMetrics, EvaluationMetrics, GroupPerformance,
    PerformanceMetrics, RankedGroup,
};

pub const EVALUATION_PER_QUESTION: &str = "evaluation_per_question.csv";
pub const EVALUATION_DISTRIBUTION: &str = "evaluation_distribution.csv";
pub const EVALUATION_BY_COLLEGE: &str = "evaluation_by_college.csv";
pub const PERFORMANCE_OVERALL: &str = "performance_overall.csv";
pub const PERFORMANCE_BY_COLLEGE: &str = "performance_by_college.csv";
pub const PERFORMANCE_BY_COURSE: &str = "performance_by_course.csv";
pub const DEMOGRAPHICS_COLLEGE: &str = "demographics_college.csv";
pub const DEMOGRAPHICS_CAMPUS: &str = "demographics_campus.csv";
pub const DEMOGRAPHICS_COURSE_SIZE: &str = "demographics_course_size.csv";
pub const COURSE_NAME_KEYWORDS: &str = "course_name_keywords.csv";
pub const SUMMARY_REPORT: &str = "summary_report.txt";

/// Computes every metric category over one immutable dataset.
pub struct MetricsCalculator {
    dataset: SurveyDataset,
}

impl MetricsCalculator {
    pub fn new(dataset: SurveyDataset) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &SurveyDataset {
        &self.dataset
    }

    pub fn evaluation(&self) -> EvaluationMetrics {
        EvaluationMetrics::compute(&self.dataset)
    }

    pub fn performance(&self) -> PerformanceMetrics {
        PerformanceMetrics::compute(&self.dataset)
    }

    pub fn demographic(&self) -> DemographicMetrics {
        DemographicMetrics::compute(&self.dataset)
    }

    pub fn additional(&self) -> AdditionalMetrics {
        AdditionalMetrics::compute(&self.dataset)
    }

    pub fn summary(&self) -> String {
        summary::summary_report(
            &self.dataset,
            &self.evaluation(),
            &self.performance(),
            &self.demographic(),
        )
    }

    /// Computes all metrics and writes them into `output_dir`, creating it if
    /// needed. Returns the paths written, in write order.
    #[tracing::instrument(skip_all, fields(output_dir = %output_dir.display(), rows = self.dataset.len()))]
    pub fn write_all(&self, output_dir: &Path) -> Result<Vec<PathBuf>> {
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("failed to create {}", output_dir.display()))?;

        let evaluation = self.evaluation();
        let performance = self.performance();
        let demographic = self.demographic();
        let additional = self.additional();

        let mut written = Vec::new();
        let mut target = |name: &str| {
            let path = output_dir.join(name);
            written.push(path.clone());
            path
        };

        write_evaluation(&evaluation, &mut target)?;
        info!("Saved evaluation metrics");

        write_performance(&performance, &mut target)?;
        info!("Saved performance metrics");

        write_demographic(&demographic, &mut target)?;
        info!("Saved demographic metrics");

        write_additional(&additional, &mut target)?;
        info!("Saved additional metrics");

        let report = summary::summary_report(&self.dataset, &evaluation, &performance, &demographic);
        let path = target(SUMMARY_REPORT);
        write_text(&path, &report)?;
        info!(path = %path.display(), "Saved summary report");

        info!(files = written.len(), "All metrics have been calculated and saved");
        Ok(written)
    }
}

fn write_evaluation(m: &EvaluationMetrics, target: &mut impl FnMut(&str) -> PathBuf) -> Result<()> {
    let rows = m.per_question.iter().map(|(question, s)| {
        vec![
            question.clone(),
            cell(s.mean),
            cell(s.median),
            cell(s.std),
            cell(s.response_rate),
        ]
    });
    write_table(
        target(EVALUATION_PER_QUESTION),
        &["Question", "mean", "median", "std", "response_rate"],
        rows,
    )?;

    let d = &m.score_distribution;
    write_key_values(
        target(EVALUATION_DISTRIBUTION),
        [
            ("high", cell(d.high)),
            ("medium", cell(d.medium)),
            ("low", cell(d.low)),
        ],
    )?;

    let questions: Vec<String> = survey_columns().collect();
    let mut headers = vec![COLLEGE];
    headers.extend(questions.iter().map(String::as_str));
    let rows = m.college_scores.iter().map(|(college, scores)| {
        let mut row = vec![college.clone()];
        row.extend(questions.iter().map(|q| cell(scores.get(q).copied().flatten())));
        row
    });
    write_table(target(EVALUATION_BY_COLLEGE), &headers, rows)
}

fn write_performance(
    m: &PerformanceMetrics,
    target: &mut impl FnMut(&str) -> PathBuf,
) -> Result<()> {
    write_key_values(
        target(PERFORMANCE_OVERALL),
        [
            ("mean_gpa", cell(m.overall.mean_gpa)),
            ("std_gpa", cell(m.overall.std_gpa)),
        ],
    )?;

    let rows = |groups: &BTreeMap<String, GroupPerformance>| {
        groups
            .iter()
            .map(|(key, g)| vec![key.clone(), cell(g.mean), cell(g.std), g.count.to_string()])
            .collect::<Vec<_>>()
    };
    write_table(
        target(PERFORMANCE_BY_COLLEGE),
        &[COLLEGE, "mean", "std", "count"],
        rows(&m.college_performance),
    )?;
    write_table(
        target(PERFORMANCE_BY_COURSE),
        &[GROUP_CODE, "mean", "std", "count"],
        rows(&m.course_performance),
    )
}

fn write_demographic(
    m: &DemographicMetrics,
    target: &mut impl FnMut(&str) -> PathBuf,
) -> Result<()> {
    let rows = m.college_distribution.iter().map(|(college, d)| {
        vec![
            college.clone(),
            d.section_count.to_string(),
            d.course_count.to_string(),
        ]
    });
    write_table(
        target(DEMOGRAPHICS_COLLEGE),
        &[COLLEGE, "section_count", "course_count"],
        rows,
    )?;

    write_key_values(
        target(DEMOGRAPHICS_CAMPUS),
        m.campus_distribution
            .iter()
            .map(|(campus, n)| (campus, n.to_string())),
    )?;

    let s = &m.course_size;
    write_key_values(
        target(DEMOGRAPHICS_COURSE_SIZE),
        [
            ("count", cell(Some(s.count as f64))),
            ("mean", cell(s.mean)),
            ("std", cell(s.std)),
            ("min", cell(s.min)),
            ("25%", cell(s.p25)),
            ("50%", cell(s.p50)),
            ("75%", cell(s.p75)),
            ("max", cell(s.max)),
        ],
    )
}

fn write_additional(
    m: &AdditionalMetrics,
    target: &mut impl FnMut(&str) -> PathBuf,
) -> Result<()> {
    for (question, scores) in &m.average_scores {
        let dimensions = [
            ("department", &scores.by_department),
            ("college", &scores.by_college),
            ("campus", &scores.by_campus),
        ];
        let rows = dimensions.iter().flat_map(|(dimension, groups)| {
            groups
                .iter()
                .map(move |(group, mean)| vec![dimension.to_string(), group.clone(), cell(*mean)])
        });
        write_table(
            target(&average_scores_file(question)),
            &["Dimension", "Group", "Mean"],
            rows,
        )?;
    }

    let ranking_rows = |ranked: &[RankedGroup]| {
        ranked
            .iter()
            .map(|g| vec![g.key.clone(), cell(g.score)])
            .collect::<Vec<_>>()
    };
    for (question, ranked) in &m.top_10_colleges {
        write_table(
            target(&top_colleges_file(question)),
            &[COLLEGE, "Score"],
            ranking_rows(ranked),
        )?;
    }
    for (question, ranked) in &m.top_10_courses {
        write_table(
            target(&top_courses_file(question)),
            &[COURSE_CODE, "Score"],
            ranking_rows(ranked),
        )?;
    }

    let rows = m
        .course_name_keywords
        .iter()
        .map(|k| vec![k.keyword.clone(), k.frequency.to_string()]);
    write_table(target(COURSE_NAME_KEYWORDS), &["Keyword", "Frequency"], rows)
}

pub fn average_scores_file(question: &str) -> String {
    format!("average_scores_{question}.csv")
}

pub fn top_colleges_file(question: &str) -> String {
    format!("top_10_colleges_{question}.csv")
}

pub fn top_courses_file(question: &str) -> String {
    format!("top_10_courses_{question}.csv")
}

/// Every file name `write_all` produces, in write order.
pub fn output_layout() -> Vec<String> {
    let questions: Vec<String> = survey_columns().collect();
    let mut files: Vec<String> = [
        EVALUATION_PER_QUESTION,
        EVALUATION_DISTRIBUTION,
        EVALUATION_BY_COLLEGE,
        PERFORMANCE_OVERALL,
        PERFORMANCE_BY_COLLEGE,
        PERFORMANCE_BY_COURSE,
        DEMOGRAPHICS_COLLEGE,
        DEMOGRAPHICS_CAMPUS,
        DEMOGRAPHICS_COURSE_SIZE,
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    files.extend(questions.iter().map(|q| average_scores_file(q)));
    files.extend(questions.iter().map(|q| top_colleges_file(q)));
    files.extend(questions.iter().map(|q| top_courses_file(q)));
    files.push(COURSE_NAME_KEYWORDS.to_string());
    files.push(SUMMARY_REPORT.to_string());
    files
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::dataset::{SurveyDataset, SurveyResponse};

    pub fn approx(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("expected a value");
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn response(
        scores: [Option<f64>; 7],
        college: &str,
        campus: &str,
        group: &str,
        course: &str,
        name: &str,
        department: &str,
    ) -> SurveyResponse {
        SurveyResponse {
            scores,
            college: Some(college.into()),
            campus: Some(campus.into()),
            group_code: Some(group.into()),
            course_code: Some(course.into()),
            course_name: Some(name.into()),
            department: Some(department.into()),
        }
    }

    /// Four responses across two colleges, two campuses and three sections.
    /// The last response leaves Survey2 unanswered.
    pub fn sample_dataset() -> SurveyDataset {
        let mut last = [Some(2.0); 7];
        last[1] = None;

        SurveyDataset::new(
            vec![
                response([Some(5.0); 7], "A", "North", "G1", "C1", "Intro Art", "X"),
                response([Some(4.0); 7], "A", "North", "G1", "C1", "Intro Art", "X"),
                response([Some(3.0); 7], "A", "South", "G2", "C2", "Advanced Art", "Y"),
                response(last, "B", "South", "G3", "C3", "Intro Biology", "Z"),
            ],
            true,
        )
    }
}
