//! Survey-response CSV loader.
//!
//! Reads one row per student response, validates the expected schema, and
//! coerces the survey score columns to numbers.

use std::io::Read;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Number of survey questions (`Survey1` ..= `Survey7`).
pub const SURVEY_QUESTIONS: usize = 7;

pub const COLLEGE: &str = "College";
pub const CAMPUS: &str = "Campus";
pub const GROUP_CODE: &str = "GroupCode";
pub const COURSE_CODE: &str = "CourseCode";
pub const COURSE_NAME: &str = "CourseName";
pub const DEPARTMENT: &str = "Department";

const KEY_COLUMNS: [&str; 5] = [COLLEGE, CAMPUS, GROUP_CODE, COURSE_CODE, COURSE_NAME];

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("data file {0} not found")]
    NotFound(String),
    #[error("missing required columns: {0:?}")]
    MissingColumns(Vec<String>),
    #[error("failed to read survey CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to open survey CSV: {0}")]
    Io(#[from] std::io::Error),
}

/// Column names of the survey questions, in order.
pub fn survey_columns() -> impl Iterator<Item = String> {
    (1..=SURVEY_QUESTIONS).map(|i| format!("Survey{i}"))
}

/// Every column the loader refuses to run without.
pub fn required_columns() -> Vec<String> {
    survey_columns()
        .chain(KEY_COLUMNS.iter().map(|c| c.to_string()))
        .collect()
}

/// A single student response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurveyResponse {
    pub scores: [Option<f64>; SURVEY_QUESTIONS],
    pub college: Option<String>,
    pub campus: Option<String>,
    pub group_code: Option<String>,
    pub course_code: Option<String>,
    pub course_name: Option<String>,
    pub department: Option<String>,
}

impl SurveyResponse {
    /// Present scores of this response, skipping unanswered questions.
    pub fn answered(&self) -> impl Iterator<Item = f64> + '_ {
        self.scores.iter().flatten().copied()
    }
}

/// The immutable input frame for one run.
#[derive(Debug, Clone, Default)]
pub struct SurveyDataset {
    responses: Vec<SurveyResponse>,
    has_department: bool,
}

impl SurveyDataset {
    pub fn new(responses: Vec<SurveyResponse>, has_department: bool) -> Self {
        Self {
            responses,
            has_department,
        }
    }

    /// Loads and validates the survey CSV at `path`.
    #[tracing::instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        if !path.exists() {
            error!(path = %path.display(), "Data file not found");
            return Err(DatasetError::NotFound(path.display().to_string()));
        }

        let file = std::fs::File::open(path)?;
        let dataset = Self::from_reader(file)?;
        info!(rows = dataset.len(), "Survey data loaded");
        Ok(dataset)
    }

    /// Parses survey rows from any CSV source with a header line.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let headers = rdr.headers()?.clone();
        let position = |name: &str| headers.iter().position(|h| h == name);

        let missing: Vec<String> = required_columns()
            .into_iter()
            .filter(|c| position(c).is_none())
            .collect();
        if !missing.is_empty() {
            error!(missing = ?missing, "Missing required columns");
            return Err(DatasetError::MissingColumns(missing));
        }

        let department = position(DEPARTMENT);
        if department.is_none() {
            warn!(
                column = DEPARTMENT,
                "Optional column missing, some calculations will be skipped"
            );
        }

        let score_idx: Vec<usize> = survey_columns().filter_map(|c| position(&c)).collect();
        let [college, campus, group_code, course_code, course_name] =
            KEY_COLUMNS.map(|c| position(c).unwrap_or_default());

        let mut responses = Vec::new();
        for result in rdr.records() {
            let record = result?;
            let key = |idx: usize| category(record.get(idx));

            let mut scores = [None; SURVEY_QUESTIONS];
            for (slot, idx) in scores.iter_mut().zip(&score_idx) {
                *slot = numeric(record.get(*idx));
            }

            responses.push(SurveyResponse {
                scores,
                college: key(college),
                campus: key(campus),
                group_code: key(group_code),
                course_code: key(course_code),
                course_name: key(course_name),
                department: department.and_then(key),
            });
        }

        debug!(rows = responses.len(), "Parsed survey records");

        Ok(Self::new(responses, department.is_some()))
    }

    pub fn responses(&self) -> &[SurveyResponse] {
        &self.responses
    }

    pub fn len(&self) -> usize {
        self.responses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    pub fn has_department(&self) -> bool {
        self.has_department
    }

    /// Values of question `q` (0-based) across all rows, missing included.
    pub fn question(&self, q: usize) -> impl Iterator<Item = Option<f64>> + '_ {
        self.responses.iter().map(move |r| r.scores[q])
    }
}

/// Coerces a cell to a number; anything unparsable becomes missing.
fn numeric(cell: Option<&str>) -> Option<f64> {
    cell.map(str::trim)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| !v.is_nan())
}

fn category(cell: Option<&str>) -> Option<String> {
    cell.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
