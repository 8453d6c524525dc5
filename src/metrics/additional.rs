use std::collections::{BTreeMap, HashMap};

use crate::dataset::{SurveyDataset, SurveyResponse, survey_columns};
use crate::metrics::types::{AdditionalMetrics, AverageScores, GroupScores, KeywordCount, RankedGroup};
use crate::metrics::utility::{group_means, group_values, mean, round_to};

/// Length of every ranking and of the keyword list.
pub const TOP_N: usize = 10;

type KeyFn = fn(&SurveyResponse) -> Option<&str>;

impl AdditionalMetrics {
    /// Breakdowns by department, college and campus, top-ten rankings, and
    /// the most frequent course-name keywords.
    pub fn compute(dataset: &SurveyDataset) -> Self {
        let mut average_scores = BTreeMap::new();
        let mut top_10_colleges = BTreeMap::new();
        let mut top_10_courses = BTreeMap::new();

        for (q, column) in survey_columns().enumerate() {
            let means = |key: KeyFn| group_means(keyed(dataset, q, key), 2);

            let by_department = if dataset.has_department() {
                means(|r| r.department.as_deref())
            } else {
                GroupScores::new()
            };

            average_scores.insert(
                column.clone(),
                AverageScores {
                    by_department,
                    by_college: means(|r| r.college.as_deref()),
                    by_campus: means(|r| r.campus.as_deref()),
                },
            );
            top_10_colleges.insert(
                column.clone(),
                top_groups(dataset, q, |r| r.college.as_deref(), TOP_N),
            );
            top_10_courses.insert(
                column,
                top_groups(dataset, q, |r| r.course_code.as_deref(), TOP_N),
            );
        }

        AdditionalMetrics {
            average_scores,
            top_10_colleges,
            top_10_courses,
            course_name_keywords: course_name_keywords(dataset, TOP_N),
        }
    }
}

fn keyed<'a>(
    dataset: &'a SurveyDataset,
    q: usize,
    key: KeyFn,
) -> impl Iterator<Item = (Option<&'a str>, Option<f64>)> + 'a {
    dataset.responses().iter().map(move |r| (key(r), r.scores[q]))
}

/// Groups ranked by their mean score on question `q`, highest first.
///
/// Groups without any answer sort last. The ranking is computed on unrounded
/// means and rounded to two digits afterwards.
pub fn top_groups(dataset: &SurveyDataset, q: usize, key: KeyFn, n: usize) -> Vec<RankedGroup> {
    let mut ranked: Vec<(String, Option<f64>)> = group_values(keyed(dataset, q, key))
        .into_iter()
        .map(|(k, series)| (k, mean(&series)))
        .collect();

    // Stable sort, so equal means keep key order.
    ranked.sort_by(|(_, a), (_, b)| match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    ranked
        .into_iter()
        .take(n)
        .map(|(key, score)| RankedGroup {
            key,
            score: score.map(|s| round_to(s, 2)),
        })
        .collect()
}

/// Most common lower-cased words across all course names. Equal counts keep
/// the order in which the words first appeared.
pub fn course_name_keywords(dataset: &SurveyDataset, n: usize) -> Vec<KeywordCount> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<KeywordCount> = Vec::new();

    let words = dataset
        .responses()
        .iter()
        .filter_map(|r| r.course_name.as_deref())
        .flat_map(str::split_whitespace)
        .map(str::to_lowercase);

    for word in words {
        match seen.get(&word) {
            Some(&idx) => counts[idx].frequency += 1,
            None => {
                seen.insert(word.clone(), counts.len());
                counts.push(KeywordCount {
                    keyword: word,
                    frequency: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    counts.truncate(n);
    counts
}
