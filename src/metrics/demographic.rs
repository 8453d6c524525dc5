use std::collections::{BTreeMap, BTreeSet};

use crate::dataset::SurveyDataset;
use crate::metrics::types::{CollegeDistribution, CourseSize, DemographicMetrics};
use crate::metrics::utility::{mean, quantile, round_to, sample_stddev};

impl DemographicMetrics {
    /// Section and course counts per college, responses per campus, and the
    /// spread of section sizes.
    pub fn compute(dataset: &SurveyDataset) -> Self {
        let mut sections: BTreeMap<String, BTreeSet<&str>> = BTreeMap::new();
        let mut courses: BTreeMap<String, BTreeSet<&str>> = BTreeMap::new();
        let mut campus_distribution: BTreeMap<String, usize> = BTreeMap::new();
        let mut section_sizes: BTreeMap<&str, usize> = BTreeMap::new();

        for r in dataset.responses() {
            if let Some(college) = &r.college {
                let s = sections.entry(college.clone()).or_default();
                s.extend(r.group_code.as_deref());
                let c = courses.entry(college.clone()).or_default();
                c.extend(r.course_code.as_deref());
            }
            if let Some(campus) = &r.campus {
                *campus_distribution.entry(campus.clone()).or_default() += 1;
            }
            if let Some(group) = &r.group_code {
                *section_sizes.entry(group.as_str()).or_default() += 1;
            }
        }

        let college_distribution = sections
            .into_iter()
            .map(|(college, groups)| {
                let course_count = courses.get(&college).map_or(0, BTreeSet::len);
                let dist = CollegeDistribution {
                    section_count: groups.len(),
                    course_count,
                };
                (college, dist)
            })
            .collect();

        let sizes: Vec<f64> = section_sizes.values().map(|&n| n as f64).collect();

        DemographicMetrics {
            college_distribution,
            campus_distribution,
            course_size: describe(&sizes),
        }
    }
}

/// Count, mean, spread, and quartiles of `values`, rounded to two digits.
pub fn describe(values: &[f64]) -> CourseSize {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let r = |v: Option<f64>| v.map(|v| round_to(v, 2));

    CourseSize {
        count: sorted.len(),
        mean: r(mean(&sorted)),
        std: r(sample_stddev(&sorted)),
        min: sorted.first().copied(),
        p25: r(quantile(&sorted, 0.25)),
        p50: r(quantile(&sorted, 0.5)),
        p75: r(quantile(&sorted, 0.75)),
        max: sorted.last().copied(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::fixtures::sample_dataset;

    #[test]
    fn test_college_distribution_counts_distinct_codes() {
        let m = DemographicMetrics::compute(&sample_dataset());

        assert_eq!(
            m.college_distribution["A"],
            CollegeDistribution {
                section_count: 2,
                course_count: 2
            }
        );
        assert_eq!(
            m.college_distribution["B"],
            CollegeDistribution {
                section_count: 1,
                course_count: 1
            }
        );
    }

    #[test]
    fn test_campus_distribution_counts_rows() {
        let m = DemographicMetrics::compute(&sample_dataset());

        assert_eq!(m.campus_distribution["North"], 2);
        assert_eq!(m.campus_distribution["South"], 2);
    }

    #[test]
    fn test_course_size_description() {
        let m = DemographicMetrics::compute(&sample_dataset());

        assert_eq!(
            m.course_size,
            CourseSize {
                count: 3,
                mean: Some(1.33),
                std: Some(0.58),
                min: Some(1.0),
                p25: Some(1.0),
                p50: Some(1.0),
                p75: Some(1.5),
                max: Some(2.0),
            }
        );
    }

    #[test]
    fn test_describe_empty() {
        let d = describe(&[]);
        assert_eq!(d.count, 0);
        assert_eq!(d.mean, None);
        assert_eq!(d.max, None);
    }
}
