/// Maximum score a survey question can take.
pub const SURVEY_MAX: f64 = 5.0;

/// Top of the GPA-equivalent scale.
pub const GPA_MAX: f64 = 4.5;

/// Factor mapping a 0–5 survey mean onto the 0–4.5 GPA-equivalent scale.
pub const GPA_SCALE: f64 = GPA_MAX / SURVEY_MAX;

/// Converts a mean survey score into its GPA equivalent.
///
/// | Survey mean | GPA equivalent |
/// |-------------|----------------|
/// | 5.0         | 4.5            |
/// | 4.0         | 3.6            |
/// | 2.5         | 2.25           |
/// | 0.0         | 0.0            |
pub fn gpa_equivalent(survey_mean: f64) -> f64 {
    survey_mean * GPA_SCALE
}
