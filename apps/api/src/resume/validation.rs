//! Completeness and format checks for a submitted [`ResumeRecord`].
//!
//! Validation is pure: the record is never normalized or rewritten, and the
//! renderer receives exactly what the client sent.

use serde::Serialize;

use crate::models::resume::ResumeRecord;

/// Limits applied on top of the completeness rules.
#[derive(Debug, Clone, Copy)]
pub struct ValidationLimits {
    pub max_field_len: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            max_field_len: 5000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Dotted path of the offending field, e.g. `personal.phone`.
    pub field: String,
    pub message: String,
}

/// Field-level failures in form order (personal → qualification → summary →
/// skills → profession), so the caller can surface the earliest section first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// First failing field, in form order.
    pub fn first(&self) -> Option<&FieldError> {
        self.0.first()
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", joined.join("; "))
    }
}

/// Checks that every required field is non-blank, that the email has a
/// `local@domain` shape, and that no field exceeds `limits.max_field_len`.
pub fn validate(record: &ResumeRecord, limits: &ValidationLimits) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();

    let p = &record.personal;
    let q = &record.qualification;
    let w = &record.profession;

    let required: [(&str, &str, &str); 12] = [
        ("personal.name", "Full name", p.name.as_str()),
        ("personal.email", "Email", p.email.as_str()),
        ("personal.phone", "Phone number", p.phone.as_str()),
        ("personal.address", "Address", p.address.as_str()),
        ("qualification.degree", "Degree", q.degree.as_str()),
        ("qualification.university", "University", q.university.as_str()),
        ("qualification.year", "Year of passing", q.year.as_str()),
        ("summary", "Summary", record.summary.as_str()),
        ("skills", "Skills", record.skills.as_str()),
        ("profession.jobTitle", "Job title", w.job_title.as_str()),
        ("profession.experience", "Experience", w.experience.as_str()),
        ("profession.background", "Background", w.background.as_str()),
    ];

    for (field, label, value) in required {
        if value.trim().is_empty() {
            errors.push(field, format!("{label} is required"));
        } else if field == "personal.email" && !looks_like_email(value.trim()) {
            errors.push(field, "Email must look like local@domain");
        } else if value.chars().count() > limits.max_field_len {
            errors.push(field, too_long(label, limits));
        }
    }

    let optional: [(&str, &str, Option<&String>); 4] = [
        ("personal.linkedin", "LinkedIn", p.linkedin.as_ref()),
        ("personal.website", "Website", p.website.as_ref()),
        (
            "qualification.additionalCourses",
            "Additional courses",
            q.additional_courses.as_ref(),
        ),
        ("profession.achievements", "Achievements", w.achievements.as_ref()),
    ];

    for (field, label, value) in optional {
        if value.is_some_and(|v| v.chars().count() > limits.max_field_len) {
            errors.push(field, too_long(label, limits));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn too_long(label: &str, limits: &ValidationLimits) -> String {
    format!(
        "{label} must be at most {} characters",
        limits.max_field_len
    )
}

/// Basic `local@domain` shape: one `@`, non-empty local part, and a domain with
/// an interior dot. No whitespace anywhere.
fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.find('.') {
        Some(idx) => idx > 0 && !domain.ends_with('.'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::sample_record;

    fn limits() -> ValidationLimits {
        ValidationLimits::default()
    }

    #[test]
    fn test_complete_record_passes() {
        assert!(validate(&sample_record(), &limits()).is_ok());
    }

    #[test]
    fn test_blank_phone_is_reported() {
        let mut record = sample_record();
        record.personal.phone = String::new();
        let errors = validate(&record, &limits()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains("personal.phone"));
        assert!(errors.first().unwrap().message.contains("required"));
    }

    #[test]
    fn test_whitespace_only_counts_as_blank() {
        let mut record = sample_record();
        record.summary = "   \n\t ".to_string();
        let errors = validate(&record, &limits()).unwrap_err();
        assert!(errors.contains("summary"));
    }

    #[test]
    fn test_every_required_field_is_checked() {
        let errors = validate(&ResumeRecord::default(), &limits()).unwrap_err();
        assert_eq!(errors.len(), 12);
        for field in [
            "personal.name",
            "personal.email",
            "personal.phone",
            "personal.address",
            "qualification.degree",
            "qualification.university",
            "qualification.year",
            "summary",
            "skills",
            "profession.jobTitle",
            "profession.experience",
            "profession.background",
        ] {
            assert!(errors.contains(field), "missing error for {field}");
        }
    }

    #[test]
    fn test_errors_follow_form_order() {
        let mut record = sample_record();
        record.profession.background = String::new();
        record.qualification.year = " ".to_string();
        let errors = validate(&record, &limits()).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["qualification.year", "profession.background"]);
    }

    #[test]
    fn test_optional_fields_may_be_absent_or_blank() {
        let mut record = sample_record();
        record.personal.linkedin = Some(String::new());
        record.profession.achievements = None;
        assert!(validate(&record, &limits()).is_ok());
    }

    #[test]
    fn test_malformed_email_rejected() {
        for bad in ["asha", "asha@", "@example.com", "asha@example", "a b@example.com", "a@b@c.com", "asha@.com", "asha@example."] {
            let mut record = sample_record();
            record.personal.email = bad.to_string();
            let errors = validate(&record, &limits()).unwrap_err();
            assert!(errors.contains("personal.email"), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_email_with_subdomain_accepted() {
        let mut record = sample_record();
        record.personal.email = "asha.rao+cv@mail.example.co.in".to_string();
        assert!(validate(&record, &limits()).is_ok());
    }

    #[test]
    fn test_field_over_limit_rejected() {
        let mut record = sample_record();
        record.summary = "x".repeat(11);
        record.profession.achievements = Some("y".repeat(11));
        let errors = validate(&record, &ValidationLimits { max_field_len: 10 }).unwrap_err();
        assert!(errors.contains("summary"));
        assert!(errors.contains("profession.achievements"));
        assert!(!errors.contains("skills"));
    }

    #[test]
    fn test_display_joins_fields() {
        let mut record = sample_record();
        record.personal.name = String::new();
        let errors = validate(&record, &limits()).unwrap_err();
        assert_eq!(errors.to_string(), "personal.name: Full name is required");
    }
}
