use serde::{Deserialize, Serialize};

/// One resume as submitted by the form UI. Held only for the duration of a request.
///
/// Every string defaults to empty so that a missing key surfaces as a field error
/// from the validator rather than as a JSON decoding failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeRecord {
    pub personal: PersonalDetails,
    pub qualification: Qualification,
    pub summary: String,
    pub skills: String,
    pub profession: Profession,
    pub template: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub linkedin: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Qualification {
    pub degree: String,
    pub university: String,
    pub year: String,
    pub additional_courses: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profession {
    pub job_title: String,
    pub experience: String,
    pub background: String,
    pub achievements: Option<String>,
}

/// A document that has been durably written. Never mutated after creation.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedDocument {
    pub filename: String,
    /// Absolute path or `s3://bucket/key`. Logged, never returned to clients.
    #[serde(skip)]
    pub storage_location: String,
    pub retrieval_reference: String,
}

#[cfg(test)]
pub(crate) fn sample_record() -> ResumeRecord {
    ResumeRecord {
        personal: PersonalDetails {
            name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: "555-0100".to_string(),
            address: "12 Oak St".to_string(),
            linkedin: None,
            website: None,
        },
        qualification: Qualification {
            degree: "B.Sc CS".to_string(),
            university: "State U".to_string(),
            year: "2020".to_string(),
            additional_courses: None,
        },
        summary: "Backend engineer.".to_string(),
        skills: "Go, SQL".to_string(),
        profession: Profession {
            job_title: "Engineer".to_string(),
            experience: "3 years".to_string(),
            background: "Built services.".to_string(),
            achievements: None,
        },
        template: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_form_payload_in_camel_case() {
        let json = serde_json::json!({
            "personal": { "name": "Asha Rao", "email": "asha@example.com", "phone": "555-0100", "address": "12 Oak St" },
            "qualification": { "degree": "B.Sc CS", "university": "State U", "year": "2020", "additionalCourses": "AWS" },
            "summary": "Backend engineer.",
            "skills": "Go, SQL",
            "profession": { "jobTitle": "Engineer", "experience": "3 years", "background": "Built services." },
            "template": "compact"
        });
        let record: ResumeRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.profession.job_title, "Engineer");
        assert_eq!(record.qualification.additional_courses.as_deref(), Some("AWS"));
        assert_eq!(record.template.as_deref(), Some("compact"));
        assert!(record.personal.linkedin.is_none());
    }

    #[test]
    fn test_missing_keys_default_to_empty() {
        let record: ResumeRecord =
            serde_json::from_value(serde_json::json!({ "personal": { "name": "X" } })).unwrap();
        assert_eq!(record.personal.name, "X");
        assert!(record.personal.phone.is_empty());
        assert!(record.summary.is_empty());
        assert!(record.profession.job_title.is_empty());
    }

    #[test]
    fn test_generated_document_hides_storage_location() {
        let doc = GeneratedDocument {
            filename: "SmartCV_1_a.pdf".to_string(),
            storage_location: "/srv/resumes/SmartCV_1_a.pdf".to_string(),
            retrieval_reference: "http://localhost/resumes/SmartCV_1_a.pdf".to_string(),
        };
        let v = serde_json::to_value(&doc).unwrap();
        assert!(v.get("storage_location").is_none());
        assert_eq!(v["filename"], "SmartCV_1_a.pdf");
    }
}
