use serde::{Deserialize, Serialize};

use super::fields::ExtractedFields;

/// Structured candidate information for one resume.
///
/// `skills` is always a list and `no_of_pages` always a number; the other
/// fields serialise as `null` when nothing matched. `degree` is part of the
/// output shape but no rule populates it yet.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CandidateRecord {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mobile_number: Option<String>,
    pub skills: Vec<String>,
    pub degree: Option<String>,
    pub no_of_pages: usize,
}

impl CandidateRecord {
    pub fn assemble(fields: ExtractedFields, no_of_pages: usize) -> Self {
        Self {
            name: fields.name,
            email: fields.email,
            mobile_number: fields.mobile_number,
            skills: fields.skills,
            degree: None,
            no_of_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_absent_fields_as_null() {
        let record = CandidateRecord::assemble(ExtractedFields::default(), 1);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": null,
                "email": null,
                "mobile_number": null,
                "skills": [],
                "degree": null,
                "no_of_pages": 1
            })
        );
    }

    #[test]
    fn assemble_keeps_fields_and_leaves_degree_empty() {
        let fields = ExtractedFields {
            name: Some("Jane Doe".into()),
            email: Some("jane@example.com".into()),
            mobile_number: Some("5551234567".into()),
            skills: vec!["sql".into(), "sql".into()],
        };
        let record = CandidateRecord::assemble(fields, 2);
        assert_eq!(record.name.as_deref(), Some("Jane Doe"));
        assert_eq!(record.skills, vec!["sql", "sql"]);
        assert_eq!(record.degree, None);
        assert_eq!(record.no_of_pages, 2);
    }
}
