use serde::{Deserialize, Serialize};

/// A single job listing as supplied by the job source.
/// `id` is opaque and expected to be unique within one batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobListing {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_posted: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,
}

impl JobListing {
    pub fn new(id: impl Into<String>, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn with_requirements(mut self, requirements: impl Into<String>) -> Self {
        self.requirements = Some(requirements.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_fields_are_omitted_when_absent() {
        let listing = JobListing::new("j1", "Rust Engineer", "Build services");
        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["id"], "j1");
        assert!(json.get("salary").is_none());
        assert!(json.get("requirements").is_none());
    }

    #[test]
    fn test_minimal_listing_deserializes() {
        let listing: JobListing = serde_json::from_str(r#"{"id": "42"}"#).unwrap();
        assert_eq!(listing.id, "42");
        assert!(listing.title.is_empty());
        assert!(listing.requirements.is_none());
    }
}
