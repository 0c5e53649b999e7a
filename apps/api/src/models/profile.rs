use serde::{Deserialize, Serialize};

/// Structured CV profile produced by the upstream resume parser.
/// Every section defaults to empty so partially parsed CVs still deserialize.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub skills: Vec<String>,
    pub education: Vec<EducationEntry>,
    pub experience: Vec<ExperienceEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationEntry {
    pub degree: String,
    pub field: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceEntry {
    pub title: String,
    pub description: String,
}

impl EducationEntry {
    /// "degree field", trimmed. Empty when both parts are blank.
    pub fn text(&self) -> String {
        join_trimmed(&self.degree, &self.field)
    }
}

impl ExperienceEntry {
    pub fn text(&self) -> String {
        join_trimmed(&self.title, &self.description)
    }
}

impl UserProfile {
    /// Skills with surrounding whitespace removed, blanks dropped.
    pub fn clean_skills(&self) -> impl Iterator<Item = &str> {
        self.skills.iter().map(|s| s.trim()).filter(|s| !s.is_empty())
    }

    /// True when no section carries any non-blank text.
    pub fn is_blank(&self) -> bool {
        self.clean_skills().next().is_none()
            && self.education.iter().all(|e| e.text().is_empty())
            && self.experience.iter().all(|e| e.text().is_empty())
    }
}

fn join_trimmed(a: &str, b: &str) -> String {
    match (a.trim(), b.trim()) {
        ("", "") => String::new(),
        (a, "") => a.to_string(),
        ("", b) => b.to_string(),
        (a, b) => format!("{a} {b}"),
    }
}
