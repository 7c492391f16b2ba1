use serde::{Deserialize, Serialize};

/// The fixed set of policy categories. Unknown stored values read as `Uncategorized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    EmergencyProcedures,
    ClinicalCare,
    EquipmentManagement,
    PatientAssessment,
    InfectionControl,
    Documentation,
    Administrative,
    #[default]
    Uncategorized,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::EmergencyProcedures,
        Category::ClinicalCare,
        Category::EquipmentManagement,
        Category::PatientAssessment,
        Category::InfectionControl,
        Category::Documentation,
        Category::Administrative,
        Category::Uncategorized,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::EmergencyProcedures => "Emergency Procedures",
            Category::ClinicalCare => "Clinical Care",
            Category::EquipmentManagement => "Equipment Management",
            Category::PatientAssessment => "Patient Assessment",
            Category::InfectionControl => "Infection Control",
            Category::Documentation => "Documentation",
            Category::Administrative => "Administrative",
            Category::Uncategorized => "Uncategorized",
        }
    }

    pub fn from_label(label: &str) -> Self {
        Category::ALL
            .into_iter()
            .find(|c| c.label() == label)
            .unwrap_or_default()
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Category::from_label(&value)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.label().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub text: String,
    pub options: Vec<String>,
    pub correct_index: usize,
}

impl Question {
    /// A question needs at least two options and a correct index pointing into them.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.text.trim().is_empty() {
            return Err("question text is empty");
        }
        if self.options.len() < 2 {
            return Err("a question needs at least two options");
        }
        if self.correct_index >= self.options.len() {
            return Err("correct index is out of range");
        }
        Ok(())
    }
}

/// A policy document with its competency quiz.
///
/// `id` is empty for policies that have not been stored yet, e.g. drafts
/// returned by the AI backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl Policy {
    /// Label shown on cards; policies that never had a category read "General".
    pub fn category_label(&self) -> &'static str {
        self.category.map(Category::label).unwrap_or("General")
    }

    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.title.to_lowercase().contains(&term)
            || self
                .code
                .as_deref()
                .is_some_and(|code| code.to_lowercase().contains(&term))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub policy_ids: Vec<String>,
}

pub const DEFAULT_LAST_UPDATED: &str = "Demo Data";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub last_updated: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            last_updated: DEFAULT_LAST_UPDATED.to_string(),
        }
    }
}

/// Case-insensitive search over title and code. An empty term keeps everything.
pub fn filter_policies<'a>(policies: &'a [Policy], term: &str) -> Vec<&'a Policy> {
    let term = term.trim();
    policies
        .iter()
        .filter(|p| term.is_empty() || p.matches(term))
        .collect()
}

/// Resolve a bundle's policy ids against the collection, keeping the authored
/// order. Missing ids resolve to `None`.
pub fn bundle_policies<'a>(bundle: &Bundle, policies: &'a [Policy]) -> Vec<Option<&'a Policy>> {
    bundle
        .policy_ids
        .iter()
        .map(|id| policies.iter().find(|p| &p.id == id))
        .collect()
}
