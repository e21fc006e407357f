use serde::{Deserialize, Serialize};

use super::medication::MedicationRecommendation;

/// Reported symptom inside a saved consultation summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSymptom {
    pub name: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub severity: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prescription {
    #[serde(default)]
    pub medications: Vec<MedicationRecommendation>,
    #[serde(default)]
    pub tests: Vec<String>,
    #[serde(default)]
    pub follow_up: Vec<String>,
    #[serde(default)]
    pub advice: Vec<String>,
}

/// A consultation summary saved by the consultation agent.
///
/// These files sit next to full records in the local fallback directory
/// and only carry the treatment side of a visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedTreatment {
    pub diagnosis: String,
    pub prescription: Prescription,
    #[serde(default)]
    pub symptoms: Vec<SavedSymptom>,
    /// Free text or a structured list, depending on the agent version.
    #[serde(default)]
    pub medical_history: serde_json::Value,
    #[serde(default)]
    pub timestamp: Option<String>,
}
