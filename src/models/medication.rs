use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationRecommendation {
    pub name: String,
    pub dosage: String,
    /// Duration or frequency text, e.g. "5 days".
    #[serde(default)]
    pub duration: String,
    /// Purpose or instructions text.
    #[serde(default)]
    pub purpose: String,
}

impl MedicationRecommendation {
    pub fn new(name: &str, dosage: &str, duration: &str, purpose: &str) -> Self {
        Self {
            name: name.to_string(),
            dosage: dosage.to_string(),
            duration: duration.to_string(),
            purpose: purpose.to_string(),
        }
    }
}
