use serde::Serialize;

use crate::pipeline::PipelineSnapshot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionEntry {
    pub name: String,
    pub details: String,
    pub treatment: String,
}

/// Medical history screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryView {
    /// Free-text history from the current consultation.
    pub medical_history: String,
    pub current_medications: String,
    pub conditions: Vec<ConditionEntry>,
    pub allergies: Vec<String>,
    pub family_history: Vec<String>,
    pub immunizations: Vec<String>,
}

impl HistoryView {
    pub fn sample() -> Self {
        Self {
            medical_history: String::new(),
            current_medications: String::new(),
            conditions: vec![ConditionEntry {
                name: "Pneumonia".into(),
                details: "Occurred at age 5".into(),
                treatment: "Treatment not specified".into(),
            }],
            allergies: vec![],
            family_history: vec![],
            immunizations: vec![
                "COVID-19 Vaccination (Complete)".into(),
                "Flu Shot (Annual)".into(),
                "Tetanus (Up to date)".into(),
            ],
        }
    }

    pub fn from_snapshot(snapshot: &PipelineSnapshot) -> Self {
        let record = &snapshot.record;
        Self {
            medical_history: record.medical_history.clone(),
            current_medications: record.current_medications.clone(),
            ..Self::sample()
        }
    }

    pub fn allergies_label(&self) -> String {
        if self.allergies.is_empty() {
            "No known allergies".to_string()
        } else {
            self.allergies.join(", ")
        }
    }

    pub fn family_history_label(&self) -> String {
        if self.family_history.is_empty() {
            "No significant family history reported".to_string()
        } else {
            self.family_history.join(", ")
        }
    }
}
