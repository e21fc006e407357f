use serde::Serialize;

use crate::models::{ConsultationRecord, DiagnosisClassification, MedicationRecommendation};
use crate::pipeline::advice::{extract_advice, extract_follow_up};
use crate::pipeline::classify::classify_record;
use crate::pipeline::recommend::{recommend_medications, recommended_tests};

/// Everything the screens derive from one consultation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsultationSummary {
    pub diagnosis: DiagnosisClassification,
    pub medications: Vec<MedicationRecommendation>,
    pub tests: Vec<String>,
    pub follow_up: Vec<String>,
    pub advice: Vec<String>,
}

impl ConsultationSummary {
    /// Derive the summary. Pure: the same record always yields the same summary.
    pub fn derive(record: &ConsultationRecord) -> Self {
        let diagnosis = classify_record(record);
        let medications = recommend_medications(&diagnosis);
        let tests = recommended_tests(diagnosis.category);
        let follow_up = extract_follow_up(&diagnosis, &record.conversation);
        let advice = extract_advice(&diagnosis, &record.conversation);

        tracing::debug!(
            category = %diagnosis.category,
            basis = %diagnosis.basis,
            medications = medications.len(),
            "Derived consultation summary"
        );

        Self {
            diagnosis,
            medications,
            tests,
            follow_up,
            advice,
        }
    }
}
