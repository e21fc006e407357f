use serde::Serialize;

use crate::models::{MedicationRecommendation, SavedTreatment};
use crate::pipeline::PipelineSnapshot;

/// Treatment screen: medications, required tests, follow-up, advice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreatmentView {
    pub diagnosis: String,
    pub medications: Vec<MedicationRecommendation>,
    pub tests: Vec<String>,
    pub follow_up: Vec<String>,
    pub advice: Vec<String>,
    pub banner: Option<String>,
}

impl TreatmentView {
    /// A saved plan on the snapshot takes precedence over the derived summary.
    pub fn from_snapshot(snapshot: &PipelineSnapshot) -> Self {
        if let Some(plan) = &snapshot.saved_plan {
            return Self {
                banner: snapshot.banner(),
                ..Self::from_saved(plan)
            };
        }

        let summary = &snapshot.summary;
        Self {
            diagnosis: summary.diagnosis.primary.clone(),
            medications: summary.medications.clone(),
            tests: summary.tests.clone(),
            follow_up: summary.follow_up.clone(),
            advice: summary.advice.clone(),
            banner: snapshot.banner(),
        }
    }

    /// Build from a treatment plan saved by the consultation agent.
    ///
    /// The plan is shown as saved; nothing is re-derived.
    pub fn from_saved(saved: &SavedTreatment) -> Self {
        Self {
            diagnosis: saved.diagnosis.clone(),
            medications: saved.prescription.medications.clone(),
            tests: saved.prescription.tests.clone(),
            follow_up: saved.prescription.follow_up.clone(),
            advice: saved.prescription.advice.clone(),
            banner: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Prescription, RecordOrigin};
    use crate::pipeline::recommend::DISCLAIMER_NAME;
    use crate::source::sample::bundled_record;

    #[test]
    fn snapshot_treatments_end_with_disclaimer() {
        let snapshot = PipelineSnapshot::new(bundled_record(), RecordOrigin::BundledSample);
        let view = TreatmentView::from_snapshot(&snapshot);
        assert_eq!(view.medications.last().unwrap().name, DISCLAIMER_NAME);
        assert_eq!(
            view.tests,
            vec!["Rapid COVID-19 test", "Rapid strep test if sore throat persists"]
        );
        assert!(view
            .advice
            .contains(&"Stay well hydrated throughout the day".to_string()));
    }

    #[test]
    fn saved_plan_shown_verbatim() {
        let saved = SavedTreatment {
            diagnosis: "Migraine".into(),
            prescription: Prescription {
                medications: vec![MedicationRecommendation::new(
                    "Sumatriptan",
                    "50mg at onset",
                    "as needed",
                    "",
                )],
                tests: vec![],
                follow_up: vec!["Neurology referral".into()],
                advice: vec![],
            },
            symptoms: vec![],
            medical_history: serde_json::Value::Null,
            timestamp: None,
        };
        let view = TreatmentView::from_saved(&saved);
        assert_eq!(view.medications.len(), 1);
        assert_eq!(view.follow_up, vec!["Neurology referral"]);
        assert!(view.advice.is_empty());
    }
}
