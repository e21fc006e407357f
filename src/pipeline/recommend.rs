//! Medication recommender: fixed medication tables keyed by diagnosis label.

use crate::models::{DiagnosisCategory, DiagnosisClassification, MedicationRecommendation};

/// Name of the entry closing every recommendation list.
pub const DISCLAIMER_NAME: &str = "Consult a Healthcare Professional";

/// Resolve the medication table for a primary label by substring.
///
/// Checked in this order: musculoskeletal, headache, respiratory.
pub fn category_for_label(primary: &str) -> DiagnosisCategory {
    let label = primary.to_lowercase();

    if ["musculoskeletal", "back", "lumbar"].iter().any(|k| label.contains(k)) {
        return DiagnosisCategory::Musculoskeletal;
    }
    if ["headache", "migraine"].iter().any(|k| label.contains(k)) {
        return DiagnosisCategory::Headache;
    }
    if ["respiratory", "cold", "influenza"].iter().any(|k| label.contains(k)) {
        return DiagnosisCategory::Respiratory;
    }
    DiagnosisCategory::Symptomatic
}

/// Medications for a classification, disclaimer last. Never empty.
pub fn recommend_medications(diagnosis: &DiagnosisClassification) -> Vec<MedicationRecommendation> {
    recommend_for_label(&diagnosis.primary)
}

pub fn recommend_for_label(primary: &str) -> Vec<MedicationRecommendation> {
    let mut medications = medication_table(category_for_label(primary));
    medications.push(disclaimer());
    medications
}

/// Suggested diagnostic tests per category; may be empty.
pub fn recommended_tests(category: DiagnosisCategory) -> Vec<String> {
    let tests: &[&str] = match category {
        DiagnosisCategory::Respiratory => &[
            "Rapid COVID-19 test",
            "Rapid strep test if sore throat persists",
        ],
        DiagnosisCategory::Musculoskeletal => {
            &["Lumbar spine X-ray if pain persists beyond 6 weeks"]
        }
        DiagnosisCategory::Headache => &["Blood pressure check"],
        DiagnosisCategory::Symptomatic => &[],
    };
    tests.iter().map(|t| t.to_string()).collect()
}

fn medication_table(category: DiagnosisCategory) -> Vec<MedicationRecommendation> {
    match category {
        DiagnosisCategory::Musculoskeletal => vec![
            MedicationRecommendation::new(
                "Ibuprofen (Advil, Motrin)",
                "400mg every 6-8 hours with food",
                "7 days",
                "Anti-inflammatory for pain and swelling",
            ),
            MedicationRecommendation::new(
                "Cyclobenzaprine",
                "5-10mg at bedtime",
                "5 days",
                "Muscle relaxant for back spasms",
            ),
            MedicationRecommendation::new(
                "Diclofenac Topical Gel 1%",
                "Apply to affected area 3-4 times daily",
                "10 days",
                "Topical analgesic for localized pain",
            ),
        ],
        DiagnosisCategory::Headache => vec![
            MedicationRecommendation::new(
                "Acetaminophen (Tylenol)",
                "500-1000mg every 6 hours as needed (max 3000mg/day)",
                "5 days",
                "Analgesic for headache pain",
            ),
            MedicationRecommendation::new(
                "Ibuprofen (Advil, Motrin)",
                "400mg every 6-8 hours with food",
                "3 days",
                "Anti-inflammatory analgesic for headache",
            ),
        ],
        DiagnosisCategory::Respiratory => vec![
            MedicationRecommendation::new(
                "Acetaminophen (Tylenol)",
                "500mg every 6 hours as needed",
                "5 days",
                "For fever and headache",
            ),
            MedicationRecommendation::new(
                "Guaifenesin (Mucinex)",
                "200-400mg every 4 hours",
                "7 days",
                "Expectorant for chest congestion",
            ),
            MedicationRecommendation::new(
                "Saline Nasal Spray",
                "2 sprays per nostril as needed",
                "7 days",
                "Relieves nasal congestion",
            ),
        ],
        DiagnosisCategory::Symptomatic => vec![
            MedicationRecommendation::new(
                "Acetaminophen (Tylenol)",
                "500mg every 6 hours as needed",
                "5 days",
                "For general pain relief",
            ),
            MedicationRecommendation::new(
                "Ibuprofen (Advil, Motrin)",
                "200-400mg every 6-8 hours with food",
                "5 days",
                "For pain and inflammation",
            ),
        ],
    }
}

fn disclaimer() -> MedicationRecommendation {
    MedicationRecommendation::new(
        DISCLAIMER_NAME,
        "N/A",
        "Before starting any medication",
        "These suggestions are not a prescription. Confirm with a licensed healthcare professional before taking any medication.",
    )
}
