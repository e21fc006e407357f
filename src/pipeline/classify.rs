//! Diagnosis classifier: a static keyword table, first match wins.
//!
//! The doctor's earliest assessment turn is consulted first; the patient's
//! symptom text is the fallback. Category order is fixed and is the whole
//! contract, so matching stays plain case-insensitive substring search.

use crate::models::{
    doctor_turns, ClassificationBasis, ConsultationRecord, DiagnosisCategory,
    DiagnosisClassification, DialogueTurn,
};

/// Confidence attached to every classification.
pub const CONFIDENCE: &str = "Moderate — requires clinical confirmation";

/// Phrases marking a doctor turn as an assessment.
const ASSESSMENT_TRIGGERS: &[&str] = &["diagnosis", "based on what you've told me", "sounds like"];

/// Canonical match order across every screen.
pub const CATEGORY_ORDER: [DiagnosisCategory; 3] = [
    DiagnosisCategory::Musculoskeletal,
    DiagnosisCategory::Respiratory,
    DiagnosisCategory::Headache,
];

const MUSCULOSKELETAL_KEYWORDS: &[&str] = &[
    "back pain",
    "backache",
    "lower back",
    "lumbar",
    "spine",
    "sciatica",
    "muscle strain",
    "pulled muscle",
    "musculoskeletal",
];

const RESPIRATORY_KEYWORDS: &[&str] = &[
    "sore throat",
    "cold",
    "cough",
    "fever",
    "temperature",
    "runny nose",
    "congestion",
    "sneez",
    "flu",
    "respiratory",
];

const HEADACHE_KEYWORDS: &[&str] = &["headache", "migraine", "head pain", "head hurts"];

/// Classify a consultation from its transcript and symptom text.
pub fn classify_record(record: &ConsultationRecord) -> DiagnosisClassification {
    classify(&record.symptoms, &record.conversation)
}

/// Classify from symptom free text and the dialogue transcript.
pub fn classify(symptoms: &str, conversation: &[DialogueTurn]) -> DiagnosisClassification {
    if let Some(assessment) = find_assessment_turn(conversation) {
        if let Some(category) = match_category(&normalize(&assessment.text)) {
            return build(category, ClassificationBasis::DoctorAssessment);
        }
    }

    match match_category(&normalize(symptoms)) {
        Some(category) => build(category, ClassificationBasis::SymptomText),
        None => build(DiagnosisCategory::Symptomatic, ClassificationBasis::Default),
    }
}

/// Earliest doctor turn containing an assessment trigger phrase.
pub fn find_assessment_turn(conversation: &[DialogueTurn]) -> Option<&DialogueTurn> {
    doctor_turns(conversation).find(|t| {
        let text = normalize(&t.text);
        ASSESSMENT_TRIGGERS.iter().any(|p| text.contains(p))
    })
}

/// First category in [`CATEGORY_ORDER`] with a keyword in `text`.
///
/// `text` must already be normalized.
pub fn match_category(text: &str) -> Option<DiagnosisCategory> {
    CATEGORY_ORDER
        .into_iter()
        .find(|category| keywords(*category).iter().any(|k| text.contains(k)))
}

/// Display label for a category.
pub fn primary_label(category: DiagnosisCategory) -> &'static str {
    match category {
        DiagnosisCategory::Musculoskeletal => "Musculoskeletal Back Pain (Lumbar Strain)",
        DiagnosisCategory::Respiratory => "Upper Respiratory Tract Infection (Common Cold)",
        DiagnosisCategory::Headache => "Tension-Type Headache",
        DiagnosisCategory::Symptomatic => "Symptomatic Pain",
    }
}

fn alternative_labels(category: DiagnosisCategory) -> [&'static str; 2] {
    match category {
        DiagnosisCategory::Musculoskeletal => ["Lumbar Disc Herniation", "Sciatica"],
        DiagnosisCategory::Respiratory => ["Influenza", "Acute Pharyngitis"],
        DiagnosisCategory::Headache => ["Migraine", "Cluster Headache"],
        DiagnosisCategory::Symptomatic => ["Nonspecific Musculoskeletal Pain", "Viral Syndrome"],
    }
}

fn keywords(category: DiagnosisCategory) -> &'static [&'static str] {
    match category {
        DiagnosisCategory::Musculoskeletal => MUSCULOSKELETAL_KEYWORDS,
        DiagnosisCategory::Respiratory => RESPIRATORY_KEYWORDS,
        DiagnosisCategory::Headache => HEADACHE_KEYWORDS,
        DiagnosisCategory::Symptomatic => &[],
    }
}

fn build(category: DiagnosisCategory, basis: ClassificationBasis) -> DiagnosisClassification {
    let primary = primary_label(category);
    DiagnosisClassification {
        primary: primary.to_string(),
        alternatives: alternative_labels(category)
            .iter()
            .filter(|alt| **alt != primary)
            .map(|alt| alt.to_string())
            .collect(),
        confidence: CONFIDENCE.to_string(),
        category,
        basis,
    }
}

/// Lowercase and fold typographic apostrophes so triggers like
/// "you've" match text typed on mobile keyboards.
pub(crate) fn normalize(text: &str) -> String {
    text.to_lowercase().replace(['\u{2019}', '\u{2018}'], "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(symptoms: &str, conversation: Vec<DialogueTurn>) -> ConsultationRecord {
        ConsultationRecord {
            patient: crate::models::Patient {
                name: "John Doe".into(),
                age: Some(32),
                sex: "male".into(),
            },
            date: None,
            symptoms: symptoms.into(),
            medical_history: String::new(),
            current_medications: String::new(),
            conversation,
            call_duration: 0,
        }
    }

    #[test]
    fn doctor_assessment_with_back_pain_is_musculoskeletal() {
        let conversation = vec![
            DialogueTurn::patient("My back has been killing me"),
            DialogueTurn::doctor("Based on what you've told me, this is back pain from a strain."),
        ];
        let result = classify("", &conversation);
        assert_eq!(result.category, DiagnosisCategory::Musculoskeletal);
        assert_eq!(result.primary, "Musculoskeletal Back Pain (Lumbar Strain)");
        assert_eq!(result.basis, ClassificationBasis::DoctorAssessment);
        assert!(!result.alternatives.contains(&result.primary));
    }

    #[test]
    fn sore_throat_and_headache_resolves_respiratory_first() {
        let result = classify(
            "sore throat and headache since Tuesday, temperature was 100.4°F",
            &[],
        );
        assert_eq!(result.category, DiagnosisCategory::Respiratory);
        assert_eq!(result.primary, "Upper Respiratory Tract Infection (Common Cold)");
        assert_eq!(result.basis, ClassificationBasis::SymptomText);
    }

    #[test]
    fn empty_dialogue_uses_symptom_text() {
        let result = classify_record(&record("back pain", vec![]));
        assert_eq!(result.category, DiagnosisCategory::Musculoskeletal);
        assert_eq!(result.basis, ClassificationBasis::SymptomText);
    }

    #[test]
    fn assessment_turn_overrides_symptom_text() {
        let conversation = vec![DialogueTurn::doctor("It sounds like a migraine to me.")];
        let result = classify("runny nose", &conversation);
        assert_eq!(result.category, DiagnosisCategory::Headache);
        assert_eq!(result.basis, ClassificationBasis::DoctorAssessment);
    }

    #[test]
    fn earliest_assessment_turn_wins() {
        let conversation = vec![
            DialogueTurn::doctor("My working diagnosis is a common cold."),
            DialogueTurn::doctor("Sounds like your back pain is separate."),
        ];
        let result = classify("", &conversation);
        assert_eq!(result.category, DiagnosisCategory::Respiratory);
    }

    #[test]
    fn patient_turns_never_count_as_assessment() {
        let conversation = vec![DialogueTurn::patient("My diagnosis from last year was a migraine")];
        assert!(find_assessment_turn(&conversation).is_none());
        let result = classify("", &conversation);
        assert_eq!(result.category, DiagnosisCategory::Symptomatic);
    }

    #[test]
    fn doctor_turn_without_trigger_is_ignored() {
        let conversation = vec![DialogueTurn::doctor("Any cough or back pain?")];
        let result = classify("headache", &conversation);
        assert_eq!(result.category, DiagnosisCategory::Headache);
        assert_eq!(result.basis, ClassificationBasis::SymptomText);
    }

    #[test]
    fn assessment_without_category_falls_back_to_symptoms() {
        let conversation = vec![DialogueTurn::doctor("I'd rather not give a diagnosis yet.")];
        let result = classify("persistent cough", &conversation);
        assert_eq!(result.category, DiagnosisCategory::Respiratory);
        assert_eq!(result.basis, ClassificationBasis::SymptomText);
    }

    #[test]
    fn curly_apostrophe_trigger_matches() {
        let conversation = vec![DialogueTurn::doctor("Based on what you\u{2019}ve told me, a cold.")];
        let result = classify("", &conversation);
        assert_eq!(result.basis, ClassificationBasis::DoctorAssessment);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(
            classify("LOWER BACK stiffness", &[]).category,
            DiagnosisCategory::Musculoskeletal
        );
    }

    #[test]
    fn no_match_yields_symptomatic_pain() {
        let result = classify("my knee aches", &[]);
        assert_eq!(result.primary, "Symptomatic Pain");
        assert_eq!(result.basis, ClassificationBasis::Default);
        assert_eq!(result.alternatives.len(), 2);
    }

    #[test]
    fn every_category_uses_fixed_confidence() {
        for text in ["back pain", "cough", "headache", "nothing"] {
            assert_eq!(classify(text, &[]).confidence, CONFIDENCE);
        }
    }

    #[test]
    fn alternatives_never_contain_primary() {
        for category in CATEGORY_ORDER.into_iter().chain([DiagnosisCategory::Symptomatic]) {
            let result = build(category, ClassificationBasis::Default);
            assert!(!result.alternatives.contains(&result.primary));
        }
    }

    #[test]
    fn classification_is_idempotent() {
        let r = record(
            "sneezing and a headache",
            vec![DialogueTurn::doctor("This sounds like a cold")],
        );
        assert_eq!(classify_record(&r), classify_record(&r));
    }
}
