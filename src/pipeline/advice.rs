//! Follow-up and advice extraction.
//!
//! Two independent lists are built: category boilerplate first, then one
//! fixed line per doctor trigger found in the transcript. A list that ends
//! up empty receives a single default line.

use crate::models::{doctor_turns, DiagnosisCategory, DiagnosisClassification, DialogueTurn};
use crate::pipeline::classify::normalize;
use crate::pipeline::recommend::category_for_label;

pub const DEFAULT_FOLLOW_UP: &str =
    "Follow up with your healthcare provider if symptoms persist or worsen";
pub const DEFAULT_ADVICE: &str = "Follow your healthcare provider's general recommendations";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    FollowUp,
    Advice,
}

/// A doctor-side trigger and the line it contributes.
struct Trigger {
    phrases: &'static [&'static str],
    target: Target,
    line: &'static str,
}

const TRIGGERS: &[Trigger] = &[
    Trigger {
        phrases: &["follow up", "follow-up"],
        target: Target::FollowUp,
        line: "Schedule a follow-up appointment as discussed with your doctor",
    },
    Trigger {
        phrases: &["rest"],
        target: Target::Advice,
        line: "Get adequate rest as advised by your doctor",
    },
    Trigger {
        phrases: &["hydrate", "fluids"],
        target: Target::Advice,
        line: "Stay well hydrated throughout the day",
    },
    Trigger {
        phrases: &["ice"],
        target: Target::Advice,
        line: "Apply ice to the affected area for 15-20 minutes at a time",
    },
    Trigger {
        phrases: &["heat"],
        target: Target::Advice,
        line: "Use gentle heat after the first 48 hours to relax tight muscles",
    },
    Trigger {
        phrases: &["stretch"],
        target: Target::Advice,
        line: "Perform gentle stretches as demonstrated by your doctor",
    },
];

/// Follow-up instructions for the classification and transcript.
pub fn extract_follow_up(
    diagnosis: &DiagnosisClassification,
    conversation: &[DialogueTurn],
) -> Vec<String> {
    build(diagnosis, conversation, Target::FollowUp)
}

/// General advice for the classification and transcript.
pub fn extract_advice(
    diagnosis: &DiagnosisClassification,
    conversation: &[DialogueTurn],
) -> Vec<String> {
    build(diagnosis, conversation, Target::Advice)
}

fn build(
    diagnosis: &DiagnosisClassification,
    conversation: &[DialogueTurn],
    target: Target,
) -> Vec<String> {
    let category = category_for_label(&diagnosis.primary);
    let mut lines: Vec<String> = boilerplate(category, target)
        .iter()
        .map(|l| l.to_string())
        .collect();

    let doctor_text: Vec<String> = doctor_turns(conversation)
        .map(|t| normalize(&t.text))
        .collect();

    // At most one line per trigger, in table order.
    for trigger in TRIGGERS.iter().filter(|t| t.target == target) {
        let found = doctor_text
            .iter()
            .any(|text| trigger.phrases.iter().any(|p| text.contains(p)));
        if found {
            lines.push(trigger.line.to_string());
        }
    }

    if lines.is_empty() {
        let fallback = match target {
            Target::FollowUp => DEFAULT_FOLLOW_UP,
            Target::Advice => DEFAULT_ADVICE,
        };
        lines.push(fallback.to_string());
    }

    lines
}

fn boilerplate(category: DiagnosisCategory, target: Target) -> &'static [&'static str] {
    match (category, target) {
        (DiagnosisCategory::Musculoskeletal, Target::FollowUp) => &[
            "Return if pain worsens or persists beyond 2 weeks",
            "Seek immediate care for numbness, weakness, or loss of bladder control",
        ],
        (DiagnosisCategory::Musculoskeletal, Target::Advice) => &[
            "Avoid heavy lifting and prolonged sitting",
            "Stay gently active; short walks help recovery",
        ],
        (DiagnosisCategory::Respiratory, Target::FollowUp) => &[
            "Return if symptoms worsen or persist beyond 7 days",
            "Seek immediate care if fever exceeds 103°F (39.4°C)",
            "Virtual check-up in 3 days if no improvement",
        ],
        (DiagnosisCategory::Respiratory, Target::Advice) => &[
            "Drink plenty of warm fluids",
            "Wash hands frequently to avoid spreading infection",
        ],
        (DiagnosisCategory::Headache, Target::FollowUp) => &[
            "Return if headaches become more frequent or severe",
            "Seek immediate care for a sudden severe headache or vision changes",
        ],
        (DiagnosisCategory::Headache, Target::Advice) => &[
            "Keep a headache diary to identify triggers",
            "Limit screen time and keep a regular sleep schedule",
        ],
        (DiagnosisCategory::Symptomatic, _) => &[],
    }
}
