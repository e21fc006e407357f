use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use super::enums::Speaker;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub name: String,
    /// Accepts a number or a numeric string; anything else reads as unknown.
    #[serde(default, deserialize_with = "lenient_age")]
    pub age: Option<u32>,
    /// Biological sex as reported by the service.
    #[serde(default, alias = "gender")]
    pub sex: String,
}

/// One utterance in the consultation transcript.
///
/// On the wire a turn carries exactly one of `patient` or `doctor`;
/// anything else is rejected during deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireTurn", into = "WireTurn")]
pub struct DialogueTurn {
    pub speaker: Speaker,
    pub text: String,
    pub timestamp: Option<String>,
}

impl DialogueTurn {
    pub fn patient(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Patient,
            text: text.into(),
            timestamp: None,
        }
    }

    pub fn doctor(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Doctor,
            text: text.into(),
            timestamp: None,
        }
    }

    pub fn at(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn is_doctor(&self) -> bool {
        self.speaker == Speaker::Doctor
    }
}

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parse the timestamp shapes the consultation service emits.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

/// Doctor utterances in transcript order.
pub fn doctor_turns(conversation: &[DialogueTurn]) -> impl Iterator<Item = &DialogueTurn> {
    conversation.iter().filter(|t| t.is_doctor())
}

#[derive(Serialize, Deserialize)]
struct WireTurn {
    #[serde(default, alias = "user", skip_serializing_if = "Option::is_none")]
    patient: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    doctor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
}

impl TryFrom<WireTurn> for DialogueTurn {
    type Error = String;

    fn try_from(wire: WireTurn) -> Result<Self, Self::Error> {
        let (speaker, text) = match (wire.patient, wire.doctor) {
            (Some(text), None) => (Speaker::Patient, text),
            (None, Some(text)) => (Speaker::Doctor, text),
            (Some(_), Some(_)) => {
                return Err("dialogue turn has both patient and doctor text".into())
            }
            (None, None) => return Err("dialogue turn has neither patient nor doctor text".into()),
        };
        Ok(Self {
            speaker,
            text,
            timestamp: wire.timestamp,
        })
    }
}

impl From<DialogueTurn> for WireTurn {
    fn from(turn: DialogueTurn) -> Self {
        let (patient, doctor) = match turn.speaker {
            Speaker::Patient => (Some(turn.text), None),
            Speaker::Doctor => (None, Some(turn.text)),
        };
        Self {
            patient,
            doctor,
            timestamp: turn.timestamp,
        }
    }
}

/// The latest consultation as served by `/consultations/latest`.
///
/// Treated as immutable: a newer record replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsultationRecord {
    pub patient: Patient,
    #[serde(default, alias = "consultation_date")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "text_or_list")]
    pub symptoms: String,
    #[serde(default, deserialize_with = "text_or_list")]
    pub medical_history: String,
    #[serde(default, alias = "medications", deserialize_with = "text_or_list")]
    pub current_medications: String,
    /// Chronological transcript, kept exactly in received order.
    #[serde(default, alias = "conversation_history")]
    pub conversation: Vec<DialogueTurn>,
    /// Total call duration in whole seconds. Fractional input is rounded.
    #[serde(default, deserialize_with = "rounded_seconds")]
    pub call_duration: u64,
}

impl ConsultationRecord {
    /// Reject records that parsed but carry no usable patient identity.
    pub fn validate(&self) -> Result<(), String> {
        if self.patient.name.trim().is_empty() {
            return Err("patient name is empty".into());
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Whole(u64),
    Fractional(f64),
    Text(String),
}

impl LooseNumber {
    fn as_f64(&self) -> Option<f64> {
        match self {
            LooseNumber::Whole(n) => Some(*n as f64),
            LooseNumber::Fractional(f) => Some(*f),
            LooseNumber::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

fn lenient_age<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<LooseNumber>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|n| n.as_f64())
        .filter(|age| age.is_finite() && *age >= 0.0 && *age <= u32::MAX as f64)
        .map(|age| age.round() as u32))
}

fn rounded_seconds<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<LooseNumber>::deserialize(deserializer)?;
    match raw {
        None => Ok(0),
        Some(LooseNumber::Whole(n)) => Ok(n),
        Some(other) => match other.as_f64() {
            Some(secs) if secs.is_finite() => Ok(secs.max(0.0).round() as u64),
            _ => Err(serde::de::Error::custom("call_duration is not a number")),
        },
    }
}

/// Free text, or a list of entries joined with `", "`.
///
/// Older agent versions store history and medications as lists; objects in
/// a list contribute their string fields.
fn text_or_list<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;

    fn flatten(value: &Value) -> Option<String> {
        match value {
            Value::Null => None,
            Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Array(items) => {
                let parts: Vec<String> = items.iter().filter_map(flatten).collect();
                Some(parts.join(", ")).filter(|s| !s.is_empty())
            }
            Value::Object(fields) => {
                let parts: Vec<String> = fields.values().filter_map(flatten).collect();
                Some(parts.join(" ")).filter(|s| !s.is_empty())
            }
        }
    }

    let value = Value::deserialize(deserializer)?;
    Ok(flatten(&value).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECORD_JSON: &str = r#"{
        "patient": {"name": "John Doe", "age": 32, "gender": "male"},
        "date": "2025-03-13T23:35:18.868507",
        "symptoms": "back pain for three days",
        "medical_history": "pneumonia at age 5",
        "current_medications": "none",
        "conversation": [
            {"doctor": "What brings you in today?", "timestamp": "2025-03-13T23:30:00"},
            {"patient": "My lower back hurts.", "timestamp": "2025-03-13T23:30:10"},
            {"doctor": "Based on what you've told me, this is a strain.", "timestamp": "2025-03-13T23:31:00"}
        ],
        "call_duration": 312
    }"#;

    #[test]
    fn parses_full_record() {
        let record: ConsultationRecord = serde_json::from_str(RECORD_JSON).unwrap();
        assert_eq!(record.patient.name, "John Doe");
        assert_eq!(record.patient.age, Some(32));
        assert_eq!(record.patient.sex, "male");
        assert_eq!(record.call_duration, 312);
        assert_eq!(record.conversation.len(), 3);
        assert_eq!(record.conversation[1].speaker, Speaker::Patient);
        assert_eq!(doctor_turns(&record.conversation).count(), 2);
    }

    #[test]
    fn conversation_order_preserved() {
        let record: ConsultationRecord = serde_json::from_str(RECORD_JSON).unwrap();
        let texts: Vec<&str> = record.conversation.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "What brings you in today?",
                "My lower back hurts.",
                "Based on what you've told me, this is a strain.",
            ]
        );
    }

    #[test]
    fn missing_patient_rejected() {
        let result: Result<ConsultationRecord, _> =
            serde_json::from_str(r#"{"symptoms": "cough"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn turn_with_both_speakers_rejected() {
        let json = r#"{"patient": {"name": "A"}, "conversation": [{"patient": "hi", "doctor": "hello"}]}"#;
        let err = serde_json::from_str::<ConsultationRecord>(json).unwrap_err();
        assert!(err.to_string().contains("both patient and doctor"));
    }

    #[test]
    fn turn_with_no_speaker_rejected() {
        let json = r#"{"patient": {"name": "A"}, "conversation": [{"timestamp": "x"}]}"#;
        assert!(serde_json::from_str::<ConsultationRecord>(json).is_err());
    }

    #[test]
    fn turn_serializes_with_single_speaker_key() {
        let json = serde_json::to_string(&DialogueTurn::doctor("Rest well").at("t1")).unwrap();
        assert_eq!(json, r#"{"doctor":"Rest well","timestamp":"t1"}"#);
    }

    #[test]
    fn empty_name_fails_validation() {
        let json = r#"{"patient": {"name": "  "}}"#;
        let record: ConsultationRecord = serde_json::from_str(json).unwrap();
        assert!(record.validate().is_err());
    }

    /// Record exactly as the phone agent saves it.
    const AGENT_RECORD_JSON: &str = r#"{
        "patient": {"name": "Maria Lopez", "age": "41", "sex": "female"},
        "consultation_date": "2025-03-14T09:12:44.120931",
        "symptoms": "Sore throat and a runny nose since Monday",
        "medical_history": "Asthma as a child",
        "medications": "Ibuprofen occasionally",
        "conversation_history": [
            {"user": "Hi, I need some help", "timestamp": "2025-03-14T09:07:31.554120"},
            {"doctor": "Hello, could you tell me your name, age, and biological sex?", "timestamp": "2025-03-14T09:07:33.001200"},
            {"user": "Maria Lopez, 41, female", "timestamp": "2025-03-14T09:07:50.331001"},
            {"doctor": "Based on what you've described, this sounds like a cold. Get plenty of rest.", "timestamp": "2025-03-14T09:12:40.900000"}
        ],
        "call_duration": 312.57
    }"#;

    #[test]
    fn parses_phone_agent_record() {
        let record: ConsultationRecord = serde_json::from_str(AGENT_RECORD_JSON).unwrap();
        assert_eq!(record.patient.age, Some(41));
        assert_eq!(record.date.as_deref(), Some("2025-03-14T09:12:44.120931"));
        assert_eq!(record.current_medications, "Ibuprofen occasionally");
        assert_eq!(record.conversation.len(), 4);
        assert_eq!(record.conversation[0].speaker, Speaker::Patient);
        assert_eq!(record.call_duration, 313);
        assert_eq!(doctor_turns(&record.conversation).count(), 2);
    }

    #[test]
    fn user_turn_serializes_as_patient() {
        let record: ConsultationRecord = serde_json::from_str(AGENT_RECORD_JSON).unwrap();
        let json = serde_json::to_string(&record.conversation[0]).unwrap();
        assert!(json.starts_with(r#"{"patient":"Hi, I need some help""#));
    }

    #[test]
    fn non_numeric_age_reads_as_unknown() {
        let json = r#"{"patient": {"name": "A", "age": "patient age as number"}}"#;
        let record: ConsultationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.patient.age, None);

        let json = r#"{"patient": {"name": "A", "age": null}}"#;
        let record: ConsultationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.patient.age, None);
    }

    #[test]
    fn list_history_joined_into_text() {
        let json = r#"{"patient": {"name": "A"}, "medical_history": ["asthma", {"condition": "pneumonia"}]}"#;
        let record: ConsultationRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.medical_history, "asthma, pneumonia");
    }

    #[test]
    fn non_numeric_duration_rejected() {
        let json = r#"{"patient": {"name": "A"}, "call_duration": "long"}"#;
        assert!(serde_json::from_str::<ConsultationRecord>(json).is_err());
    }
}
