//! Where consultation records come from.
//!
//! - `http`: the consultation service (`GET /consultations/latest`)
//! - `local`: a directory of saved JSON consultations, used as fallback
//! - `sample`: the record bundled into the binary, used when all else fails

pub mod http;
pub mod local;
pub mod sample;

use std::future::Future;

use serde::Serialize;
use thiserror::Error;

use crate::models::ConsultationRecord;

pub use http::HttpConsultationSource;
pub use local::{LocalConsultationStore, LocalSnapshot, LocalStoreError, StoredFile};

/// Coarse class of a fetch failure, as shown to the patient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchErrorKind {
    /// Connection refused, DNS failure, timeout.
    Network,
    /// Non-success HTTP status.
    Protocol,
    /// Body missing `patient` or not a consultation record.
    MalformedPayload,
}

/// Errors from fetching the latest consultation.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum FetchError {
    #[error("Consultation service is not reachable at {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Consultation service returned error (status {status}): {body}")]
    Status { status: u16, body: String },

    #[error("Consultation payload has no patient")]
    MissingPatient,

    #[error("Malformed consultation payload: {0}")]
    MalformedPayload(String),

    #[error("HTTP client error: {0}")]
    Client(String),
}

impl FetchError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            Self::Connection(_) | Self::Timeout(_) | Self::Client(_) => FetchErrorKind::Network,
            Self::Status { .. } => FetchErrorKind::Protocol,
            Self::MissingPatient | Self::MalformedPayload(_) => FetchErrorKind::MalformedPayload,
        }
    }

    /// Non-fatal banner text for the screens.
    pub fn banner_message(&self) -> String {
        match self {
            Self::Connection(_) | Self::Client(_) => {
                "Unable to reach the consultation service. Showing your last available consultation."
                    .to_string()
            }
            Self::Timeout(_) => {
                "The consultation service is taking too long to respond. Showing your last available consultation."
                    .to_string()
            }
            Self::Status { status, .. } => format!(
                "The consultation service returned an error (status {status}). Showing your last available consultation."
            ),
            Self::MissingPatient | Self::MalformedPayload(_) => {
                "The latest consultation could not be read. Showing your last available consultation."
                    .to_string()
            }
        }
    }
}

/// A remote provider of the latest consultation.
///
/// Implementations must be cheap to call repeatedly; the pipeline calls
/// `fetch_latest` once per polling cycle and never concurrently.
pub trait ConsultationSource: Send + Sync + 'static {
    fn fetch_latest(
        &self,
    ) -> impl Future<Output = Result<ConsultationRecord, FetchError>> + Send;
}

/// Parse a `/consultations/latest` body.
///
/// The `patient` field is checked before full deserialization so a missing
/// identity is reported as such rather than as a generic parse error.
pub fn parse_record(body: &str) -> Result<ConsultationRecord, FetchError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| FetchError::MalformedPayload(e.to_string()))?;

    match value.get("patient") {
        None | Some(serde_json::Value::Null) => return Err(FetchError::MissingPatient),
        Some(_) => {}
    }

    let record: ConsultationRecord =
        serde_json::from_value(value).map_err(|e| FetchError::MalformedPayload(e.to_string()))?;
    record.validate().map_err(FetchError::MalformedPayload)?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_body() {
        let record = parse_record(r#"{"patient": {"name": "Jane"}, "symptoms": "cough"}"#).unwrap();
        assert_eq!(record.patient.name, "Jane");
        assert!(record.conversation.is_empty());
    }

    #[test]
    fn missing_patient_is_classified() {
        let err = parse_record(r#"{"symptoms": "cough"}"#).unwrap_err();
        assert_eq!(err, FetchError::MissingPatient);
        assert_eq!(err.kind(), FetchErrorKind::MalformedPayload);
    }

    #[test]
    fn null_patient_is_missing() {
        let err = parse_record(r#"{"patient": null}"#).unwrap_err();
        assert_eq!(err, FetchError::MissingPatient);
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = parse_record("not json").unwrap_err();
        assert!(matches!(err, FetchError::MalformedPayload(_)));
    }

    #[test]
    fn blank_patient_name_is_malformed() {
        let err = parse_record(r#"{"patient": {"name": ""}}"#).unwrap_err();
        assert!(matches!(err, FetchError::MalformedPayload(_)));
    }

    #[test]
    fn status_banner_includes_code() {
        let err = FetchError::Status {
            status: 503,
            body: "maintenance".into(),
        };
        assert_eq!(err.kind(), FetchErrorKind::Protocol);
        assert!(err.banner_message().contains("503"));
    }

    #[test]
    fn network_errors_share_kind() {
        assert_eq!(FetchError::Timeout(10).kind(), FetchErrorKind::Network);
        assert_eq!(
            FetchError::Connection("http://x".into()).kind(),
            FetchErrorKind::Network
        );
    }

    #[test]
    fn phone_agent_body_keeps_transcript() {
        let body = r#"{
            "patient": {"name": "Sam Park", "age": 29, "sex": "male"},
            "consultation_date": "2025-03-15T18:02:11.000104",
            "symptoms": "Lower back pain after moving furniture",
            "medical_history": "None",
            "medications": "None",
            "conversation_history": [
                {"user": "My back hurts", "timestamp": "2025-03-15T17:58:00.100000"},
                {"doctor": "Based on what you've told me, this looks like a lumbar strain. Apply ice.", "timestamp": "2025-03-15T18:01:59.000000"}
            ],
            "call_duration": 251.9
        }"#;
        let record = parse_record(body).unwrap();
        assert_eq!(record.call_duration, 252);
        assert_eq!(record.current_medications, "None");

        let diagnosis = crate::pipeline::classify::classify_record(&record);
        assert_eq!(diagnosis.basis, crate::models::ClassificationBasis::DoctorAssessment);
    }
}
