use serde::Serialize;

use super::{format_date, format_duration, format_time, parse_timestamp};
use crate::models::{RecordOrigin, Speaker};
use crate::pipeline::PipelineSnapshot;

/// One transcript line on the consultation screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptLine {
    pub speaker: Speaker,
    pub text: String,
    pub time_label: Option<String>,
}

/// Consultation summary screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsultationView {
    pub patient_name: String,
    pub patient_age: Option<u32>,
    pub patient_sex: String,
    pub date_label: Option<String>,
    pub time_label: Option<String>,
    pub symptoms: String,
    pub diagnosis: String,
    pub alternatives: Vec<String>,
    pub confidence: String,
    pub transcript: Vec<TranscriptLine>,
    pub call_duration: String,
    pub origin: RecordOrigin,
    pub banner: Option<String>,
    pub revision: u64,
}

impl ConsultationView {
    pub fn from_snapshot(snapshot: &PipelineSnapshot) -> Self {
        let record = &snapshot.record;
        let diagnosis = &snapshot.summary.diagnosis;
        let visited_at = record.date.as_deref().and_then(parse_timestamp);

        let transcript = record
            .conversation
            .iter()
            .map(|turn| TranscriptLine {
                speaker: turn.speaker,
                text: turn.text.clone(),
                time_label: turn
                    .timestamp
                    .as_deref()
                    .and_then(parse_timestamp)
                    .map(|ts| format_time(&ts)),
            })
            .collect();

        Self {
            patient_name: record.patient.name.clone(),
            patient_age: record.patient.age,
            patient_sex: record.patient.sex.clone(),
            date_label: visited_at.as_ref().map(format_date),
            time_label: visited_at.as_ref().map(format_time),
            symptoms: record.symptoms.clone(),
            diagnosis: diagnosis.primary.clone(),
            alternatives: diagnosis.alternatives.clone(),
            confidence: diagnosis.confidence.clone(),
            transcript,
            call_duration: format_duration(record.call_duration),
            origin: snapshot.origin,
            banner: snapshot.banner(),
            revision: snapshot.revision,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::sample::bundled_record;
    use crate::source::FetchError;

    #[test]
    fn sample_consultation_view() {
        let snapshot = PipelineSnapshot::new(bundled_record(), RecordOrigin::BundledSample);
        let view = ConsultationView::from_snapshot(&snapshot);
        assert_eq!(view.patient_name, "John Doe");
        assert_eq!(view.date_label.as_deref(), Some("March 13, 2025"));
        assert_eq!(view.time_label.as_deref(), Some("11:35 PM"));
        assert_eq!(view.diagnosis, "Upper Respiratory Tract Infection (Common Cold)");
        assert_eq!(view.call_duration, "5:18");
        assert_eq!(view.transcript.len(), 5);
        assert_eq!(view.transcript[0].speaker, Speaker::Doctor);
        assert_eq!(view.transcript[0].time_label.as_deref(), Some("11:30 PM"));
        assert!(view.banner.is_none());
    }

    #[test]
    fn unparseable_date_leaves_labels_empty() {
        let mut record = bundled_record();
        record.date = Some("last Tuesday".into());
        let view = ConsultationView::from_snapshot(&PipelineSnapshot::new(
            record,
            RecordOrigin::BundledSample,
        ));
        assert!(view.date_label.is_none());
        assert!(view.time_label.is_none());
    }

    #[test]
    fn banner_follows_snapshot_error() {
        let mut snapshot = PipelineSnapshot::new(bundled_record(), RecordOrigin::BundledSample);
        snapshot.error = Some(FetchError::Status {
            status: 502,
            body: String::new(),
        });
        let view = ConsultationView::from_snapshot(&snapshot);
        assert!(view.banner.unwrap().contains("502"));
    }
}
