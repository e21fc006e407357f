pub mod consultation;
pub mod diagnosis;
pub mod enums;
pub mod medication;
pub mod treatment;

pub use consultation::{doctor_turns, parse_timestamp, ConsultationRecord, DialogueTurn, Patient};
pub use diagnosis::DiagnosisClassification;
pub use enums::{ClassificationBasis, DiagnosisCategory, RecordOrigin, Speaker};
pub use medication::MedicationRecommendation;
pub use treatment::{Prescription, SavedSymptom, SavedTreatment};
