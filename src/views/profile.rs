use serde::Serialize;

use super::capitalize;
use crate::pipeline::PipelineSnapshot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmergencyContact {
    pub name: String,
    pub relationship: String,
    pub phone: String,
}

/// Profile screen: identity from the current record, the rest bundled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileView {
    pub name: String,
    pub patient_id: String,
    pub age: Option<u32>,
    pub sex: String,
    pub blood_type: String,
    pub emergency_contact: EmergencyContact,
}

impl ProfileView {
    /// Bundled profile shown before any consultation is known.
    pub fn sample() -> Self {
        Self {
            name: "John Doe".into(),
            patient_id: "#12345".into(),
            age: Some(32),
            sex: "Male".into(),
            blood_type: "O+".into(),
            emergency_contact: EmergencyContact {
                name: "Jane Doe".into(),
                relationship: "Spouse".into(),
                phone: "+1 (555) 123-4567".into(),
            },
        }
    }

    pub fn from_snapshot(snapshot: &PipelineSnapshot) -> Self {
        let patient = &snapshot.record.patient;
        let mut view = Self::sample();
        view.name = patient.name.clone();
        view.age = patient.age;
        if !patient.sex.trim().is_empty() {
            view.sex = capitalize(&patient.sex);
        }
        view
    }
}
