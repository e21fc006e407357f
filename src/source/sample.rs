use crate::models::{ConsultationRecord, DialogueTurn, Patient};

/// The consultation shown when neither the service nor the local
/// directory has anything to offer.
pub fn bundled_record() -> ConsultationRecord {
    ConsultationRecord {
        patient: Patient {
            name: "John Doe".into(),
            age: Some(32),
            sex: "male".into(),
        },
        date: Some("2025-03-13T23:35:18.868507".into()),
        symptoms: "Feeling cold, headaches and sneezing for the past 2 days".into(),
        medical_history: "Pneumonia at age 5".into(),
        current_medications: "None".into(),
        conversation: vec![
            DialogueTurn::doctor(
                "Hello, I'm here to help you today. Can you please share your symptoms with me?",
            )
            .at("2025-03-13T23:30:02"),
            DialogueTurn::patient(
                "I've been feeling cold for two days, with headaches and a lot of sneezing.",
            )
            .at("2025-03-13T23:30:21"),
            DialogueTurn::doctor("Have you had a fever or any trouble breathing?")
                .at("2025-03-13T23:31:05"),
            DialogueTurn::patient("No fever that I noticed, and my breathing is fine.")
                .at("2025-03-13T23:31:19"),
            DialogueTurn::doctor(
                "Based on what you've told me, this sounds like a common cold. Get some rest and drink plenty of fluids.",
            )
            .at("2025-03-13T23:33:40"),
        ],
        call_duration: 318,
    }
}
