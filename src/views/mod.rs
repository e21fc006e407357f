//! Screen view models built from pipeline snapshots.
//!
//! Each screen subscribes to the pipeline independently and rebuilds its
//! view from the latest snapshot. Views are plain serializable data; layout
//! and styling live with the renderer.

pub mod consultation;
pub mod history;
pub mod profile;
pub mod treatments;

use chrono::NaiveDateTime;

pub use crate::models::parse_timestamp;
pub use consultation::ConsultationView;
pub use history::HistoryView;
pub use profile::ProfileView;
pub use treatments::TreatmentView;

/// "March 13, 2025"
pub fn format_date(ts: &NaiveDateTime) -> String {
    ts.format("%B %-d, %Y").to_string()
}

/// "11:35 PM"
pub fn format_time(ts: &NaiveDateTime) -> String {
    ts.format("%-I:%M %p").to_string()
}

/// Call duration as `m:ss`, or `h:mm:ss` from one hour up.
pub fn format_duration(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// "male" → "Male"
pub(crate) fn capitalize(text: &str) -> String {
    let mut chars = text.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
