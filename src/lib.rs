pub mod config;
pub mod models;
pub mod pipeline; // Fetch/refresh controller + keyword classification
pub mod source; // HTTP, local directory, bundled sample
pub mod views; // Screen view models

use tracing_subscriber::EnvFilter;

use crate::config::PipelineConfig;
use crate::pipeline::{ConsultationPipeline, PipelineSnapshot};
use crate::source::HttpConsultationSource;
use crate::views::{ConsultationView, HistoryView, ProfileView, TreatmentView};

pub fn run() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    tracing::info!("Careview starting v{}", config::APP_VERSION);

    // Timer and network callbacks share one thread.
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build async runtime");
            return;
        }
    };

    runtime.block_on(run_console(PipelineConfig::from_env()));

    tracing::info!("Careview stopped");
}

/// Run the pipeline and log each new snapshot until Ctrl+C.
pub async fn run_console(config: PipelineConfig) {
    let source = match HttpConsultationSource::from_config(&config) {
        Ok(source) => source,
        Err(e) => {
            tracing::error!(error = %e, "Failed to create consultation client");
            return;
        }
    };

    tracing::info!(url = %config.latest_url(), "Polling consultation service");

    let handle = ConsultationPipeline::new(source, &config).start();
    let mut snapshots = handle.subscribe();

    render(&handle.current());

    loop {
        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                render(&snapshot);
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Ctrl+C received, stopping pipeline");
                break;
            }
        }
    }

    handle.stop().await;
}

fn render(snapshot: &PipelineSnapshot) {
    let consultation = ConsultationView::from_snapshot(snapshot);
    let treatment = TreatmentView::from_snapshot(snapshot);

    if let Some(banner) = &consultation.banner {
        tracing::warn!("{banner}");
    }

    tracing::info!(
        patient = %consultation.patient_name,
        date = consultation.date_label.as_deref().unwrap_or("unknown date"),
        origin = %consultation.origin,
        revision = consultation.revision,
        diagnosis = %consultation.diagnosis,
        medications = treatment.medications.len(),
        "Consultation summary"
    );

    let screens = serde_json::json!({
        "consultation": consultation,
        "treatments": treatment,
        "profile": ProfileView::from_snapshot(snapshot),
        "history": HistoryView::from_snapshot(snapshot),
    });
    match serde_json::to_string_pretty(&screens) {
        Ok(json) => tracing::debug!("Screens:\n{json}"),
        Err(e) => tracing::warn!(error = %e, "Failed to serialize screens"),
    }
}
