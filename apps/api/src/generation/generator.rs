//! Resume generation: validates a record, renders it, stores it, and returns
//! where it can be downloaded.
//!
//! Flow: validate → derive filename → render (spawn_blocking) → store.put
//!       (awaited durable write) → retrieval reference.
//!
//! Nothing is stored unless validation passed, and a reference is returned only
//! after the store reports the write as committed.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::{GeneratedDocument, ResumeRecord};
use crate::render::{render_resume, Template};
use crate::resume::validation::{validate, ValidationLimits};
use crate::storage::DocumentStore;

pub const FILENAME_PREFIX: &str = "SmartCV";
pub const FILENAME_EXTENSION: &str = "pdf";

/// Request-independent inputs to the pipeline, built once at startup.
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    /// Public prefix the filename is appended to, e.g. `https://cv.example.com/resumes`.
    pub public_base_url: String,
    pub limits: ValidationLimits,
}

/// `SmartCV_<unix millis>_<uuid v4>.pdf`. The random suffix keeps concurrent
/// requests in the same millisecond apart.
pub fn new_filename(now: DateTime<Utc>) -> String {
    format!(
        "{FILENAME_PREFIX}_{}_{}.{FILENAME_EXTENSION}",
        now.timestamp_millis(),
        Uuid::new_v4().simple()
    )
}

pub fn retrieval_reference(public_base_url: &str, filename: &str) -> String {
    format!("{}/{}", public_base_url.trim_end_matches('/'), filename)
}

/// Runs the full pipeline for one submitted record.
pub async fn generate_resume(
    record: ResumeRecord,
    store: &dyn DocumentStore,
    settings: &GenerationSettings,
) -> Result<GeneratedDocument, AppError> {
    if let Err(errors) = validate(&record, &settings.limits) {
        if let Some(first) = errors.first() {
            info!(
                "Rejected incomplete resume: {} field error(s), first '{}'",
                errors.len(),
                first.field
            );
        }
        return Err(AppError::Validation(errors));
    }

    let filename = new_filename(Utc::now());
    let template = Template::from_identifier(record.template.as_deref());

    // CPU-bound layout + serialisation: spawn_blocking to avoid blocking the async executor.
    let bytes = tokio::task::spawn_blocking(move || render_resume(&record, template))
        .await
        .map_err(|e| generation_failed(&filename, format!("render task failed: {e}")))?
        .map_err(|e| generation_failed(&filename, e.to_string()))?;

    let stored = store
        .put(&filename, Bytes::from(bytes))
        .await
        .map_err(|e| generation_failed(&filename, e.to_string()))?;

    info!(
        "PDF generated: {} ({} bytes, template {:?})",
        filename, stored.size, template
    );

    Ok(GeneratedDocument {
        retrieval_reference: retrieval_reference(&settings.public_base_url, &filename),
        storage_location: stored.location,
        filename,
    })
}

fn generation_failed(filename: &str, reason: String) -> AppError {
    error!("PDF generation failed for {filename}: {reason}");
    AppError::Generation(format!("{filename}: {reason}"))
}
