//! Spreadsheet export route.
//!
//! One CSV file with two sections, `EMPLOYEES` then `LEAVE REQUESTS`, each
//! with its own header row.

use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use serde::Serialize;
use tracing::info;

use crate::error::{app_error_response, error_response, forbidden};
use crate::{AppState, middleware::AuthUser};
use leaveflow_core::export::ExportSnapshot;
use leaveflow_shared::AppError;

/// Creates the export routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/export", get(export_csv))
}

/// Writes one titled section.
fn write_section<T: Serialize>(out: &mut Vec<u8>, title: &str, rows: &[T]) -> Result<(), csv::Error> {
    out.extend_from_slice(title.as_bytes());
    out.push(b'\n');
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let body = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    out.extend_from_slice(&body);
    Ok(())
}

/// Renders the snapshot as CSV text.
///
/// # Errors
///
/// Returns the `csv` error if a row cannot be serialized.
pub fn render_csv(snapshot: &ExportSnapshot) -> Result<Vec<u8>, csv::Error> {
    let mut out = Vec::new();
    write_section(&mut out, "EMPLOYEES", &snapshot.balances)?;
    out.push(b'\n');
    write_section(&mut out, "LEAVE REQUESTS", &snapshot.requests)?;
    Ok(out)
}

/// GET /export - Download balances and leave requests as CSV.
async fn export_csv(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if !auth.role().can_export() {
        return forbidden("Your role cannot download the export");
    }

    let snapshot = match state.manager.export_snapshot().await {
        Ok(snapshot) => snapshot,
        Err(e) => return error_response(e),
    };
    let body = match render_csv(&snapshot) {
        Ok(body) => body,
        Err(e) => return app_error_response(&AppError::Internal(e.to_string())),
    };

    let filename = format!(
        "leave_management_{}.csv",
        snapshot.generated_at.format("%Y-%m-%d")
    );
    info!(
        exported_by = %auth.employee_id(),
        requests = snapshot.requests.len(),
        "Export downloaded"
    );

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_empty_snapshot_has_both_titles() {
        let snapshot = ExportSnapshot {
            generated_at: Utc::now(),
            balances: Vec::new(),
            requests: Vec::new(),
        };
        let text = String::from_utf8(render_csv(&snapshot).unwrap()).unwrap();
        assert_eq!(text, "EMPLOYEES\n\nLEAVE REQUESTS\n");
    }
}
