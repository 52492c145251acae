use super::PERSIST_STATUS_HEADER;
use crate::error::AppError;
use crate::form::RecordForm;
use crate::state::AppState;
use crate::store::PersistOutcome;
use crate::views::{records_page, FormView};
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::header::{self, HeaderName, HeaderValue};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;
use billing::{sum_amounts, Record};
use serde::Serialize;
use std::sync::Arc;
use template::InvoiceRenderer;

/// GET / - empty creation form
pub async fn index() -> Html<String> {
    Html(FormView::create().render())
}

/// POST /generate - save the submitted record and return its PDF
///
/// Saving is best-effort; a failed insert is flagged in a response header and
/// the PDF is still produced.
pub async fn generate(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let record = parse_record(&body)?;

    let saved = state.store.insert(&record).await;
    if let Ok(id) = &saved {
        tracing::info!(id, total = %record.total, "Record saved");
    }
    let outcome = PersistOutcome::from_result("Insert", saved);

    let filename = record.download_filename("document");
    let pdf = render_pdf(&state, record).await?;

    let mut response = pdf_response(pdf, &filename);
    if !outcome.is_persisted() {
        response.headers_mut().insert(
            HeaderName::from_static(PERSIST_STATUS_HEADER),
            HeaderValue::from_static("failed"),
        );
    }
    Ok(response)
}

/// GET /records - every record with the grand total
pub async fn records(State(state): State<AppState>) -> Html<String> {
    let records = state.store.fetch_all().await.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Fetch records failed");
        Vec::new()
    });
    let grand_total = sum_amounts(records.iter().map(|r| r.total));

    Html(records_page(&records, grand_total))
}

/// GET /print/:id - PDF of a saved record
pub async fn print(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let record = find_record(&state, id).await?;
    let filename = record.download_filename(&format!("record_{id}"));
    let pdf = render_pdf(&state, record).await?;

    Ok(pdf_response(pdf, &filename))
}

/// GET /edit/:id - form pre-filled with a saved record
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Html<String>, AppError> {
    let record = find_record(&state, id).await?;
    Ok(Html(FormView::edit(id, &record).render()))
}

/// POST /update/:id
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<Redirect, AppError> {
    let record = parse_record(&body)?;
    let outcome = PersistOutcome::from_result("Update", state.store.update(id, &record).await);
    if outcome.is_persisted() {
        tracing::info!(id, "Record updated");
    }
    Ok(Redirect::to("/records"))
}

/// POST /delete/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> Redirect {
    let outcome = PersistOutcome::from_result("Delete", state.store.delete(id).await);
    if outcome.is_persisted() {
        tracing::info!(id, "Record deleted");
    }
    Redirect::to("/records")
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

fn parse_record(body: &[u8]) -> Result<Record, AppError> {
    let form = RecordForm::parse(body).map_err(|e| AppError::BadRequest(e.to_string()))?;
    Ok(form.into_record())
}

async fn find_record(state: &AppState, id: i64) -> Result<Record, AppError> {
    state
        .store
        .fetch_one(id)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .ok_or(AppError::NotFound)
}

async fn render_pdf(state: &AppState, record: Record) -> Result<Vec<u8>, AppError> {
    let layout = Arc::clone(&state.layout);
    let template_path = Arc::clone(&state.template_path);

    let pdf = tokio::task::spawn_blocking(move || {
        InvoiceRenderer::new(&layout).render_file(template_path.as_path(), &record)
    })
    .await??;
    Ok(pdf)
}

fn pdf_response(pdf: Vec<u8>, filename: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, content_disposition(filename)),
        ],
        pdf,
    )
        .into_response()
}

/// `attachment` disposition with an ASCII fallback and a UTF-8 `filename*`
pub fn content_disposition(filename: &str) -> String {
    let ascii: String = filename
        .chars()
        .map(|c| if c.is_ascii() && c != '"' && c != '\\' { c } else { '_' })
        .collect();

    let mut encoded = String::with_capacity(filename.len());
    for byte in filename.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'!'
            | b'#'
            | b'$'
            | b'&'
            | b'+'
            | b'-'
            | b'.'
            | b'^'
            | b'_'
            | b'`'
            | b'|'
            | b'~' => encoded.push(byte as char),
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }

    format!("attachment; filename=\"{ascii}\"; filename*=UTF-8''{encoded}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_ascii() {
        assert_eq!(
            content_disposition("Acme.pdf"),
            "attachment; filename=\"Acme.pdf\"; filename*=UTF-8''Acme.pdf"
        );
    }

    #[test]
    fn test_content_disposition_non_ascii() {
        assert_eq!(
            content_disposition("Café_(1).pdf"),
            "attachment; filename=\"Caf__(1).pdf\"; filename*=UTF-8''Caf%C3%A9_%281%29.pdf"
        );
    }
}
