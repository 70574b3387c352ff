use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
    },
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::{Span, debug, field, instrument};
use uuid::Uuid;

use assessor::{Assessment, Assessor, extract_text};

use super::error::GatewayError;
use super::state::HandlerState;
use super::{ASSESSMENT_ID_HEADER, ASSESSOR_STATUS_HEADER, STATUS_COMPLETED};

/// Multipart field carrying the CV.
pub const UPLOAD_FIELD: &str = "file";

#[derive(Debug, Deserialize)]
pub struct AssessTextRequest {
    pub text: String,
}

struct Upload {
    filename: Option<String>,
    bytes: Vec<u8>,
}

/// `POST /assess-cv`: multipart upload of a PDF or text CV.
#[instrument(
    skip(state, multipart),
    fields(assessment_id = field::Empty, filename = field::Empty, bytes = field::Empty)
)]
pub async fn assess_cv_handler(
    State(state): State<HandlerState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let assessment_id = start_assessment();

    let result = async {
        let mut multipart =
            multipart.map_err(|rejection| GatewayError::InvalidRequest(rejection.body_text()))?;
        let upload = read_upload(&mut multipart).await?;

        let span = Span::current();
        if let Some(name) = &upload.filename {
            span.record("filename", field::display(name));
        }
        span.record("bytes", upload.bytes.len());

        run_blocking(&state, move |assessor| {
            let text = extract_text(upload.filename.as_deref(), &upload.bytes)?;
            Ok(assessor.assess(&text)?)
        })
        .await
    }
    .await;

    finish(assessment_id, result)
}

/// `POST /v1/assessments`: assess text that was already extracted.
#[instrument(skip(state, request), fields(assessment_id = field::Empty, chars = field::Empty))]
pub async fn assess_text_handler(
    State(state): State<HandlerState>,
    request: Result<Json<AssessTextRequest>, JsonRejection>,
) -> Response {
    let assessment_id = start_assessment();

    let result = async {
        let Json(request) = request.map_err(json_rejection)?;
        Span::current().record("chars", request.text.chars().count());

        run_blocking(&state, move |assessor| Ok(assessor.assess(&request.text)?)).await
    }
    .await;

    finish(assessment_id, result)
}

fn start_assessment() -> Uuid {
    let assessment_id = Uuid::new_v4();
    Span::current().record("assessment_id", field::display(assessment_id));
    assessment_id
}

/// Runs `job` on the blocking pool once a concurrency permit is available.
async fn run_blocking<F>(state: &HandlerState, job: F) -> Result<Assessment, GatewayError>
where
    F: FnOnce(&Assessor) -> Result<Assessment, GatewayError> + Send + 'static,
{
    let permit = state
        .limiter
        .clone()
        .acquire_owned()
        .await
        .map_err(|e| GatewayError::InternalError(format!("assessment limiter closed: {e}")))?;

    let assessor = state.assessor.clone();
    let span = Span::current();

    tokio::task::spawn_blocking(move || {
        let _permit = permit;
        let _entered = span.enter();
        job(&assessor)
    })
    .await
    .map_err(|e| GatewayError::InternalError(format!("assessment task failed: {e}")))?
}

async fn read_upload(multipart: &mut Multipart) -> Result<Upload, GatewayError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            debug!(name = ?field.name(), "Ignoring multipart field");
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;
        return Ok(Upload {
            filename,
            bytes: bytes.to_vec(),
        });
    }

    Err(GatewayError::InvalidRequest(format!(
        "multipart field `{UPLOAD_FIELD}` is required"
    )))
}

fn multipart_error(err: MultipartError) -> GatewayError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        GatewayError::PayloadTooLarge(err.body_text())
    } else {
        GatewayError::InvalidRequest(format!("malformed multipart body: {}", err.body_text()))
    }
}

fn json_rejection(rejection: JsonRejection) -> GatewayError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        GatewayError::PayloadTooLarge(rejection.body_text())
    } else {
        GatewayError::InvalidRequest(rejection.body_text())
    }
}

/// Builds the response and stamps the assessment id on it, success or not.
fn finish(assessment_id: Uuid, result: Result<Assessment, GatewayError>) -> Response {
    let mut response = match result {
        Ok(assessment) => {
            let mut headers = HeaderMap::new();
            headers.insert(
                ASSESSOR_STATUS_HEADER,
                HeaderValue::from_static(STATUS_COMPLETED),
            );
            (StatusCode::OK, headers, Json(assessment)).into_response()
        }
        Err(err) => err.into_response(),
    };

    if let Ok(value) = HeaderValue::from_str(&assessment_id.to_string()) {
        response.headers_mut().insert(ASSESSMENT_ID_HEADER, value);
    }

    response
}
