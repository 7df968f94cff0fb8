use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use famledger_core::DomainError;
use famledger_households::HouseholdError;

pub fn household_error_to_response(err: HouseholdError) -> axum::response::Response {
    match err {
        HouseholdError::Domain(e) => domain_error_to_response(e),
        HouseholdError::Store(e) => {
            tracing::error!(error = %e, "store failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", e.to_string())
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::NotFound(msg) => json_error(StatusCode::NOT_FOUND, "not_found", msg),
        DomainError::Unauthorized(msg) => json_error(StatusCode::FORBIDDEN, "unauthorized", msg),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
