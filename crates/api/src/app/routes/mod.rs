use axum::Router;

pub mod expenses;
pub mod families;
pub mod system;

/// Router for all endpoints that act on behalf of a caller.
pub fn router() -> Router {
    Router::new()
        .nest("/families", families::router())
        .nest("/expenses", expenses::router())
}

/// Serialize a successful result with `status`, or map the error.
pub(crate) fn respond<T: serde::Serialize>(
    status: axum::http::StatusCode,
    result: famledger_households::HouseholdResult<T>,
) -> axum::response::Response {
    use axum::response::IntoResponse;

    match result {
        Ok(body) => (status, axum::Json(body)).into_response(),
        Err(e) => crate::app::errors::household_error_to_response(e),
    }
}
