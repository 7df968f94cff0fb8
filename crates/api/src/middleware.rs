use axum::{
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};

use famledger_auth::PrincipalId;

use crate::context::PrincipalContext;

/// Header carrying the caller identity, as established by the fronting
/// gateway.
pub const PRINCIPAL_HEADER: &str = "x-principal-id";

pub async fn principal_middleware(
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let principal = extract_principal(req.headers())?;
    tracing::debug!(principal = %principal, path = %req.uri().path(), "request");

    req.extensions_mut().insert(PrincipalContext::new(principal));

    Ok(next.run(req).await)
}

fn extract_principal(headers: &HeaderMap) -> Result<PrincipalId, StatusCode> {
    let header = headers
        .get(PRINCIPAL_HEADER)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    PrincipalId::parse(header).map_err(|_| StatusCode::UNAUTHORIZED)
}
