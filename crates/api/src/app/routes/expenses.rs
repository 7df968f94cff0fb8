use std::sync::Arc;

use axum::{
    Router,
    extract::{Extension, Path},
    http::StatusCode,
    routing::{delete, post},
};

use famledger_core::ExpenseId;
use famledger_households::FamilyExpensePayload;

use crate::app::dto::JsonBody;
use crate::app::routes::respond;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(add_family_expense))
        .route("/:id", delete(delete_family_expense))
}

pub async fn add_family_expense(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    JsonBody(body): JsonBody<FamilyExpensePayload>,
) -> axum::response::Response {
    let hh = services.lock().await;
    respond(
        StatusCode::CREATED,
        hh.ledger.add_family_expense(principal.principal_id(), body),
    )
}

/// Responds `{ "outcome": "deleted" | "orphan_cleanup", "expense": {..} }`.
pub async fn delete_family_expense(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = ExpenseId::from(id);

    let hh = services.lock().await;
    respond(
        StatusCode::OK,
        hh.ledger.delete_family_expense(principal.principal_id(), &id),
    )
}
