use std::sync::Arc;

use axum::{
    Router,
    extract::{Extension, Path},
    http::StatusCode,
    routing::{get, post},
};

use famledger_core::FamilyId;
use famledger_households::FamilyPayload;

use crate::app::dto::{self, JsonBody};
use crate::app::routes::respond;
use crate::app::services::AppServices;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_families).post(add_family))
        .route("/:id", get(get_family).put(update_family).delete(delete_family))
        .route("/:id/income", post(update_family_income))
        .route("/:id/expenses", get(list_family_expenses))
        .route("/:id/net-income", get(get_net_family_income))
}

pub async fn list_families(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let hh = services.lock().await;
    let result = hh
        .registry
        .list_families()
        .map(|items| dto::ItemsResponse { items });
    respond(StatusCode::OK, result)
}

pub async fn get_family(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = FamilyId::from(id);

    let hh = services.lock().await;
    respond(StatusCode::OK, hh.registry.get_family(&id))
}

pub async fn add_family(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    JsonBody(body): JsonBody<FamilyPayload>,
) -> axum::response::Response {
    let hh = services.lock().await;
    respond(
        StatusCode::CREATED,
        hh.registry.add_family(principal.principal_id(), body),
    )
}

pub async fn update_family(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<FamilyPayload>,
) -> axum::response::Response {
    let id = FamilyId::from(id);

    let hh = services.lock().await;
    respond(
        StatusCode::OK,
        hh.registry.update_family(principal.principal_id(), &id, body),
    )
}

pub async fn update_family_income(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<dto::IncomeAdjustmentRequest>,
) -> axum::response::Response {
    let id = FamilyId::from(id);

    let hh = services.lock().await;
    respond(
        StatusCode::OK,
        hh.registry
            .update_family_income(principal.principal_id(), &id, body.delta),
    )
}

pub async fn delete_family(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = FamilyId::from(id);

    let hh = services.lock().await;
    respond(
        StatusCode::OK,
        hh.registry.delete_family(principal.principal_id(), &id),
    )
}

pub async fn list_family_expenses(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = FamilyId::from(id);

    let hh = services.lock().await;
    let result = hh
        .ledger
        .list_family_expenses(&id)
        .map(|items| dto::ItemsResponse { items });
    respond(StatusCode::OK, result)
}

pub async fn get_net_family_income(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = FamilyId::from(id);

    let hh = services.lock().await;
    let result = hh
        .ledger
        .net_family_income(&id)
        .map(|net_income| dto::NetIncomeResponse {
            family_id: id,
            net_income,
        });
    respond(StatusCode::OK, result)
}
