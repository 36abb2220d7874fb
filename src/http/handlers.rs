//! Request handlers. Each one maps a request onto a [`CatalogApp`] operation.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Form, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::app::{AppStatus, CatalogApp, Prediction};
use crate::catalog::{DISPLAY_COLUMNS, NewVehicle, VehicleRow};
use crate::error::{CatalogError, CatalogResult};
use crate::orders::{OrderRecord, PurchaseRequest};
use crate::paging::Page;

pub type AppState = Arc<CatalogApp>;

/// `?page=N`. Missing or unparsable values mean page 1.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    page: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(1)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PredictForm {
    pub price: String,
    pub seats: String,
}

#[derive(Debug, Serialize)]
pub struct VehicleListing {
    pub columns: &'static [&'static str],
    #[serde(flatten)]
    pub page: Page<VehicleRow>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct PurchaseResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("request handler failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Catalog(CatalogError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            Self::Catalog(CatalogError::MissingAsset { .. } | CatalogError::ModelUnavailable) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            Self::Catalog(_) | Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Catalog(e) if e.is_user_error() => "invalid_input",
            Self::Catalog(e) if e.is_unavailable() => "unavailable",
            Self::Catalog(CatalogError::Model(_)) => "model",
            Self::Catalog(_) => "store",
            Self::Task(_) => "internal",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("[http] {self}");
        } else {
            tracing::debug!("[http] rejected: {self}");
        }
        let body = ErrorBody {
            error: self.to_string(),
            kind: self.kind(),
        };
        (status, Json(body)).into_response()
    }
}

/// Run a store-touching operation on the blocking pool.
async fn run_blocking<T, F>(app: &AppState, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&CatalogApp) -> CatalogResult<T> + Send + 'static,
{
    let app = Arc::clone(app);
    let result = tokio::task::spawn_blocking(move || f(&app)).await?;
    Ok(result?)
}

pub async fn health() -> &'static str {
    "OK"
}

pub async fn status(State(app): State<AppState>) -> Json<AppStatus> {
    Json(app.status())
}

pub async fn list_vehicles(
    State(app): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<VehicleListing>, ApiError> {
    let page = query.page();
    let page = run_blocking(&app, move |app| app.list_page(page)).await?;
    Ok(Json(VehicleListing {
        columns: &DISPLAY_COLUMNS,
        page,
    }))
}

pub async fn add_vehicle(
    State(app): State<AppState>,
    Form(input): Form<NewVehicle>,
) -> Result<Redirect, ApiError> {
    run_blocking(&app, move |app| app.add_vehicle(input)).await?;
    Ok(Redirect::to("/vehicles"))
}

pub async fn predict(
    State(app): State<AppState>,
    Query(query): Query<PageQuery>,
    Form(form): Form<PredictForm>,
) -> Result<Json<Prediction>, ApiError> {
    let page = query.page();
    let prediction =
        run_blocking(&app, move |app| app.predict(&form.price, &form.seats, page)).await?;
    Ok(Json(prediction))
}

pub async fn submit_order(
    State(app): State<AppState>,
    payload: Result<Json<PurchaseRequest>, JsonRejection>,
) -> (StatusCode, Json<PurchaseResponse>) {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return (
                rejection.status(),
                Json(PurchaseResponse {
                    success: false,
                    error: Some(rejection.body_text()),
                }),
            );
        }
    };

    match run_blocking(&app, move |app| app.submit_order(request)).await {
        Ok(order) => {
            crate::debug_event!("http", "order recorded", "{}", order.vehicle_full_name);
            (
                StatusCode::OK,
                Json(PurchaseResponse {
                    success: true,
                    error: None,
                }),
            )
        }
        Err(e) => {
            let status = e.status();
            if status.is_server_error() {
                tracing::error!("[http] order failed: {e}");
            }
            (
                status,
                Json(PurchaseResponse {
                    success: false,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}

pub async fn list_sales(
    State(app): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<OrderRecord>>, ApiError> {
    let page = query.page();
    let page = run_blocking(&app, move |app| app.list_sales(page)).await?;
    Ok(Json(page))
}
