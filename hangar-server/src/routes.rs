//! HTTP handlers for Hangar server.

use std::collections::HashMap;

use actix_web::error::InternalError;
use actix_web::{HttpResponse, Responder, delete, get, post, web};
use hangar_core::{
    DeleteOutcome, HangarError, Ship, ShipPayload, ShipService, ShipType, parse_ship_id,
};
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::db::DbPool;
use crate::openapi::ApiDoc;
use crate::repository::DieselShipRepository;

#[derive(Clone)]
/// Shared application state for handlers.
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
}

/// Error response payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub message: String,
}

/// Register ship endpoints and extractor settings.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .service(count_ships)
        .service(list_ships)
        .service(openapi_json)
        .service(get_ship)
        .service(create_ship)
        .service(update_ship)
        .service(delete_ship);
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(ErrorResponse {
            message: format!("invalid ship payload: {err}"),
        });
        InternalError::from_response(err, response).into()
    })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(ErrorResponse {
            message: format!("invalid query string: {err}"),
        });
        InternalError::from_response(err, response).into()
    })
}

fn error_response(err: &HangarError) -> HttpResponse {
    let body = ErrorResponse {
        message: err.to_string(),
    };
    match err {
        HangarError::BadRequest(_) => HttpResponse::BadRequest().json(body),
        HangarError::NotFound(_) => HttpResponse::NotFound().json(body),
        HangarError::Storage(message) => {
            log::error!("ship storage failure: {message}");
            HttpResponse::InternalServerError().json(body)
        }
    }
}

/// Run a service operation on the blocking pool.
async fn with_service<T, F>(state: &web::Data<AppState>, operation: F) -> Result<T, HttpResponse>
where
    F: FnOnce(ShipService<DieselShipRepository>) -> hangar_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let service = ShipService::new(DieselShipRepository::new(state.pool.clone()));
    match web::block(move || operation(service)).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(error_response(&err)),
        Err(err) => Err(error_response(&HangarError::storage(err))),
    }
}

#[utoipa::path(
    get,
    path = "/rest/ships",
    params(
        ("name" = Option<String>, Query, description = "Substring of the ship name"),
        ("planet" = Option<String>, Query, description = "Substring of the planet"),
        ("shipType" = Option<ShipType>, Query, description = "Exact ship type"),
        ("isUsed" = Option<bool>, Query, description = "Usage flag"),
        ("minCrewSize" = Option<i32>, Query, description = "Inclusive lower crew bound"),
        ("maxCrewSize" = Option<i32>, Query, description = "Inclusive upper crew bound"),
        ("minSpeed" = Option<f64>, Query, description = "Inclusive lower speed bound"),
        ("maxSpeed" = Option<f64>, Query, description = "Inclusive upper speed bound"),
        ("minRating" = Option<f64>, Query, description = "Inclusive lower rating bound"),
        ("maxRating" = Option<f64>, Query, description = "Inclusive upper rating bound"),
        ("after" = Option<i64>, Query, description = "Earliest production date, epoch millis"),
        ("before" = Option<i64>, Query, description = "Latest production date, epoch millis"),
        ("pageNumber" = Option<i64>, Query, description = "Zero-based page, default 0"),
        ("pageSize" = Option<i64>, Query, description = "Page size, default 3"),
        ("order" = Option<String>, Query, description = "Sort field, default id")
    ),
    responses(
        (status = 200, description = "Matching ships", body = [Ship]),
        (status = 400, description = "Invalid parameter", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/rest/ships")]
/// List a page of ships matching the query parameters.
pub async fn list_ships(
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let params = query.into_inner();
    match with_service(&state, move |service| service.list(&params)).await {
        Ok(page) => HttpResponse::Ok().json(page.ships),
        Err(response) => response,
    }
}

#[utoipa::path(
    get,
    path = "/rest/ships/count",
    responses(
        (status = 200, description = "Number of matching ships", body = i64),
        (status = 400, description = "Invalid parameter", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/rest/ships/count")]
/// Count ships matching the query parameters.
pub async fn count_ships(
    state: web::Data<AppState>,
    query: web::Query<HashMap<String, String>>,
) -> impl Responder {
    let params = query.into_inner();
    match with_service(&state, move |service| service.count(&params)).await {
        Ok(total) => HttpResponse::Ok().json(total),
        Err(response) => response,
    }
}

#[utoipa::path(
    get,
    path = "/rest/ships/{id}",
    params(
        ("id" = i64, Path, description = "Ship identifier")
    ),
    responses(
        (status = 200, description = "Ship", body = Ship),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Ship not found", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[get("/rest/ships/{id}")]
/// Fetch a ship by id.
pub async fn get_ship(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = match parse_ship_id(&path.into_inner()) {
        Ok(id) => id,
        Err(err) => return error_response(&err),
    };
    match with_service(&state, move |service| service.get(id)).await {
        Ok(ship) => HttpResponse::Ok().json(ship),
        Err(response) => response,
    }
}

#[utoipa::path(
    post,
    path = "/rest/ships",
    request_body = ShipPayload,
    responses(
        (status = 200, description = "Created ship", body = Ship),
        (status = 400, description = "Invalid payload", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[post("/rest/ships")]
/// Create a ship.
pub async fn create_ship(
    state: web::Data<AppState>,
    payload: web::Json<ShipPayload>,
) -> impl Responder {
    let payload = payload.into_inner();
    match with_service(&state, move |service| service.create(payload)).await {
        Ok(ship) => {
            log::info!("created ship {}", ship.id);
            HttpResponse::Ok().json(ship)
        }
        Err(response) => response,
    }
}

#[utoipa::path(
    post,
    path = "/rest/ships/{id}",
    params(
        ("id" = i64, Path, description = "Ship identifier")
    ),
    request_body = ShipPayload,
    responses(
        (status = 200, description = "Updated ship", body = Ship),
        (status = 400, description = "Invalid id or payload", body = ErrorResponse),
        (status = 404, description = "Ship not found", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[post("/rest/ships/{id}")]
/// Apply a partial update to a ship.
pub async fn update_ship(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<ShipPayload>,
) -> impl Responder {
    let id = match parse_ship_id(&path.into_inner()) {
        Ok(id) => id,
        Err(err) => return error_response(&err),
    };
    let payload = payload.into_inner();
    match with_service(&state, move |service| service.update(id, payload)).await {
        Ok(ship) => {
            log::info!("updated ship {id}");
            HttpResponse::Ok().json(ship)
        }
        Err(response) => response,
    }
}

#[utoipa::path(
    delete,
    path = "/rest/ships/{id}",
    params(
        ("id" = i64, Path, description = "Ship identifier")
    ),
    responses(
        (status = 200, description = "Ship deleted", body = String),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Ship not found", body = ErrorResponse)
    ),
    tag = "ships"
)]
#[delete("/rest/ships/{id}")]
/// Delete a ship.
pub async fn delete_ship(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = match parse_ship_id(&path.into_inner()) {
        Ok(id) => id,
        Err(err) => return error_response(&err),
    };
    match with_service(&state, move |service| service.delete(id)).await {
        Ok(DeleteOutcome::Deleted) => {
            log::info!("deleted ship {id}");
            HttpResponse::Ok().body("Ok")
        }
        Ok(DeleteOutcome::NotFound) => HttpResponse::NotFound().json(ErrorResponse {
            message: format!("ship {id} not found"),
        }),
        Err(response) => response,
    }
}

#[utoipa::path(
    get,
    path = "/rest/openapi.json",
    responses(
        (status = 200, description = "OpenAPI document")
    ),
    tag = "system"
)]
#[get("/rest/openapi.json")]
/// Serve the OpenAPI document.
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}
