//! JSON REST API under `/cars`.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::car::{CarPatch, CarRecord, NewCar};
use crate::handler::with_state;
use crate::payload::{self, PayloadError};
use crate::sort::{self, SortOrder};
use crate::stats::{self, Statistics};
use crate::store::{CarStore, StoreError};
use crate::{IntoResponse, Json, Request, Response, Router, Status};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Payload(#[from] PayloadError),
    #[error("missing path parameter `id`")]
    MissingId,
}

#[derive(Serialize)]
struct Message {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Store(StoreError::NotFound(_)) => Status::NotFound,
            ApiError::Payload(_) => Status::BadRequest,
            ApiError::Store(StoreError::LockPoisoned(_)) | ApiError::MissingId => {
                error!("{self}");
                Status::InternalServerError
            }
        };
        if status == Status::BadRequest {
            warn!("rejected payload: {self}");
        }
        Json(Message { message: self.to_string() }).with_status(status)
    }
}

pub(crate) fn mount(router: Router, store: &Arc<CarStore>) -> Router {
    router
        .get("/cars", with_state(store, list_cars))
        .post("/cars", with_state(store, create_car))
        .get("/cars/stats", with_state(store, car_stats))
        .get("/cars/{id}", with_state(store, get_car))
        .put("/cars/{id}", with_state(store, update_car))
        .delete("/cars/{id}", with_state(store, delete_car))
}

fn id(req: &Request) -> Result<&str, ApiError> {
    req.param("id").ok_or(ApiError::MissingId)
}

/// The store contents, optionally sorted by `sort_by` / `order`.
pub(crate) fn sorted_listing(store: &CarStore, req: &Request) -> Result<Vec<CarRecord>, StoreError> {
    let cars = store.list()?;
    let order = req.query("order").map(|o| SortOrder::parse(&o)).unwrap_or_default();
    Ok(match req.query("sort_by") {
        Some(field) => sort::sort_by_name(&cars, &field, order),
        None => cars,
    })
}

// GET /cars?sort_by=price&order=desc
async fn list_cars(store: Arc<CarStore>, req: Request) -> Result<Json<Vec<CarRecord>>, ApiError> {
    Ok(Json(sorted_listing(&store, &req)?))
}

// POST /cars → 201 + location
async fn create_car(store: Arc<CarStore>, req: Request) -> Result<Response, ApiError> {
    let candidate: NewCar = payload::decode(&req)?;
    let car = store.insert(candidate)?;
    let location = format!("/cars/{}", car.id);
    Ok(Json(car).with_status(Status::Created).with_header("location", &location))
}

// GET /cars/stats
async fn car_stats(store: Arc<CarStore>, _req: Request) -> Result<Json<Statistics>, ApiError> {
    Ok(Json(stats::aggregate(&store.list()?)))
}

// GET /cars/{id}
async fn get_car(store: Arc<CarStore>, req: Request) -> Result<Json<CarRecord>, ApiError> {
    Ok(Json(store.get(id(&req)?)?))
}

// PUT /cars/{id}: an unknown id is a 404 whatever the body holds.
async fn update_car(store: Arc<CarStore>, req: Request) -> Result<Json<CarRecord>, ApiError> {
    let id = id(&req)?;
    store.get(id)?;
    let patch: CarPatch = payload::decode(&req)?;
    Ok(Json(store.update(id, patch)?))
}

// DELETE /cars/{id}
async fn delete_car(store: Arc<CarStore>, req: Request) -> Result<Json<Message>, ApiError> {
    store.delete(id(&req)?)?;
    Ok(Json(Message { message: "car deleted".to_owned() }))
}
