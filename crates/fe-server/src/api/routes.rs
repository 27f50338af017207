//! HTTP route handlers
//!
//! All routes are GETs, including `/ingest/{target}`: ingestion is
//! kicked off out-of-band and the handler only enqueues the request.

use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::warn;

use fe_srm::{DbMap, QueryBuilder, SqlValue, SrmError};

use crate::api::pagination::Page;
use crate::api::response::{MessageResponse, VehicleListResponse, VehicleResponse};
use crate::error::ApiResult;
use crate::ingest::{WorkQueue, WorkRequest};
use crate::models::{calculate_fuel_data, DrivingProfile, EmissionsInfo, FuelPrices, Vehicle};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub db: DbMap,
    pub queue: WorkQueue,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health_check", get(health_check))
        .route("/ingest/:target", get(ingest))
        .route("/vehicle/:epa_id", get(get_vehicle))
        .route("/vehicles", get(list_vehicles))
        .with_state(state)
}

/// Querystring parameters shared by the vehicle routes.
///
/// Search filters only apply to the list route; profile overrides apply
/// to both. Non-positive profile values fall back to the defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VehicleQuery {
    year: Option<i64>,
    make: Option<String>,
    model: Option<String>,
    page: Option<i64>,
    page_length: Option<i64>,
    city_share: Option<i64>,
    highway_share: Option<i64>,
    miles_per_year: Option<i64>,
}

impl VehicleQuery {
    fn profile(&self) -> DrivingProfile {
        let mut profile = DrivingProfile::default();
        if let Some(v) = self.city_share {
            if v > 0 {
                profile.city_share = v;
            }
        }
        if let Some(v) = self.highway_share {
            if v > 0 {
                profile.highway_share = v;
            }
        }
        if let Some(v) = self.miles_per_year {
            if v > 0 {
                profile.miles_per_year = v;
            }
        }
        profile
    }
}

async fn health_check(State(state): State<AppState>) -> ApiResult<Json<MessageResponse>> {
    state.db.ping().await.map_err(crate::error::AppError::from)?;
    Ok(Json(MessageResponse::new("Healthy!")))
}

async fn ingest(
    State(state): State<AppState>,
    Path(target): Path<String>,
) -> ApiResult<Json<MessageResponse>> {
    let work = WorkRequest::for_target(&target, state.db.clone())?;
    state.queue.submit(work).await?;
    Ok(Json(MessageResponse::new(format!(
        "Ingest kicked off for: {target}"
    ))))
}

async fn get_vehicle(
    State(state): State<AppState>,
    Path(epa_id): Path<i64>,
    Query(params): Query<VehicleQuery>,
) -> ApiResult<Json<VehicleResponse>> {
    let profile = params.profile();
    let placeholder = state.db.dialect().placeholder(1);

    let query = format!("SELECT * FROM vehicles WHERE epa_id = {placeholder}");
    let mut vehicle: Vehicle = state.db.select_one(&query, &[SqlValue::Int(epa_id)]).await?;

    let prices = latest_fuel_prices(&state.db).await;
    vehicle.fuels = calculate_fuel_data(&vehicle, profile, &prices);

    let query = format!("SELECT * FROM emissions_info WHERE epa_id = {placeholder}");
    vehicle.emissions_info = state.db.select_many(&query, &[SqlValue::Int(epa_id)]).await?;

    Ok(Json(VehicleResponse { profile, vehicle }))
}

async fn list_vehicles(
    State(state): State<AppState>,
    Query(params): Query<VehicleQuery>,
) -> ApiResult<Json<VehicleListResponse>> {
    let profile = params.profile();
    let page = Page::from_params(params.page, params.page_length);

    let mut builder = QueryBuilder::new(state.db.dialect(), "vehicles")
        .limit(page.page_length)
        .offset(page.offset());
    if let Some(year) = params.year {
        builder = builder.exact("year", SqlValue::Int(year));
    }
    if let Some(make) = params.make.as_deref().filter(|s| !s.is_empty()) {
        builder = builder.fuzzy("make", make);
    }
    if let Some(model) = params.model.as_deref().filter(|s| !s.is_empty()) {
        builder = builder.fuzzy("model", model);
    }

    let (count_sql, count_args) = builder.build_count();
    let total = state.db.select_count(&count_sql, &count_args).await?;

    let (select_sql, select_args) = builder.build_select();
    let mut vehicles: Vec<Vehicle> = state.db.select_many(&select_sql, &select_args).await?;

    let prices = latest_fuel_prices(&state.db).await;
    for vehicle in &mut vehicles {
        vehicle.fuels = calculate_fuel_data(vehicle, profile, &prices);
    }
    attach_emissions(&state.db, &mut vehicles).await?;

    Ok(Json(VehicleListResponse {
        page: page.into_meta(total),
        profile,
        vehicles,
    }))
}

/// Newest fuel price row, or zero prices if none have been ingested.
///
/// Missing prices degrade the cost figures to zero rather than failing
/// the vehicle lookup.
async fn latest_fuel_prices(db: &DbMap) -> FuelPrices {
    let query = "SELECT * FROM fuel_prices WHERE updated = (SELECT MAX(updated) FROM fuel_prices)";
    match db.select_one(query, &[]).await {
        Ok(prices) => prices,
        Err(SrmError::NotFound) => FuelPrices::default(),
        Err(err) => {
            warn!(%err, "failed to load fuel prices");
            FuelPrices::default()
        },
    }
}

/// Load emissions for a page of vehicles in one IN-clause query and
/// distribute the rows to their vehicles.
async fn attach_emissions(db: &DbMap, vehicles: &mut [Vehicle]) -> Result<(), SrmError> {
    if vehicles.is_empty() {
        return Ok(());
    }

    let mut index_by_epa_id = HashMap::with_capacity(vehicles.len());
    let mut placeholders = String::new();
    let mut params = Vec::with_capacity(vehicles.len());
    for (i, vehicle) in vehicles.iter().enumerate() {
        index_by_epa_id.insert(vehicle.epa_id, i);
        if i > 0 {
            placeholders.push_str(", ");
        }
        placeholders.push_str(&db.dialect().placeholder(i + 1));
        params.push(SqlValue::Int(vehicle.epa_id));
    }

    let query = format!("SELECT * FROM emissions_info WHERE epa_id IN ({placeholders})");
    let records: Vec<EmissionsInfo> = db.select_many(&query, &params).await?;
    for record in records {
        if let Some(&i) = index_by_epa_id.get(&record.epa_id) {
            vehicles[i].emissions_info.push(record);
        }
    }
    Ok(())
}
