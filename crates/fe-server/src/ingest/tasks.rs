//! Ingestion tasks: fetch, parse, persist
//!
//! Vehicles are upserted by natural key so repeated runs refresh rows
//! in place. Emissions are bulk-replaced: delete everything, then
//! re-insert; records referencing a vehicle we never stored fail the
//! foreign key check and are tallied and skipped rather than aborting
//! the run. Fuel prices are append-only; readers take the newest row.

use std::collections::HashMap;

use tracing::{info, warn};

use fe_srm::{DbMap, SrmError};

use crate::models::{
    EmissionsInfo, FuelPrices, RawEmissionsReport, RawFuelPrices, RawVehicles, Vehicle,
};

use super::fetch::{Fetch, FUEL_PRICES_URL};
use super::IngestError;

pub async fn ingest_vehicles(db: &DbMap, fetcher: &dyn Fetch) -> Result<(), IngestError> {
    let data = fetcher.fetch("vehicles").await?;
    let raw: RawVehicles = quick_xml::de::from_reader(data.as_slice())?;

    let mut inserted = 0u64;
    let mut updated = 0u64;
    for raw_vehicle in &raw.vehicles {
        let vehicle = Vehicle::from_raw(raw_vehicle);
        let id = db.upsert_one("vehicles", "epa_id", &vehicle).await?;
        if id > 0 {
            inserted += 1;
        } else {
            updated += 1;
        }
    }
    info!(inserted, updated, "vehicle ingestion complete");

    // Emissions reference vehicles, so they always ride along.
    ingest_emissions(db, fetcher).await
}

async fn ingest_emissions(db: &DbMap, fetcher: &dyn Fetch) -> Result<(), IngestError> {
    let data = fetcher.fetch("emissions").await?;
    let report: RawEmissionsReport = quick_xml::de::from_reader(data.as_slice())?;

    db.delete_all("emissions_info").await?;

    let mut inserted = 0u64;
    let mut violations: HashMap<i64, u64> = HashMap::new();
    for raw in &report.emissions {
        let record = EmissionsInfo::from_raw(raw);
        match db.insert_one("emissions_info", &record).await {
            Ok(_) => inserted += 1,
            Err(SrmError::ForeignKeyViolation(_)) => {
                *violations.entry(record.epa_id).or_insert(0) += 1;
            },
            Err(err) => return Err(err.into()),
        }
    }
    info!(inserted, "emissions ingestion complete");
    if !violations.is_empty() {
        warn!(
            skipped = violations.values().sum::<u64>(),
            epa_ids = ?violations,
            "emissions records skipped for unknown vehicles"
        );
    }
    Ok(())
}

pub async fn ingest_fuel_prices(db: &DbMap, fetcher: &dyn Fetch) -> Result<(), IngestError> {
    let data = fetcher.fetch(FUEL_PRICES_URL).await?;
    let raw: RawFuelPrices = quick_xml::de::from_reader(data.as_slice())?;

    let prices = FuelPrices::from_raw(&raw);
    let id = db.insert_one("fuel_prices", &prices).await?;
    info!(id, "fuel prices inserted");
    Ok(())
}
