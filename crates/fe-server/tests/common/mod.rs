//! Shared test fixtures
//!
//! In-memory sqlite schema mirroring the Postgres migrations, plus
//! record builders used across the integration tests.

use sqlx::sqlite::SqlitePoolOptions;

use fe_server::models::{EmissionsInfo, FuelPrices, Vehicle};
use fe_srm::DbMap;

const VEHICLES_DDL: &str = "CREATE TABLE vehicles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    updated TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    atv_type TEXT NOT NULL,
    charge_time_120v REAL NOT NULL,
    charge_time_240v REAL NOT NULL,
    charge_time_240vb REAL NOT NULL,
    charger_240v_dscr TEXT NOT NULL,
    charger_240vb_dscr TEXT NOT NULL,
    cylinders INTEGER NOT NULL,
    drive_axle_type TEXT NOT NULL,
    e_city REAL NOT NULL,
    e_comb REAL NOT NULL,
    e_highway REAL NOT NULL,
    e_motor TEXT NOT NULL,
    eng_displacement REAL NOT NULL,
    eng_dscr TEXT NOT NULL,
    eng_id INTEGER NOT NULL,
    epa_created_on TEXT NOT NULL,
    epa_id INTEGER NOT NULL UNIQUE,
    epa_modified_on TEXT NOT NULL,
    f1_barrels_per_year REAL NOT NULL,
    f1_co2 REAL NOT NULL,
    f1_co2_tailpipe REAL NOT NULL,
    f1_fuel_cost INTEGER NOT NULL,
    f1_fuel_type TEXT NOT NULL,
    f1_ghg_score INTEGER NOT NULL,
    f1_mpg_city REAL NOT NULL,
    f1_mpg_city_unadj REAL NOT NULL,
    f1_mpg_city_unrounded REAL NOT NULL,
    f1_mpg_comb REAL NOT NULL,
    f1_mpg_comb_unrounded REAL NOT NULL,
    f1_mpg_highway REAL NOT NULL,
    f1_mpg_highway_unadj REAL NOT NULL,
    f1_mpg_highway_unrounded REAL NOT NULL,
    f1_range REAL NOT NULL,
    f2_barrels_per_year REAL NOT NULL,
    f2_co2 REAL NOT NULL,
    f2_co2_tailpipe REAL NOT NULL,
    f2_fuel_cost INTEGER NOT NULL,
    f2_fuel_type TEXT NOT NULL,
    f2_ghg_score INTEGER NOT NULL,
    f2_mpg_city REAL NOT NULL,
    f2_mpg_city_unadj REAL NOT NULL,
    f2_mpg_city_unrounded REAL NOT NULL,
    f2_mpg_comb REAL NOT NULL,
    f2_mpg_comb_unrounded REAL NOT NULL,
    f2_mpg_highway REAL NOT NULL,
    f2_mpg_highway_unrounded REAL NOT NULL,
    f2_mpg_highway_unadj REAL NOT NULL,
    f2_range REAL NOT NULL,
    f2_range_city REAL NOT NULL,
    f2_range_highway REAL NOT NULL,
    fuel_economy_score REAL NOT NULL,
    fuel_type TEXT NOT NULL,
    has_mpg_data BOOLEAN NOT NULL,
    start_stop BOOLEAN NOT NULL,
    has_supercharger BOOLEAN NOT NULL,
    has_turbocharger BOOLEAN NOT NULL,
    is_guzzler BOOLEAN NOT NULL,
    is_phev_blended BOOLEAN NOT NULL,
    luggage_volume_2door INTEGER NOT NULL,
    luggage_volume_4door INTEGER NOT NULL,
    luggage_volume_hatch INTEGER NOT NULL,
    make TEXT NOT NULL,
    manufacturer_code TEXT NOT NULL,
    model TEXT NOT NULL,
    passenger_volume_2door INTEGER NOT NULL,
    passenger_volume_4door INTEGER NOT NULL,
    passenger_volume_hatch INTEGER NOT NULL,
    phev_cd_city REAL NOT NULL,
    phev_cd_comb REAL NOT NULL,
    phev_cd_highway REAL NOT NULL,
    phev_mpg_city REAL NOT NULL,
    phev_mpg_comb REAL NOT NULL,
    phev_mpg_highway REAL NOT NULL,
    phev_uf_city REAL NOT NULL,
    phev_uf_comb REAL NOT NULL,
    phev_uf_highway REAL NOT NULL,
    size_class TEXT NOT NULL,
    trans_dscr TEXT NOT NULL,
    transmission TEXT NOT NULL,
    year INTEGER NOT NULL,
    you_save_spend INTEGER NOT NULL
)";

const EMISSIONS_DDL: &str = "CREATE TABLE emissions_info (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    updated TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    emission_std_code TEXT NOT NULL,
    emission_std_txt TEXT NOT NULL,
    engine_family_id TEXT NOT NULL,
    epa_id INTEGER NOT NULL REFERENCES vehicles (epa_id),
    f1_smog_rating REAL NOT NULL,
    f2_smog_rating REAL NOT NULL,
    sales_area INTEGER NOT NULL,
    smartway_score INTEGER NOT NULL
)";

const FUEL_PRICES_DDL: &str = "CREATE TABLE fuel_prices (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    updated TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
    cng REAL NOT NULL,
    diesel REAL NOT NULL,
    e85 REAL NOT NULL,
    electricity REAL NOT NULL,
    gas_midgrade REAL NOT NULL,
    gas_premium REAL NOT NULL,
    gas_regular REAL NOT NULL,
    liquid_propane REAL NOT NULL
)";

/// In-memory database with the full schema and foreign keys enforced.
pub async fn test_db() -> DbMap {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(&pool)
        .await
        .unwrap();
    for ddl in [VEHICLES_DDL, EMISSIONS_DDL, FUEL_PRICES_DDL] {
        sqlx::query(ddl).execute(&pool).await.unwrap();
    }
    DbMap::sqlite(pool)
}

pub fn sample_vehicle(epa_id: i64, make: &str, model: &str, year: i64) -> Vehicle {
    Vehicle {
        epa_id,
        make: make.to_string(),
        model: model.to_string(),
        year,
        f1_fuel_type: "Regular Gasoline".to_string(),
        f1_mpg_city: 20.0,
        f1_mpg_highway: 30.0,
        f1_mpg_comb: 24.0,
        f1_barrels_per_year: 15.0,
        ..Vehicle::default()
    }
}

pub fn sample_emissions(epa_id: i64, sales_area: i64) -> EmissionsInfo {
    EmissionsInfo {
        epa_id,
        sales_area,
        emission_std_code: "T3B125".to_string(),
        emission_std_txt: "Federal Tier 3 Bin 125".to_string(),
        engine_family_id: "FARXV01.84PC".to_string(),
        f1_smog_rating: 5.0,
        ..EmissionsInfo::default()
    }
}

pub fn sample_fuel_prices() -> FuelPrices {
    FuelPrices {
        cng: 2.2,
        diesel: 4.0,
        e85: 2.5,
        electricity: 0.10,
        gas_midgrade: 3.5,
        gas_premium: 4.0,
        gas_regular: 3.0,
        liquid_propane: 2.9,
        ..FuelPrices::default()
    }
}
