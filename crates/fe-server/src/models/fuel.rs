//! Per-fuel economy figures, recomputed for a caller's driving profile
//!
//! A [`Fuel`] starts as a copy of the vehicle's per-fuel columns and is
//! then adjusted: combined figures are reweighted by the city/highway
//! split, annual barrels are scaled from the EPA's 15,000-mile baseline
//! to the caller's mileage, and the annual fuel cost is recomputed from
//! the latest national prices.

use serde::{Deserialize, Serialize};

use super::fuel_prices::FuelPrices;
use super::vehicle::Vehicle;

/// EPA figures assume 15,000 miles per year.
const BASELINE_MILES_PER_YEAR: f64 = 15000.0;

pub const CITY_SHARE_DEFAULT: i64 = 55;
pub const HIGHWAY_SHARE_DEFAULT: i64 = 45;
pub const MILES_PER_YEAR_DEFAULT: i64 = 15000;

/// Caller-supplied driving assumptions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrivingProfile {
    pub city_share: i64,
    pub highway_share: i64,
    pub miles_per_year: i64,
}

impl Default for DrivingProfile {
    fn default() -> Self {
        DrivingProfile {
            city_share: CITY_SHARE_DEFAULT,
            highway_share: HIGHWAY_SHARE_DEFAULT,
            miles_per_year: MILES_PER_YEAR_DEFAULT,
        }
    }
}

#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fuel {
    pub barrels_per_year: f64,
    pub co2: f64,
    pub co2_tailpipe: f64,
    pub e_city: f64,
    pub e_comb: f64,
    pub e_highway: f64,
    pub fuel_cost: i64,
    pub fuel_type: String,
    pub ghg_score: i64,
    pub mpg_city: f64,
    pub mpg_city_unadj: f64,
    pub mpg_city_unrounded: f64,
    #[serde(skip)]
    pub mpg_comb: f64,
    #[serde(skip)]
    pub mpg_comb_unrounded: f64,
    pub mpg_highway: f64,
    pub mpg_highway_unadj: f64,
    pub mpg_highway_unrounded: f64,
    pub range: f64,
    pub range_city: f64,
    pub range_highway: f64,
    pub phev_cd_city: f64,
    pub phev_cd_comb: f64,
    pub phev_cd_highway: f64,
    pub phev_mpg_city: f64,
    pub phev_mpg_comb: f64,
    pub phev_mpg_highway: f64,
    pub phev_uf_city: f64,
    pub phev_uf_comb: f64,
    pub phev_uf_highway: f64,
}

/// Build the per-fuel view of a vehicle and adjust it for the profile.
///
/// Fuel 1 is always present; fuel 2 only for dual-fuel vehicles.
pub fn calculate_fuel_data(v: &Vehicle, profile: DrivingProfile, prices: &FuelPrices) -> Vec<Fuel> {
    let mut fuels = vec![build_fuel1(v)];
    if !v.f2_fuel_type.is_empty() {
        fuels.push(build_fuel2(v));
    }
    for fuel in &mut fuels {
        apply_profile(fuel, profile, prices);
    }
    fuels
}

fn build_fuel1(v: &Vehicle) -> Fuel {
    Fuel {
        barrels_per_year: v.f1_barrels_per_year,
        co2: v.f1_co2,
        co2_tailpipe: v.f1_co2_tailpipe,
        e_city: v.e_city,
        e_comb: v.e_comb,
        e_highway: v.e_highway,
        fuel_cost: v.f1_fuel_cost,
        fuel_type: v.f1_fuel_type.clone(),
        ghg_score: v.f1_ghg_score,
        mpg_city: v.f1_mpg_city,
        mpg_city_unadj: v.f1_mpg_city_unadj,
        mpg_city_unrounded: v.f1_mpg_city_unrounded,
        mpg_comb: v.f1_mpg_comb,
        mpg_comb_unrounded: v.f1_mpg_comb_unrounded,
        mpg_highway: v.f1_mpg_highway,
        mpg_highway_unadj: v.f1_mpg_highway_unadj,
        mpg_highway_unrounded: v.f1_mpg_highway_unrounded,
        range: v.f1_range,
        phev_cd_city: v.phev_cd_city,
        phev_cd_comb: v.phev_cd_comb,
        phev_cd_highway: v.phev_cd_highway,
        phev_mpg_city: v.phev_mpg_city,
        phev_mpg_comb: v.phev_mpg_comb,
        phev_mpg_highway: v.phev_mpg_highway,
        phev_uf_city: v.phev_uf_city,
        phev_uf_comb: v.phev_uf_comb,
        phev_uf_highway: v.phev_uf_highway,
        ..Fuel::default()
    }
}

fn build_fuel2(v: &Vehicle) -> Fuel {
    Fuel {
        barrels_per_year: v.f2_barrels_per_year,
        co2: v.f2_co2,
        co2_tailpipe: v.f2_co2_tailpipe,
        fuel_cost: v.f2_fuel_cost,
        fuel_type: v.f2_fuel_type.clone(),
        ghg_score: v.f2_ghg_score,
        mpg_city: v.f2_mpg_city,
        mpg_city_unadj: v.f2_mpg_city_unadj,
        mpg_city_unrounded: v.f2_mpg_city_unrounded,
        mpg_comb: v.f2_mpg_comb,
        mpg_comb_unrounded: v.f2_mpg_comb_unrounded,
        mpg_highway: v.f2_mpg_highway,
        mpg_highway_unadj: v.f2_mpg_highway_unadj,
        mpg_highway_unrounded: v.f2_mpg_highway_unrounded,
        range: v.f2_range,
        range_city: v.f2_range_city,
        range_highway: v.f2_range_highway,
        ..Fuel::default()
    }
}

fn apply_profile(fuel: &mut Fuel, profile: DrivingProfile, prices: &FuelPrices) {
    if fuel.mpg_city > 0.0 {
        fuel.mpg_comb = weighted(fuel.mpg_city, fuel.mpg_highway, profile);
    }
    if fuel.e_city > 0.0 {
        fuel.e_comb = weighted(fuel.e_city, fuel.e_highway, profile);
    }
    if fuel.range_city > 0.0 {
        fuel.range = weighted(fuel.range_city, fuel.range_highway, profile);
    }

    let miles = profile.miles_per_year as f64;
    fuel.barrels_per_year = to_fixed(fuel.barrels_per_year / BASELINE_MILES_PER_YEAR * miles, 2);

    let price = price_for_fuel(&fuel.fuel_type, prices);
    fuel.fuel_cost = if fuel.fuel_type == "Electricity" {
        (miles / 100.0 * fuel.e_comb * price) as i64
    } else if fuel.mpg_comb > 0.0 {
        (price / fuel.mpg_comb * miles) as i64
    } else {
        0
    };
}

/// City/highway weighted average, rounded to two decimals.
fn weighted(city: f64, highway: f64, profile: DrivingProfile) -> f64 {
    to_fixed(
        profile.city_share as f64 / 100.0 * city + profile.highway_share as f64 / 100.0 * highway,
        2,
    )
}

fn price_for_fuel(name: &str, prices: &FuelPrices) -> f64 {
    match name {
        "Diesel" => prices.diesel,
        "E85" => prices.e85,
        "Electricity" => prices.electricity,
        "Midgrade Gasoline" => prices.gas_midgrade,
        "Natural Gas" => prices.cng,
        "Premium Gasoline" => prices.gas_premium,
        "Regular Gasoline" => prices.gas_regular,
        _ => 0.0,
    }
}

fn to_fixed(num: f64, precision: u32) -> f64 {
    let scale = 10f64.powi(precision as i32);
    (num * scale).round() / scale
}
