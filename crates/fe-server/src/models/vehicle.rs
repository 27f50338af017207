//! Vehicle domain record and its raw wire mirror
//!
//! `RawVehicle` mirrors the EPA XML feed field-for-field as strings;
//! `Vehicle` is the typed record persisted to the `vehicles` table.
//! `emissions_info` and `fuels` are populated by the application layer
//! (relational join / derived data) and are invisible to the mapper.

use serde::{Deserialize, Serialize};

use fe_srm::{FieldDescriptor, Relational, SqlValue, Timestamp};

use super::emissions::EmissionsInfo;
use super::fuel::Fuel;
use super::parse::{parse_flag, parse_float, parse_int, parse_timestamp};

#[derive(Debug, Default, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    #[serde(skip)]
    pub id: i64,
    pub updated: Timestamp,
    pub atv_type: String, // type of alternative fuel or advanced technology vehicle
    pub charge_time_120v: f64,
    pub charge_time_240v: f64,
    pub charge_time_240vb: f64, // hours at 240 V on the alternate charger
    pub charger_240v_dscr: String,
    pub charger_240vb_dscr: String,
    pub cylinders: i64,
    pub drive_axle_type: String,
    #[serde(skip)]
    pub e_city: f64, // electricity consumption in kw-hrs/100 miles
    #[serde(skip)]
    pub e_comb: f64,
    #[serde(skip)]
    pub e_highway: f64,
    pub e_motor: String,
    /// Joined at application level from the emissions_info table.
    pub emissions_info: Vec<EmissionsInfo>,
    pub eng_displacement: f64,
    pub eng_dscr: String,
    pub eng_id: i64, // EPA model type index
    pub epa_created_on: Timestamp,
    pub epa_id: i64, // natural key linking the feed's records
    pub epa_modified_on: Timestamp,
    #[serde(skip)]
    pub f1_barrels_per_year: f64,
    #[serde(skip)]
    pub f1_co2: f64,
    #[serde(skip)]
    pub f1_co2_tailpipe: f64,
    #[serde(skip)]
    pub f1_fuel_cost: i64,
    #[serde(skip)]
    pub f1_fuel_type: String,
    #[serde(skip)]
    pub f1_ghg_score: i64,
    #[serde(skip)]
    pub f1_mpg_city: f64,
    #[serde(skip)]
    pub f1_mpg_city_unadj: f64,
    #[serde(skip)]
    pub f1_mpg_city_unrounded: f64,
    #[serde(skip)]
    pub f1_mpg_comb: f64,
    #[serde(skip)]
    pub f1_mpg_comb_unrounded: f64,
    #[serde(skip)]
    pub f1_mpg_highway: f64,
    #[serde(skip)]
    pub f1_mpg_highway_unadj: f64,
    #[serde(skip)]
    pub f1_mpg_highway_unrounded: f64,
    #[serde(skip)]
    pub f1_range: f64,
    #[serde(skip)]
    pub f2_barrels_per_year: f64,
    #[serde(skip)]
    pub f2_co2: f64,
    #[serde(skip)]
    pub f2_co2_tailpipe: f64,
    #[serde(skip)]
    pub f2_fuel_cost: i64,
    #[serde(skip)]
    pub f2_fuel_type: String, // alternative fuel for dual fuel vehicles
    #[serde(skip)]
    pub f2_ghg_score: i64,
    #[serde(skip)]
    pub f2_mpg_city: f64,
    #[serde(skip)]
    pub f2_mpg_city_unadj: f64,
    #[serde(skip)]
    pub f2_mpg_city_unrounded: f64,
    #[serde(skip)]
    pub f2_mpg_comb: f64,
    #[serde(skip)]
    pub f2_mpg_comb_unrounded: f64,
    #[serde(skip)]
    pub f2_mpg_highway: f64,
    #[serde(skip)]
    pub f2_mpg_highway_unrounded: f64,
    #[serde(skip)]
    pub f2_mpg_highway_unadj: f64,
    #[serde(skip)]
    pub f2_range: f64,
    #[serde(skip)]
    pub f2_range_city: f64,
    #[serde(skip)]
    pub f2_range_highway: f64,
    pub fuel_economy_score: f64,
    /// Derived per-fuel view over the f1_/f2_/phev_ figures; computed,
    /// never persisted.
    pub fuels: Vec<Fuel>,
    pub fuel_type: String,
    #[serde(skip)]
    pub has_mpg_data: bool,
    pub has_start_stop: bool,
    pub has_supercharger: bool,
    pub has_turbocharger: bool,
    pub is_guzzler: bool, // subject to the gas guzzler tax
    pub is_phev_blended: bool,
    pub luggage_volume_2door: i64,
    pub luggage_volume_4door: i64,
    pub luggage_volume_hatch: i64,
    pub make: String,
    pub manufacturer_code: String,
    pub model: String,
    pub passenger_volume_2door: i64,
    pub passenger_volume_4door: i64,
    pub passenger_volume_hatch: i64,
    #[serde(skip)]
    pub phev_cd_city: f64, // gasoline gallons/100 miles in charge depleting mode
    #[serde(skip)]
    pub phev_cd_comb: f64,
    #[serde(skip)]
    pub phev_cd_highway: f64,
    #[serde(skip)]
    pub phev_mpg_city: f64, // composite gasoline-electricity MPGe
    #[serde(skip)]
    pub phev_mpg_comb: f64,
    #[serde(skip)]
    pub phev_mpg_highway: f64,
    #[serde(skip)]
    pub phev_uf_city: f64, // utility factor (share of electricity)
    #[serde(skip)]
    pub phev_uf_comb: f64,
    #[serde(skip)]
    pub phev_uf_highway: f64,
    pub size_class: String,
    pub trans_dscr: String,
    pub transmission: String,
    pub year: i64,
    #[serde(skip)]
    pub you_save_spend: i64, // $ saved/spent over 5 years vs an average car
}

impl Vehicle {
    /// Convert a raw feed record; malformed scalars degrade to zero
    /// values, they never fail the record.
    pub fn from_raw(raw: &RawVehicle) -> Self {
        Vehicle {
            id: 0,
            updated: Timestamp::default(),
            atv_type: raw.atv_type.clone(),
            charge_time_120v: parse_float(&raw.charge_time_120v),
            charge_time_240v: parse_float(&raw.charge_time_240v),
            charge_time_240vb: parse_float(&raw.charge_time_240vb),
            charger_240v_dscr: raw.charger_240v_dscr.clone(),
            charger_240vb_dscr: raw.charger_240vb_dscr.clone(),
            cylinders: parse_int(&raw.cylinders),
            drive_axle_type: raw.drive_axle_type.clone(),
            e_city: parse_float(&raw.e_city),
            e_comb: parse_float(&raw.e_comb),
            e_highway: parse_float(&raw.e_highway),
            e_motor: raw.e_motor.clone(),
            emissions_info: Vec::new(),
            eng_displacement: parse_float(&raw.eng_displacement),
            eng_dscr: raw.eng_dscr.clone(),
            eng_id: parse_int(&raw.eng_id),
            epa_created_on: parse_timestamp(&raw.epa_created_on),
            epa_id: parse_int(&raw.epa_id),
            epa_modified_on: parse_timestamp(&raw.epa_modified_on),
            f1_barrels_per_year: parse_float(&raw.f1_barrels_per_year),
            f1_co2: parse_float(&raw.f1_co2),
            f1_co2_tailpipe: parse_float(&raw.f1_co2_tailpipe),
            f1_fuel_cost: parse_int(&raw.f1_fuel_cost),
            f1_fuel_type: raw.f1_fuel_type.clone(),
            f1_ghg_score: parse_int(&raw.f1_ghg_score),
            f1_mpg_city: parse_float(&raw.f1_mpg_city),
            f1_mpg_city_unadj: parse_float(&raw.f1_mpg_city_unadj),
            f1_mpg_city_unrounded: parse_float(&raw.f1_mpg_city_unrounded),
            f1_mpg_comb: parse_float(&raw.f1_mpg_comb),
            f1_mpg_comb_unrounded: parse_float(&raw.f1_mpg_comb_unrounded),
            f1_mpg_highway: parse_float(&raw.f1_mpg_highway),
            f1_mpg_highway_unadj: parse_float(&raw.f1_mpg_highway_unadj),
            f1_mpg_highway_unrounded: parse_float(&raw.f1_mpg_highway_unrounded),
            f1_range: parse_float(&raw.f1_range),
            f2_barrels_per_year: parse_float(&raw.f2_barrels_per_year),
            f2_co2: parse_float(&raw.f2_co2),
            f2_co2_tailpipe: parse_float(&raw.f2_co2_tailpipe),
            f2_fuel_cost: parse_int(&raw.f2_fuel_cost),
            f2_fuel_type: raw.f2_fuel_type.clone(),
            f2_ghg_score: parse_int(&raw.f2_ghg_score),
            f2_mpg_city: parse_float(&raw.f2_mpg_city),
            f2_mpg_city_unadj: parse_float(&raw.f2_mpg_city_unadj),
            f2_mpg_city_unrounded: parse_float(&raw.f2_mpg_city_unrounded),
            f2_mpg_comb: parse_float(&raw.f2_mpg_comb),
            f2_mpg_comb_unrounded: parse_float(&raw.f2_mpg_comb_unrounded),
            f2_mpg_highway: parse_float(&raw.f2_mpg_highway),
            f2_mpg_highway_unrounded: parse_float(&raw.f2_mpg_highway_unrounded),
            f2_mpg_highway_unadj: parse_float(&raw.f2_mpg_highway_unadj),
            f2_range: parse_float(&raw.f2_range),
            f2_range_city: parse_float(&raw.f2_range_city),
            f2_range_highway: parse_float(&raw.f2_range_highway),
            fuel_economy_score: parse_float(&raw.fuel_economy_score),
            fuels: Vec::new(),
            fuel_type: raw.fuel_type.clone(),
            has_mpg_data: parse_flag(&raw.mpg_data, &["Y"]),
            has_start_stop: parse_flag(&raw.start_stop, &["Y"]),
            has_supercharger: parse_flag(&raw.supercharger, &["S"]),
            has_turbocharger: parse_flag(&raw.turbocharger, &["T"]),
            is_guzzler: parse_flag(&raw.guzzler, &["T", "G"]),
            is_phev_blended: parse_flag(&raw.phev_blended, &["true"]),
            luggage_volume_2door: parse_int(&raw.luggage_volume_2door),
            luggage_volume_4door: parse_int(&raw.luggage_volume_4door),
            luggage_volume_hatch: parse_int(&raw.luggage_volume_hatch),
            make: raw.make.clone(),
            manufacturer_code: raw.manufacturer_code.clone(),
            model: raw.model.clone(),
            passenger_volume_2door: parse_int(&raw.passenger_volume_2door),
            passenger_volume_4door: parse_int(&raw.passenger_volume_4door),
            passenger_volume_hatch: parse_int(&raw.passenger_volume_hatch),
            phev_cd_city: parse_float(&raw.phev_cd_city),
            phev_cd_comb: parse_float(&raw.phev_cd_comb),
            phev_cd_highway: parse_float(&raw.phev_cd_highway),
            phev_mpg_city: parse_float(&raw.phev_mpg_city),
            phev_mpg_comb: parse_float(&raw.phev_mpg_comb),
            phev_mpg_highway: parse_float(&raw.phev_mpg_highway),
            phev_uf_city: parse_float(&raw.phev_uf_city),
            phev_uf_comb: parse_float(&raw.phev_uf_comb),
            phev_uf_highway: parse_float(&raw.phev_uf_highway),
            size_class: raw.size_class.clone(),
            trans_dscr: raw.trans_dscr.clone(),
            transmission: raw.transmission.clone(),
            year: parse_int(&raw.year),
            you_save_spend: parse_int(&raw.you_save_spend),
        }
    }
}

impl Relational for Vehicle {
    fn fields() -> &'static [FieldDescriptor<Self>] {
        static FIELDS: &[FieldDescriptor<Vehicle>] = &[
            FieldDescriptor::int("id", |v: &Vehicle| SqlValue::Int(v.id), |v, x| v.id = x.into_int())
                .primary_key(),
            FieldDescriptor::timestamp(
                "updated",
                |v: &Vehicle| SqlValue::Timestamp(v.updated.0),
                |v, x| v.updated = x.into_timestamp(),
            )
            .auto_set(),
            FieldDescriptor::text("atv_type", |v| SqlValue::Text(v.atv_type.clone()), |v, x| {
                v.atv_type = x.into_text()
            }),
            FieldDescriptor::float(
                "charge_time_120v",
                |v| SqlValue::Float(v.charge_time_120v),
                |v, x| v.charge_time_120v = x.into_float(),
            ),
            FieldDescriptor::float(
                "charge_time_240v",
                |v| SqlValue::Float(v.charge_time_240v),
                |v, x| v.charge_time_240v = x.into_float(),
            ),
            FieldDescriptor::float(
                "charge_time_240vb",
                |v| SqlValue::Float(v.charge_time_240vb),
                |v, x| v.charge_time_240vb = x.into_float(),
            ),
            FieldDescriptor::text(
                "charger_240v_dscr",
                |v| SqlValue::Text(v.charger_240v_dscr.clone()),
                |v, x| v.charger_240v_dscr = x.into_text(),
            ),
            FieldDescriptor::text(
                "charger_240vb_dscr",
                |v| SqlValue::Text(v.charger_240vb_dscr.clone()),
                |v, x| v.charger_240vb_dscr = x.into_text(),
            ),
            FieldDescriptor::int(
                "cylinders",
                |v| SqlValue::Int(v.cylinders),
                |v, x| v.cylinders = x.into_int(),
            ),
            FieldDescriptor::text(
                "drive_axle_type",
                |v| SqlValue::Text(v.drive_axle_type.clone()),
                |v, x| v.drive_axle_type = x.into_text(),
            ),
            FieldDescriptor::float("e_city", |v| SqlValue::Float(v.e_city), |v, x| {
                v.e_city = x.into_float()
            }),
            FieldDescriptor::float("e_comb", |v| SqlValue::Float(v.e_comb), |v, x| {
                v.e_comb = x.into_float()
            }),
            FieldDescriptor::float("e_highway", |v| SqlValue::Float(v.e_highway), |v, x| {
                v.e_highway = x.into_float()
            }),
            FieldDescriptor::text("e_motor", |v| SqlValue::Text(v.e_motor.clone()), |v, x| {
                v.e_motor = x.into_text()
            }),
            FieldDescriptor::float(
                "eng_displacement",
                |v| SqlValue::Float(v.eng_displacement),
                |v, x| v.eng_displacement = x.into_float(),
            ),
            FieldDescriptor::text("eng_dscr", |v| SqlValue::Text(v.eng_dscr.clone()), |v, x| {
                v.eng_dscr = x.into_text()
            }),
            FieldDescriptor::int("eng_id", |v| SqlValue::Int(v.eng_id), |v, x| {
                v.eng_id = x.into_int()
            }),
            FieldDescriptor::timestamp(
                "epa_created_on",
                |v| SqlValue::Timestamp(v.epa_created_on.0),
                |v, x| v.epa_created_on = x.into_timestamp(),
            ),
            FieldDescriptor::int("epa_id", |v| SqlValue::Int(v.epa_id), |v, x| {
                v.epa_id = x.into_int()
            }),
            FieldDescriptor::timestamp(
                "epa_modified_on",
                |v| SqlValue::Timestamp(v.epa_modified_on.0),
                |v, x| v.epa_modified_on = x.into_timestamp(),
            ),
            FieldDescriptor::float(
                "f1_barrels_per_year",
                |v| SqlValue::Float(v.f1_barrels_per_year),
                |v, x| v.f1_barrels_per_year = x.into_float(),
            ),
            FieldDescriptor::float("f1_co2", |v| SqlValue::Float(v.f1_co2), |v, x| {
                v.f1_co2 = x.into_float()
            }),
            FieldDescriptor::float(
                "f1_co2_tailpipe",
                |v| SqlValue::Float(v.f1_co2_tailpipe),
                |v, x| v.f1_co2_tailpipe = x.into_float(),
            ),
            FieldDescriptor::int(
                "f1_fuel_cost",
                |v| SqlValue::Int(v.f1_fuel_cost),
                |v, x| v.f1_fuel_cost = x.into_int(),
            ),
            FieldDescriptor::text(
                "f1_fuel_type",
                |v| SqlValue::Text(v.f1_fuel_type.clone()),
                |v, x| v.f1_fuel_type = x.into_text(),
            ),
            FieldDescriptor::int(
                "f1_ghg_score",
                |v| SqlValue::Int(v.f1_ghg_score),
                |v, x| v.f1_ghg_score = x.into_int(),
            ),
            FieldDescriptor::float(
                "f1_mpg_city",
                |v| SqlValue::Float(v.f1_mpg_city),
                |v, x| v.f1_mpg_city = x.into_float(),
            ),
            FieldDescriptor::float(
                "f1_mpg_city_unadj",
                |v| SqlValue::Float(v.f1_mpg_city_unadj),
                |v, x| v.f1_mpg_city_unadj = x.into_float(),
            ),
            FieldDescriptor::float(
                "f1_mpg_city_unrounded",
                |v| SqlValue::Float(v.f1_mpg_city_unrounded),
                |v, x| v.f1_mpg_city_unrounded = x.into_float(),
            ),
            FieldDescriptor::float(
                "f1_mpg_comb",
                |v| SqlValue::Float(v.f1_mpg_comb),
                |v, x| v.f1_mpg_comb = x.into_float(),
            ),
            FieldDescriptor::float(
                "f1_mpg_comb_unrounded",
                |v| SqlValue::Float(v.f1_mpg_comb_unrounded),
                |v, x| v.f1_mpg_comb_unrounded = x.into_float(),
            ),
            FieldDescriptor::float(
                "f1_mpg_highway",
                |v| SqlValue::Float(v.f1_mpg_highway),
                |v, x| v.f1_mpg_highway = x.into_float(),
            ),
            FieldDescriptor::float(
                "f1_mpg_highway_unadj",
                |v| SqlValue::Float(v.f1_mpg_highway_unadj),
                |v, x| v.f1_mpg_highway_unadj = x.into_float(),
            ),
            FieldDescriptor::float(
                "f1_mpg_highway_unrounded",
                |v| SqlValue::Float(v.f1_mpg_highway_unrounded),
                |v, x| v.f1_mpg_highway_unrounded = x.into_float(),
            ),
            FieldDescriptor::float("f1_range", |v| SqlValue::Float(v.f1_range), |v, x| {
                v.f1_range = x.into_float()
            }),
            FieldDescriptor::float(
                "f2_barrels_per_year",
                |v| SqlValue::Float(v.f2_barrels_per_year),
                |v, x| v.f2_barrels_per_year = x.into_float(),
            ),
            FieldDescriptor::float("f2_co2", |v| SqlValue::Float(v.f2_co2), |v, x| {
                v.f2_co2 = x.into_float()
            }),
            FieldDescriptor::float(
                "f2_co2_tailpipe",
                |v| SqlValue::Float(v.f2_co2_tailpipe),
                |v, x| v.f2_co2_tailpipe = x.into_float(),
            ),
            FieldDescriptor::int(
                "f2_fuel_cost",
                |v| SqlValue::Int(v.f2_fuel_cost),
                |v, x| v.f2_fuel_cost = x.into_int(),
            ),
            FieldDescriptor::text(
                "f2_fuel_type",
                |v| SqlValue::Text(v.f2_fuel_type.clone()),
                |v, x| v.f2_fuel_type = x.into_text(),
            ),
            FieldDescriptor::int(
                "f2_ghg_score",
                |v| SqlValue::Int(v.f2_ghg_score),
                |v, x| v.f2_ghg_score = x.into_int(),
            ),
            FieldDescriptor::float(
                "f2_mpg_city",
                |v| SqlValue::Float(v.f2_mpg_city),
                |v, x| v.f2_mpg_city = x.into_float(),
            ),
            FieldDescriptor::float(
                "f2_mpg_city_unadj",
                |v| SqlValue::Float(v.f2_mpg_city_unadj),
                |v, x| v.f2_mpg_city_unadj = x.into_float(),
            ),
            FieldDescriptor::float(
                "f2_mpg_city_unrounded",
                |v| SqlValue::Float(v.f2_mpg_city_unrounded),
                |v, x| v.f2_mpg_city_unrounded = x.into_float(),
            ),
            FieldDescriptor::float(
                "f2_mpg_comb",
                |v| SqlValue::Float(v.f2_mpg_comb),
                |v, x| v.f2_mpg_comb = x.into_float(),
            ),
            FieldDescriptor::float(
                "f2_mpg_comb_unrounded",
                |v| SqlValue::Float(v.f2_mpg_comb_unrounded),
                |v, x| v.f2_mpg_comb_unrounded = x.into_float(),
            ),
            FieldDescriptor::float(
                "f2_mpg_highway",
                |v| SqlValue::Float(v.f2_mpg_highway),
                |v, x| v.f2_mpg_highway = x.into_float(),
            ),
            FieldDescriptor::float(
                "f2_mpg_highway_unrounded",
                |v| SqlValue::Float(v.f2_mpg_highway_unrounded),
                |v, x| v.f2_mpg_highway_unrounded = x.into_float(),
            ),
            FieldDescriptor::float(
                "f2_mpg_highway_unadj",
                |v| SqlValue::Float(v.f2_mpg_highway_unadj),
                |v, x| v.f2_mpg_highway_unadj = x.into_float(),
            ),
            FieldDescriptor::float("f2_range", |v| SqlValue::Float(v.f2_range), |v, x| {
                v.f2_range = x.into_float()
            }),
            FieldDescriptor::float(
                "f2_range_city",
                |v| SqlValue::Float(v.f2_range_city),
                |v, x| v.f2_range_city = x.into_float(),
            ),
            FieldDescriptor::float(
                "f2_range_highway",
                |v| SqlValue::Float(v.f2_range_highway),
                |v, x| v.f2_range_highway = x.into_float(),
            ),
            FieldDescriptor::float(
                "fuel_economy_score",
                |v| SqlValue::Float(v.fuel_economy_score),
                |v, x| v.fuel_economy_score = x.into_float(),
            ),
            FieldDescriptor::text(
                "fuel_type",
                |v| SqlValue::Text(v.fuel_type.clone()),
                |v, x| v.fuel_type = x.into_text(),
            ),
            FieldDescriptor::boolean(
                "has_mpg_data",
                |v| SqlValue::Bool(v.has_mpg_data),
                |v, x| v.has_mpg_data = x.into_bool(),
            ),
            // Column name kept from the upstream schema, not the field name.
            FieldDescriptor::boolean(
                "start_stop",
                |v| SqlValue::Bool(v.has_start_stop),
                |v, x| v.has_start_stop = x.into_bool(),
            ),
            FieldDescriptor::boolean(
                "has_supercharger",
                |v| SqlValue::Bool(v.has_supercharger),
                |v, x| v.has_supercharger = x.into_bool(),
            ),
            FieldDescriptor::boolean(
                "has_turbocharger",
                |v| SqlValue::Bool(v.has_turbocharger),
                |v, x| v.has_turbocharger = x.into_bool(),
            ),
            FieldDescriptor::boolean(
                "is_guzzler",
                |v| SqlValue::Bool(v.is_guzzler),
                |v, x| v.is_guzzler = x.into_bool(),
            ),
            FieldDescriptor::boolean(
                "is_phev_blended",
                |v| SqlValue::Bool(v.is_phev_blended),
                |v, x| v.is_phev_blended = x.into_bool(),
            ),
            FieldDescriptor::int(
                "luggage_volume_2door",
                |v| SqlValue::Int(v.luggage_volume_2door),
                |v, x| v.luggage_volume_2door = x.into_int(),
            ),
            FieldDescriptor::int(
                "luggage_volume_4door",
                |v| SqlValue::Int(v.luggage_volume_4door),
                |v, x| v.luggage_volume_4door = x.into_int(),
            ),
            FieldDescriptor::int(
                "luggage_volume_hatch",
                |v| SqlValue::Int(v.luggage_volume_hatch),
                |v, x| v.luggage_volume_hatch = x.into_int(),
            ),
            FieldDescriptor::text("make", |v| SqlValue::Text(v.make.clone()), |v, x| {
                v.make = x.into_text()
            }),
            FieldDescriptor::text(
                "manufacturer_code",
                |v| SqlValue::Text(v.manufacturer_code.clone()),
                |v, x| v.manufacturer_code = x.into_text(),
            ),
            FieldDescriptor::text("model", |v| SqlValue::Text(v.model.clone()), |v, x| {
                v.model = x.into_text()
            }),
            FieldDescriptor::int(
                "passenger_volume_2door",
                |v| SqlValue::Int(v.passenger_volume_2door),
                |v, x| v.passenger_volume_2door = x.into_int(),
            ),
            FieldDescriptor::int(
                "passenger_volume_4door",
                |v| SqlValue::Int(v.passenger_volume_4door),
                |v, x| v.passenger_volume_4door = x.into_int(),
            ),
            FieldDescriptor::int(
                "passenger_volume_hatch",
                |v| SqlValue::Int(v.passenger_volume_hatch),
                |v, x| v.passenger_volume_hatch = x.into_int(),
            ),
            FieldDescriptor::float(
                "phev_cd_city",
                |v| SqlValue::Float(v.phev_cd_city),
                |v, x| v.phev_cd_city = x.into_float(),
            ),
            FieldDescriptor::float(
                "phev_cd_comb",
                |v| SqlValue::Float(v.phev_cd_comb),
                |v, x| v.phev_cd_comb = x.into_float(),
            ),
            FieldDescriptor::float(
                "phev_cd_highway",
                |v| SqlValue::Float(v.phev_cd_highway),
                |v, x| v.phev_cd_highway = x.into_float(),
            ),
            FieldDescriptor::float(
                "phev_mpg_city",
                |v| SqlValue::Float(v.phev_mpg_city),
                |v, x| v.phev_mpg_city = x.into_float(),
            ),
            FieldDescriptor::float(
                "phev_mpg_comb",
                |v| SqlValue::Float(v.phev_mpg_comb),
                |v, x| v.phev_mpg_comb = x.into_float(),
            ),
            FieldDescriptor::float(
                "phev_mpg_highway",
                |v| SqlValue::Float(v.phev_mpg_highway),
                |v, x| v.phev_mpg_highway = x.into_float(),
            ),
            FieldDescriptor::float(
                "phev_uf_city",
                |v| SqlValue::Float(v.phev_uf_city),
                |v, x| v.phev_uf_city = x.into_float(),
            ),
            FieldDescriptor::float(
                "phev_uf_comb",
                |v| SqlValue::Float(v.phev_uf_comb),
                |v, x| v.phev_uf_comb = x.into_float(),
            ),
            FieldDescriptor::float(
                "phev_uf_highway",
                |v| SqlValue::Float(v.phev_uf_highway),
                |v, x| v.phev_uf_highway = x.into_float(),
            ),
            FieldDescriptor::text(
                "size_class",
                |v| SqlValue::Text(v.size_class.clone()),
                |v, x| v.size_class = x.into_text(),
            ),
            FieldDescriptor::text(
                "trans_dscr",
                |v| SqlValue::Text(v.trans_dscr.clone()),
                |v, x| v.trans_dscr = x.into_text(),
            ),
            FieldDescriptor::text(
                "transmission",
                |v| SqlValue::Text(v.transmission.clone()),
                |v, x| v.transmission = x.into_text(),
            ),
            FieldDescriptor::int("year", |v| SqlValue::Int(v.year), |v, x| {
                v.year = x.into_int()
            }),
            FieldDescriptor::int(
                "you_save_spend",
                |v| SqlValue::Int(v.you_save_spend),
                |v, x| v.you_save_spend = x.into_int(),
            ),
        ];
        FIELDS
    }
}

/// Collection wrapper matching the feed's `<vehicles>` document root.
#[derive(Debug, Default, Deserialize)]
pub struct RawVehicles {
    #[serde(rename = "vehicle", default)]
    pub vehicles: Vec<RawVehicle>,
}

/// All-string mirror of one `<vehicle>` element.
///
/// Exists only transiently during ingestion; discarded after
/// conversion to [`Vehicle`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawVehicle {
    #[serde(rename = "atvtype")]
    pub atv_type: String,
    #[serde(rename = "charge120")]
    pub charge_time_120v: String,
    #[serde(rename = "charge240")]
    pub charge_time_240v: String,
    #[serde(rename = "charge240b")]
    pub charge_time_240vb: String,
    #[serde(rename = "c240Dscr")]
    pub charger_240v_dscr: String,
    #[serde(rename = "c240bDscr")]
    pub charger_240vb_dscr: String,
    pub cylinders: String,
    #[serde(rename = "drive")]
    pub drive_axle_type: String,
    #[serde(rename = "cityE")]
    pub e_city: String,
    #[serde(rename = "combE")]
    pub e_comb: String,
    #[serde(rename = "highwayE")]
    pub e_highway: String,
    #[serde(rename = "evMotor")]
    pub e_motor: String,
    #[serde(rename = "displ")]
    pub eng_displacement: String,
    pub eng_dscr: String,
    #[serde(rename = "engId")]
    pub eng_id: String,
    #[serde(rename = "createdOn")]
    pub epa_created_on: String,
    #[serde(rename = "id")]
    pub epa_id: String,
    #[serde(rename = "modifiedOn")]
    pub epa_modified_on: String,
    #[serde(rename = "barrels08")]
    pub f1_barrels_per_year: String,
    #[serde(rename = "co2")]
    pub f1_co2: String,
    #[serde(rename = "co2TailpipeGpm")]
    pub f1_co2_tailpipe: String,
    #[serde(rename = "fuelCost08")]
    pub f1_fuel_cost: String,
    #[serde(rename = "fuelType1")]
    pub f1_fuel_type: String,
    #[serde(rename = "ghgScore")]
    pub f1_ghg_score: String,
    #[serde(rename = "city08")]
    pub f1_mpg_city: String,
    #[serde(rename = "UCity")]
    pub f1_mpg_city_unadj: String,
    #[serde(rename = "city08U")]
    pub f1_mpg_city_unrounded: String,
    #[serde(rename = "comb08")]
    pub f1_mpg_comb: String,
    #[serde(rename = "comb08U")]
    pub f1_mpg_comb_unrounded: String,
    #[serde(rename = "highway08")]
    pub f1_mpg_highway: String,
    #[serde(rename = "UHighway")]
    pub f1_mpg_highway_unadj: String,
    #[serde(rename = "highway08U")]
    pub f1_mpg_highway_unrounded: String,
    #[serde(rename = "range")]
    pub f1_range: String,
    #[serde(rename = "barrelsA08")]
    pub f2_barrels_per_year: String,
    #[serde(rename = "co2A")]
    pub f2_co2: String,
    #[serde(rename = "co2TailpipeAGpm")]
    pub f2_co2_tailpipe: String,
    #[serde(rename = "fuelCostA08")]
    pub f2_fuel_cost: String,
    #[serde(rename = "fuelType2")]
    pub f2_fuel_type: String,
    #[serde(rename = "ghgScoreA")]
    pub f2_ghg_score: String,
    #[serde(rename = "cityA08")]
    pub f2_mpg_city: String,
    #[serde(rename = "UCityA")]
    pub f2_mpg_city_unadj: String,
    #[serde(rename = "cityA08U")]
    pub f2_mpg_city_unrounded: String,
    #[serde(rename = "combA08")]
    pub f2_mpg_comb: String,
    #[serde(rename = "combA08U")]
    pub f2_mpg_comb_unrounded: String,
    #[serde(rename = "highwayA08")]
    pub f2_mpg_highway: String,
    #[serde(rename = "highwayA08U")]
    pub f2_mpg_highway_unrounded: String,
    #[serde(rename = "UHighwayA")]
    pub f2_mpg_highway_unadj: String,
    #[serde(rename = "rangeA")]
    pub f2_range: String,
    #[serde(rename = "rangeCityA")]
    pub f2_range_city: String,
    #[serde(rename = "rangeHwyA")]
    pub f2_range_highway: String,
    #[serde(rename = "feScore")]
    pub fuel_economy_score: String,
    #[serde(rename = "fuelType")]
    pub fuel_type: String,
    /// If G or T, the vehicle is subject to the gas guzzler tax.
    pub guzzler: String,
    #[serde(rename = "lv2")]
    pub luggage_volume_2door: String,
    #[serde(rename = "lv4")]
    pub luggage_volume_4door: String,
    #[serde(rename = "hlv")]
    pub luggage_volume_hatch: String,
    pub make: String,
    #[serde(rename = "mfrCode")]
    pub manufacturer_code: String,
    pub model: String,
    #[serde(rename = "mpgData")]
    pub mpg_data: String,
    #[serde(rename = "pv2")]
    pub passenger_volume_2door: String,
    #[serde(rename = "pv4")]
    pub passenger_volume_4door: String,
    #[serde(rename = "hpv")]
    pub passenger_volume_hatch: String,
    #[serde(rename = "phevBlended")]
    pub phev_blended: String,
    #[serde(rename = "cityCD")]
    pub phev_cd_city: String,
    #[serde(rename = "combinedCD")]
    pub phev_cd_comb: String,
    #[serde(rename = "highwayCD")]
    pub phev_cd_highway: String,
    #[serde(rename = "phevCity")]
    pub phev_mpg_city: String,
    #[serde(rename = "phevComb")]
    pub phev_mpg_comb: String,
    #[serde(rename = "phevHwy")]
    pub phev_mpg_highway: String,
    #[serde(rename = "cityUF")]
    pub phev_uf_city: String,
    #[serde(rename = "combinedUF")]
    pub phev_uf_comb: String,
    #[serde(rename = "highwayUF")]
    pub phev_uf_highway: String,
    #[serde(rename = "VClass")]
    pub size_class: String,
    #[serde(rename = "startStop")]
    pub start_stop: String,
    #[serde(rename = "sCharger")]
    pub supercharger: String,
    #[serde(rename = "tCharger")]
    pub turbocharger: String,
    pub trans_dscr: String,
    #[serde(rename = "trany")]
    pub transmission: String,
    pub year: String,
    #[serde(rename = "youSaveSpend")]
    pub you_save_spend: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fe_srm::record::write_fields;

    const SAMPLE_XML: &str = r#"
        <vehicles>
          <vehicle>
            <id>31873</id>
            <make>Alfa Romeo</make>
            <model>4C</model>
            <year>2015</year>
            <cylinders>4</cylinders>
            <displ>1.8</displ>
            <fuelType1>Premium Gasoline</fuelType1>
            <comb08>28</comb08>
            <city08>24</city08>
            <highway08>34</highway08>
            <tCharger>T</tCharger>
            <sCharger></sCharger>
            <guzzler></guzzler>
            <mpgData>N</mpgData>
            <phevBlended>false</phevBlended>
            <ghgScore>-1</ghgScore>
            <createdOn>2014-09-02T00:00:00-04:00</createdOn>
            <trany>Auto(AM6)</trany>
          </vehicle>
          <vehicle>
            <id>31874</id>
            <make>Chevrolet</make>
            <model>Spark EV</model>
            <year>2015</year>
            <fuelType1>Electricity</fuelType1>
            <cityE>28</cityE>
            <combE>30</combE>
            <highwayE>32</highwayE>
          </vehicle>
        </vehicles>"#;

    #[test]
    fn test_deserialize_raw_vehicles() {
        let outer: RawVehicles = quick_xml::de::from_str(SAMPLE_XML).unwrap();
        assert_eq!(outer.vehicles.len(), 2);
        assert_eq!(outer.vehicles[0].make, "Alfa Romeo");
        assert_eq!(outer.vehicles[0].turbocharger, "T");
        // elements absent from the document default to empty strings
        assert_eq!(outer.vehicles[1].turbocharger, "");
    }

    #[test]
    fn test_from_raw_converts_and_derives_booleans() {
        let outer: RawVehicles = quick_xml::de::from_str(SAMPLE_XML).unwrap();
        let v = Vehicle::from_raw(&outer.vehicles[0]);

        assert_eq!(v.epa_id, 31873);
        assert_eq!(v.year, 2015);
        assert_eq!(v.cylinders, 4);
        assert_eq!(v.eng_displacement, 1.8);
        assert_eq!(v.f1_mpg_comb, 28.0);
        assert!(v.has_turbocharger);
        assert!(!v.has_supercharger);
        assert!(!v.is_guzzler);
        assert!(!v.has_mpg_data);
        assert!(!v.is_phev_blended);
        // -1 sentinel normalized to zero
        assert_eq!(v.f1_ghg_score, 0);
        assert_ne!(v.epa_created_on, fe_srm::Timestamp::default());
        assert_eq!(v.transmission, "Auto(AM6)");
    }

    #[test]
    fn test_write_column_set_excludes_id_updated_and_joins() {
        let cols: Vec<&str> = write_fields::<Vehicle>().iter().map(|f| f.column).collect();
        assert!(!cols.contains(&"id"));
        assert!(!cols.contains(&"updated"));
        assert!(cols.contains(&"epa_id"));
        assert!(cols.contains(&"start_stop"));
        // joined/computed collections are not columns at all
        assert!(!cols.contains(&"emissions_info"));
        assert!(!cols.contains(&"fuels"));
    }
}
