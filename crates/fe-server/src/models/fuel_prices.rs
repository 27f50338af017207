//! National average fuel prices, appended on each ingestion run
//!
//! Rows are never updated in place; the newest row (greatest `updated`)
//! is the current price set.

use serde::Deserialize;

use fe_srm::{FieldDescriptor, Relational, SqlValue, Timestamp};

use super::parse::parse_float;

#[derive(Debug, Default, Clone)]
pub struct FuelPrices {
    pub id: i64,
    pub updated: Timestamp,
    /// $ per gallon of gasoline equivalent of compressed natural gas.
    pub cng: f64,
    pub diesel: f64,
    pub e85: f64,
    /// $ per kW-hr.
    pub electricity: f64,
    pub gas_midgrade: f64,
    pub gas_premium: f64,
    pub gas_regular: f64,
    pub liquid_propane: f64,
}

impl FuelPrices {
    pub fn from_raw(raw: &RawFuelPrices) -> Self {
        FuelPrices {
            id: 0,
            updated: Timestamp::default(),
            cng: parse_float(&raw.cng),
            diesel: parse_float(&raw.diesel),
            e85: parse_float(&raw.e85),
            electricity: parse_float(&raw.electric),
            gas_midgrade: parse_float(&raw.midgrade),
            gas_premium: parse_float(&raw.premium),
            gas_regular: parse_float(&raw.regular),
            liquid_propane: parse_float(&raw.lpg),
        }
    }
}

impl Relational for FuelPrices {
    fn fields() -> &'static [FieldDescriptor<Self>] {
        static FIELDS: &[FieldDescriptor<FuelPrices>] = &[
            FieldDescriptor::int("id", |p: &FuelPrices| SqlValue::Int(p.id), |p, x| p.id = x.into_int())
                .primary_key(),
            FieldDescriptor::timestamp(
                "updated",
                |p: &FuelPrices| SqlValue::Timestamp(p.updated.0),
                |p, x| p.updated = x.into_timestamp(),
            )
            .auto_set(),
            FieldDescriptor::float("cng", |p| SqlValue::Float(p.cng), |p, x| {
                p.cng = x.into_float()
            }),
            FieldDescriptor::float("diesel", |p| SqlValue::Float(p.diesel), |p, x| {
                p.diesel = x.into_float()
            }),
            FieldDescriptor::float("e85", |p| SqlValue::Float(p.e85), |p, x| {
                p.e85 = x.into_float()
            }),
            FieldDescriptor::float(
                "electricity",
                |p| SqlValue::Float(p.electricity),
                |p, x| p.electricity = x.into_float(),
            ),
            FieldDescriptor::float(
                "gas_midgrade",
                |p| SqlValue::Float(p.gas_midgrade),
                |p, x| p.gas_midgrade = x.into_float(),
            ),
            FieldDescriptor::float(
                "gas_premium",
                |p| SqlValue::Float(p.gas_premium),
                |p, x| p.gas_premium = x.into_float(),
            ),
            FieldDescriptor::float(
                "gas_regular",
                |p| SqlValue::Float(p.gas_regular),
                |p, x| p.gas_regular = x.into_float(),
            ),
            FieldDescriptor::float(
                "liquid_propane",
                |p| SqlValue::Float(p.liquid_propane),
                |p, x| p.liquid_propane = x.into_float(),
            ),
        ];
        FIELDS
    }
}

/// All-string mirror of the `<fuelPrices>` document.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawFuelPrices {
    pub cng: String,
    pub diesel: String,
    pub e85: String,
    pub electric: String,
    pub lpg: String,
    pub midgrade: String,
    pub premium: String,
    pub regular: String,
}
