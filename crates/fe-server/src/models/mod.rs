//! Domain records and their raw feed mirrors

pub mod emissions;
pub mod fuel;
pub mod fuel_prices;
pub mod parse;
pub mod vehicle;

pub use emissions::{EmissionsInfo, RawEmissionsInfo, RawEmissionsReport};
pub use fuel::{calculate_fuel_data, DrivingProfile, Fuel};
pub use fuel_prices::{FuelPrices, RawFuelPrices};
pub use vehicle::{RawVehicle, RawVehicles, Vehicle};
