//! API response types

use serde::Serialize;

use crate::api::pagination::PageMeta;
use crate::models::{DrivingProfile, Vehicle};

/// One-line acknowledgement body.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Single vehicle, echoing the profile its figures were computed for.
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub profile: DrivingProfile,
    pub vehicle: Vehicle,
}

/// Page of vehicles plus the paging and profile context.
#[derive(Debug, Serialize)]
pub struct VehicleListResponse {
    pub page: PageMeta,
    pub profile: DrivingProfile,
    pub vehicles: Vec<Vehicle>,
}

/// Standard error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}
