use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Screening event in the shape POS terminals consume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event4Pos {
    pub id: String,
    pub attributes: Event4PosAttributes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event4PosAttributes {
    pub day: String,
    pub open_time: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seat_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tour_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wheelchair_available: Option<u64>,
    pub ticket_types: Vec<TicketType>,
    pub online_sales_status: OnlineSalesStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OnlineSalesStatus {
    Normal,
    Suspended,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge: Option<i64>,
    pub name: TicketTypeName,
    /// Ticket type code, not the internal offer id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_num: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketTypeName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ja: Option<String>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ApiError,
}
