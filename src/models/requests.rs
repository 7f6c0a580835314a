use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::Seller;

/// Default page size of the event search
pub const DEFAULT_LIMIT: u32 = 100;

/// Query parameters of `GET /performances`
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct SearchConditions4Pos {
    /// Floored at 1 when building the upstream search
    pub page: Option<i64>,
    #[validate(range(min = 1))]
    pub limit: Option<u32>,
    #[validate(custom(function = "validate_day"))]
    pub day: Option<String>,
    #[validate(length(min = 1))]
    #[serde(alias = "performance_id", rename = "performanceId")]
    pub performance_id: Option<String>,
}

/// `day` is either empty (no filter) or a calendar date written as YYYYMMDD
fn validate_day(day: &str) -> Result<(), ValidationError> {
    if day.is_empty() {
        return Ok(());
    }

    let well_formed = day.len() == 8
        && day.bytes().all(|b| b.is_ascii_digit())
        && chrono::NaiveDate::parse_from_str(day, "%Y%m%d").is_ok();

    if well_formed {
        Ok(())
    } else {
        Err(ValidationError::new("day_format"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    ScreeningEvent,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::ScreeningEvent => "ScreeningEvent",
        }
    }
}

/// Conditions sent to the upstream event search, sorted by start date ascending
#[derive(Debug, Clone, PartialEq)]
pub struct EventSearchConditions {
    pub limit: u32,
    pub page: u32,
    pub type_of: EventType,
    pub start_from: Option<DateTime<FixedOffset>>,
    pub start_through: Option<DateTime<FixedOffset>>,
    /// Fields excluded from the upstream response
    pub excluded_fields: Vec<String>,
}

impl EventSearchConditions {
    /// Query string pairs in the bracket notation the event API expects
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("limit".to_string(), self.limit.to_string()),
            ("page".to_string(), self.page.to_string()),
            ("sort[startDate]".to_string(), "1".to_string()),
            ("typeOf".to_string(), self.type_of.as_str().to_string()),
        ];

        if let Some(from) = self.start_from {
            pairs.push(("startFrom".to_string(), from.to_rfc3339()));
        }
        if let Some(through) = self.start_through {
            pairs.push(("startThrough".to_string(), through.to_rfc3339()));
        }
        for field in &self.excluded_fields {
            pairs.push((format!("$projection[{}]", field), "0".to_string()));
        }

        pairs
    }
}

/// Conditions sent to the upstream ticket offer search
#[derive(Debug, Clone, PartialEq)]
pub struct TicketOfferSearchConditions {
    pub event_id: String,
    pub seller: Option<Seller>,
    pub store_id: String,
}

impl TicketOfferSearchConditions {
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(3);

        if let Some(seller) = &self.seller {
            pairs.push(("seller[typeOf]".to_string(), seller.type_of.clone()));
            pairs.push(("seller[id]".to_string(), seller.id.clone()));
        }
        pairs.push(("store[id]".to_string(), self.store_id.clone()));

        pairs
    }
}
