use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Price specification type tag of the per-unit price component
pub const UNIT_PRICE_SPECIFICATION: &str = "UnitPriceSpecification";

/// Screening event as returned by the Cinerino event API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningEvent {
    pub id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub event_status: EventStatus,
    #[serde(default)]
    pub remaining_attendee_capacity: Option<u64>,
    #[serde(default)]
    pub additional_property: Option<Vec<PropertyValue>>,
    #[serde(default)]
    pub offers: Option<EventOffers>,
    #[serde(default)]
    pub aggregate_offer: Option<AggregateOffer>,
}

impl ScreeningEvent {
    /// Value of the additional property named `name`, if any
    pub fn property(&self, name: &str) -> Option<&str> {
        find_property(self.additional_property.as_deref(), name)
    }

    /// Remaining capacity the aggregate offer reports for the offer `offer_id`
    pub fn offer_remaining_capacity(&self, offer_id: &str) -> Option<u64> {
        self.aggregate_offer
            .as_ref()?
            .offers
            .as_ref()?
            .iter()
            .find(|o| o.id == offer_id)?
            .remaining_attendee_capacity
    }

    pub fn seller(&self) -> Option<&Seller> {
        self.offers.as_ref()?.seller.as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventStatus {
    EventScheduled,
    EventCancelled,
    EventPostponed,
    EventRescheduled,
    #[serde(other)]
    Other,
}

/// Name/value pair attached to events and offers
///
/// Values are free-form upstream; only string values are read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyValue {
    pub name: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventOffers {
    #[serde(default)]
    pub seller: Option<Seller>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seller {
    pub type_of: String,
    pub id: String,
}

/// Per-event breakdown of offers with live remaining capacity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateOffer {
    #[serde(default)]
    pub offers: Option<Vec<AggregateOfferItem>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateOfferItem {
    pub id: String,
    #[serde(default)]
    pub remaining_attendee_capacity: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultilingualString {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ja: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSpecification {
    pub type_of: String,
    #[serde(default)]
    pub price: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompoundPriceSpecification {
    #[serde(default)]
    pub price_component: Vec<PriceSpecification>,
}

/// Ticket offer as returned by the ticket offer search
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketOffer {
    pub id: String,
    pub identifier: String,
    #[serde(default)]
    pub name: MultilingualString,
    #[serde(default)]
    pub price_specification: CompoundPriceSpecification,
    #[serde(default)]
    pub additional_property: Option<Vec<PropertyValue>>,
}

/// Ticket offer reduced to its unit price component
#[derive(Debug, Clone)]
pub struct UnitPriceOffer {
    pub id: String,
    pub identifier: String,
    pub name: MultilingualString,
    pub price_specification: Option<PriceSpecification>,
    pub additional_property: Option<Vec<PropertyValue>>,
}

impl UnitPriceOffer {
    pub fn property(&self, name: &str) -> Option<&str> {
        find_property(self.additional_property.as_deref(), name)
    }
}

impl From<TicketOffer> for UnitPriceOffer {
    fn from(offer: TicketOffer) -> Self {
        let price_specification = offer
            .price_specification
            .price_component
            .into_iter()
            .find(|p| p.type_of == UNIT_PRICE_SPECIFICATION);

        Self {
            id: offer.id,
            identifier: offer.identifier,
            name: offer.name,
            price_specification,
            additional_property: offer.additional_property,
        }
    }
}

fn find_property<'a>(properties: Option<&'a [PropertyValue]>, name: &str) -> Option<&'a str> {
    properties?
        .iter()
        .find(|p| p.name == name)
        .and_then(|p| p.value.as_str())
}
