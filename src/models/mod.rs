// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{ScreeningEvent, EventStatus, PropertyValue, EventOffers, Seller, AggregateOffer, AggregateOfferItem, MultilingualString, PriceSpecification, CompoundPriceSpecification, TicketOffer, UnitPriceOffer};
pub use requests::{SearchConditions4Pos, EventSearchConditions, TicketOfferSearchConditions, EventType};
pub use responses::{Event4Pos, Event4PosAttributes, OnlineSalesStatus, TicketType, TicketTypeName, HealthResponse, ErrorResponse};
