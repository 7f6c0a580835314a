use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone, Utc};
use chrono_tz::Asia::Tokyo;

use crate::error::{AppError, CinerinoError};
use crate::models::requests::DEFAULT_LIMIT;
use crate::models::{
    Event4Pos, Event4PosAttributes, EventSearchConditions, EventStatus, EventType,
    OnlineSalesStatus, ScreeningEvent, SearchConditions4Pos, TicketOffer,
    TicketOfferSearchConditions, TicketType, TicketTypeName, UnitPriceOffer,
};

/// UTC offset the `day` filter is interpreted in
const JST_OFFSET_SECS: i32 = 9 * 3600;

/// One page of upstream search results
#[derive(Debug, Clone)]
pub struct SearchResult<T> {
    pub data: Vec<T>,
    pub total_count: Option<u64>,
}

/// Event and offer lookups offered by the upstream API
#[async_trait]
pub trait EventService: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<ScreeningEvent, AppError>;

    async fn search(
        &self,
        conditions: &EventSearchConditions,
    ) -> Result<SearchResult<ScreeningEvent>, AppError>;

    async fn search_ticket_offers(
        &self,
        conditions: &TicketOfferSearchConditions,
    ) -> Result<Vec<TicketOffer>, AppError>;
}

/// Search screening events and reshape them for POS terminals
///
/// Ticket offers are looked up once, for the first event found, and the
/// same offers are used for every event in the result.
pub async fn search_events<S>(
    params: &SearchConditions4Pos,
    client_id: &str,
    service: &S,
) -> Result<Vec<Event4Pos>, AppError>
where
    S: EventService + ?Sized,
{
    let events = match &params.performance_id {
        Some(id) => vec![service.find_by_id(id).await?],
        None => {
            let conditions = build_search_conditions(params)?;
            service.search(&conditions).await?.data
        }
    };

    let Some(first_event) = events.first() else {
        tracing::debug!("No events found");
        return Ok(Vec::new());
    };

    let offers = service
        .search_ticket_offers(&TicketOfferSearchConditions {
            event_id: first_event.id.clone(),
            seller: first_event.seller().cloned(),
            store_id: client_id.to_string(),
        })
        .await?;

    let unit_price_offers: Vec<UnitPriceOffer> = offers.into_iter().map(UnitPriceOffer::from).collect();

    tracing::debug!(
        "Reshaping {} events with {} offers of event {}",
        events.len(),
        unit_price_offers.len(),
        first_event.id
    );

    Ok(events
        .iter()
        .map(|event| event_to_event4pos(event, &unit_price_offers))
        .collect())
}

/// Build the paged upstream search from POS query parameters
pub fn build_search_conditions(params: &SearchConditions4Pos) -> Result<EventSearchConditions, AppError> {
    let (start_from, start_through) = match params.day.as_deref() {
        Some(day) if !day.is_empty() => {
            let (from, through) = day_window(day)?;
            (Some(from), Some(through))
        }
        _ => (None, None),
    };

    Ok(EventSearchConditions {
        limit: params.limit.unwrap_or(DEFAULT_LIMIT),
        page: floor_page(params.page),
        type_of: EventType::ScreeningEvent,
        start_from,
        start_through,
        excluded_fields: vec!["aggregateReservation".to_string()],
    })
}

/// Requested page, never below 1
fn floor_page(page: Option<i64>) -> u32 {
    page.map_or(1, |p| u32::try_from(p.max(1)).unwrap_or(u32::MAX))
}

/// `[day 00:00+09:00, day+1 00:00+09:00)` for a YYYYMMDD day
pub fn day_window(day: &str) -> Result<(DateTime<FixedOffset>, DateTime<FixedOffset>), AppError> {
    let invalid = || AppError::from(CinerinoError::argument("day", format!("invalid day: {}", day)));

    let offset = FixedOffset::east_opt(JST_OFFSET_SECS).ok_or_else(invalid)?;
    let date = NaiveDate::parse_from_str(day, "%Y%m%d").map_err(|_| invalid())?;
    let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(invalid)?;
    let from = offset.from_local_datetime(&midnight).single().ok_or_else(invalid)?;

    Ok((from, from + Duration::days(1)))
}

/// Reshape one screening event using the offers of the first event
pub fn event_to_event4pos(event: &ScreeningEvent, unit_price_offers: &[UnitPriceOffer]) -> Event4Pos {
    let normal_offer = find_offer_by_category(unit_price_offers, "Normal");
    let wheelchair_offer = find_offer_by_category(unit_price_offers, "Wheelchair");

    // Normal seats first, the event's own capacity otherwise
    let seat_status = normal_offer
        .and_then(|o| event.offer_remaining_capacity(&o.id))
        .or(event.remaining_attendee_capacity);

    let wheelchair_available = wheelchair_offer.and_then(|o| event.offer_remaining_capacity(&o.id));

    let ticket_types = unit_price_offers
        .iter()
        .map(|offer| TicketType {
            name: TicketTypeName {
                en: offer.name.en.clone(),
                ja: offer.name.ja.clone(),
            },
            // POS terminals key on the ticket type code
            id: Some(offer.identifier.clone()),
            charge: offer.price_specification.as_ref().and_then(|p| p.price),
            available_num: event.offer_remaining_capacity(&offer.id),
        })
        .collect();

    let online_sales_status = if event.event_status == EventStatus::EventScheduled {
        OnlineSalesStatus::Normal
    } else {
        OnlineSalesStatus::Suspended
    };

    Event4Pos {
        id: event.id.clone(),
        attributes: Event4PosAttributes {
            day: format_tokyo(&event.start_date, "%Y%m%d"),
            open_time: format_tokyo(&event.start_date, "%H%M"),
            start_time: format_tokyo(&event.start_date, "%H%M"),
            end_time: format_tokyo(&event.end_date, "%H%M"),
            seat_status: seat_status.map(|s| s.to_string()),
            tour_number: event.property("tourNumber").map(str::to_string),
            wheelchair_available,
            ticket_types,
            online_sales_status,
        },
    }
}

fn find_offer_by_category<'a>(offers: &'a [UnitPriceOffer], category: &str) -> Option<&'a UnitPriceOffer> {
    offers.iter().find(|o| o.property("category") == Some(category))
}

fn format_tokyo(date: &DateTime<Utc>, format: &str) -> String {
    date.with_timezone(&Tokyo).format(format).to_string()
}
