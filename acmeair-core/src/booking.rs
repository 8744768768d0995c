use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A confirmed booking of one flight segment for one customer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "customerId")]
    pub customer_id: String,
    #[serde(rename = "flightId")]
    pub flight_id: String,
    #[serde(rename = "flightSegmentId")]
    pub flight_segment_id: String,
    #[serde(rename = "dateOfBooking")]
    pub date_of_booking: DateTime<Utc>,
}

impl Booking {
    pub fn new(customer_id: &str, flight_segment_id: &str, flight_id: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            customer_id: customer_id.to_string(),
            flight_id: flight_id.to_string(),
            flight_segment_id: flight_segment_id.to_string(),
            date_of_booking: Utc::now(),
        }
    }
}

/// Wire shape returned by `POST /bookflights`.
///
/// Field order is part of the contract: `oneWay`, then `returnBookingId`
/// (round trips only), then `departBookingId`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookingInfo {
    #[serde(rename = "oneWay")]
    pub one_way: bool,
    #[serde(rename = "returnBookingId", skip_serializing_if = "Option::is_none", default)]
    pub return_booking_id: Option<String>,
    #[serde(rename = "departBookingId")]
    pub depart_booking_id: String,
}

impl BookingInfo {
    pub fn one_way(depart_booking_id: String) -> Self {
        Self {
            one_way: true,
            return_booking_id: None,
            depart_booking_id,
        }
    }

    pub fn round_trip(depart_booking_id: String, return_booking_id: String) -> Self {
        Self {
            one_way: false,
            return_booking_id: Some(return_booking_id),
            depart_booking_id,
        }
    }
}
