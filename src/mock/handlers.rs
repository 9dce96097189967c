//! Route handlers and the routing table

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{json, Value};

use super::fixtures;
use super::responder::{MockRequest, MockResponse};
use super::routes::{HttpMethod, PathPattern, Route};

pub const MOCK_ID_TOKEN: &str = "mock-id-token";
pub const CUSTOMER_ROLE: &str = "CUSTOMER";
pub const WRONG_PASSWORD: &str = "wrong-pass";
pub const DUPLICATE_EMAIL_MARKER: &str = "exists";

/// Declaration order is evaluation order: `/tours/available` must precede `/tours/`.
pub static ROUTE_TABLE: &[Route] = &[
    Route::new(HttpMethod::Post, PathPattern::Exact("/auth/sign-up"), "sign-up", sign_up),
    Route::new(HttpMethod::Post, PathPattern::Exact("/auth/sign-in"), "sign-in", sign_in),
    Route::new(HttpMethod::Post, PathPattern::Exact("/bookings"), "create-booking", create_booking),
    Route::new(HttpMethod::Get, PathPattern::Prefix("/tours/available"), "available-tours", available_tours),
    Route::new(
        HttpMethod::Get,
        PathPattern::Tail { prefix: "/tours/", param: "tourId" },
        "tour-detail",
        tour_detail,
    ),
    Route::new(HttpMethod::Get, PathPattern::Exact("/health"), "health", health),
];

fn sign_up(request: &MockRequest, _: &HashMap<String, String>) -> MockResponse {
    let email = request.field("email").and_then(Value::as_str).unwrap_or_default();

    if email.contains(DUPLICATE_EMAIL_MARKER) {
        MockResponse::message(409, "Email already exists")
    } else {
        MockResponse::message(201, "Account created successfully")
    }
}

fn sign_in(request: &MockRequest, _: &HashMap<String, String>) -> MockResponse {
    match (request.present("email"), request.present("password")) {
        (Some(email), Some(password)) if password.as_str() != Some(WRONG_PASSWORD) => MockResponse::new(
            200,
            json!({
                "idToken": MOCK_ID_TOKEN,
                "role": CUSTOMER_ROLE,
                "userName": email,
                "email": email,
            }),
        ),
        _ => MockResponse::message(400, "Wrong password or email"),
    }
}

fn create_booking(request: &MockRequest, _: &HashMap<String, String>) -> MockResponse {
    let (Some(_tour_id), Some(travel_date)) = (request.present("tourId"), request.present("travelDate")) else {
        return MockResponse::message(400, "Bad request");
    };

    match parse_travel_date(travel_date) {
        Some(instant) if instant > Utc::now() => MockResponse::new(
            201,
            json!({
                "bookingId": "B-0001",
                "status": "CREATED",
                "confirmationNumber": "CONF-123",
            }),
        ),
        _ => MockResponse::message(400, "Travel date cannot be in the past"),
    }
}

fn available_tours(_: &MockRequest, _: &HashMap<String, String>) -> MockResponse {
    MockResponse::new(200, fixtures::available_listing())
}

fn tour_detail(_: &MockRequest, params: &HashMap<String, String>) -> MockResponse {
    let id = params.get("tourId").map(String::as_str).unwrap_or_default();

    match fixtures::find_tour(id) {
        Some(tour) => MockResponse::new(200, tour.detail()),
        None => MockResponse::message(404, "Tour not found"),
    }
}

fn health(_: &MockRequest, _: &HashMap<String, String>) -> MockResponse {
    MockResponse::new(200, json!({ "status": "ok" }))
}

/// Parse a travel date into an instant
///
/// Accepts `YYYY-MM-DD` (midnight UTC), RFC 3339, a zone-less
/// `YYYY-MM-DDTHH:MM:SS` (read as UTC) or epoch milliseconds. Anything else
/// yields `None`, which callers treat as "not in the future".
pub fn parse_travel_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
            }
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.and_utc())
        }
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use crate::mock::responder::RequestOptions;

    #[test]
    fn test_parse_date_only() {
        let parsed = parse_travel_date(&json!("2031-05-17")).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2031, 5, 17, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let parsed = parse_travel_date(&json!("2031-05-17T10:00:00+02:00")).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2031, 5, 17, 8, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_epoch_millis() {
        let parsed = parse_travel_date(&json!(0)).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_float_epoch_millis() {
        let parsed = parse_travel_date(&json!(1.9e12)).unwrap();
        assert_eq!(Some(parsed), DateTime::from_timestamp_millis(1_900_000_000_000));

        let parsed = parse_travel_date(&json!(1500.75)).unwrap();
        assert_eq!(Some(parsed), DateTime::from_timestamp_millis(1500));
    }

    #[test]
    fn test_future_float_millis_is_bookable() {
        let millis = (Utc::now() + Duration::days(30)).timestamp_millis() as f64 + 0.5;
        let request = MockRequest::new(
            "POST",
            "/bookings",
            RequestOptions::json(json!({"tourId": "T-0001", "travelDate": millis})),
        );
        assert_eq!(create_booking(&request, &HashMap::new()).status(), 201);
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_travel_date(&json!("next tuesday")).is_none());
        assert!(parse_travel_date(&json!(true)).is_none());
        assert!(parse_travel_date(&json!({"y": 2031})).is_none());
    }

    #[test]
    fn test_today_is_not_in_the_future() {
        let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
        let request = MockRequest::new(
            "POST",
            "/bookings",
            RequestOptions::json(json!({"tourId": "T-0001", "travelDate": today})),
        );
        assert_eq!(create_booking(&request, &HashMap::new()).status(), 400);
    }

    #[test]
    fn test_day_after_tomorrow_is_bookable() {
        let travel_date = (Utc::now() + Duration::days(2)).date_naive().format("%Y-%m-%d").to_string();
        let request = MockRequest::new(
            "POST",
            "/bookings",
            RequestOptions::json(json!({"tourId": "T-0002", "travelDate": travel_date})),
        );
        assert_eq!(create_booking(&request, &HashMap::new()).status(), 201);
    }

    #[test]
    fn test_route_table_order() {
        let names: Vec<_> = ROUTE_TABLE.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            ["sign-up", "sign-in", "create-booking", "available-tours", "tour-detail", "health"]
        );
    }
}
