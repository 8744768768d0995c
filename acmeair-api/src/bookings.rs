use axum::{
    extract::{rejection::FormRejection, Form, Path, State},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json,
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use acmeair_core::BookingInfo;
use serde::Deserialize;
use tracing::{debug, error, warn};
use crate::state::AppState;
use crate::demand;
use crate::error::AppError;

pub const JWT_COOKIE: &str = "jwt_token";

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct BookFlightsForm {
    pub userid: String,
    #[serde(rename = "toFlightId")]
    pub to_flight_id: String,
    #[serde(rename = "toFlightSegId")]
    pub to_flight_seg_id: String,
    #[serde(rename = "retFlightId", default)]
    pub ret_flight_id: Option<String>,
    #[serde(rename = "retFlightSegId", default)]
    pub ret_flight_seg_id: Option<String>,
    #[serde(rename = "oneWayFlight")]
    pub one_way_flight: bool,
}

impl BookFlightsForm {
    /// Return leg as `(flight id, segment id)`; both are required for a round trip.
    fn return_leg(&self) -> Result<(&str, &str), AppError> {
        fn present(v: &Option<String>) -> Option<&str> {
            v.as_deref().filter(|s| !s.trim().is_empty())
        }

        match (present(&self.ret_flight_id), present(&self.ret_flight_seg_id)) {
            (Some(flight_id), Some(segment_id)) => Ok((flight_id, segment_id)),
            _ => Err(AppError::ValidationError(
                "retFlightId and retFlightSegId are required for a round trip".to_string(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CancelBookingForm {
    pub number: String,
    pub userid: String,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(check_status))
        .route("/bookflights", post(book_flights))
        .route("/bybookingnumber/{userid}/{number}", get(get_booking_by_number))
        .route("/byuser/{user}", get(get_bookings_by_user))
        .route("/cancelbooking", post(cancel_booking))
}

/// Missing or malformed form fields are a client error, reported like any other.
fn form_fields<T>(form: Result<Form<T>, FormRejection>) -> Result<T, AppError> {
    form.map(|Form(fields)| fields)
        .map_err(|rejection| AppError::ValidationError(rejection.body_text()))
}

/// Rejects the call when enforcement is on and the `jwt_token` cookie does
/// not belong to `user_id`.
fn authorize(state: &AppState, user_id: &str, jar: &CookieJar) -> Result<(), AppError> {
    if !state.auth.secure_user_calls() {
        return Ok(());
    }

    let token = jar.get(JWT_COOKIE).map(|c| c.value());
    if state.auth.validate_jwt(user_id, token) {
        Ok(())
    } else {
        Err(AppError::AuthorizationError(format!("token does not match user {}", user_id)))
    }
}

/// Award miles for a booked segment. A failure here never undoes the booking.
async fn award_miles(state: &AppState, user_id: &str, segment_id: &str) {
    if !state.rewards.track_reward_miles() {
        return;
    }
    if let Err(e) = state.rewards.update_reward_miles(user_id, segment_id, true).await {
        warn!("Reward award failed for {} on segment {}: {}", user_id, segment_id, e);
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /
pub async fn check_status() -> &'static str {
    "OK"
}

/// POST /bookflights
pub async fn book_flights(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Form<BookFlightsForm>, FormRejection>,
) -> Result<Json<BookingInfo>, AppError> {
    let form = form_fields(form)?;
    authorize(&state, &form.userid, &jar)?;

    let return_leg = if form.one_way_flight {
        None
    } else {
        Some(form.return_leg()?)
    };

    let depart_id = state
        .bookings
        .book_flight(&form.userid, &form.to_flight_seg_id, &form.to_flight_id)
        .await?;
    award_miles(&state, &form.userid, &form.to_flight_seg_id).await;

    let info = match return_leg {
        None => BookingInfo::one_way(depart_id),
        Some((ret_flight_id, ret_segment_id)) => {
            let return_id = state
                .bookings
                .book_flight(&form.userid, ret_segment_id, ret_flight_id)
                .await
                .map_err(|e| {
                    error!(
                        "Return leg failed for {}; departure booking {} stays in place",
                        form.userid, depart_id
                    );
                    AppError::InternalServerError(e.to_string())
                })?;
            award_miles(&state, &form.userid, ret_segment_id).await;
            BookingInfo::round_trip(depart_id, return_id)
        }
    };

    demand::emulate(&state, demand::BOOK_FLIGHTS).await;
    Ok(Json(info))
}

/// GET /bybookingnumber/{userid}/{number}
///
/// Lookup failures produce an empty 200 body.
pub async fn get_booking_by_number(
    State(state): State<AppState>,
    Path((user_id, number)): Path<(String, String)>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    authorize(&state, &user_id, &jar)?;

    match state.bookings.get_booking(&user_id, &number).await {
        Ok(booking) => {
            demand::emulate(&state, demand::BOOKING_BY_NUMBER).await;
            Ok(Json(booking).into_response())
        }
        Err(e) => {
            debug!("Booking {} for {} unavailable: {}", number, user_id, e);
            Ok(().into_response())
        }
    }
}

/// GET /byuser/{user}
///
/// Lookup failures produce an empty 200 body.
pub async fn get_bookings_by_user(
    State(state): State<AppState>,
    Path(user): Path<String>,
    jar: CookieJar,
) -> Result<Response, AppError> {
    debug!("Listing bookings for {}", user);
    authorize(&state, &user, &jar)?;

    match state.bookings.get_bookings_by_user(&user).await {
        Ok(bookings) => {
            demand::emulate(&state, demand::BOOKINGS_BY_USER).await;
            Ok(Json(bookings).into_response())
        }
        Err(e) => {
            debug!("Bookings for {} unavailable: {}", user, e);
            Ok(().into_response())
        }
    }
}

/// POST /cancelbooking
pub async fn cancel_booking(
    State(state): State<AppState>,
    jar: CookieJar,
    form: Result<Form<CancelBookingForm>, FormRejection>,
) -> Result<String, AppError> {
    let form = form_fields(form)?;
    authorize(&state, &form.userid, &jar)?;

    if state.rewards.track_reward_miles() {
        // segment id is needed to reverse the miles
        match state.bookings.get_booking(&form.userid, &form.number).await {
            Ok(booking) => {
                cancel(&state, &form.userid, &form.number).await?;
                if let Err(e) = state
                    .rewards
                    .update_reward_miles(&form.userid, &booking.flight_segment_id, false)
                    .await
                {
                    warn!("Reward reversal failed for booking {}: {}", form.number, e);
                }
            }
            Err(e) if e.is_not_found() => {
                debug!("Booking {} does not exist, skipping reward reversal", form.number);
            }
            Err(e) => return Err(e.into()),
        }
    } else {
        cancel(&state, &form.userid, &form.number).await?;
    }

    demand::emulate(&state, demand::CANCEL_BOOKING).await;
    Ok(format!("booking {} deleted.", form.number))
}

/// Cancelling a booking that is already gone counts as done.
async fn cancel(state: &AppState, user_id: &str, number: &str) -> Result<(), AppError> {
    match state.bookings.cancel_booking(user_id, number).await {
        Ok(()) => Ok(()),
        Err(e) if e.is_not_found() => {
            debug!("Booking {} already gone", number);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
