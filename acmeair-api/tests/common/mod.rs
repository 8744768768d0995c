#![allow(dead_code)]

use acmeair_api::{app, AppState};
use acmeair_core::{
    AuthGuard, Booking, BookingService, CoreError, CoreResult, RewardTracker, ServiceLoad,
};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Ordered record of every collaborator call made during a test.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub struct FakeBookings {
    log: CallLog,
    ids: Mutex<VecDeque<String>>,
    stored: Mutex<HashMap<String, Booking>>,
    fail_on_book: Mutex<Option<usize>>,
    fail_reads: bool,
}

impl FakeBookings {
    pub fn new(log: CallLog, ids: &[&str]) -> Self {
        Self {
            log,
            ids: Mutex::new(ids.iter().map(|s| s.to_string()).collect()),
            stored: Mutex::new(HashMap::new()),
            fail_on_book: Mutex::new(None),
            fail_reads: false,
        }
    }

    /// Make the n-th (1-based) `book_flight` call fail.
    pub fn failing_on_book(self, n: usize) -> Self {
        *self.fail_on_book.lock().unwrap() = Some(n);
        self
    }

    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    pub fn with_booking(self, number: &str, user_id: &str, segment_id: &str) -> Self {
        let mut booking = Booking::new(user_id, segment_id, "F1");
        booking.id = number.to_string();
        self.stored.lock().unwrap().insert(number.to_string(), booking);
        self
    }
}

#[async_trait]
impl BookingService for FakeBookings {
    async fn book_flight(&self, user_id: &str, flight_segment_id: &str, flight_id: &str) -> CoreResult<String> {
        let call = {
            let mut log = self.log.lock().unwrap();
            log.push(format!("book:{}:{}:{}", user_id, flight_segment_id, flight_id));
            log.iter().filter(|c| c.starts_with("book:")).count()
        };
        if *self.fail_on_book.lock().unwrap() == Some(call) {
            return Err(CoreError::StorageError("booking store unavailable".to_string()));
        }
        let id = self.ids.lock().unwrap().pop_front().unwrap_or_else(|| format!("B{}", call));
        let mut booking = Booking::new(user_id, flight_segment_id, flight_id);
        booking.id = id.clone();
        self.stored.lock().unwrap().insert(id.clone(), booking);
        Ok(id)
    }

    async fn get_booking(&self, user_id: &str, number: &str) -> CoreResult<Booking> {
        self.log.lock().unwrap().push(format!("get:{}:{}", user_id, number));
        if self.fail_reads {
            return Err(CoreError::StorageError("read failed".to_string()));
        }
        self.stored
            .lock()
            .unwrap()
            .get(number)
            .filter(|b| b.customer_id == user_id)
            .cloned()
            .ok_or_else(|| CoreError::NotFound(number.to_string()))
    }

    async fn get_bookings_by_user(&self, user_id: &str) -> CoreResult<Vec<Booking>> {
        self.log.lock().unwrap().push(format!("list:{}", user_id));
        if self.fail_reads {
            return Err(CoreError::StorageError("read failed".to_string()));
        }
        let mut list: Vec<Booking> = self
            .stored
            .lock()
            .unwrap()
            .values()
            .filter(|b| b.customer_id == user_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(list)
    }

    async fn cancel_booking(&self, user_id: &str, number: &str) -> CoreResult<()> {
        self.log.lock().unwrap().push(format!("cancel:{}:{}", user_id, number));
        self.stored
            .lock()
            .unwrap()
            .remove(number)
            .map(|_| ())
            .ok_or_else(|| CoreError::NotFound(number.to_string()))
    }
}

pub struct FakeRewards {
    log: CallLog,
    enabled: bool,
    fail: bool,
}

impl FakeRewards {
    pub fn new(log: CallLog, enabled: bool) -> Self {
        Self { log, enabled, fail: false }
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

#[async_trait]
impl RewardTracker for FakeRewards {
    fn track_reward_miles(&self) -> bool {
        self.enabled
    }

    async fn update_reward_miles(&self, user_id: &str, flight_segment_id: &str, award: bool) -> CoreResult<()> {
        self.log
            .lock()
            .unwrap()
            .push(format!("reward:{}:{}:{}", user_id, flight_segment_id, award));
        if self.fail {
            return Err(CoreError::RewardError("miles service down".to_string()));
        }
        Ok(())
    }
}

/// Accepts exactly `token-<user>` for each user.
pub struct FakeGuard {
    pub secure: bool,
}

impl AuthGuard for FakeGuard {
    fn secure_user_calls(&self) -> bool {
        self.secure
    }

    fn validate_jwt(&self, user_id: &str, token: Option<&str>) -> bool {
        token == Some(format!("token-{}", user_id).as_str())
    }
}

pub struct Harness {
    pub log: CallLog,
    pub load: Arc<ServiceLoad>,
    pub app: axum::Router,
}

impl Harness {
    pub fn calls(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

pub fn harness(bookings: impl FnOnce(CallLog) -> FakeBookings, rewards_enabled: bool, secure: bool) -> Harness {
    harness_with(bookings, |log| FakeRewards::new(log, rewards_enabled), secure)
}

pub fn harness_with(
    bookings: impl FnOnce(CallLog) -> FakeBookings,
    rewards: impl FnOnce(CallLog) -> FakeRewards,
    secure: bool,
) -> Harness {
    let log: CallLog = Arc::new(Mutex::new(Vec::new()));
    let load = Arc::new(ServiceLoad::new("booking", 1.0));
    let state = AppState {
        bookings: Arc::new(bookings(log.clone())),
        rewards: Arc::new(rewards(log.clone())),
        auth: Arc::new(FakeGuard { secure }),
        load: load.clone(),
        service_demand: false,
    };
    Harness { log, load, app: app(state) }
}

pub fn form_request(uri: &str, body: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded");
    if let Some(token) = token {
        builder = builder.header("cookie", format!("jwt_token={}", token));
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header("cookie", format!("jwt_token={}", token));
    }
    builder.body(Body::empty()).expect("request")
}

pub async fn read_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8")
}
