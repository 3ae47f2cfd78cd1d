//! Scripted transport for exercising the engine without a network.
//!
//! Routes match when the requested URL contains the route pattern; the first
//! matching route (in insertion order) wins. A route replays its responses in
//! order and keeps repeating the last one.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use ultim_core::{HttpResponse, HttpTransport, TransportError};

/// One canned reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scripted {
    /// 200 with this body.
    Body(Vec<u8>),
    /// This status with a short body.
    Status(u16),
    /// 200 with an empty body.
    Empty,
    /// Connection-level failure.
    Fail,
}

impl Scripted {
    /// 200 with a small non-empty body.
    pub fn ok() -> Self {
        Self::Body(b"GRIB7777".to_vec())
    }
}

#[derive(Debug)]
struct Route {
    pattern: String,
    replies: VecDeque<Scripted>,
}

/// A fake `HttpTransport` with scripted replies and call accounting.
#[derive(Debug)]
pub struct FakeTransport {
    routes: Mutex<Vec<Route>>,
    default_reply: Scripted,
    delay: Duration,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl Default for FakeTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeTransport {
    /// Create a transport answering 404 to everything.
    pub fn new() -> Self {
        Self {
            routes: Mutex::new(Vec::new()),
            default_reply: Scripted::Status(404),
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Reply used when no route matches.
    #[must_use]
    pub fn with_default(mut self, reply: Scripted) -> Self {
        self.default_reply = reply;
        self
    }

    /// Always answer `reply` for URLs containing `pattern`.
    #[must_use]
    pub fn with_route(self, pattern: &str, reply: Scripted) -> Self {
        self.with_sequence(pattern, vec![reply])
    }

    /// Answer `replies` in order for URLs containing `pattern`, then repeat
    /// the last one.
    #[must_use]
    pub fn with_sequence(self, pattern: &str, replies: Vec<Scripted>) -> Self {
        self.lock_routes().push(Route {
            pattern: pattern.to_string(),
            replies: replies.into(),
        });
        self
    }

    /// Delay every reply, to keep requests in flight.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Every URL requested, in request order.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Total number of requests.
    pub fn call_count(&self) -> usize {
        self.calls().len()
    }

    /// Number of requests whose URL contains `pattern`.
    pub fn calls_to(&self, pattern: &str) -> usize {
        self.calls().iter().filter(|u| u.contains(pattern)).count()
    }

    /// Highest number of concurrent requests observed.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn lock_routes(&self) -> std::sync::MutexGuard<'_, Vec<Route>> {
        self.routes
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn next_reply(&self, url: &str) -> Scripted {
        let mut routes = self.lock_routes();
        let Some(route) = routes.iter_mut().find(|r| url.contains(&r.pattern)) else {
            return self.default_reply.clone();
        };
        if route.replies.len() > 1 {
            route.replies.pop_front().unwrap_or(Scripted::Fail)
        } else {
            route.replies.front().cloned().unwrap_or(Scripted::Fail)
        }
    }
}

#[async_trait]
impl HttpTransport for FakeTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(url.to_string());
        }
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let reply = self.next_reply(url);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match reply {
            Scripted::Body(body) => Ok(HttpResponse::new(200, body)),
            Scripted::Status(status) => Ok(HttpResponse::new(status, b"error".to_vec())),
            Scripted::Empty => Ok(HttpResponse::new(200, Vec::new())),
            Scripted::Fail => Err(TransportError::Request {
                url: url.to_string(),
                message: "connection reset".to_string(),
            }),
        }
    }
}
