//! Integration tests for apizza.
//!
//! The library half holds the test doubles shared by the `tests/` suites and
//! by the CLI's command tests:
//!
//! - [`FakeTransport`] - replays canned vendor bodies and records every call
//! - [`FakeClock`] - a settable clock for menu freshness
//! - [`fixtures`] - vendor payloads, addresses and a throwaway cache
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p apizza-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};

use apizza_vendor::{ClientError, Clock, Result, Transport};
use chrono::{DateTime, TimeDelta, Utc};

pub mod fixtures;

/// HTTP method of a recorded call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Method {
    Get,
    Post,
}

/// One request seen by a [`FakeTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedCall {
    /// Value of a query parameter.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The request body as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is not JSON")
    }
}

/// A [`Transport`] that answers from canned bodies keyed by method and path.
///
/// Each route holds a queue of bodies; the last one repeats once the queue
/// drains. A call to an unknown route fails like a 404 HTML page would.
#[derive(Debug, Default)]
pub struct FakeTransport {
    routes: RefCell<BTreeMap<(Method, String), VecDeque<String>>>,
    calls: RefCell<Vec<RecordedCall>>,
}

impl FakeTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FakeTransport::respond`].
    #[must_use]
    pub fn with(self, method: Method, path: &str, body: &str) -> Self {
        self.respond(method, path, body);
        self
    }

    /// Queue `body` as a response to `method path`.
    pub fn respond(&self, method: Method, path: &str, body: &str) {
        self.routes
            .borrow_mut()
            .entry((method, path.to_owned()))
            .or_default()
            .push_back(body.to_owned());
    }

    /// Every call so far, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    /// Number of calls made to `method path`.
    #[must_use]
    pub fn count(&self, method: Method, path: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.method == method && c.path == path)
            .count()
    }

    fn answer(&self, method: Method, path: &str, query: &[(&str, &str)], body: &[u8]) -> Result<Vec<u8>> {
        self.calls.borrow_mut().push(RecordedCall {
            method,
            path: path.to_owned(),
            query: query
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
            body: body.to_vec(),
        });

        let mut routes = self.routes.borrow_mut();
        let queue = routes
            .get_mut(&(method, path.to_owned()))
            .filter(|q| !q.is_empty())
            .ok_or_else(|| ClientError::ResponseFormat {
                url: path.to_owned(),
                status: 404,
                excerpt: "<html>not found</html>".to_owned(),
            })?;

        let next = if queue.len() > 1 {
            queue.pop_front().unwrap_or_default()
        } else {
            queue.front().cloned().unwrap_or_default()
        };
        Ok(next.into_bytes())
    }
}

impl Transport for FakeTransport {
    fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<u8>> {
        self.answer(Method::Get, path, query, &[])
    }

    fn post(&self, path: &str, query: &[(&str, &str)], body: &[u8]) -> Result<Vec<u8>> {
        self.answer(Method::Post, path, query, body)
    }
}

/// A [`Clock`] that only moves when told to.
#[derive(Debug, Clone)]
pub struct FakeClock(Cell<DateTime<Utc>>);

impl FakeClock {
    #[must_use]
    pub const fn new(start: DateTime<Utc>) -> Self {
        Self(Cell::new(start))
    }

    pub fn advance(&self, by: TimeDelta) {
        self.0.set(self.0.get() + by);
    }

    pub fn set(&self, now: DateTime<Utc>) {
        self.0.set(now);
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new(fixtures::epoch())
    }
}

impl Clock for FakeClock {
    fn now(&self) -> DateTime<Utc> {
        self.0.get()
    }
}
