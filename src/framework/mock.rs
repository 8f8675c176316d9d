//! # Mock Repository
//!
//! Scriptable [`Repository`] for testing consumers in isolation.
//!
//! Queue expectations in the order calls will arrive, optionally with an artificial
//! latency, then hand the mock to the component under test. A call that doesn't
//! match the next expectation panics.
//!
//! ```ignore
//! let mock = MockRepository::<Order>::new();
//! mock.expect_create().after(Duration::from_millis(200)).return_ok(order);
//!
//! let orders: SharedRepository<Order> = Arc::new(mock.clone());
//! // exercise the orchestrator...
//! mock.verify();
//! ```

use crate::framework::{Record, RecordId, Repository, StoreError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

enum Expectation<T: Record> {
    Create {
        delay: Option<Duration>,
        response: Result<T, StoreError>,
    },
    Read {
        id: RecordId,
        delay: Option<Duration>,
        response: Result<T, StoreError>,
    },
    Update {
        id: RecordId,
        response: Result<T, StoreError>,
    },
    Delete {
        id: RecordId,
        response: Result<(), StoreError>,
    },
    List {
        delay: Option<Duration>,
        response: Result<Vec<T>, StoreError>,
    },
}

impl<T: Record> Expectation<T> {
    fn name(&self) -> &'static str {
        match self {
            Expectation::Create { .. } => "create",
            Expectation::Read { .. } => "read",
            Expectation::Update { .. } => "update",
            Expectation::Delete { .. } => "delete",
            Expectation::List { .. } => "list",
        }
    }
}

/// A call observed by the mock, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create,
    Read(RecordId),
    Update(RecordId),
    Delete(RecordId),
    List,
}

struct MockState<T: Record> {
    expectations: VecDeque<Expectation<T>>,
    calls: Vec<Call>,
}

/// A repository double with expectation tracking.
pub struct MockRepository<T: Record> {
    state: Arc<Mutex<MockState<T>>>,
}

impl<T: Record> Clone for MockRepository<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T: Record> Default for MockRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> MockRepository<T> {
    /// Creates a mock with no expectations.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                expectations: VecDeque::new(),
                calls: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MockState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(&self, expectation: Expectation<T>) {
        self.lock().expectations.push_back(expectation);
    }

    fn next(&self, call: Call) -> Expectation<T> {
        let mut state = self.lock();
        state.calls.push(call.clone());
        match state.expectations.pop_front() {
            Some(expectation) => expectation,
            None => panic!("Unexpected {call:?}: no expectations left"),
        }
    }

    /// Expects a `create` (plain or cancellable).
    pub fn expect_create(&self) -> CreateExpectationBuilder<T> {
        CreateExpectationBuilder {
            mock: self.clone(),
            delay: None,
        }
    }

    /// Expects a `read` of `id`.
    pub fn expect_read(&self, id: RecordId) -> ReadExpectationBuilder<T> {
        ReadExpectationBuilder {
            mock: self.clone(),
            id,
            delay: None,
        }
    }

    /// Expects an `update` of `id`, answered with `response`.
    pub fn expect_update(&self, id: RecordId, response: Result<T, StoreError>) {
        self.push(Expectation::Update { id, response });
    }

    /// Expects a `delete` of `id`, answered with `response`.
    pub fn expect_delete(&self, id: RecordId, response: Result<(), StoreError>) {
        self.push(Expectation::Delete { id, response });
    }

    /// Expects a `list`, answered with `response` after `delay`.
    pub fn expect_list(&self, delay: Option<Duration>, response: Result<Vec<T>, StoreError>) {
        self.push(Expectation::List { delay, response });
    }

    /// Every call received so far.
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Panics unless every expectation was consumed.
    pub fn verify(&self) {
        let state = self.lock();
        if !state.expectations.is_empty() {
            let pending: Vec<&str> = state.expectations.iter().map(Expectation::name).collect();
            panic!("Not all expectations were met. Remaining: {pending:?}");
        }
    }
}

/// Builder for `create` expectations.
pub struct CreateExpectationBuilder<T: Record> {
    mock: MockRepository<T>,
    delay: Option<Duration>,
}

impl<T: Record> CreateExpectationBuilder<T> {
    /// Delays the response. A cancellable create stops waiting as soon as its token fires.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Answers with `record`, as if the store had assigned its identity.
    pub fn return_ok(self, record: T) {
        self.mock.push(Expectation::Create {
            delay: self.delay,
            response: Ok(record),
        });
    }

    pub fn return_err(self, error: StoreError) {
        self.mock.push(Expectation::Create {
            delay: self.delay,
            response: Err(error),
        });
    }
}

/// Builder for `read` expectations.
pub struct ReadExpectationBuilder<T: Record> {
    mock: MockRepository<T>,
    id: RecordId,
    delay: Option<Duration>,
}

impl<T: Record> ReadExpectationBuilder<T> {
    /// Delays the response.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn return_ok(self, record: T) {
        self.mock.push(Expectation::Read {
            id: self.id,
            delay: self.delay,
            response: Ok(record),
        });
    }

    /// Answers with `NotFound` for the expected identity.
    pub fn return_not_found(self) {
        self.mock.push(Expectation::Read {
            id: self.id,
            delay: self.delay,
            response: Err(StoreError::NotFound { kind: T::KIND, id: self.id }),
        });
    }
}

#[async_trait]
impl<T: Record> Repository<T> for MockRepository<T> {
    async fn create(&self, _record: T) -> Result<T, StoreError> {
        match self.next(Call::Create) {
            Expectation::Create { delay, response } => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                response
            }
            other => panic!("Expected {}, got create", other.name()),
        }
    }

    async fn create_unless_cancelled(
        &self,
        _record: T,
        token: &CancellationToken,
    ) -> Result<Option<T>, StoreError> {
        match self.next(Call::Create) {
            Expectation::Create { delay, response } => {
                if let Some(delay) = delay {
                    tokio::select! {
                        _ = token.cancelled() => return Ok(None),
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
                if token.is_cancelled() {
                    return Ok(None);
                }
                response.map(Some)
            }
            other => panic!("Expected {}, got create", other.name()),
        }
    }

    async fn read(&self, id: RecordId) -> Result<T, StoreError> {
        match self.next(Call::Read(id)) {
            Expectation::Read {
                id: expected,
                delay,
                response,
            } => {
                assert_eq!(expected, id, "read of unexpected {} id", T::KIND);
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                response
            }
            other => panic!("Expected {}, got read({id})", other.name()),
        }
    }

    async fn update(&self, id: RecordId, _record: T) -> Result<T, StoreError> {
        match self.next(Call::Update(id)) {
            Expectation::Update { id: expected, response } => {
                assert_eq!(expected, id, "update of unexpected {} id", T::KIND);
                response
            }
            other => panic!("Expected {}, got update({id})", other.name()),
        }
    }

    async fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        match self.next(Call::Delete(id)) {
            Expectation::Delete { id: expected, response } => {
                assert_eq!(expected, id, "delete of unexpected {} id", T::KIND);
                response
            }
            other => panic!("Expected {}, got delete({id})", other.name()),
        }
    }

    async fn list(&self) -> Result<Vec<T>, StoreError> {
        match self.next(Call::List) {
            Expectation::List { delay, response } => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                response
            }
            other => panic!("Expected {}, got list", other.name()),
        }
    }
}
