//! # Order Orchestrator
//!
//! Turns a client proposal into a committed [`Order`] whose customer, line-item books
//! and total are taken from the stores at commit time, never from the proposal.
//!
//! ## Pipeline
//!
//! 1. Reject an empty item list.
//! 2. Resolve the customer. Nothing else is looked up if it is missing.
//! 3. Resolve each book in item order, stopping at the first missing one.
//! 4. Derive `total_price`, default `created_at` and `status`.
//! 5. Commit under the caller's deadline.
//!
//! ## Deadlines
//!
//! The deadline starts when [`create`](OrderOrchestrator::create) is called and covers
//! resolution too: if it fires during steps 2-4, or has already passed when step 5 is
//! reached, the result is `Timeout` and nothing is dispatched.
//!
//! The commit runs as a spawned task holding a [`CancellationToken`]. If the deadline
//! fires first the token is cancelled and the task joined: either the insert had
//! already landed (the order is returned) or it was skipped (`Timeout`, and the order
//! store is left exactly as it was). A timed-out order never shows up later.
//!
//! Reads, updates and deletes are bounded with `tokio::time::timeout`, which drops the
//! store future in place when the deadline fires.

use crate::framework::{Event, Record, RecordId, SharedRepository, SharedSink, StoreError};
use crate::model::order::DEFAULT_STATUS;
use crate::model::{Book, BookSales, Customer, Order, SalesReport};
use crate::orders::OrderError;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep_until, timeout_at, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Validates and commits orders against the book, customer and order repositories.
#[derive(Clone)]
pub struct OrderOrchestrator {
    books: SharedRepository<Book>,
    customers: SharedRepository<Customer>,
    orders: SharedRepository<Order>,
    sink: SharedSink,
}

impl OrderOrchestrator {
    pub fn new(
        books: SharedRepository<Book>,
        customers: SharedRepository<Customer>,
        orders: SharedRepository<Order>,
        sink: SharedSink,
    ) -> Self {
        Self {
            books,
            customers,
            orders,
            sink,
        }
    }

    /// Validates `proposal` against live data and commits it before `timeout` elapses.
    #[instrument(skip(self, proposal), fields(customer_id = proposal.customer.id, items = proposal.items.len()))]
    pub async fn create(&self, proposal: Order, timeout: Duration) -> Result<Order, OrderError> {
        let deadline = Instant::now() + timeout;
        let order = match timeout_at(deadline, self.prepare(proposal)).await {
            Ok(prepared) => prepared?,
            Err(_) => {
                warn!(?timeout, "Order resolution outlived the deadline, nothing committed");
                return Err(OrderError::Timeout(timeout));
            }
        };
        debug!(total_price = order.total_price, "Order prepared, committing");

        let committed = self.commit(order, deadline, timeout).await?;
        info!(order_id = committed.id, total_price = committed.total_price, "Order committed");
        self.sink.emit(Event::OrderPlaced {
            order_id: committed.id,
            customer_id: committed.customer.id,
            total_price: committed.total_price,
            item_count: committed.items.len(),
        });
        Ok(committed)
    }

    /// Steps 1-4: everything up to the commit. Fails fast and writes nothing.
    async fn prepare(&self, mut order: Order) -> Result<Order, OrderError> {
        if order.items.is_empty() {
            return Err(OrderError::InvalidRequest("Order must contain at least one item".into()));
        }

        let customer_id = order.customer.id;
        order.customer = self
            .customers
            .read(customer_id)
            .await
            .map_err(|e| reference_error(e, OrderError::CustomerNotFound))?;

        let mut total = 0.0;
        for item in order.items.iter_mut() {
            let book_id = item.book.id;
            item.book = self
                .books
                .read(book_id)
                .await
                .map_err(|e| reference_error(e, OrderError::BookNotFound))?;
            total += item.subtotal();
        }

        order.total_price = total;
        order.created_at.get_or_insert_with(Utc::now);
        if order.status.is_empty() {
            order.status = DEFAULT_STATUS.to_string();
        }
        Ok(order)
    }

    /// Step 5: races the cancellable insert against `deadline`.
    async fn commit(&self, order: Order, deadline: Instant, timeout: Duration) -> Result<Order, OrderError> {
        if Instant::now() >= deadline {
            warn!(?timeout, "Deadline passed before commit, insert skipped");
            return Err(OrderError::Timeout(timeout));
        }

        let token = CancellationToken::new();
        let orders = Arc::clone(&self.orders);
        let task_token = token.clone();
        let mut task = tokio::spawn(async move { orders.create_unless_cancelled(order, &task_token).await });

        let joined = tokio::select! {
            joined = &mut task => joined,
            _ = sleep_until(deadline) => {
                token.cancel();
                return match task.await {
                    Ok(Ok(Some(order))) => {
                        debug!(order_id = order.id, "Commit landed as the deadline fired");
                        Ok(order)
                    }
                    Ok(_) => {
                        warn!(?timeout, "Order commit timed out, insert skipped");
                        Err(OrderError::Timeout(timeout))
                    }
                    Err(e) => Err(OrderError::Internal(e.to_string())),
                };
            }
        };

        match joined {
            Ok(Ok(Some(order))) => Ok(order),
            Ok(Ok(None)) => Err(OrderError::Internal("commit skipped without cancellation".into())),
            Ok(Err(e)) => {
                warn!(error = %e, "Order commit failed");
                Err(OrderError::Internal(e.to_string()))
            }
            Err(e) => Err(OrderError::Internal(e.to_string())),
        }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: RecordId, timeout: Duration) -> Result<Order, OrderError> {
        bounded(timeout, self.orders.read(id)).await
    }

    /// Every order, sorted by identity.
    #[instrument(skip(self))]
    pub async fn list_all(&self, timeout: Duration) -> Result<Vec<Order>, OrderError> {
        let mut orders = bounded(timeout, self.orders.list()).await?;
        orders.sort_by_key(|order| order.id());
        Ok(orders)
    }

    /// Replaces the order wholesale. Customer and books are not re-resolved.
    #[instrument(skip(self, order))]
    pub async fn update(&self, id: RecordId, order: Order, timeout: Duration) -> Result<Order, OrderError> {
        let updated = bounded(timeout, self.orders.update(id, order)).await?;
        self.sink.emit(Event::Updated { kind: Order::KIND, id });
        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: RecordId, timeout: Duration) -> Result<(), OrderError> {
        bounded(timeout, self.orders.delete(id)).await?;
        self.sink.emit(Event::Deleted { kind: Order::KIND, id });
        Ok(())
    }

    /// Revenue and best sellers over orders created in `[start, end]`.
    ///
    /// Books are ranked by quantity sold, ties broken by ascending identity, and at
    /// most `limit` are reported.
    #[instrument(skip(self))]
    pub async fn sales_report(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: usize,
        timeout: Duration,
    ) -> Result<SalesReport, OrderError> {
        let in_window = move |order: &Order| order.created_between(start, end);
        let orders = bounded(timeout, self.orders.list_where(&in_window)).await?;

        let mut sales: HashMap<RecordId, BookSales> = HashMap::new();
        for item in orders.iter().flat_map(|order| &order.items) {
            sales
                .entry(item.book.id)
                .or_insert_with(|| BookSales {
                    book: item.book.clone(),
                    quantity: 0,
                })
                .quantity += u64::from(item.quantity);
        }
        let mut top_selling_books: Vec<BookSales> = sales.into_values().collect();
        top_selling_books.sort_by(|a, b| b.quantity.cmp(&a.quantity).then(a.book.id.cmp(&b.book.id)));
        top_selling_books.truncate(limit);

        Ok(SalesReport {
            timestamp: Utc::now(),
            total_revenue: orders.iter().map(|order| order.total_price).sum(),
            total_orders: orders.len(),
            top_selling_books,
        })
    }
}

fn reference_error(error: StoreError, missing: fn(RecordId) -> OrderError) -> OrderError {
    match error {
        StoreError::NotFound { id, .. } => missing(id),
        StoreError::Internal(msg) => OrderError::Internal(msg),
    }
}

async fn bounded<R>(
    timeout: Duration,
    call: impl Future<Output = Result<R, StoreError>>,
) -> Result<R, OrderError> {
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result.map_err(OrderError::from_order_store),
        Err(_) => {
            warn!(?timeout, "Order store call timed out");
            Err(OrderError::Timeout(timeout))
        }
    }
}
