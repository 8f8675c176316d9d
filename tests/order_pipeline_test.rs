use bookstore::framework::mock::{Call, MockRepository};
use bookstore::framework::{noop_sink, Event, KeyedStore, RecordId, RecordingSink};
use bookstore::model::{Author, Book, Customer, Order};
use bookstore::orders::{OrderError, OrderOrchestrator};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

const DEADLINE: Duration = Duration::from_secs(5);

/// Concurrent orders against real stores get distinct identities and correct totals.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_orders_get_distinct_ids() {
    let books = KeyedStore::<Book>::new();
    let customers = KeyedStore::<Customer>::new();
    let orders = KeyedStore::<Order>::new();
    books.create(Book::new("Dune", Author::default(), 10.0)).await;
    books.create(Book::new("Foundation", Author::default(), 4.5)).await;
    customers.create(Customer::new("Alice", "a@x.com")).await;

    let sink = RecordingSink::new();
    let orchestrator = OrderOrchestrator::new(
        Arc::new(books),
        Arc::new(customers),
        Arc::new(orders.clone()),
        Arc::new(sink.clone()),
    );

    let mut handles = Vec::new();
    for n in 1..=32u32 {
        let orchestrator = orchestrator.clone();
        handles.push(tokio::spawn(async move {
            orchestrator
                .create(Order::proposal(1, [(1, n), (2, 2)]), DEADLINE)
                .await
        }));
    }

    let mut ids = HashSet::new();
    for handle in handles {
        let order = handle.await.unwrap().expect("Order should commit");
        let quantity = f64::from(order.items[0].quantity);
        assert_eq!(order.total_price, quantity * 10.0 + 9.0);
        ids.insert(order.id);
    }

    assert_eq!(ids, (1..=32).collect::<HashSet<RecordId>>());
    assert_eq!(orders.next_id().await, 33);
    let placed = sink
        .events()
        .into_iter()
        .filter(|event| matches!(event, Event::OrderPlaced { .. }))
        .count();
    assert_eq!(placed, 32);
}

/// Customer is looked up before any book, and a missing customer stops the pipeline.
#[tokio::test]
async fn test_customer_resolved_first() {
    let books = MockRepository::<Book>::new();
    let customers = MockRepository::<Customer>::new();
    let orders = MockRepository::<Order>::new();
    customers.expect_read(7).return_not_found();

    let orchestrator = OrderOrchestrator::new(
        Arc::new(books.clone()),
        Arc::new(customers.clone()),
        Arc::new(orders.clone()),
        noop_sink(),
    );
    let err = orchestrator
        .create(Order::proposal(7, [(1, 1)]), DEADLINE)
        .await
        .unwrap_err();

    assert_eq!(err, OrderError::CustomerNotFound(7));
    assert_eq!(customers.calls(), vec![Call::Read(7)]);
    assert!(books.calls().is_empty());
    assert!(orders.calls().is_empty());
    customers.verify();
}

/// The committed record is whatever the order store returned.
#[tokio::test]
async fn test_commit_result_comes_from_store() {
    let books = MockRepository::<Book>::new();
    let customers = MockRepository::<Customer>::new();
    let orders = MockRepository::<Order>::new();

    let mut alice = Customer::new("Alice", "a@x.com");
    alice.id = 1;
    let mut dune = Book::new("Dune", Author::default(), 10.0);
    dune.id = 1;
    let mut stored = Order::proposal(1, [(1, 2)]);
    stored.id = 17;
    stored.total_price = 20.0;

    customers.expect_read(1).return_ok(alice);
    books.expect_read(1).return_ok(dune);
    orders
        .expect_create()
        .after(Duration::from_millis(10))
        .return_ok(stored.clone());

    let orchestrator = OrderOrchestrator::new(
        Arc::new(books.clone()),
        Arc::new(customers.clone()),
        Arc::new(orders.clone()),
        noop_sink(),
    );
    let order = orchestrator
        .create(Order::proposal(1, [(1, 2)]), DEADLINE)
        .await
        .unwrap();

    assert_eq!(order, stored);
    assert_eq!(orders.calls(), vec![Call::Create]);
    books.verify();
    customers.verify();
    orders.verify();
}

/// A deadline that fires mid-commit yields Timeout, and the store never receives the order.
#[tokio::test]
async fn test_timeout_skips_slow_commit() {
    let books = KeyedStore::<Book>::new();
    let customers = KeyedStore::<Customer>::new();
    books.create(Book::new("Dune", Author::default(), 10.0)).await;
    customers.create(Customer::new("Alice", "a@x.com")).await;

    let orders = MockRepository::<Order>::new();
    orders
        .expect_create()
        .after(Duration::from_secs(30))
        .return_ok(Order::default());

    let orchestrator = OrderOrchestrator::new(
        Arc::new(books),
        Arc::new(customers),
        Arc::new(orders.clone()),
        noop_sink(),
    );
    let started = std::time::Instant::now();
    let err = orchestrator
        .create(Order::proposal(1, [(1, 1)]), Duration::from_millis(50))
        .await
        .unwrap_err();

    assert!(matches!(err, OrderError::Timeout(_)));
    assert_eq!(err.kind().status_code(), 408);
    assert!(started.elapsed() < Duration::from_secs(5));
    orders.verify();
}

/// Orders whose customer lookup outlives the deadline all time out and none is stored.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_deadline_covers_customer_lookup() {
    let books = KeyedStore::<Book>::new();
    let orders = KeyedStore::<Order>::new();
    books.create(Book::new("Dune", Author::default(), 10.0)).await;

    let mut alice = Customer::new("Alice", "a@x.com");
    alice.id = 1;
    let customers = MockRepository::<Customer>::new();
    for _ in 0..20 {
        customers
            .expect_read(1)
            .after(Duration::from_secs(30))
            .return_ok(alice.clone());
    }

    let orchestrator = OrderOrchestrator::new(
        Arc::new(books),
        Arc::new(customers.clone()),
        Arc::new(orders.clone()),
        noop_sink(),
    );

    let started = std::time::Instant::now();
    let mut handles = Vec::new();
    for _ in 0..20 {
        let orchestrator = orchestrator.clone();
        handles.push(tokio::spawn(async move {
            orchestrator
                .create(Order::proposal(1, [(1, 1)]), Duration::from_millis(50))
                .await
        }));
    }
    for handle in handles {
        let err = handle.await.unwrap().unwrap_err();
        assert!(matches!(err, OrderError::Timeout(_)), "unexpected {err:?}");
    }

    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(orders.next_id().await, 1);
    assert!(orders.is_empty().await);
    customers.verify();
}
