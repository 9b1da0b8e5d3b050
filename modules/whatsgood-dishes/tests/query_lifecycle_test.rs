//! Lifecycle tests for DishQuery against the in-memory MockDishSource.

use std::sync::Arc;
use std::time::Duration;

use whatsgood_dishes::testing::{ranked_dish, restaurant_dish, MockDishSource, SourceCall};
use whatsgood_dishes::{
    Category, DataAccessError, DataAccessKind, DishQuery, FilterState, Location, QueryConfig,
    QueryStatus, RankedDishesParams, RestaurantId,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn nyc() -> Location {
    Location::new(40.7, -74.0)
}

fn near_nyc() -> FilterState {
    FilterState::new(5.0).with_location(nyc())
}

fn r1() -> RestaurantId {
    RestaurantId::parse("R1").unwrap()
}

fn query(source: &Arc<MockDishSource>, filters: FilterState) -> DishQuery {
    DishQuery::new(source.clone(), filters, QueryConfig::default())
}

fn dish_ids(query: &DishQuery) -> Vec<String> {
    query
        .snapshot()
        .dishes
        .into_iter()
        .map(|d| d.dish_id)
        .collect()
}

// ---------------------------------------------------------------------------
// Radius-ranked
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ranked_fetch_marshals_params_and_preserves_order() {
    let source = Arc::new(MockDishSource::new());
    source.on_ranked(
        None,
        vec![
            ranked_dish("b", "pizza", 40.0, 10),
            ranked_dish("a", "burger", 90.0, 3),
            ranked_dish("c", "sushi", 90.0, 30),
        ],
    );

    let q = query(&source, near_nyc());
    q.mount().await;

    assert_eq!(
        source.ranked_calls(),
        vec![RankedDishesParams {
            user_lat: 40.7,
            user_lng: -74.0,
            radius_miles: 5.0,
            filter_category: None,
        }]
    );

    let snapshot = q.snapshot();
    assert_eq!(snapshot.status, QueryStatus::Success);
    assert!(!snapshot.loading());
    assert_eq!(snapshot.error, None);
    assert_eq!(dish_ids(&q), ["b", "a", "c"]);
    assert_eq!(snapshot.dishes[2].total_votes, 30);
    assert_eq!(snapshot.dishes[0].distance_miles, 1.5);
}

#[tokio::test]
async fn ranked_fetch_passes_category_through() {
    let source = Arc::new(MockDishSource::new());
    let q = query(&source, near_nyc().with_category(Category::LobsterRoll));
    q.mount().await;

    let calls = source.ranked_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].filter_category.as_deref(), Some("lobster roll"));
}

#[tokio::test]
async fn ranked_rejection_becomes_error_state() {
    let source = Arc::new(MockDishSource::new());
    source.fail_ranked(Some(DataAccessError::remote(
        "function get_ranked_dishes(numeric) does not exist",
    )));

    let q = query(&source, near_nyc());
    q.mount().await;

    let snapshot = q.snapshot();
    assert_eq!(snapshot.status, QueryStatus::Error);
    assert!(!snapshot.loading());
    assert!(snapshot.dishes.is_empty());
    assert_eq!(
        snapshot.error.as_deref(),
        Some("function get_ranked_dishes(numeric) does not exist")
    );
    assert_eq!(snapshot.error_kind, Some(DataAccessKind::RemoteRejected));
}

#[tokio::test]
async fn invalid_radius_fails_without_calling_the_store() {
    let source = Arc::new(MockDishSource::new());
    let q = query(&source, FilterState::new(0.0).with_location(nyc()));
    q.mount().await;

    let snapshot = q.snapshot();
    assert_eq!(snapshot.status, QueryStatus::Error);
    assert_eq!(snapshot.error_kind, Some(DataAccessKind::InvalidRequest));
    assert!(source.calls().is_empty());
}

// ---------------------------------------------------------------------------
// Restaurant-scoped
// ---------------------------------------------------------------------------

#[tokio::test]
async fn restaurant_scope_filters_by_category_and_zeroes_ranking() {
    let source = Arc::new(MockDishSource::new());
    source.on_restaurant_dishes(
        "R1",
        vec![
            restaurant_dish("d1", "burger", "R1", "Patty Shack"),
            restaurant_dish("d2", "pizza", "R1", "Patty Shack"),
        ],
    );

    let q = query(
        &source,
        FilterState::new(5.0)
            .with_restaurant(r1())
            .with_category(Category::Burger),
    );
    q.mount().await;

    assert_eq!(
        source.calls(),
        vec![SourceCall::RestaurantDishes {
            restaurant_id: "R1".into(),
            category: Some("burger".into()),
        }]
    );

    let snapshot = q.snapshot();
    assert_eq!(snapshot.status, QueryStatus::Success);
    assert_eq!(snapshot.dishes.len(), 1);
    let dish = &snapshot.dishes[0];
    assert_eq!(dish.dish_id, "d1");
    assert_eq!(dish.category, "burger");
    assert_eq!(dish.restaurant_name, "Patty Shack");
    assert_eq!(dish.total_votes, 0);
    assert_eq!(dish.yes_votes, 0);
    assert_eq!(dish.percent_worth_it, 0.0);
    assert_eq!(dish.distance_miles, 0.0);
}

#[tokio::test]
async fn restaurant_scope_ignores_location() {
    let source = Arc::new(MockDishSource::new());
    source.on_restaurant_dishes(
        "R1",
        vec![
            restaurant_dish("d1", "burger", "R1", "Patty Shack"),
            restaurant_dish("d2", "pizza", "R1", "Patty Shack"),
        ],
    );

    let q = query(&source, near_nyc().with_restaurant(r1()));
    q.mount().await;

    assert!(source.ranked_calls().is_empty());
    assert_eq!(dish_ids(&q), ["d1", "d2"]);
    assert!(q.snapshot().dishes.iter().all(|d| d.percent_worth_it == 0.0));
    // Location stays in the filters even though it was not used.
    assert_eq!(q.filters().location, Some(nyc()));
}

#[tokio::test]
async fn restaurant_with_no_dishes_is_success_not_error() {
    let source = Arc::new(MockDishSource::new());
    let q = query(&source, FilterState::new(5.0).with_restaurant(r1()));
    q.mount().await;

    let snapshot = q.snapshot();
    assert_eq!(snapshot.status, QueryStatus::Success);
    assert!(snapshot.dishes.is_empty());
    assert_eq!(snapshot.error, None);
}

#[tokio::test]
async fn restaurant_read_failure_becomes_error_state() {
    let source = Arc::new(MockDishSource::new());
    source.fail_restaurant_dishes(Some(DataAccessError::remote(
        "invalid input syntax for type uuid",
    )));

    let q = query(&source, FilterState::new(5.0).with_restaurant(r1()));
    q.mount().await;

    let snapshot = q.snapshot();
    assert_eq!(snapshot.status, QueryStatus::Error);
    assert_eq!(
        snapshot.error.as_deref(),
        Some("invalid input syntax for type uuid")
    );
}

// ---------------------------------------------------------------------------
// Awaiting location
// ---------------------------------------------------------------------------

#[tokio::test]
async fn no_location_and_no_restaurant_awaits_without_fetching() {
    let source = Arc::new(MockDishSource::new());
    let q = query(&source, FilterState::new(5.0));
    q.mount().await;

    let snapshot = q.snapshot();
    assert_eq!(snapshot.status, QueryStatus::AwaitingLocation);
    assert!(!snapshot.loading());
    assert!(snapshot.dishes.is_empty());
    assert_eq!(snapshot.error, None);
    assert!(source.calls().is_empty());

    // Refetch cannot conjure a location either.
    q.refetch().await;
    assert_eq!(q.snapshot().status, QueryStatus::AwaitingLocation);
    assert!(source.calls().is_empty());
}

#[tokio::test]
async fn location_arriving_starts_the_fetch() {
    let source = Arc::new(MockDishSource::new());
    source.on_ranked(None, vec![ranked_dish("a", "taco", 80.0, 5)]);

    let q = query(&source, FilterState::new(5.0));
    q.mount().await;
    q.set_location(Some(nyc())).await;

    assert_eq!(q.snapshot().status, QueryStatus::Success);
    assert_eq!(dish_ids(&q), ["a"]);
    assert_eq!(source.ranked_calls().len(), 1);
}

#[tokio::test]
async fn restaurant_selection_ends_awaiting_location() {
    let source = Arc::new(MockDishSource::new());
    source.on_restaurant_dishes("R1", vec![restaurant_dish("d1", "fish", "R1", "Net Result")]);

    let q = query(&source, FilterState::new(5.0));
    q.mount().await;
    q.set_restaurant(r1()).await;

    assert_eq!(q.snapshot().status, QueryStatus::Success);
    assert_eq!(dish_ids(&q), ["d1"]);
}

// ---------------------------------------------------------------------------
// Filter changes and strategy switching
// ---------------------------------------------------------------------------

#[tokio::test]
async fn switching_strategies_replaces_dishes_entirely() {
    let source = Arc::new(MockDishSource::new());
    source.on_ranked(
        None,
        vec![ranked_dish("n1", "pizza", 70.0, 9), ranked_dish("n2", "wings", 60.0, 4)],
    );
    source.on_restaurant_dishes("R1", vec![restaurant_dish("r1", "burger", "R1", "Patty Shack")]);

    let q = query(&source, near_nyc());
    q.mount().await;
    assert_eq!(dish_ids(&q), ["n1", "n2"]);

    q.set_restaurant(r1()).await;
    assert_eq!(dish_ids(&q), ["r1"]);

    q.clear_restaurant().await;
    assert_eq!(dish_ids(&q), ["n1", "n2"]);
    assert!(q.snapshot().dishes.iter().all(|d| d.total_votes > 0));
}

#[tokio::test]
async fn unchanged_filters_do_not_refetch() {
    let source = Arc::new(MockDishSource::new());
    let q = query(&source, near_nyc());
    q.mount().await;

    q.set_radius(5.0).await;
    q.set_category(None).await;
    q.set_filters(near_nyc()).await;
    assert_eq!(source.calls().len(), 1);

    q.set_radius(10.0).await;
    assert_eq!(source.calls().len(), 2);
    assert_eq!(source.ranked_calls()[1].radius_miles, 10.0);
}

#[tokio::test]
async fn losing_location_returns_to_awaiting_and_clears_dishes() {
    let source = Arc::new(MockDishSource::new());
    source.on_ranked(None, vec![ranked_dish("a", "taco", 80.0, 5)]);

    let q = query(&source, near_nyc());
    q.mount().await;
    assert_eq!(dish_ids(&q).len(), 1);

    q.set_location(None).await;
    let snapshot = q.snapshot();
    assert_eq!(snapshot.status, QueryStatus::AwaitingLocation);
    assert!(snapshot.dishes.is_empty());
}

// ---------------------------------------------------------------------------
// Refetch
// ---------------------------------------------------------------------------

#[tokio::test]
async fn refetch_goes_through_loading_with_unchanged_filters() {
    let source = Arc::new(MockDishSource::new());
    source.on_ranked(None, vec![ranked_dish("a", "pizza", 50.0, 2)]);

    let q = Arc::new(query(&source, near_nyc()));
    q.mount().await;
    let filters_before = q.filters();

    let gate = source.gate_ranked(None);
    let mut rx = q.subscribe();
    let task = tokio::spawn({
        let q = q.clone();
        async move { q.vote_recorded().await }
    });

    rx.wait_for(|r| r.status == QueryStatus::Loading)
        .await
        .unwrap();
    // The previous result stays visible while the refetch is in flight.
    assert_eq!(dish_ids(&q), ["a"]);

    source.on_ranked(None, vec![ranked_dish("a", "pizza", 66.7, 3)]);
    gate.notify_one();
    task.await.unwrap();

    let snapshot = q.snapshot();
    assert_eq!(snapshot.status, QueryStatus::Success);
    assert_eq!(snapshot.dishes[0].total_votes, 3);
    assert_eq!(q.filters(), filters_before);

    let calls = source.ranked_calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], calls[1]);
}

#[tokio::test]
async fn refetch_recovers_from_error() {
    let source = Arc::new(MockDishSource::new());
    source.on_ranked(None, vec![ranked_dish("a", "pizza", 50.0, 2)]);
    source.fail_ranked(Some(DataAccessError::new(
        DataAccessKind::Transport,
        "connection refused",
    )));

    let q = query(&source, near_nyc());
    q.mount().await;
    assert_eq!(q.snapshot().status, QueryStatus::Error);

    source.fail_ranked(None);
    q.refetch().await;

    let snapshot = q.snapshot();
    assert_eq!(snapshot.status, QueryStatus::Success);
    assert_eq!(snapshot.error, None);
    assert_eq!(snapshot.error_kind, None);
    assert_eq!(dish_ids(&q), ["a"]);
}

#[tokio::test]
async fn error_after_success_clears_dishes() {
    let source = Arc::new(MockDishSource::new());
    source.on_ranked(None, vec![ranked_dish("a", "pizza", 50.0, 2)]);

    let q = query(&source, near_nyc());
    q.mount().await;
    assert_eq!(dish_ids(&q).len(), 1);

    source.fail_ranked(Some(DataAccessError::remote("rate limited")));
    q.refetch().await;

    let snapshot = q.snapshot();
    assert_eq!(snapshot.status, QueryStatus::Error);
    assert!(snapshot.dishes.is_empty());
}

// ---------------------------------------------------------------------------
// Overlapping fetches and timeouts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn slow_stale_response_never_overwrites_newer_result() {
    let source = Arc::new(MockDishSource::new());
    source.on_ranked(None, vec![ranked_dish("all", "pizza", 50.0, 2)]);
    source.on_ranked(Some(Category::Pizza), vec![ranked_dish("pizza", "pizza", 70.0, 7)]);
    source.on_ranked(Some(Category::Sushi), vec![ranked_dish("sushi", "sushi", 90.0, 9)]);

    let q = Arc::new(query(&source, near_nyc()));
    q.mount().await;

    let pizza_gate = source.gate_ranked(Some(Category::Pizza));
    let mut rx = q.subscribe();
    let slow = tokio::spawn({
        let q = q.clone();
        async move { q.set_category(Some(Category::Pizza)).await }
    });
    rx.wait_for(|r| r.status == QueryStatus::Loading)
        .await
        .unwrap();

    q.set_category(Some(Category::Sushi)).await;
    assert_eq!(dish_ids(&q), ["sushi"]);

    pizza_gate.notify_one();
    slow.await.unwrap();

    let snapshot = q.snapshot();
    assert_eq!(snapshot.status, QueryStatus::Success);
    assert_eq!(dish_ids(&q), ["sushi"]);
    assert_eq!(q.filters().category, Some(Category::Sushi));
    // The pizza call did happen; its answer was dropped.
    assert_eq!(source.ranked_calls().len(), 3);
}

#[tokio::test]
async fn slow_stale_failure_is_discarded_too() {
    let source = Arc::new(MockDishSource::new());
    source.on_restaurant_dishes("R1", vec![restaurant_dish("d1", "burger", "R1", "Patty Shack")]);
    source.on_ranked(None, vec![ranked_dish("n1", "pizza", 70.0, 9)]);

    let q = Arc::new(query(&source, near_nyc().with_restaurant(r1())));
    let gate = source.gate_restaurant("R1");
    let mut rx = q.subscribe();
    let slow = tokio::spawn({
        let q = q.clone();
        async move { q.mount().await }
    });
    rx.wait_for(|r| r.status == QueryStatus::Loading)
        .await
        .unwrap();

    q.clear_restaurant().await;
    assert_eq!(dish_ids(&q), ["n1"]);

    source.fail_restaurant_dishes(Some(DataAccessError::remote("too late")));
    gate.notify_one();
    slow.await.unwrap();

    let snapshot = q.snapshot();
    assert_eq!(snapshot.status, QueryStatus::Success);
    assert_eq!(snapshot.error, None);
    assert_eq!(dish_ids(&q), ["n1"]);
}

#[tokio::test]
async fn fetch_exceeding_timeout_is_a_timeout_error() {
    let source = Arc::new(MockDishSource::new());
    let _never_released = source.gate_ranked(None);

    let q = DishQuery::new(
        source.clone(),
        near_nyc(),
        QueryConfig {
            fetch_timeout: Duration::from_millis(50),
        },
    );
    q.mount().await;

    let snapshot = q.snapshot();
    assert_eq!(snapshot.status, QueryStatus::Error);
    assert_eq!(snapshot.error_kind, Some(DataAccessKind::Timeout));
    assert_eq!(snapshot.error.as_deref(), Some("Request timed out after 50ms"));
    assert!(snapshot.dishes.is_empty());
}
