//! Load lifecycle for the dish feed.
//!
//! [`DishQuery`] holds the current [`FilterState`], runs it through the router
//! whenever it changes (or on [`DishQuery::refetch`]) and publishes one
//! [`QueryResult`] slot that readers observe via [`DishQuery::snapshot`] or a
//! `watch` subscription.
//!
//! Fetches are never cancelled. Every run takes a generation number from a
//! monotonically increasing counter and its outcome is published only if no
//! newer run has started since, so the slot always reflects the most recently
//! requested filters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::category::Category;
use crate::config::QueryConfig;
use crate::error::{DataAccessError, DataAccessKind};
use crate::filter::{FilterState, Location, RestaurantId};
use crate::router::{self, FetchPlan, QueryRouter};
use crate::traits::DishSource;
use crate::types::Dish;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Constructed, not yet mounted.
    Idle,
    /// Neither a location nor a restaurant is known; nothing is in flight.
    AwaitingLocation,
    Loading,
    Success,
    Error,
}

/// What the presentation layer renders.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub status: QueryStatus,
    /// Replaced wholesale on success, emptied on error and while awaiting a
    /// location. While loading, the previous result stays visible.
    pub dishes: Vec<Dish>,
    pub error: Option<String>,
    pub error_kind: Option<DataAccessKind>,
    /// Generation of the run that last wrote this slot.
    pub generation: u64,
}

impl QueryResult {
    fn idle() -> Self {
        Self {
            status: QueryStatus::Idle,
            dishes: Vec::new(),
            error: None,
            error_kind: None,
            generation: 0,
        }
    }

    pub fn loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }
}

pub struct DishQuery {
    router: QueryRouter,
    config: QueryConfig,
    filters: watch::Sender<FilterState>,
    generation: AtomicU64,
    state: watch::Sender<QueryResult>,
}

impl DishQuery {
    /// Create the controller in `Idle`. Nothing is fetched until [`mount`].
    ///
    /// [`mount`]: DishQuery::mount
    pub fn new(source: Arc<dyn DishSource>, filters: FilterState, config: QueryConfig) -> Self {
        let (filters, _) = watch::channel(filters);
        let (state, _) = watch::channel(QueryResult::idle());
        Self {
            router: QueryRouter::new(source),
            config,
            filters,
            generation: AtomicU64::new(0),
            state,
        }
    }

    /// First run with the initial filters: ends in `AwaitingLocation` when
    /// there is nothing to fetch, otherwise loads.
    pub async fn mount(&self) {
        self.run(self.filters()).await;
    }

    pub fn filters(&self) -> FilterState {
        self.filters.borrow().clone()
    }

    pub fn snapshot(&self) -> QueryResult {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryResult> {
        self.state.subscribe()
    }

    pub fn subscribe_filters(&self) -> watch::Receiver<FilterState> {
        self.filters.subscribe()
    }

    /// Replace the filters. Re-runs only if something actually changed, or if
    /// the controller has never run.
    pub async fn set_filters(&self, next: FilterState) {
        let changed = self.filters.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next.clone();
                true
            }
        });

        if changed || self.snapshot().status == QueryStatus::Idle {
            self.run(next).await;
        }
    }

    pub async fn set_location(&self, location: Option<Location>) {
        self.set_filters(FilterState {
            location,
            ..self.filters()
        })
        .await;
    }

    pub async fn set_radius(&self, radius_miles: f64) {
        self.set_filters(FilterState {
            radius_miles,
            ..self.filters()
        })
        .await;
    }

    pub async fn set_category(&self, category: Option<Category>) {
        self.set_filters(FilterState {
            category,
            ..self.filters()
        })
        .await;
    }

    pub async fn set_restaurant(&self, restaurant_id: RestaurantId) {
        self.set_filters(FilterState {
            restaurant_id: Some(restaurant_id),
            ..self.filters()
        })
        .await;
    }

    pub async fn clear_restaurant(&self) {
        self.set_filters(FilterState {
            restaurant_id: None,
            ..self.filters()
        })
        .await;
    }

    /// Re-issue the query the current filters produce. Also the recovery path
    /// after an error.
    pub async fn refetch(&self) {
        self.run(self.filters()).await;
    }

    /// A vote was recorded elsewhere; aggregates may be stale.
    pub async fn vote_recorded(&self) {
        debug!("Vote recorded, refetching dishes");
        self.refetch().await;
    }

    async fn run(&self, filters: FilterState) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let plan = router::select(&filters);

        if plan == FetchPlan::AwaitingLocation {
            debug!(generation, "No location or restaurant yet, not fetching");
            self.publish(generation, |slot| {
                slot.status = QueryStatus::AwaitingLocation;
                slot.dishes.clear();
                slot.error = None;
                slot.error_kind = None;
            });
            return;
        }

        debug!(generation, strategy = plan.name(), "Fetching dishes");
        self.publish(generation, |slot| {
            slot.status = QueryStatus::Loading;
            slot.error = None;
            slot.error_kind = None;
        });

        let outcome =
            match tokio::time::timeout(self.config.fetch_timeout, self.router.execute(&plan)).await
            {
                Ok(result) => result,
                Err(_) => Err(DataAccessError::timeout(self.config.fetch_timeout)),
            };

        match outcome {
            Ok(dishes) => {
                let count = dishes.len();
                if self.publish(generation, |slot| {
                    slot.status = QueryStatus::Success;
                    slot.dishes = dishes;
                }) {
                    info!(generation, strategy = plan.name(), count, "Dishes loaded");
                }
            }
            Err(e) => {
                warn!(generation, strategy = plan.name(), error = %e, "Error fetching dishes");
                self.publish(generation, |slot| {
                    slot.status = QueryStatus::Error;
                    slot.dishes.clear();
                    slot.error = Some(e.message().to_string());
                    slot.error_kind = Some(e.kind());
                });
            }
        }
    }

    /// Apply `update` to the slot if `generation` is still the latest issued.
    /// Returns whether it was applied.
    fn publish<F>(&self, generation: u64, update: F) -> bool
    where
        F: FnOnce(&mut QueryResult),
    {
        let applied = self.state.send_if_modified(|slot| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            update(slot);
            slot.generation = generation;
            true
        });
        if !applied {
            debug!(generation, "Discarding stale result");
        }
        applied
    }
}
