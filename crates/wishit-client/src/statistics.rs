//! Statistics loader: fetch the three collections concurrently and derive aggregates

use crate::api_client::ApiClient;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{debug, warn};
use wishit_core::{
    Collection, CollectionKind, GiftList, Post, User,
    stats::{Aggregates, ChartSet},
};

/// A collection that could not be loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionFailure {
    /// Which collection
    pub collection: CollectionKind,
    /// Why it failed
    pub reason: String,
}

/// Everything the statistics screen needs
///
/// Failed collections count as empty in `aggregates`; `failures` lists them
/// so the screen can show a non-fatal error next to what did load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsReport {
    /// Derived counts and distributions
    pub aggregates: Aggregates,
    /// Chart-ready datasets
    pub charts: ChartSet,
    /// Collections that failed to load
    pub failures: Vec<CollectionFailure>,
    /// Users as fetched
    #[serde(skip)]
    pub users: Collection<User>,
    /// Posts as fetched
    #[serde(skip)]
    pub posts: Collection<Post>,
    /// Gift lists as fetched
    #[serde(skip)]
    pub gifts: Collection<GiftList>,
}

impl StatisticsReport {
    /// Build the report from fetch outcomes as of `today`
    #[must_use]
    pub fn from_collections(
        users: Collection<User>,
        posts: Collection<Post>,
        gifts: Collection<GiftList>,
        today: NaiveDate,
    ) -> Self {
        let failures = [
            (CollectionKind::Users, users.failure()),
            (CollectionKind::Posts, posts.failure()),
            (CollectionKind::Gifts, gifts.failure()),
        ]
        .into_iter()
        .filter_map(|(collection, reason)| {
            reason.map(|reason| CollectionFailure {
                collection,
                reason: reason.to_string(),
            })
        })
        .collect();

        let aggregates = Aggregates::compute(users.records(), posts.records(), gifts.records(), today);
        let charts = aggregates.charts();

        Self {
            aggregates,
            charts,
            failures,
            users,
            posts,
            gifts,
        }
    }

    /// Whether every collection loaded
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Load statistics as of the current UTC date
pub async fn load_statistics(client: &ApiClient) -> StatisticsReport {
    load_statistics_on(client, Utc::now().date_naive()).await
}

/// Load statistics as of `today`
///
/// The three fetches run concurrently; one failing never discards the others.
pub async fn load_statistics_on(client: &ApiClient, today: NaiveDate) -> StatisticsReport {
    debug!("Loading statistics from {}", client.api_root());
    let (users, posts, gifts) = tokio::join!(
        client.list_users(),
        client.list_posts(),
        client.list_gifts()
    );

    let report = StatisticsReport::from_collections(
        Collection::from_result(users),
        Collection::from_result(posts),
        Collection::from_result(gifts),
        today,
    );

    for failure in &report.failures {
        warn!("Failed to load {}: {}", failure.collection, failure.reason);
    }
    report
}
