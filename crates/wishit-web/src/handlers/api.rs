//! JSON endpoints feeding the dashboard pages

use crate::{cookies::CookieJar, error::ApiError, guard::require_api, state::AppState};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};
use wishit_client::{ClientError, StatisticsReport, load_statistics};
use wishit_core::{
    CollectionKind, GiftList, Post, Role, SessionUser, User, search,
    types::author_name,
    utils::{format_timestamp, truncate_text},
};

/// Query string of the listing endpoints
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Search term; blank lists everything
    #[serde(default)]
    pub search: Option<String>,
}

/// Characters of a caption or theme shown in a listing row
pub const EXCERPT_CHARS: usize = 80;

/// A listed record with the display fields the list screens show
#[derive(Debug, Serialize)]
pub struct Row<'a, T> {
    /// The record as received from the backend
    #[serde(flatten)]
    pub record: &'a T,
    /// Author display name, for posts and gift lists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<&'a str>,
    /// Truncated caption or theme
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// Creation time as `dd/mm/yyyy hh:mm`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
}

impl<'a> Row<'a, User> {
    fn user(user: &'a User) -> Self {
        Self {
            record: user,
            author: None,
            excerpt: None,
            created: user.created_at.as_ref().map(format_timestamp),
        }
    }
}

impl<'a> Row<'a, Post> {
    fn post(post: &'a Post) -> Self {
        Self {
            record: post,
            author: Some(author_name(post.creator.as_ref())),
            excerpt: Some(truncate_text(&post.caption, EXCERPT_CHARS)),
            created: post.created_at.as_ref().map(format_timestamp),
        }
    }
}

impl<'a> Row<'a, GiftList> {
    fn gift(list: &'a GiftList) -> Self {
        Self {
            record: list,
            author: Some(author_name(list.creator.as_ref())),
            excerpt: Some(truncate_text(&list.theme, EXCERPT_CHARS)),
            created: list.created_at.as_ref().map(format_timestamp),
        }
    }
}

/// Filtered listing of one collection
#[derive(Debug, Serialize)]
pub struct Listing<'a, T> {
    /// Collection listed
    pub collection: CollectionKind,
    /// Records before filtering
    pub total: usize,
    /// Records after filtering
    pub count: usize,
    /// Matching records, in backend order
    pub records: Vec<Row<'a, T>>,
}

impl<'a, T: Serialize> Listing<'a, T> {
    fn respond(collection: CollectionKind, total: usize, records: Vec<Row<'a, T>>) -> Response {
        Json(Self {
            collection,
            total,
            count: records.len(),
            records,
        })
        .into_response()
    }
}

fn collection_from(segment: &str) -> Result<CollectionKind, Response> {
    CollectionKind::from_segment(segment)
        .ok_or_else(|| ApiError::not_found(format!("Unknown collection: {segment}")).into_response())
}

/// `GET /api/session`: the signed-in user
///
/// # Errors
///
/// Returns 401 without a usable session.
pub async fn current_session(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<SessionUser>, Response> {
    let session = require_api(CookieJar::from_headers(&headers, state.session()), Role::Any)?;
    Ok(Json(session.user))
}

/// `GET /api/admin/stats`: aggregates and charts over the three collections
///
/// Collections that fail to load are listed in `failures`; the rest still count.
///
/// # Errors
///
/// Returns 401 or 403 when the caller is not an administrator.
pub async fn admin_stats(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<StatisticsReport>, Response> {
    let session = require_api(CookieJar::from_headers(&headers, state.session()), Role::Admin)?;
    let report = load_statistics(&state.client_for(&session.token)).await;
    Ok(Json(report))
}

/// `GET /api/admin/{users|posts|gifts}?search=`: filtered listing
///
/// # Errors
///
/// Returns 401 or 403 for non-administrators, 404 for an unknown collection,
/// or 502 when the backend fails.
pub async fn list_collection(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(collection): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Response, Response> {
    let session = require_api(CookieJar::from_headers(&headers, state.session()), Role::Admin)?;
    let kind = collection_from(&collection)?;
    let client = state.client_for(&session.token);
    let term = query.search.unwrap_or_default();

    let listed = match kind {
        CollectionKind::Users => client.list_users().await.map(|users| {
            let rows = search::filter_users(&users, &term).into_iter().map(Row::user).collect();
            Listing::respond(kind, users.len(), rows)
        }),
        CollectionKind::Posts => client.list_posts().await.map(|posts| {
            let rows = search::filter_posts(&posts, &term).into_iter().map(Row::post).collect();
            Listing::respond(kind, posts.len(), rows)
        }),
        CollectionKind::Gifts => client.list_gifts().await.map(|gifts| {
            let rows = search::filter_gifts(&gifts, &term).into_iter().map(Row::gift).collect();
            Listing::respond(kind, gifts.len(), rows)
        }),
    };

    listed.map_err(|err: ClientError| {
        error!("Failed to list {}: {}", kind, err);
        ApiError::backend(&err, err.user_message()).into_response()
    })
}

/// `DELETE /api/admin/{users|posts|gifts}/:id`
///
/// # Errors
///
/// Returns 401 or 403 for non-administrators, 404 for an unknown collection,
/// or 502 with `Unable to delete ...` when the backend refuses.
pub async fn delete_record(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((collection, id)): Path<(String, String)>,
) -> Result<StatusCode, Response> {
    let session = require_api(CookieJar::from_headers(&headers, state.session()), Role::Admin)?;
    let kind = collection_from(&collection)?;

    match state.client_for(&session.token).delete(kind, &id).await {
        Ok(()) => {
            info!("{} deleted {} {}", session.user.email, kind.noun(), id);
            Ok(StatusCode::NO_CONTENT)
        }
        Err(err) => {
            error!("Failed to delete {} {}: {}", kind.noun(), id, err);
            Err(ApiError::backend(&err, format!("Unable to delete {}", kind.noun())).into_response())
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}
