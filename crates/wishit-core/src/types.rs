//! Domain records exchanged with the Wishit backend

use crate::utils::{parse_date, parse_timestamp};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// User record as returned by `GET /api/user`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Backend identifier
    #[serde(rename = "_id")]
    pub id: String,

    /// Display name
    #[serde(default)]
    pub full_name: Option<String>,

    /// Email address
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,

    /// Administrator flag
    #[serde(default, deserialize_with = "literal_true")]
    pub is_admin: bool,

    /// Follower references (ids or populated users)
    #[serde(default, deserialize_with = "null_as_default")]
    pub followers: Vec<Value>,

    /// Followed references (ids or populated users)
    #[serde(default, deserialize_with = "null_as_default")]
    pub following: Vec<Value>,

    /// Declared gender, `Homme` or `Femme` when set
    #[serde(default)]
    pub sexe: Option<String>,

    /// Birth date
    #[serde(
        default,
        rename = "dateDeNaiss",
        deserialize_with = "lenient_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub birth_date: Option<NaiveDate>,

    /// Account creation time
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,

    /// Last known location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

/// Geographic location attached to a user profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude in degrees
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Longitude in degrees
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Country name
    #[serde(default)]
    pub country: Option<String>,
    /// City name
    #[serde(default)]
    pub city: Option<String>,
}

/// Post record as returned by `GET /api/post`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Backend identifier
    #[serde(rename = "_id")]
    pub id: String,

    /// Occasion category (`Birthday`, `Marriage`, ...)
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,

    /// Caption text
    #[serde(default, deserialize_with = "null_as_default")]
    pub caption: String,

    /// Picture URL
    #[serde(default)]
    pub picture: Option<String>,

    /// Author
    #[serde(default)]
    pub creator: Option<Creator>,

    /// Users who liked the post
    #[serde(default, deserialize_with = "null_as_default")]
    pub likers: Vec<Value>,

    /// Comments
    #[serde(default, deserialize_with = "null_as_default")]
    pub comments: Vec<Value>,

    /// Shares
    #[serde(default, deserialize_with = "null_as_default")]
    pub shares: Vec<Value>,

    /// Creation time
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Gift list record as returned by `GET /api/gift`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftList {
    /// Backend identifier
    #[serde(rename = "_id")]
    pub id: String,

    /// Theme of the list
    #[serde(default, deserialize_with = "null_as_default")]
    pub theme: String,

    /// Occasion category (`Birthday`, `Marriage`, ...)
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: String,

    /// Wished items
    #[serde(default, deserialize_with = "null_as_default")]
    pub gifts: Vec<GiftItem>,

    /// Owner of the list
    #[serde(default)]
    pub creator: Option<Creator>,

    /// Users who liked the list
    #[serde(default, deserialize_with = "null_as_default")]
    pub likers: Vec<Value>,

    /// Creation time
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,

    /// Last update time
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A single wished item inside a gift list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GiftItem {
    /// Item name
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Item description
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

/// Occasion category shared by posts and gift lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    /// `Birthday`
    Birthday,
    /// `Marriage`
    Marriage,
    /// `Baby Shower`
    #[serde(rename = "Baby Shower")]
    BabyShower,
    /// `Event`
    Event,
    /// `Noel`
    Noel,
    /// `Other`, and any value the dashboard does not know
    Other,
}

impl Category {
    /// Map a backend category label, unknown labels become [`Category::Other`]
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Birthday" => Self::Birthday,
            "Marriage" => Self::Marriage,
            "Baby Shower" => Self::BabyShower,
            "Event" => Self::Event,
            "Noel" => Self::Noel,
            _ => Self::Other,
        }
    }

    /// Backend label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Birthday => "Birthday",
            Self::Marriage => "Marriage",
            Self::BabyShower => "Baby Shower",
            Self::Event => "Event",
            Self::Noel => "Noel",
            Self::Other => "Other",
        }
    }
}

impl Post {
    /// Normalized category
    #[must_use]
    pub fn category(&self) -> Category {
        Category::from_label(&self.category)
    }
}

impl GiftList {
    /// Normalized category
    #[must_use]
    pub fn category(&self) -> Category {
        Category::from_label(&self.category)
    }
}

/// Author reference: either populated by the backend or a bare id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Creator {
    /// Populated author profile
    Profile(CreatorProfile),
    /// Unpopulated author id
    Id(String),
}

/// Populated author profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorProfile {
    /// Backend identifier
    #[serde(rename = "_id", default)]
    pub id: String,
    /// Display name
    #[serde(default)]
    pub full_name: Option<String>,
    /// Email address
    #[serde(default)]
    pub email: Option<String>,
    /// Username
    #[serde(default)]
    pub username: Option<String>,
}

impl Creator {
    /// Name shown for the author: full name, then username, then email
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Self::Profile(profile) => profile
                .full_name
                .as_deref()
                .or(profile.username.as_deref())
                .or(profile.email.as_deref())
                .unwrap_or(UNKNOWN_AUTHOR),
            Self::Id(_) => UNKNOWN_AUTHOR,
        }
    }

    /// Full name when the author is populated
    #[must_use]
    pub fn full_name(&self) -> Option<&str> {
        match self {
            Self::Profile(profile) => profile.full_name.as_deref(),
            Self::Id(_) => None,
        }
    }

    /// Email when the author is populated
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        match self {
            Self::Profile(profile) => profile.email.as_deref(),
            Self::Id(_) => None,
        }
    }
}

/// Placeholder for authors the backend did not populate
pub const UNKNOWN_AUTHOR: &str = "Unknown user";

/// Author display name for an optional creator
#[must_use]
pub fn author_name(creator: Option<&Creator>) -> &str {
    creator.map_or(UNKNOWN_AUTHOR, Creator::display_name)
}

/// User record kept in the session `user` entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    /// Backend identifier
    #[serde(rename = "_id", default)]
    pub id: String,

    /// Email address
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,

    /// Display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,

    /// Administrator flag; only a literal JSON `true` grants it
    #[serde(default, deserialize_with = "literal_true")]
    pub is_admin: bool,
}

/// The three resource collections managed by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    /// Users
    Users,
    /// Posts ("publications")
    Posts,
    /// Gift lists
    Gifts,
}

impl CollectionKind {
    /// All collections in display order
    pub const ALL: [Self; 3] = [Self::Users, Self::Posts, Self::Gifts];

    /// Backend resource segment, as in `/api/{segment}`
    #[must_use]
    pub const fn resource(self) -> &'static str {
        match self {
            Self::Users => "user",
            Self::Posts => "post",
            Self::Gifts => "gift",
        }
    }

    /// Human readable singular noun
    #[must_use]
    pub const fn noun(self) -> &'static str {
        match self {
            Self::Users => "user",
            Self::Posts => "post",
            Self::Gifts => "gift list",
        }
    }

    /// Parse the plural path segment used by the dashboard routes
    #[must_use]
    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "users" => Some(Self::Users),
            "posts" => Some(Self::Posts),
            "gifts" => Some(Self::Gifts),
            _ => None,
        }
    }
}

impl std::fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Users => "users",
            Self::Posts => "posts",
            Self::Gifts => "gifts",
        };
        f.write_str(name)
    }
}

/// Missing keys and explicit `null` both take the default
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn literal_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(matches!(Option::<Value>::deserialize(deserializer)?, Some(Value::Bool(true))))
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(raw)) => parse_date(&raw),
        _ => None,
    })
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(raw)) => parse_timestamp(&raw),
        _ => None,
    })
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_user_deserialization_with_backend_fields() {
        let user: User = serde_json::from_value(json!({
            "_id": "64f0c1",
            "fullName": "Amina Diallo",
            "email": "amina@wishit.app",
            "isAdmin": false,
            "followers": ["a", "b"],
            "following": [],
            "sexe": "Femme",
            "dateDeNaiss": "1998-04-12T00:00:00.000Z",
            "createdAt": "2024-02-01T10:30:00.000Z",
            "location": {"city": "Dakar", "country": "Senegal"}
        }))
        .unwrap();

        assert_eq!(user.id, "64f0c1");
        assert_eq!(user.full_name.as_deref(), Some("Amina Diallo"));
        assert_eq!(user.followers.len(), 2);
        assert_eq!(user.birth_date, NaiveDate::from_ymd_opt(1998, 4, 12));
        assert_eq!(user.created_at.unwrap().month(), 2);
        assert_eq!(user.location.unwrap().city.as_deref(), Some("Dakar"));
    }

    #[test]
    fn test_user_with_minimal_fields() {
        let user: User = serde_json::from_value(json!({"_id": "1"})).unwrap();

        assert!(user.full_name.is_none());
        assert!(!user.is_admin);
        assert!(user.sexe.is_none());
        assert!(user.birth_date.is_none());
        assert!(user.created_at.is_none());
    }

    #[test]
    fn test_null_fields_take_defaults() {
        let users: Vec<User> = crate::collection::decode_collection(
            CollectionKind::Users,
            json!([
                {"_id": "u1", "email": "a@b.c"},
                {"_id": "u2", "email": null, "followers": null, "fullName": null}
            ]),
        )
        .unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].email, "");
        assert!(users[1].followers.is_empty());

        let list: GiftList = serde_json::from_value(json!({
            "_id": "g1",
            "theme": null,
            "category": null,
            "gifts": [{"name": "Vélo", "description": null}],
            "likers": null
        }))
        .unwrap();
        assert_eq!(list.theme, "");
        assert_eq!(list.category(), Category::Other);
        assert_eq!(list.gifts[0].description, "");

        let post: Post =
            serde_json::from_value(json!({"_id": "p1", "caption": null, "category": null, "comments": null}))
                .unwrap();
        assert_eq!(post.caption, "");
        assert!(post.comments.is_empty());
    }

    #[test]
    fn test_unparsable_dates_are_absent() {
        let user: User = serde_json::from_value(json!({
            "_id": "1",
            "dateDeNaiss": "not a date",
            "createdAt": 12
        }))
        .unwrap();

        assert!(user.birth_date.is_none());
        assert!(user.created_at.is_none());
    }

    #[test]
    fn test_creator_populated_or_id() {
        let post: Post = serde_json::from_value(json!({
            "_id": "p1",
            "caption": "Mon anniversaire",
            "category": "Birthday",
            "creator": {"_id": "u1", "email": "x@y.z"}
        }))
        .unwrap();
        assert_eq!(post.creator.as_ref().unwrap().display_name(), "x@y.z");

        let post: Post = serde_json::from_value(json!({"_id": "p2", "creator": "u1"})).unwrap();
        assert_eq!(post.creator, Some(Creator::Id("u1".to_string())));
        assert_eq!(author_name(post.creator.as_ref()), UNKNOWN_AUTHOR);
        assert_eq!(author_name(None), UNKNOWN_AUTHOR);
    }

    #[test]
    fn test_creator_display_name_precedence() {
        let creator = Creator::Profile(CreatorProfile {
            id: "u".to_string(),
            full_name: None,
            email: Some("mail@wishit.app".to_string()),
            username: Some("wishy".to_string()),
        });

        assert_eq!(creator.display_name(), "wishy");
    }

    #[test]
    fn test_gift_list_deserialization() {
        let list: GiftList = serde_json::from_value(json!({
            "_id": "g1",
            "theme": "Mariage de Léa",
            "category": "Marriage",
            "gifts": [{"name": "Vase", "description": "Bleu"}, {"name": "Plaid"}],
            "likers": [],
            "createdAt": "2024-05-02T08:00:00Z",
            "updatedAt": "2024-05-03T08:00:00Z"
        }))
        .unwrap();

        assert_eq!(list.gifts.len(), 2);
        assert_eq!(list.gifts[1].description, "");
        assert!(list.updated_at.unwrap() > list.created_at.unwrap());
    }

    #[test]
    fn test_session_user_admin_flag_requires_literal_true() {
        let admin: SessionUser =
            serde_json::from_str(r#"{"_id":"1","email":"a@b.c","isAdmin":true}"#).unwrap();
        let text_flag: SessionUser =
            serde_json::from_str(r#"{"_id":"1","email":"a@b.c","isAdmin":"true"}"#).unwrap();
        let missing: SessionUser = serde_json::from_str(r#"{"email":"a@b.c"}"#).unwrap();

        assert!(admin.is_admin);
        assert!(!text_flag.is_admin);
        assert!(!missing.is_admin);
    }

    #[test]
    fn test_unknown_category_is_other() {
        let post: Post =
            serde_json::from_value(json!({"_id": "p", "category": "Baby Shower"})).unwrap();
        assert_eq!(post.category(), Category::BabyShower);

        let list: GiftList = serde_json::from_value(json!({"_id": "g", "category": "Graduation"})).unwrap();
        assert_eq!(list.category(), Category::Other);
        assert_eq!(list.category, "Graduation");
        assert_eq!(Category::Noel.as_str(), "Noel");
    }

    #[test]
    fn test_collection_kind_segments() {
        assert_eq!(CollectionKind::from_segment("gifts"), Some(CollectionKind::Gifts));
        assert_eq!(CollectionKind::from_segment("gift"), None);
        assert_eq!(CollectionKind::Posts.resource(), "post");
        assert_eq!(CollectionKind::Gifts.noun(), "gift list");
        assert_eq!(CollectionKind::Users.to_string(), "users");
    }
}
