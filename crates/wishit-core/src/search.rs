//! Search filters for the list screens
//!
//! A blank term matches everything. Otherwise the term is trimmed and matched
//! case-insensitively as a substring of the fields each screen exposes.

use crate::{
    types::{Creator, GiftList, Post, User},
    utils::contains_ignore_case,
};

/// A normalized search term
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchTerm {
    needle: Option<String>,
}

impl SearchTerm {
    /// Normalize a raw term; blank input matches everything
    #[must_use]
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        Self {
            needle: (!trimmed.is_empty()).then(|| trimmed.to_lowercase()),
        }
    }

    /// Whether the term matches everything
    #[must_use]
    pub const fn is_blank(&self) -> bool {
        self.needle.is_none()
    }

    fn any<'a>(&self, fields: impl IntoIterator<Item = Option<&'a str>>) -> bool {
        let Some(needle) = self.needle.as_deref() else {
            return true;
        };
        fields
            .into_iter()
            .flatten()
            .any(|field| contains_ignore_case(field, needle))
    }

    /// Match a user on full name or email
    #[must_use]
    pub fn matches_user(&self, user: &User) -> bool {
        self.any([user.full_name.as_deref(), Some(user.email.as_str())])
    }

    /// Match a post on caption, category, or author name and email
    #[must_use]
    pub fn matches_post(&self, post: &Post) -> bool {
        let creator = post.creator.as_ref();
        self.any([
            Some(post.caption.as_str()),
            Some(post.category.as_str()),
            creator.and_then(Creator::full_name),
            creator.and_then(Creator::email),
        ])
    }

    /// Match a gift list on theme, category, owner name, or any item
    #[must_use]
    pub fn matches_gift(&self, list: &GiftList) -> bool {
        let head = [
            Some(list.theme.as_str()),
            Some(list.category.as_str()),
            list.creator.as_ref().and_then(Creator::full_name),
        ];
        let items = list
            .gifts
            .iter()
            .flat_map(|item| [Some(item.name.as_str()), Some(item.description.as_str())]);
        self.any(head.into_iter().chain(items))
    }
}

/// Users matching `term`, in backend order
#[must_use]
pub fn filter_users<'a>(users: &'a [User], term: &str) -> Vec<&'a User> {
    let term = SearchTerm::new(term);
    users.iter().filter(|user| term.matches_user(user)).collect()
}

/// Posts matching `term`, in backend order
#[must_use]
pub fn filter_posts<'a>(posts: &'a [Post], term: &str) -> Vec<&'a Post> {
    let term = SearchTerm::new(term);
    posts.iter().filter(|post| term.matches_post(post)).collect()
}

/// Gift lists matching `term`, in backend order
#[must_use]
pub fn filter_gifts<'a>(gifts: &'a [GiftList], term: &str) -> Vec<&'a GiftList> {
    let term = SearchTerm::new(term);
    gifts.iter().filter(|list| term.matches_gift(list)).collect()
}
