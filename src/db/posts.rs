use super::StoreError;
use crate::models::{NewPost, Post, PostChanges, PostStatus};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use dashmap::{DashMap, mapref::entry::Entry};
use serde::Deserialize;
use std::{
    cmp::Reverse,
    collections::BTreeSet,
    sync::{
        Arc, PoisonError, RwLock, RwLockWriteGuard,
        atomic::{AtomicI64, Ordering},
    },
};
use uuid::Uuid;

/// In-memory post table.
///
/// Rows live in `rows` keyed by id. `slug_index` enforces that a slug is unique
/// per publish day, the same way `email_index` keeps user emails unique.
/// `publish_index` keeps ids sorted by descending `publish`; every read walks
/// it, so results come back newest first without sorting.
///
/// Lock order is row, then `publish_index`. Readers copy ids out of the index
/// before touching rows.
#[derive(Clone, Default)]
pub struct PostStore {
    rows: Arc<DashMap<i64, Post>>,
    slug_index: Arc<DashMap<(NaiveDate, String), i64>>,
    publish_index: Arc<RwLock<BTreeSet<PublishKey>>>,
    sequence: Arc<AtomicI64>,
}

/// Descending `publish`, ties broken by descending id.
type PublishKey = (Reverse<DateTime<Utc>>, Reverse<i64>);

fn publish_key(publish: DateTime<Utc>, id: i64) -> PublishKey {
    (Reverse(publish), Reverse(id))
}

impl PostStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, new: NewPost) -> Result<Post, StoreError> {
        let now = Utc::now();
        let slug = match new.slug {
            Some(slug) if !slug.is_empty() => slug,
            _ => crate::slug::slugify_title(&new.title),
        };
        if slug.is_empty() {
            return Err(StoreError::EmptySlug);
        }
        let publish = new.publish.unwrap_or(now);
        let id = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;

        self.claim_slug(publish.date_naive(), &slug, id)?;

        let post = Post {
            id,
            title: new.title,
            slug,
            author_id: new.author_id,
            body: new.body,
            publish,
            created: now,
            updated: now,
            status: new.status.unwrap_or_default(),
        };
        self.rows.insert(id, post.clone());
        self.index_mut().insert(publish_key(publish, id));
        Ok(post)
    }

    pub fn get(&self, id: i64) -> Option<Post> {
        self.rows.get(&id).map(|row| row.clone())
    }

    /// Every post, newest first.
    pub fn all(&self) -> Vec<Post> {
        self.list(|_| true)
    }

    /// Posts with `PUBLISHED` status, newest first.
    pub fn published(&self) -> Vec<Post> {
        self.list(Post::is_published)
    }

    pub fn list(&self, predicate: impl Fn(&Post) -> bool) -> Vec<Post> {
        self.ordered_ids()
            .into_iter()
            .filter_map(|id| self.rows.get(&id))
            .filter(|row| predicate(row.value()))
            .map(|row| row.value().clone())
            .collect()
    }

    /// Ids in index order, newest `publish` first.
    fn ordered_ids(&self) -> Vec<i64> {
        self.publish_index
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, Reverse(id))| *id)
            .collect()
    }

    fn index_mut(&self) -> RwLockWriteGuard<'_, BTreeSet<PublishKey>> {
        self.publish_index
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Published post on `date` carrying `slug`. Anything other than exactly
    /// one match is `NotFound`.
    pub fn find_published_on(&self, date: NaiveDate, slug: &str) -> Result<Post, StoreError> {
        let mut matches = self
            .list(|post| post.is_published() && post.publish_date() == date && post.slug == slug);
        if matches.len() != 1 {
            return Err(StoreError::NotFound);
        }
        Ok(matches.remove(0))
    }

    pub fn find_published(&self, id: i64) -> Result<Post, StoreError> {
        self.get(id)
            .filter(Post::is_published)
            .ok_or(StoreError::NotFound)
    }

    pub fn update(&self, id: i64, changes: PostChanges) -> Result<Post, StoreError> {
        let mut row = self.rows.get_mut(&id).ok_or(StoreError::NotFound)?;

        let slug = changes.slug.unwrap_or_else(|| row.slug.clone());
        if slug.is_empty() {
            return Err(StoreError::EmptySlug);
        }
        let publish = changes.publish.unwrap_or(row.publish);
        let old_key = (row.publish_date(), row.slug.clone());
        let new_key = (publish.date_naive(), slug);
        if new_key != old_key {
            self.claim_slug(new_key.0, &new_key.1, id)?;
            self.slug_index.remove_if(&old_key, |_, owner| *owner == id);
        }
        if publish != row.publish {
            let mut index = self.index_mut();
            index.remove(&publish_key(row.publish, id));
            index.insert(publish_key(publish, id));
        }

        let post = row.value_mut();
        post.slug = new_key.1;
        post.publish = publish;
        if let Some(title) = changes.title {
            post.title = title;
        }
        if let Some(body) = changes.body {
            post.body = body;
        }
        if let Some(status) = changes.status {
            post.status = status;
        }
        post.updated = Utc::now();
        Ok(post.clone())
    }

    pub fn delete(&self, id: i64) -> Result<Post, StoreError> {
        let (_, post) = self.rows.remove(&id).ok_or(StoreError::NotFound)?;
        self.index_mut().remove(&publish_key(post.publish, id));
        self.slug_index
            .remove_if(&(post.publish_date(), post.slug.clone()), |_, owner| *owner == id);
        Ok(post)
    }

    /// Removes every post written by `author_id`, returning how many went.
    pub fn delete_by_author(&self, author_id: Uuid) -> usize {
        let ids: Vec<i64> = self
            .rows
            .iter()
            .filter(|entry| entry.author_id == author_id)
            .map(|entry| *entry.key())
            .collect();
        ids.into_iter()
            .filter(|id| self.delete(*id).is_ok())
            .count()
    }

    /// Editor listing over all statuses, ordered by status then publish
    /// ascending.
    pub fn search(&self, filter: &PostFilter, now: DateTime<Utc>) -> Vec<Post> {
        let mut posts = self.list(|post| filter.matches(post, now));
        posts.sort_by_key(|post| (post.status, post.publish, post.id));
        posts
    }

    fn claim_slug(&self, date: NaiveDate, slug: &str, id: i64) -> Result<(), StoreError> {
        match self.slug_index.entry((date, slug.to_owned())) {
            Entry::Occupied(owner) if *owner.get() != id => Err(StoreError::SlugTaken {
                date,
                slug: slug.to_owned(),
            }),
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(slot) => {
                slot.insert(id);
                Ok(())
            }
        }
    }
}

/// Relative window used by the `created` / `publish` editor filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum DateRange {
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "past_7_days")]
    PastSevenDays,
    #[serde(rename = "this_month")]
    ThisMonth,
    #[serde(rename = "this_year")]
    ThisYear,
}

impl DateRange {
    pub fn contains(self, at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        let day = at.date_naive();
        let today = now.date_naive();
        match self {
            DateRange::Today => day == today,
            DateRange::PastSevenDays => day >= today - Duration::days(7) && day <= today,
            DateRange::ThisMonth => day.year() == today.year() && day.month() == today.month(),
            DateRange::ThisYear => day.year() == today.year(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub status: Option<PostStatus>,
    pub author: Option<Uuid>,
    pub created: Option<DateRange>,
    pub publish: Option<DateRange>,
    pub search: Option<String>,
}

impl PostFilter {
    fn matches(&self, post: &Post, now: DateTime<Utc>) -> bool {
        if self.status.is_some_and(|status| post.status != status) {
            return false;
        }
        if self.author.is_some_and(|author| post.author_id != author) {
            return false;
        }
        if self.created.is_some_and(|range| !range.contains(post.created, now)) {
            return false;
        }
        if self.publish.is_some_and(|range| !range.contains(post.publish, now)) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => {
                let term = term.to_lowercase();
                post.title.to_lowercase().contains(&term) || post.body.to_lowercase().contains(&term)
            }
            _ => true,
        }
    }
}
