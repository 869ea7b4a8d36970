use std::cmp::Ordering;

use crate::registry::metadata::{AnimationMetadata, Category, Difficulty};

/// Metadata filter. Fields combine with AND; `tags` match if any listed tag is present.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Required category.
    pub category: Option<Category>,
    /// Required difficulty.
    pub difficulty: Option<Difficulty>,
    /// Accept entries carrying at least one of these tags. Empty accepts everything.
    pub tags: Vec<String>,
    /// Case-insensitive free-text match against name, description and tags.
    pub search: Option<String>,
}

impl FilterCriteria {
    /// Return `true` when `meta` passes every set criterion.
    pub fn matches(&self, meta: &AnimationMetadata) -> bool {
        if self.category.is_some_and(|c| c != meta.category) {
            return false;
        }
        if self.difficulty.is_some_and(|d| d != meta.difficulty) {
            return false;
        }
        if !self.tags.is_empty() && !self.tags.iter().any(|t| meta.has_tag(t)) {
            return false;
        }
        match self.search.as_deref().map(str::trim) {
            Some(q) if !q.is_empty() => meta.matches_lowercase(&q.to_lowercase()),
            _ => true,
        }
    }
}

/// Sort key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortBy {
    /// Display name, case-insensitive.
    #[default]
    Name,
    /// Category identifier.
    Category,
    /// Ordinal difficulty.
    Difficulty,
    /// Creation date.
    CreatedAt,
    /// Last update date.
    UpdatedAt,
}

/// Sort direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

/// Sort key and direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SortOptions {
    /// Sort key.
    pub by: SortBy,
    /// Sort direction.
    pub order: SortOrder,
}

impl SortOptions {
    /// Options for `by` in `order`.
    pub fn new(by: SortBy, order: SortOrder) -> Self {
        Self { by, order }
    }
}

/// Stable sort of `list`.
///
/// Date keys only reorder entries that carry the date; entries without it stay in their slots.
pub fn sort_metadata(list: &mut [AnimationMetadata], opts: SortOptions) {
    let directed = |o: Ordering| match opts.order {
        SortOrder::Asc => o,
        SortOrder::Desc => o.reverse(),
    };
    match opts.by {
        SortBy::Name => list.sort_by(|a, b| {
            directed(a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        }),
        SortBy::Category => {
            list.sort_by(|a, b| directed(a.category.as_str().cmp(b.category.as_str())))
        }
        SortBy::Difficulty => list.sort_by(|a, b| directed(a.difficulty.cmp(&b.difficulty))),
        SortBy::CreatedAt => sort_dated(list, |m| m.created_at.as_deref(), directed),
        SortBy::UpdatedAt => sort_dated(list, |m| m.updated_at.as_deref(), directed),
    }
}

fn sort_dated(
    list: &mut [AnimationMetadata],
    key: impl Fn(&AnimationMetadata) -> Option<&str>,
    directed: impl Fn(Ordering) -> Ordering,
) {
    let slots: Vec<usize> = (0..list.len()).filter(|&i| key(&list[i]).is_some()).collect();
    if slots.len() < 2 {
        return;
    }
    let mut dated: Vec<AnimationMetadata> = slots.iter().map(|&i| list[i].clone()).collect();
    // ISO-8601 strings in one format order lexicographically.
    dated.sort_by(|a, b| directed(key(a).cmp(&key(b))));
    for (slot, meta) in slots.into_iter().zip(dated) {
        list[slot] = meta;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/registry/query.rs"]
mod tests;
