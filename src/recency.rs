use crate::post::Post;
use chrono::NaiveDate;

/// A post kept by the recency filter, carrying its adjusted day offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentPost {
    pub title: String,
    pub offset: i64,
}

/// Signed days between `date` and the reference date; negative is past.
pub fn day_offset(date: NaiveDate, reference: NaiveDate) -> i64 {
    (date - reference).num_days()
}

/// Keep posts whose raw offset is strictly newer than `cutoff`, shift each
/// kept offset by +1, and sort ascending by offset. The shift is the
/// published chart's inclusive-today convention: a same-day post lands at
/// offset 1. The sort is stable, so posts sharing a date keep their listing
/// order.
pub fn filter_recent(posts: &[Post], reference: NaiveDate, cutoff: i64) -> Vec<RecentPost> {
    let mut recent: Vec<RecentPost> = posts
        .iter()
        .filter_map(|post| {
            let raw = day_offset(post.date, reference);
            (raw > cutoff).then(|| RecentPost {
                title: post.title.clone(),
                offset: raw + 1,
            })
        })
        .collect();
    recent.sort_by_key(|post| post.offset);
    recent
}
