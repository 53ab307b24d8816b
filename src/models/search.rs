use serde::Serialize;

use super::post::Post;

/// Most results a search ever returns.
pub const SEARCH_LIMIT: usize = 5;

#[derive(Debug, Serialize, Clone)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    pub category: String,
    pub image: String,
    pub href: String,
}

impl From<&Post> for SearchResult {
    fn from(p: &Post) -> Self {
        SearchResult {
            id: p.id.clone(),
            title: p.title.clone(),
            category: p.category.clone(),
            image: p.image.clone(),
            href: p.href(),
        }
    }
}

/// Case-insensitive substring match on title or category, in list order,
/// capped at `SEARCH_LIMIT`. A blank query matches nothing.
pub fn search(posts: &[Post], query: &str) -> Vec<SearchResult> {
    if query.trim().is_empty() {
        return vec![];
    }
    let needle = query.to_lowercase();
    posts
        .iter()
        .filter(|p| {
            p.title.to_lowercase().contains(&needle) || p.category.to_lowercase().contains(&needle)
        })
        .take(SEARCH_LIMIT)
        .map(SearchResult::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::post::tests::{episode, post};
    use crate::models::post::Collection;

    #[test]
    fn caps_at_five() {
        let posts: Vec<Post> = (0..6)
            .map(|i| post(&i.to_string(), &format!("Rust note {}", i), Collection::Home))
            .collect();
        let results = search(&posts, "rust");
        assert_eq!(results.len(), 5);
        assert_eq!(results[0].id, "0");
    }

    #[test]
    fn matches_title_or_category_ignoring_case() {
        let mut a = post("1", "Morning Walk", Collection::Home);
        a.category = "Life".into();
        let mut b = post("2", "Evening", Collection::Written);
        b.category = "WALKING".into();
        let c = post("3", "Unrelated", Collection::Home);
        let posts = vec![a, b, c];

        let ids: Vec<String> = search(&posts, "walk").into_iter().map(|r| r.id).collect();
        assert_eq!(ids, ["1", "2"]);
    }

    #[test]
    fn blank_query_returns_nothing() {
        let posts = vec![post("1", "Anything", Collection::Home)];
        assert!(search(&posts, "").is_empty());
        assert!(search(&posts, "   ").is_empty());
    }

    #[test]
    fn bengali_text_matches() {
        let posts = vec![post("1", "আমার গ্রাম", Collection::Home)];
        assert_eq!(search(&posts, "গ্রাম").len(), 1);
    }

    #[test]
    fn series_results_link_to_series() {
        let posts = vec![episode("1", "Trip", Some(1))];
        let r = search(&posts, "trip");
        assert_eq!(r[0].href, "/series/Trip");
    }
}
