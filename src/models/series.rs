use serde::Serialize;

use super::post::{Collection, Post};

/// One series as shown on listing pages.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesSummary {
    pub name: String,
    pub href: String,
    /// First post found for the series; supplies the cover image.
    pub cover: Post,
    pub episode_count: usize,
}

/// Distinct series among series-collection posts, in first-seen order
/// (newest series first, since the list is newest first).
pub fn summaries(posts: &[Post]) -> Vec<SeriesSummary> {
    let mut out: Vec<SeriesSummary> = Vec::new();
    for p in posts.iter().filter(|p| p.collection == Collection::Series) {
        let Some(name) = p.series_name.as_deref() else {
            continue;
        };
        match out.iter_mut().find(|s| s.name == name) {
            Some(summary) => summary.episode_count += 1,
            None => out.push(SeriesSummary {
                name: name.to_string(),
                href: p.href(),
                cover: p.clone(),
                episode_count: 1,
            }),
        }
    }
    out
}

/// Episodes of `name`, ascending by episode number. Posts without a number
/// count as 0 and therefore come first.
pub fn episodes(posts: &[Post], name: &str) -> Vec<Post> {
    let mut eps: Vec<Post> = posts
        .iter()
        .filter(|p| p.series_name.as_deref() == Some(name))
        .cloned()
        .collect();
    eps.sort_by_key(|p| p.episode_number.unwrap_or(0));
    eps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::post::tests::{episode, post};

    #[test]
    fn summaries_pick_first_found() {
        let posts = vec![
            episode("5", "Trip", Some(2)),
            post("4", "plain", Collection::Home),
            episode("3", "Cooking", Some(1)),
            episode("2", "Trip", Some(1)),
        ];
        let s = summaries(&posts);
        assert_eq!(s.len(), 2);
        assert_eq!(s[0].name, "Trip");
        assert_eq!(s[0].cover.id, "5");
        assert_eq!(s[0].episode_count, 2);
        assert_eq!(s[1].name, "Cooking");
        assert_eq!(s[1].href, "/series/Cooking");
    }

    #[test]
    fn summaries_ignore_non_series_collections() {
        let mut stray = post("1", "x", Collection::Written);
        stray.series_name = Some("Ghost".into());
        assert!(summaries(&[stray]).is_empty());
    }

    #[test]
    fn episodes_sorted_ascending() {
        let posts = vec![
            episode("3", "Trip", Some(3)),
            episode("1", "Trip", Some(1)),
            episode("9", "Other", Some(1)),
            episode("2", "Trip", Some(2)),
        ];
        let eps = episodes(&posts, "Trip");
        let numbers: Vec<u32> = eps.iter().filter_map(|p| p.episode_number).collect();
        assert_eq!(numbers, [1, 2, 3]);
    }

    #[test]
    fn unnumbered_episodes_sort_first() {
        let posts = vec![episode("2", "Trip", Some(1)), episode("1", "Trip", None)];
        let eps = episodes(&posts, "Trip");
        assert_eq!(eps[0].id, "1");
        assert_eq!(eps[1].id, "2");
    }

    #[test]
    fn unknown_series_is_empty() {
        let posts = vec![episode("1", "Trip", Some(1))];
        assert!(episodes(&posts, "Nope").is_empty());
    }
}
