use std::fmt;
use std::str::FromStr;

use rocket::request::FromParam;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, FromFormField)]
#[serde(rename_all = "lowercase")]
pub enum PostKind {
    #[field(value = "featured")]
    Featured,
    #[field(value = "postcard")]
    Postcard,
}

/// Which listing a post belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Home,
    Written,
    Series,
}

impl Collection {
    pub fn as_str(self) -> &'static str {
        match self {
            Collection::Home => "home",
            Collection::Written => "written",
            Collection::Series => "series",
        }
    }

    /// Page the collection's editor lives on.
    pub fn page(self) -> &'static str {
        match self {
            Collection::Home => "/",
            Collection::Written => "/written",
            Collection::Series => "/series",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "home" => Ok(Collection::Home),
            "written" => Ok(Collection::Written),
            "series" => Ok(Collection::Series),
            other => Err(format!("unknown collection: {}", other)),
        }
    }
}

impl<'a> FromParam<'a> for Collection {
    type Error = &'a str;

    fn from_param(param: &'a str) -> Result<Self, Self::Error> {
        param.parse().map_err(|_| param)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category: String,
    #[serde(default)]
    pub seo_title: String,
    /// Inline `data:` URI.
    pub image: String,
    pub date: String,
    pub author: String,
    #[serde(rename = "type")]
    pub kind: PostKind,
    pub collection: Collection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_number: Option<u32>,
}

/// What the editor submits; the blog fills in id, date and episode.
#[derive(Debug, Clone, Default)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub category: String,
    pub seo_title: String,
    pub image: String,
    pub kind: Option<PostKind>,
    pub author: String,
    pub series_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    MissingFields,
    MissingSeriesName,
}

impl PostDraft {
    pub fn validate(&self, collection: Collection) -> Result<(), DraftError> {
        if self.title.is_empty() || self.content.is_empty() || self.image.is_empty() {
            return Err(DraftError::MissingFields);
        }
        if collection == Collection::Series && self.series_name.trim().is_empty() {
            return Err(DraftError::MissingSeriesName);
        }
        Ok(())
    }
}

impl Post {
    /// Document title: the SEO title when one was given.
    pub fn page_title(&self) -> &str {
        if self.seo_title.trim().is_empty() {
            &self.title
        } else {
            &self.seo_title
        }
    }

    /// Body split on newlines, one entry per rendered paragraph.
    pub fn paragraphs(&self) -> Vec<&str> {
        self.content.split('\n').collect()
    }

    /// Link target for cards and search results.
    pub fn href(&self) -> String {
        match (&self.collection, &self.series_name) {
            (Collection::Series, Some(name)) => format!("/series/{}", encode_segment(name)),
            _ => format!("/post/{}", self.id),
        }
    }

    pub fn find<'a>(posts: &'a [Post], id: &str) -> Option<&'a Post> {
        posts.iter().find(|p| p.id == id)
    }

    pub fn by_collection(posts: &[Post], collection: Collection) -> Vec<Post> {
        posts
            .iter()
            .filter(|p| p.collection == collection)
            .cloned()
            .collect()
    }

    /// `None` means every category.
    pub fn by_category(posts: &[Post], category: Option<&str>) -> Vec<Post> {
        posts
            .iter()
            .filter(|p| category.map_or(true, |c| p.category == c))
            .cloned()
            .collect()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(posts: &[Post]) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for p in posts {
            if !out.contains(&p.category) {
                out.push(p.category.clone());
            }
        }
        out
    }

    /// Episode number for the next post of `series`: existing count + 1.
    /// Deleted episodes are not reclaimed, so gaps stay.
    pub fn next_episode_number(posts: &[Post], series: &str) -> u32 {
        let existing = posts
            .iter()
            .filter(|p| p.series_name.as_deref() == Some(series))
            .count();
        existing as u32 + 1
    }
}

/// Percent-encode a path segment (series names may contain spaces, `/`, or Bengali text).
pub fn encode_segment(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => out.push(b as char),
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}
