use rocket::serde::json::Json;
use rocket::State;
use serde_json::{json, Value};

use crate::blog::Blog;
use crate::models::search::SearchResult;

#[get("/search?<q>")]
pub fn search(blog: &State<Blog>, q: Option<String>) -> Json<Vec<SearchResult>> {
    Json(blog.search(q.as_deref().unwrap_or("")))
}

#[get("/series")]
pub fn series(blog: &State<Blog>) -> Json<Value> {
    let list: Vec<Value> = blog
        .series()
        .into_iter()
        .map(|s| {
            json!({
                "name": s.name,
                "href": s.href,
                "episodeCount": s.episode_count,
                "id": s.cover.id,
            })
        })
        .collect();
    Json(json!(list))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![search, series]
}
