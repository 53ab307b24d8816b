use rocket::response::status;
use rocket::State;
use rocket_dyn_templates::Template;
use serde_json::{json, Value};

use super::Page;
use crate::blog::Blog;
use crate::models::post::{Collection, Post};
use crate::models::series::SeriesSummary;

/// Cards shown in each strip on the home page.
const STRIP_LEN: usize = 4;
const EXCERPT_CHARS: usize = 140;

fn excerpt(content: &str) -> String {
    let flat = content.replace('\n', " ");
    if flat.chars().count() <= EXCERPT_CHARS {
        return flat;
    }
    let cut: String = flat.chars().take(EXCERPT_CHARS).collect();
    format!("{}…", cut.trim_end())
}

/// Card view of a post: the post plus its link and excerpt.
fn card(post: &Post) -> Value {
    json!({
        "post": post,
        "href": post.href(),
        "excerpt": excerpt(&post.content),
        "is_series": post.collection == Collection::Series,
    })
}

/// Numbered entry on a series page, linking to the episode itself.
fn episode_entry(post: &Post) -> Value {
    json!({
        "post": post,
        "href": format!("/post/{}", post.id),
        "excerpt": excerpt(&post.content),
    })
}

fn cards(posts: &[Post]) -> Vec<Value> {
    posts.iter().map(card).collect()
}

fn series_cards(series: &[SeriesSummary]) -> Vec<Value> {
    series
        .iter()
        .map(|s| {
            json!({
                "name": s.name,
                "href": s.href,
                "image": s.cover.image,
                "category": s.cover.category,
                "episode_count": s.episode_count,
            })
        })
        .collect()
}

fn not_found(page: &Page, message: &str) -> status::NotFound<Template> {
    status::NotFound(page.render(
        "not_found",
        page.t().page_not_found,
        json!({ "message": message }),
    ))
}

// ── Home ───────────────────────────────────────────────

#[get("/?<q>")]
pub fn home(page: Page, blog: &State<Blog>, q: Option<String>) -> Template {
    let query = q.unwrap_or_default();
    let searched = !query.trim().is_empty();
    let results = if searched { blog.search(&query) } else { Vec::new() };

    let written: Vec<Post> = blog
        .collection(Collection::Written)
        .into_iter()
        .take(STRIP_LEN)
        .collect();
    let series: Vec<SeriesSummary> = blog.series().into_iter().take(STRIP_LEN).collect();

    page.render(
        "home",
        &page.site.site_name,
        json!({
            "collection": Collection::Home,
            "posts": cards(&blog.collection(Collection::Home)),
            "written": cards(&written),
            "series": series_cards(&series),
            "query": query,
            "searched": searched,
            "results": results,
        }),
    )
}

// ── Listings ───────────────────────────────────────────

#[get("/written")]
pub fn written(page: Page, blog: &State<Blog>) -> Template {
    page.render(
        "list",
        page.t().written_blogs,
        json!({
            "collection": Collection::Written,
            "heading": page.t().written_blogs,
            "posts": cards(&blog.collection(Collection::Written)),
            "series": [],
        }),
    )
}

#[get("/series")]
pub fn series_list(page: Page, blog: &State<Blog>) -> Template {
    page.render(
        "list",
        page.t().series_blogs,
        json!({
            "collection": Collection::Series,
            "heading": page.t().series_blogs,
            "posts": [],
            "series": series_cards(&blog.series()),
        }),
    )
}

#[get("/all?<category>")]
pub fn all(page: Page, blog: &State<Blog>, category: Option<String>) -> Template {
    let selected = category.filter(|c| !c.is_empty());
    let (posts, categories) = blog.with_posts(|p| {
        (Post::by_category(p, selected.as_deref()), Post::categories(p))
    });

    page.render(
        "all",
        page.t().all_blogs,
        json!({
            "posts": cards(&posts),
            "categories": categories,
            "selected": selected,
        }),
    )
}

// ── Single pages ───────────────────────────────────────

#[get("/post/<id>")]
pub fn post_page(page: Page, blog: &State<Blog>, id: &str) -> Result<Template, status::NotFound<Template>> {
    let Some(post) = blog.post(id) else {
        return Err(not_found(&page, page.t().post_not_found));
    };

    Ok(page.render(
        "post",
        post.page_title(),
        json!({
            "post": post,
            "paragraphs": post.paragraphs(),
        }),
    ))
}

#[get("/series/<name>")]
pub fn series_detail(page: Page, blog: &State<Blog>, name: &str) -> Result<Template, status::NotFound<Template>> {
    let episodes = blog.episodes(name);
    let Some(first) = episodes.first() else {
        return Err(not_found(&page, page.t().series_not_found));
    };

    Ok(page.render(
        "series",
        name,
        json!({
            "name": name,
            "cover": first.image,
            "episode_count": episodes.len(),
            "episodes": episodes.iter().map(episode_entry).collect::<Vec<_>>(),
        }),
    ))
}

#[get("/contact")]
pub fn contact(page: Page) -> Template {
    page.render("contact", page.t().contact, json!({}))
}

#[get("/about")]
pub fn about(page: Page) -> Template {
    page.render("about", page.t().about, json!({}))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![home, written, series_list, all, post_page, series_detail, contact, about]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_excerpt_is_flattened() {
        assert_eq!(excerpt("one\ntwo"), "one two");
    }

    #[test]
    fn long_excerpt_is_cut_on_chars() {
        let long = "আ".repeat(200);
        let e = excerpt(&long);
        assert_eq!(e.chars().count(), EXCERPT_CHARS + 1);
        assert!(e.ends_with('…'));
    }
}
