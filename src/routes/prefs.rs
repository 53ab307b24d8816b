use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use log::warn;
use rocket::form::Form;
use rocket::http::{Cookie, CookieJar, SameSite};
use rocket::response::Redirect;
use rocket::State;

use super::{safe_next, NextForm};
use crate::blog::Blog;
use crate::i18n::Language;
use crate::models::settings::{Settings, FONT_SIZE_STEP};

const PREFS_COOKIE: &str = "kolom_prefs";

pub fn encode(settings: &Settings) -> Option<String> {
    serde_json::to_vec(settings).ok().map(|raw| URL_SAFE_NO_PAD.encode(raw))
}

/// Settings from a cookie value. The cookie is visitor-controlled, so
/// the result is always sanitized.
pub fn decode(value: &str) -> Option<Settings> {
    let raw = URL_SAFE_NO_PAD.decode(value).ok()?;
    serde_json::from_slice::<Settings>(&raw).ok().map(Settings::sanitized)
}

/// Visitor preferences, or the site defaults when the cookie is missing or unreadable.
pub fn read(cookies: &CookieJar<'_>, blog: &Blog) -> Settings {
    cookies
        .get(PREFS_COOKIE)
        .and_then(|c| decode(c.value()))
        .unwrap_or_else(|| blog.default_settings())
}

pub fn write(cookies: &CookieJar<'_>, settings: &Settings) {
    let Some(value) = encode(settings) else {
        warn!("Could not encode reader preferences");
        return;
    };
    let mut cookie = Cookie::new(PREFS_COOKIE, value);
    cookie.set_path("/");
    cookie.set_same_site(SameSite::Lax);
    cookie.set_max_age(rocket::time::Duration::days(365));
    cookies.add(cookie);
}

fn update(cookies: &CookieJar<'_>, blog: &Blog, change: impl FnOnce(&mut Settings)) {
    let mut settings = read(cookies, blog);
    change(&mut settings);
    write(cookies, &settings);
}

#[derive(Debug, FromForm)]
pub struct LanguageForm {
    pub language: Language,
    pub next: Option<String>,
}

#[derive(Debug, FromForm)]
pub struct FontForm {
    pub font: String,
    pub next: Option<String>,
}

#[derive(Debug, FromForm)]
pub struct FontSizeForm {
    pub delta: f64,
    pub next: Option<String>,
}

#[post("/theme", data = "<form>")]
pub fn theme(cookies: &CookieJar<'_>, blog: &State<Blog>, form: Form<NextForm>) -> Redirect {
    update(cookies, blog, Settings::toggle_theme);
    Redirect::to(safe_next(form.next.as_deref(), "/"))
}

#[post("/language", data = "<form>")]
pub fn language(cookies: &CookieJar<'_>, blog: &State<Blog>, form: Form<LanguageForm>) -> Redirect {
    update(cookies, blog, |s| s.language = form.language);
    Redirect::to(safe_next(form.next.as_deref(), "/"))
}

#[post("/font", data = "<form>")]
pub fn font(cookies: &CookieJar<'_>, blog: &State<Blog>, form: Form<FontForm>) -> Redirect {
    update(cookies, blog, |s| {
        if !s.set_font(&form.font) {
            warn!("Ignoring unknown font {:?}", form.font);
        }
    });
    Redirect::to(safe_next(form.next.as_deref(), "/"))
}

/// Only whole steps are honoured; the sign of `delta` picks the direction.
#[post("/font-size", data = "<form>")]
pub fn font_size(cookies: &CookieJar<'_>, blog: &State<Blog>, form: Form<FontSizeForm>) -> Redirect {
    let step = if form.delta < 0.0 { -FONT_SIZE_STEP } else { FONT_SIZE_STEP };
    update(cookies, blog, |s| s.adjust_font_size(step));
    Redirect::to(safe_next(form.next.as_deref(), "/"))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![theme, language, font, font_size]
}
