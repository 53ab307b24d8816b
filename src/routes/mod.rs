use chrono::Datelike;
use rocket::http::Status;
use rocket::request::{FlashMessage, FromRequest, Outcome, Request};
use rocket_dyn_templates::Template;
use serde_json::{json, Value};

use crate::auth::{gate_state, GateState};
use crate::blog::Blog;
use crate::config::BlogConfig;
use crate::i18n::Strings;
use crate::models::settings::Settings;

pub mod admin;
pub mod api;
pub mod prefs;
pub mod public;

/// Everything a rendered page needs about the current visitor.
pub struct Page {
    pub prefs: Settings,
    pub gate: GateState,
    pub flash: Option<(String, String)>,
    pub path: String,
    pub site: BlogConfig,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Page {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let (Some(blog), Some(site)) = (
            request.rocket().state::<Blog>(),
            request.rocket().state::<BlogConfig>(),
        ) else {
            return Outcome::Error((Status::InternalServerError, ()));
        };

        let flash = request
            .guard::<FlashMessage<'_>>()
            .await
            .succeeded()
            .map(|f| (f.kind().to_string(), f.message().to_string()));

        Outcome::Success(Page {
            prefs: prefs::read(request.cookies(), blog),
            gate: gate_state(request.cookies()),
            flash,
            path: request.uri().path().to_string(),
            site: site.clone(),
        })
    }
}

impl Page {
    pub fn t(&self) -> &'static Strings {
        self.prefs.language.strings()
    }

    pub fn unlocked(&self) -> bool {
        self.gate.is_unlocked()
    }

    fn base_context(&self, title: &str) -> Value {
        json!({
            "t": self.t(),
            "lang": self.prefs.language.code(),
            "theme": self.prefs.theme,
            "prefs": self.prefs,
            "active_font": self.prefs.active_font(),
            "fonts": Settings::fonts_for(self.prefs.language),
            "font_size_label": self.prefs.font_size_label(),
            "gate": self.gate,
            "unlocked": self.unlocked(),
            "site": self.site,
            "flash": self.flash.as_ref().map(|(kind, message)| json!({ "kind": kind, "message": message })),
            "path": self.path,
            "year": chrono::Local::now().year(),
            "page_title": title,
        })
    }

    /// Render `name` with the shared context plus the page's own keys.
    pub fn render(&self, name: &'static str, title: &str, extra: Value) -> Template {
        let mut context = self.base_context(title);
        if let (Value::Object(base), Value::Object(extra)) = (&mut context, extra) {
            base.extend(extra);
        }
        Template::render(name, context)
    }
}

/// Form carrying only the page to return to.
#[derive(Debug, FromForm)]
pub struct NextForm {
    pub next: Option<String>,
}

/// Redirect target from a submitted `next`: local absolute paths only.
pub fn safe_next(next: Option<&str>, fallback: &str) -> String {
    match next {
        Some(n) if n.starts_with('/') && !n.starts_with("//") && !n.contains('\\') => n.to_string(),
        _ => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_accepts_local_paths_only() {
        assert_eq!(safe_next(Some("/written"), "/"), "/written");
        assert_eq!(safe_next(Some("/series/Trip%20One"), "/"), "/series/Trip%20One");
        assert_eq!(safe_next(Some("//evil.example"), "/"), "/");
        assert_eq!(safe_next(Some("https://evil.example"), "/all"), "/all");
        assert_eq!(safe_next(Some("/\\evil"), "/"), "/");
        assert_eq!(safe_next(None, "/about"), "/about");
    }
}
