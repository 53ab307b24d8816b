use log::{error, info, warn};
use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::http::{CookieJar, Status};
use rocket::response::{Flash, Redirect};
use rocket::serde::json::Json;
use rocket::tokio::io::AsyncReadExt;
use rocket::State;

use super::{safe_next, NextForm, Page};
use crate::auth::{set_gate_state, AdminSession, GateState, PasswordCheck};
use crate::blog::{parse_backup, Backup, Blog, BlogError};
use crate::i18n::Strings;
use crate::images;
use crate::models::post::{Collection, PostDraft, PostKind};

#[derive(Debug, FromForm)]
pub struct PasswordForm {
    pub password: String,
    pub next: Option<String>,
}

#[derive(FromForm)]
pub struct PostFormData<'f> {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub seo_title: Option<String>,
    pub author: Option<String>,
    #[field(name = "type")]
    pub kind: Option<PostKind>,
    pub series_name: Option<String>,
    pub image: Option<TempFile<'f>>,
    pub next: Option<String>,
}

#[derive(FromForm)]
pub struct ImportForm<'f> {
    pub file: TempFile<'f>,
}

/// Whole upload in memory with its declared content type.
async fn read_upload(file: &TempFile<'_>) -> Option<(Vec<u8>, Option<String>)> {
    if file.len() == 0 {
        return None;
    }
    let reader = match file.open().await {
        Ok(r) => r,
        Err(e) => {
            error!("Failed to open upload: {}", e);
            return None;
        }
    };
    rocket::tokio::pin!(reader);
    let mut bytes = Vec::new();
    if let Err(e) = reader.read_to_end(&mut bytes).await {
        error!("Failed to read upload: {}", e);
        return None;
    }
    Some((bytes, file.content_type().map(|ct| ct.to_string())))
}

fn error_message(t: &Strings, e: &BlogError) -> &'static str {
    match e {
        BlogError::MissingFields => t.fill_required,
        BlogError::MissingSeriesName => t.series_name_required,
        BlogError::NotFound => t.post_not_found,
        BlogError::BlankPassword => t.fill_required,
        BlogError::Storage(_) => t.save_failed,
    }
}

// ── Gate ───────────────────────────────────────────────

#[post("/unlock", data = "<form>")]
pub fn unlock(
    page: Page,
    blog: &State<Blog>,
    cookies: &CookieJar<'_>,
    form: Form<PasswordForm>,
) -> Result<Redirect, Flash<Redirect>> {
    let back = safe_next(form.next.as_deref(), "/");
    let check = blog.check_password(&form.password);
    let next = page.gate.after_check(check);
    set_gate_state(cookies, next);

    match check {
        PasswordCheck::Matches => {
            info!("Admin gate unlocked");
            Ok(Redirect::to(back))
        }
        PasswordCheck::Recovery => {
            info!("Recovery phrase accepted, awaiting new password");
            Ok(Redirect::to(back))
        }
        PasswordCheck::Wrong => {
            warn!("Rejected admin password attempt");
            Err(Flash::error(Redirect::to(back), page.t().incorrect_password))
        }
    }
}

#[post("/password", data = "<form>")]
pub fn change_password(
    page: Page,
    blog: &State<Blog>,
    cookies: &CookieJar<'_>,
    form: Form<PasswordForm>,
) -> Result<Flash<Redirect>, Status> {
    if page.gate != GateState::ChangingPassword {
        return Err(Status::Unauthorized);
    }
    let back = Redirect::to(safe_next(form.next.as_deref(), "/"));

    match blog.change_password(&form.password) {
        Ok(()) => {
            set_gate_state(cookies, page.gate.after_password_change());
            Ok(Flash::success(back, page.t().password_changed))
        }
        Err(e) => {
            if let BlogError::Storage(ref msg) = e {
                error!("Password change failed: {}", msg);
            }
            Ok(Flash::error(back, error_message(page.t(), &e)))
        }
    }
}

#[post("/lock", data = "<form>")]
pub fn lock(cookies: &CookieJar<'_>, form: Form<NextForm>) -> Redirect {
    set_gate_state(cookies, GateState::Locked);
    Redirect::to(safe_next(form.next.as_deref(), "/"))
}

// ── Posts ──────────────────────────────────────────────

#[post("/posts/<collection>", data = "<form>")]
pub async fn create_post(
    _admin: AdminSession,
    page: Page,
    blog: &State<Blog>,
    collection: Collection,
    form: Form<PostFormData<'_>>,
) -> Flash<Redirect> {
    let back = Redirect::to(safe_next(form.next.as_deref(), collection.page()));

    let image = match form.image.as_ref() {
        Some(file) => read_upload(file)
            .await
            .map(|(bytes, declared)| images::to_data_uri(&bytes, declared.as_deref()))
            .unwrap_or_default(),
        None => String::new(),
    };

    let draft = PostDraft {
        title: form.title.clone().unwrap_or_default(),
        content: form.content.clone().unwrap_or_default(),
        category: form.category.clone().unwrap_or_default(),
        seo_title: form.seo_title.clone().unwrap_or_default(),
        image,
        kind: form.kind,
        author: form.author.clone().unwrap_or_default(),
        series_name: form.series_name.clone().unwrap_or_default(),
    };

    match blog.publish(collection, draft, page.prefs.language) {
        Ok(_) => Flash::success(back, page.t().post_published),
        Err(e) => {
            if let BlogError::Storage(ref msg) = e {
                error!("Publishing failed: {}", msg);
            }
            Flash::error(back, error_message(page.t(), &e))
        }
    }
}

#[post("/posts/<id>/delete", data = "<form>")]
pub fn delete_post(
    _admin: AdminSession,
    page: Page,
    blog: &State<Blog>,
    id: &str,
    form: Form<NextForm>,
) -> Flash<Redirect> {
    let back = Redirect::to(safe_next(form.next.as_deref(), "/"));
    match blog.delete_post(id) {
        Ok(_) => Flash::success(back, page.t().post_deleted),
        Err(e) => {
            if let BlogError::Storage(ref msg) = e {
                error!("Delete of {} failed: {}", id, msg);
            }
            Flash::error(back, error_message(page.t(), &e))
        }
    }
}

// ── Settings & backups ─────────────────────────────────

#[post("/settings/default", data = "<form>")]
pub fn save_defaults(
    _admin: AdminSession,
    page: Page,
    blog: &State<Blog>,
    form: Form<NextForm>,
) -> Flash<Redirect> {
    let back = Redirect::to(safe_next(form.next.as_deref(), "/"));
    match blog.save_default_settings(&page.prefs) {
        Ok(()) => {
            info!("Site default settings updated");
            Flash::success(back, page.t().defaults_saved)
        }
        Err(e) => {
            error!("Saving default settings failed: {}", e);
            Flash::error(back, page.t().save_failed)
        }
    }
}

#[get("/export")]
pub fn export(_admin: AdminSession, blog: &State<Blog>) -> Json<Backup> {
    Json(blog.export())
}

#[post("/import", data = "<form>")]
pub async fn import(
    _admin: AdminSession,
    page: Page,
    blog: &State<Blog>,
    form: Form<ImportForm<'_>>,
) -> Flash<Redirect> {
    let back = Redirect::to("/all");
    let t = page.t();

    let Some((bytes, _)) = read_upload(&form.file).await else {
        return Flash::error(back, t.import_failed);
    };
    let backup = match String::from_utf8(bytes).map_err(|e| e.to_string()).and_then(|raw| parse_backup(&raw)) {
        Ok(b) => b,
        Err(e) => {
            warn!("Rejected backup file: {}", e);
            return Flash::error(back, t.import_failed);
        }
    };

    match blog.import(backup) {
        Ok(_) => Flash::success(back, t.imported),
        Err(e) => {
            error!("Import failed: {}", e);
            Flash::error(back, t.import_failed)
        }
    }
}

pub fn routes() -> Vec<rocket::Route> {
    routes![unlock, change_password, lock, create_post, delete_post, save_defaults, export, import]
}
