#[macro_use]
extern crate rocket;

use std::sync::Arc;

use rocket::fairing::{Fairing, Info, Kind};
use rocket::fs::FileServer;
use rocket::http::Header;
use rocket::response::content::RawHtml;
use rocket::{Build, Rocket};
use rocket_dyn_templates::Template;

mod auth;
mod blog;
mod boot;
mod config;
mod db;
mod i18n;
mod images;
mod models;
mod routes;
mod store;


use blog::Blog;
use config::{BlogConfig, StorageBackend};
use store::memory::MemoryStore;
use store::sqlite::SqliteStore;
use store::Store;

pub struct NoCacheAdmin;

#[rocket::async_trait]
impl Fairing for NoCacheAdmin {
    fn info(&self) -> Info {
        Info { name: "No-Cache Admin Responses", kind: Kind::Response }
    }

    async fn on_response<'r>(&self, req: &'r rocket::Request<'_>, res: &mut rocket::Response<'r>) {
        if req.uri().path().starts_with("/admin") {
            res.set_header(Header::new("Cache-Control", "no-store, no-cache, must-revalidate, max-age=0"));
            res.set_header(Header::new("Pragma", "no-cache"));
        }
    }
}

#[catch(401)]
fn unauthorized() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>401</h1><p>Unlock the editor first.</p><a href='/'>← Home</a></body></html>".to_string())
}

#[catch(404)]
fn not_found() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>404</h1><p>Page not found.</p><a href='/'>← Home</a></body></html>".to_string())
}

#[catch(500)]
fn server_error() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>500</h1><p>Internal server error.</p><a href='/'>← Home</a></body></html>".to_string())
}

/// Assemble the server around an opened blog.
pub fn build(blog: Blog, config: BlogConfig) -> Rocket<Build> {
    rocket::build()
        .manage(blog)
        .manage(config)
        .attach(Template::fairing())
        .attach(NoCacheAdmin)
        .mount("/static", FileServer::from("website/static"))
        .mount("/", routes::public::routes())
        .mount("/prefs", routes::prefs::routes())
        .mount("/admin", routes::admin::routes())
        .mount("/api", routes::api::routes())
        .register("/", catchers![unauthorized, not_found, server_error])
}

#[launch]
fn rocket() -> _ {
    env_logger::init();

    let config = BlogConfig::load();

    // Boot check — verify/create directories, validate critical files
    boot::run(&config);

    let store: Arc<dyn Store> = match config.storage {
        StorageBackend::Sqlite => {
            Arc::new(SqliteStore::new_at(&config.db_path).expect("Failed to initialize database pool"))
        }
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
    };
    store.run_migrations().expect("Failed to run storage migrations");

    let blog = Blog::open(store, &config).expect("Failed to open blog");
    log::info!("Serving \"{}\" from {} storage", config.site_name, blog.backend());

    build(blog, config)
}
