use log::{error, info, warn};
use std::fs;
use std::path::Path;
use std::process;

use crate::config::{BlogConfig, StorageBackend};

/// Required directories that will be created if missing
const REQUIRED_DIRS: &[&str] = &[
    "website",
    "website/db",
    "website/static",
    "website/static/css",
    "website/templates",
];

/// Critical template files — no page renders without these
const CRITICAL_TEMPLATES: &[&str] = &[
    "website/templates/base.html.tera",
    "website/templates/macros.html.tera",
    "website/templates/home.html.tera",
    "website/templates/list.html.tera",
    "website/templates/all.html.tera",
    "website/templates/post.html.tera",
    "website/templates/series.html.tera",
    "website/templates/not_found.html.tera",
];

/// Pages that can be missing at the cost of a 500 on that page only
const OPTIONAL_TEMPLATES: &[&str] = &[
    "website/templates/contact.html.tera",
    "website/templates/about.html.tera",
];

const CRITICAL_STATIC: &[&str] = &["website/static/css/blog.css"];

/// Run all boot checks. Call this before Rocket launches.
/// Creates missing directories, warns about missing files, and
/// aborts if critical dependencies are absent.
pub fn run(config: &BlogConfig) {
    info!("Boot check starting for \"{}\"...", config.site_name);

    let mut warnings = 0u32;
    let mut errors = 0u32;

    // ── 1. Directories ─────────────────────────────────
    for dir in REQUIRED_DIRS {
        let path = Path::new(dir);
        if !path.exists() {
            match fs::create_dir_all(path) {
                Ok(_) => info!("  Created directory: {}", dir),
                Err(e) => {
                    error!("  FAILED to create directory {}: {}", dir, e);
                    errors += 1;
                }
            }
        }
    }

    // ── 2. Templates ───────────────────────────────────
    for file in CRITICAL_TEMPLATES {
        if !Path::new(file).exists() {
            error!("  MISSING critical template: {}", file);
            errors += 1;
        }
    }
    for file in OPTIONAL_TEMPLATES {
        if !Path::new(file).exists() {
            warn!("  Missing template: {}", file);
            warnings += 1;
        }
    }

    // ── 3. Static assets ───────────────────────────────
    for file in CRITICAL_STATIC {
        if !Path::new(file).exists() {
            warn!("  Missing static asset: {} (pages will be unstyled)", file);
            warnings += 1;
        }
    }

    // ── 4. Database directory writable ──────────────────
    if config.storage == StorageBackend::Sqlite {
        let db_dir = Path::new(&config.db_path)
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        if let Err(e) = fs::create_dir_all(db_dir) {
            error!("  Cannot create database directory {}: {}", db_dir.display(), e);
            errors += 1;
        } else {
            let test_file = db_dir.join(".write_test");
            match fs::write(&test_file, "test") {
                Ok(_) => {
                    let _ = fs::remove_file(&test_file);
                }
                Err(e) => {
                    error!("  Database directory not writable: {}", e);
                    errors += 1;
                }
            }
        }
    } else {
        warn!("  Memory storage selected: posts are lost on restart");
        warnings += 1;
    }

    // ── 5. Rocket.toml exists ───────────────────────────
    if !Path::new("Rocket.toml").exists() {
        warn!("  Rocket.toml not found — using default config");
        warnings += 1;
    }

    // ── Summary ─────────────────────────────────────────
    if errors > 0 {
        error!(
            "Boot check FAILED: {} error(s), {} warning(s). Aborting.",
            errors, warnings
        );
        process::exit(1);
    }

    if warnings > 0 {
        warn!(
            "Boot check passed with {} warning(s). Some features may not work correctly.",
            warnings
        );
    } else {
        info!("Boot check passed. All systems go.");
    }
}
