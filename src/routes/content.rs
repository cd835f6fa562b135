//! Content endpoints
//!
//! - `GET /api/content/catalog` - category -> article index with links
//! - `GET /api/content/{category}/{filename}` - raw article text
//!
//! Filenames arrive percent-encoded (they are relative paths within a
//! category). Decoded paths are normalized lexically and rejected when
//! they would escape the category root.

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use crate::catalog::{build_catalog, CATEGORIES};
use crate::routes::{error_response, failure_response, json_ok};
use crate::server::AppState;
use crate::types::WoodshedError;

/// Article text response body
#[derive(Serialize)]
struct ArticleView {
    content: String,
}

/// Handle GET /api/content/catalog
///
/// The catalog is rebuilt from the content tree on every request.
pub fn handle_catalog(state: Arc<AppState>) -> Response<Full<Bytes>> {
    match build_catalog(&state.args.content_root) {
        Ok(catalog) => json_ok(&catalog),
        Err(e) => failure_response(&e),
    }
}

/// Handle GET /api/content/{category}/{filename}
pub fn handle_article(state: Arc<AppState>, path: &str) -> Response<Full<Bytes>> {
    let (category, encoded_filename) = match parse_article_path(path) {
        Some(parts) => parts,
        None => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Expected /api/content/{category}/{filename}",
            );
        }
    };

    if !CATEGORIES.iter().any(|(name, _)| *name == category) {
        return error_response(StatusCode::NOT_FOUND, "Unknown category");
    }

    let filename = match urlencoding::decode(encoded_filename) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => return error_response(StatusCode::BAD_REQUEST, "Invalid filename encoding"),
    };

    let category_dir = state.args.content_root.join(category);
    let file_path = match resolve_article_path(&category_dir, &filename) {
        Some(path) => path,
        None => return error_response(StatusCode::BAD_REQUEST, "Invalid path"),
    };

    if !file_path.is_file() {
        return error_response(StatusCode::NOT_FOUND, "Article not found");
    }

    match fs::read_to_string(&file_path) {
        Ok(content) => json_ok(&ArticleView { content }),
        Err(e) => failure_response(&WoodshedError::Io(e)),
    }
}

/// Split `/api/content/{category}/{filename}` into its two parts
fn parse_article_path(path: &str) -> Option<(&str, &str)> {
    let stripped = path.strip_prefix("/api/content/")?;
    let (category, filename) = stripped.split_once('/')?;
    if category.is_empty() || filename.is_empty() {
        return None;
    }
    Some((category, filename))
}

/// Join `filename` onto the category root, rejecting escapes
///
/// Normalization is lexical: `.` segments are dropped and `..` pops a
/// previously pushed segment. Popping past the start, or an absolute
/// filename, means the path would leave the category root.
fn resolve_article_path(category_dir: &Path, filename: &str) -> Option<PathBuf> {
    let mut safe = PathBuf::new();

    for component in Path::new(filename).components() {
        match component {
            Component::Normal(part) => safe.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !safe.pop() {
                    return None;
                }
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if safe.as_os_str().is_empty() {
        return None;
    }

    Some(category_dir.join(safe))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Args;
    use clap::Parser;

    fn state_with_root(root: &Path) -> Arc<AppState> {
        let args = Args::parse_from([
            "woodshed",
            "--content-root",
            root.to_str().unwrap(),
        ]);
        Arc::new(AppState::new(args))
    }

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_parse_article_path() {
        assert_eq!(
            parse_article_path("/api/content/technique/01_picking.md"),
            Some(("technique", "01_picking.md"))
        );
        assert_eq!(parse_article_path("/api/content/technique/"), None);
        assert_eq!(parse_article_path("/api/content/"), None);
        assert_eq!(parse_article_path("/other"), None);
    }

    #[test]
    fn test_resolve_article_path_plain() {
        let resolved = resolve_article_path(Path::new("/content/technique"), "01_picking.md");
        assert_eq!(resolved, Some(PathBuf::from("/content/technique/01_picking.md")));
    }

    #[test]
    fn test_resolve_article_path_nested_with_internal_dotdot() {
        let resolved = resolve_article_path(Path::new("/content/technique"), "sub/../01.md");
        assert_eq!(resolved, Some(PathBuf::from("/content/technique/01.md")));
    }

    #[test]
    fn test_resolve_article_path_rejects_escape() {
        assert!(resolve_article_path(Path::new("/content/technique"), "../secret.md").is_none());
        assert!(resolve_article_path(Path::new("/content/technique"), "a/../../secret.md").is_none());
        assert!(resolve_article_path(Path::new("/content/technique"), "/etc/passwd").is_none());
    }

    #[test]
    fn test_handle_article_serves_content() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "technique/01_picking.md", "# Picking basics");

        let state = state_with_root(tmp.path());
        let resp = handle_article(state, "/api/content/technique/01_picking.md");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[test]
    fn test_handle_article_unknown_category_is_404() {
        let tmp = tempfile::tempdir().unwrap();
        let state = state_with_root(tmp.path());

        let resp = handle_article(state, "/api/content/scales/01.md");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_handle_article_missing_file_is_404() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir_all(tmp.path().join("technique")).unwrap();

        let state = state_with_root(tmp.path());
        let resp = handle_article(state, "/api/content/technique/99_missing.md");
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_handle_article_traversal_is_400() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "secret.md", "hidden");
        fs::create_dir_all(tmp.path().join("technique")).unwrap();

        let state = state_with_root(tmp.path());
        // %2E%2E%2F = "../"
        let resp = handle_article(state, "/api/content/technique/%2E%2E%2Fsecret.md");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_handle_catalog_builds_from_content_root() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "technique/01_picking.md", "see [[tech_02]]");
        write(tmp.path(), "technique/02_bends.md", "# Bends");

        let state = state_with_root(tmp.path());
        let resp = handle_catalog(state);
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
