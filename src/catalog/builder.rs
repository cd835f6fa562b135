//! Catalog construction
//!
//! Builds the category -> article index from the content tree in three
//! passes: scan files and assign IDs, extract cross-references using
//! the path map from the first pass, then invert forward links into
//! backlinks.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::catalog::links::extract_links;
use crate::types::Result;

/// Content categories and their article-ID prefixes, in display order
pub const CATEGORIES: &[(&str, &str)] = &[
    ("technique", "tech"),
    ("theory", "theory"),
    ("ghost", "ghost"),
    ("dinner", "dinner"),
];

/// One catalog entry
#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Stable article ID, e.g. 'tech_01'
    pub id: String,
    /// Percent-encoded path relative to the category directory
    pub filename: String,
    /// Display title derived from the file name
    pub title: String,
    /// Category the article belongs to
    pub category: String,
    /// Article IDs this article references
    pub forward_links: Vec<String>,
    /// Article IDs that reference this article (derived)
    pub backlinks: Vec<String>,
}

/// File discovered during the scan pass, before links are extracted
struct PendingItem {
    category: String,
    /// Path relative to the category directory, forward slashes
    rel_path: String,
    /// Path relative to the content root, forward slashes
    root_rel_path: String,
    id: String,
    title: String,
}

/// Build the full catalog with forward links and backlinks
pub fn build_catalog(content_root: &Path) -> Result<BTreeMap<String, Vec<CatalogItem>>> {
    // Pass 1: scan every category, assign IDs, build the path map
    let mut pending: Vec<PendingItem> = Vec::new();
    let mut path_map: HashMap<String, String> = HashMap::new();

    for (category, prefix) in CATEGORIES {
        let dir = content_root.join(category);
        for rel_path in list_markdown_files(&dir) {
            let basename = rel_path.rsplit('/').next().unwrap_or(&rel_path);
            let id = article_id(prefix, basename);
            let title = article_title(basename);
            let root_rel_path = format!("{}/{}", category, rel_path);

            path_map.insert(root_rel_path.clone(), id.clone());
            pending.push(PendingItem {
                category: category.to_string(),
                rel_path,
                root_rel_path,
                id,
                title,
            });
        }
    }

    // Pass 2: extract cross-references now that every path has an ID
    let mut items: Vec<CatalogItem> = Vec::with_capacity(pending.len());
    for entry in &pending {
        let file_path = content_root.join(&entry.root_rel_path);
        let forward_links = match fs::read_to_string(&file_path) {
            Ok(content) => {
                let source_dir = parent_dir(&entry.root_rel_path);
                extract_links(&content, source_dir, &path_map)
            }
            Err(e) => {
                warn!("Failed to read {}: {}", file_path.display(), e);
                Vec::new()
            }
        };

        items.push(CatalogItem {
            id: entry.id.clone(),
            filename: urlencoding::encode(&entry.rel_path).into_owned(),
            title: entry.title.clone(),
            category: entry.category.clone(),
            forward_links,
            backlinks: Vec::new(),
        });
    }

    // Pass 3: backlinks are the transpose of the forward-link relation.
    // Set accumulation only, so self-references and cycles are harmless.
    let index_by_id: HashMap<String, usize> = items
        .iter()
        .enumerate()
        .map(|(i, item)| (item.id.clone(), i))
        .collect();

    for source_idx in 0..items.len() {
        let source_id = items[source_idx].id.clone();
        let forward = items[source_idx].forward_links.clone();
        for target_id in forward {
            if let Some(&target_idx) = index_by_id.get(&target_id) {
                let backlinks = &mut items[target_idx].backlinks;
                if !backlinks.contains(&source_id) {
                    backlinks.push(source_id.clone());
                }
            }
        }
    }

    // Group per category, preserving scan order
    let mut catalog: BTreeMap<String, Vec<CatalogItem>> = BTreeMap::new();
    for (category, _) in CATEGORIES {
        catalog.insert(category.to_string(), Vec::new());
    }
    for item in items {
        catalog
            .entry(item.category.clone())
            .or_default()
            .push(item);
    }

    debug!(
        "Catalog built: {} articles across {} categories",
        catalog.values().map(|v| v.len()).sum::<usize>(),
        catalog.len()
    );

    Ok(catalog)
}

/// Recursively list `.md` files under `dir`, as sorted forward-slash
/// paths relative to `dir`. A missing directory yields an empty list.
fn list_markdown_files(dir: &Path) -> Vec<String> {
    let mut results = Vec::new();
    collect_markdown_files(dir, PathBuf::new(), &mut results);
    results.sort();
    results
}

fn collect_markdown_files(dir: &Path, rel: PathBuf, results: &mut Vec<String>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let name = entry.file_name();
        let rel_path = rel.join(&name);
        if path.is_dir() {
            collect_markdown_files(&path, rel_path, results);
        } else if name.to_string_lossy().ends_with(".md") {
            results.push(rel_path.to_string_lossy().replace('\\', "/"));
        }
    }
}

/// Derive an article ID from the category prefix and the file's
/// leading numeric token, e.g. ('tech', '01_picking.md') -> 'tech_01'.
/// Files without a leading number share the '00' token.
fn article_id(prefix: &str, basename: &str) -> String {
    let num: String = basename.chars().take_while(|c| c.is_ascii_digit()).collect();
    if num.is_empty() {
        format!("{}_00", prefix)
    } else {
        format!("{}_{}", prefix, num)
    }
}

/// Derive a display title by stripping the `.md` suffix and the
/// leading numeric token with its underscore
fn article_title(basename: &str) -> String {
    let stem = basename.strip_suffix(".md").unwrap_or(basename);
    let without_num = stem.trim_start_matches(|c: char| c.is_ascii_digit());
    without_num.strip_prefix('_').unwrap_or(without_num).to_string()
}

/// Directory part of a root-relative path (empty for top level)
fn parent_dir(root_rel_path: &str) -> &str {
    match root_rel_path.rfind('/') {
        Some(idx) => &root_rel_path[..idx],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_article_id_derivation() {
        assert_eq!(article_id("tech", "01_picking.md"), "tech_01");
        assert_eq!(article_id("theory", "12_modes.md"), "theory_12");
        assert_eq!(article_id("ghost", "intro.md"), "ghost_00");
    }

    #[test]
    fn test_article_title_derivation() {
        assert_eq!(article_title("01_picking.md"), "picking");
        assert_eq!(article_title("intro.md"), "intro");
        assert_eq!(article_title("03.md"), "");
    }

    #[test]
    fn test_build_catalog_assigns_ids_and_titles() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "technique/01_picking.md", "# Picking");
        write(tmp.path(), "technique/02_bends.md", "# Bends");
        write(tmp.path(), "theory/01_notes.md", "# Notes");

        let catalog = build_catalog(tmp.path()).unwrap();
        let technique = &catalog["technique"];
        assert_eq!(technique.len(), 2);
        assert_eq!(technique[0].id, "tech_01");
        assert_eq!(technique[0].title, "picking");
        assert_eq!(catalog["theory"][0].id, "theory_01");
        // Empty categories still appear
        assert!(catalog["ghost"].is_empty());
        assert!(catalog["dinner"].is_empty());
    }

    #[test]
    fn test_backlinks_are_transpose_of_forward_links() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "technique/01_picking.md", "see [[tech_02]]");
        write(tmp.path(), "technique/02_bends.md", "back to [[tech_01]] and [[tech_01]]");

        let catalog = build_catalog(tmp.path()).unwrap();
        let technique = &catalog["technique"];
        assert_eq!(technique[0].forward_links, vec!["tech_02"]);
        assert_eq!(technique[0].backlinks, vec!["tech_02"]);
        assert_eq!(technique[1].backlinks, vec!["tech_01"]);
    }

    #[test]
    fn test_markdown_path_links_resolve_across_categories() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "technique/01_picking.md",
            "[modes](../theory/01_notes.md)",
        );
        write(tmp.path(), "theory/01_notes.md", "plain text");

        let catalog = build_catalog(tmp.path()).unwrap();
        assert_eq!(catalog["technique"][0].forward_links, vec!["theory_01"]);
        assert_eq!(catalog["theory"][0].backlinks, vec!["tech_01"]);
    }

    #[test]
    fn test_self_reference_is_legal() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "technique/01_picking.md", "me: [[tech_01]]");

        let catalog = build_catalog(tmp.path()).unwrap();
        let item = &catalog["technique"][0];
        assert_eq!(item.forward_links, vec!["tech_01"]);
        assert_eq!(item.backlinks, vec!["tech_01"]);
    }

    #[test]
    fn test_unknown_forward_link_kept_but_no_backlink() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "technique/01_picking.md", "[[ghost_99]]");

        let catalog = build_catalog(tmp.path()).unwrap();
        assert_eq!(catalog["technique"][0].forward_links, vec!["ghost_99"]);
    }

    #[test]
    fn test_nested_files_and_encoded_filename() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "technique/extras/05_tapping.md", "# Tapping");

        let catalog = build_catalog(tmp.path()).unwrap();
        let item = &catalog["technique"][0];
        assert_eq!(item.id, "tech_05");
        assert_eq!(item.filename, "extras%2F05_tapping.md");
    }

    #[test]
    fn test_missing_content_root_yields_empty_catalog() {
        let catalog = build_catalog(Path::new("/nonexistent/content")).unwrap();
        assert!(catalog.values().all(|v| v.is_empty()));
    }
}
