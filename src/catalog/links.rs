//! Markdown cross-reference extraction
//!
//! Two link forms resolve to article IDs:
//!
//! - wiki references: `[[tech_01]]` or `[[tech_01|pick basics]]`
//! - standard markdown links whose target is a relative `.md` path,
//!   resolved against the referencing file's directory and mapped to
//!   an ID via the path map built in the catalog's first pass

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// `[[id]]` or `[[id|label]]`
static WIKI_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[([^\]|]+)(?:\|[^\]]*)?\]\]").expect("regex: wiki link"));

/// `[label](target)` - target filtered to relative .md paths afterwards
static MARKDOWN_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[[^\]]*\]\(([^)]+)\)").expect("regex: markdown link"));

/// Extract all article references from one file's text
///
/// `source_dir` is the file's directory relative to the content root
/// (empty string for a top-level file); `path_map` maps root-relative
/// `.md` paths to article IDs. Each referenced ID appears once, in
/// first-seen order. Unresolvable markdown paths are dropped; wiki
/// references are kept verbatim even when no such article exists.
pub fn extract_links(
    content: &str,
    source_dir: &str,
    path_map: &HashMap<String, String>,
) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for cap in WIKI_LINK.captures_iter(content) {
        let id = cap[1].trim().to_string();
        if !id.is_empty() && seen.insert(id.clone()) {
            links.push(id);
        }
    }

    for cap in MARKDOWN_LINK.captures_iter(content) {
        let target = cap[1].trim();
        if !is_relative_md_path(target) {
            continue;
        }
        if let Some(resolved) = resolve_relative(source_dir, target) {
            if let Some(id) = path_map.get(&resolved) {
                if seen.insert(id.clone()) {
                    links.push(id.clone());
                }
            }
        }
    }

    links
}

/// Keep only plain relative `.md` targets; URLs, anchors, and absolute
/// paths never resolve to catalog articles
fn is_relative_md_path(target: &str) -> bool {
    !target.is_empty()
        && !target.contains("://")
        && !target.starts_with('#')
        && !target.starts_with('/')
        && target.ends_with(".md")
}

/// Resolve `target` against `base_dir`, both as forward-slash paths
/// relative to the content root
///
/// Returns `None` when `..` segments climb past the root.
pub fn resolve_relative(base_dir: &str, target: &str) -> Option<String> {
    let mut stack: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();

    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                stack.pop()?;
            }
            name => stack.push(name),
        }
    }

    Some(stack.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_map() -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("technique/01_picking.md".to_string(), "tech_01".to_string());
        map.insert("technique/02_bends.md".to_string(), "tech_02".to_string());
        map.insert("theory/03_modes.md".to_string(), "theory_03".to_string());
        map
    }

    #[test]
    fn test_wiki_links_plain_and_labelled() {
        let links = extract_links(
            "see [[tech_01]] and [[theory_03|the modes lesson]]",
            "technique",
            &path_map(),
        );
        assert_eq!(links, vec!["tech_01", "theory_03"]);
    }

    #[test]
    fn test_wiki_links_deduplicated() {
        let links = extract_links("[[tech_01]] twice [[tech_01]]", "technique", &path_map());
        assert_eq!(links, vec!["tech_01"]);
    }

    #[test]
    fn test_markdown_link_same_directory() {
        let links = extract_links(
            "next: [bends](02_bends.md)",
            "technique",
            &path_map(),
        );
        assert_eq!(links, vec!["tech_02"]);
    }

    #[test]
    fn test_markdown_link_crosses_categories() {
        let links = extract_links(
            "theory side: [modes](../theory/03_modes.md)",
            "technique",
            &path_map(),
        );
        assert_eq!(links, vec!["theory_03"]);
    }

    #[test]
    fn test_markdown_link_with_dot_prefix() {
        let links = extract_links("[again](./01_picking.md)", "technique", &path_map());
        assert_eq!(links, vec!["tech_01"]);
    }

    #[test]
    fn test_urls_anchors_and_non_md_ignored() {
        let links = extract_links(
            "[site](https://example.com/a.md) [anchor](#top) [img](pick.png)",
            "technique",
            &path_map(),
        );
        assert!(links.is_empty());
    }

    #[test]
    fn test_unresolvable_md_path_dropped() {
        let links = extract_links("[gone](99_missing.md)", "technique", &path_map());
        assert!(links.is_empty());
    }

    #[test]
    fn test_resolve_relative_escaping_root_rejected() {
        assert_eq!(resolve_relative("technique", "../../etc/passwd.md"), None);
    }

    #[test]
    fn test_both_forms_in_one_file() {
        let links = extract_links(
            "[[tech_01]] then [bends](02_bends.md)",
            "technique",
            &path_map(),
        );
        assert_eq!(links, vec!["tech_01", "tech_02"]);
    }
}
