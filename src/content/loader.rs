//! Node loader - reads content nodes from query results and markdown sources

use serde_json::Value;
use std::cmp::Ordering;
use std::fs;
use std::path::{Component, Path};
use walkdir::WalkDir;

use super::{ContentNode, FrontMatter, LoadError, RawNode};
use crate::Site;

/// Loads content nodes from a file or directory
pub struct NodeLoader<'a> {
    site: &'a Site,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputFormat {
    Json,
    Yaml,
    Markdown,
}

impl<'a> NodeLoader<'a> {
    /// Create a new node loader
    pub fn new(site: &'a Site) -> Self {
        Self { site }
    }

    /// Load, filter and order all nodes under `input`
    ///
    /// A directory is walked recursively and files that fail to load are
    /// skipped with a warning. A single file must load.
    pub fn load(&self, input: &Path) -> Result<Vec<ContentNode>, LoadError> {
        if !input.exists() {
            return Err(LoadError::NotFound(input.to_path_buf()));
        }

        let mut nodes = if input.is_dir() {
            self.load_dir(input)
        } else {
            let root = input.parent().unwrap_or(input);
            self.load_file(input, root)?
        };

        if !self.site.config.render_drafts {
            let before = nodes.len();
            nodes.retain(ContentNode::is_published);
            if nodes.len() < before {
                tracing::debug!("Skipped {} unpublished nodes", before - nodes.len());
            }
        }

        sort_nodes(&mut nodes, &self.site.config.excerpt.order_by);

        Ok(nodes)
    }

    fn load_dir(&self, dir: &Path) -> Vec<ContentNode> {
        let mut nodes = Vec::new();

        for entry in WalkDir::new(dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()))
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || input_format(path).is_none() {
                continue;
            }

            match self.load_file(path, dir) {
                Ok(mut loaded) => nodes.append(&mut loaded),
                Err(e) => {
                    tracing::warn!("Failed to load {:?}: {}", path, e);
                }
            }
        }

        nodes
    }

    /// Load the nodes held by one file; `root` anchors path-derived slugs
    fn load_file(&self, path: &Path, root: &Path) -> Result<Vec<ContentNode>, LoadError> {
        let format =
            input_format(path).ok_or_else(|| LoadError::UnsupportedFormat(path.to_path_buf()))?;

        let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let nodes = match format {
            InputFormat::Json => {
                let doc: Value =
                    serde_json::from_str(&content).map_err(|source| LoadError::Json {
                        path: path.to_path_buf(),
                        source,
                    })?;
                nodes_from_document(doc, path)
            }
            InputFormat::Yaml => {
                let doc: Value =
                    serde_yaml::from_str(&content).map_err(|source| LoadError::Yaml {
                        path: path.to_path_buf(),
                        source,
                    })?;
                nodes_from_document(doc, path)
            }
            InputFormat::Markdown => vec![load_markdown(&content, path, root)?],
        };

        tracing::debug!("Loaded {} nodes from {:?}", nodes.len(), path);
        Ok(nodes)
    }
}

/// Build a node from a markdown file's front-matter; the body is not converted
fn load_markdown(content: &str, path: &Path, root: &Path) -> Result<ContentNode, LoadError> {
    let (fm, _body) = FrontMatter::parse(content);

    // Front-matter slug overrides the path-derived one
    let slug = fm
        .slug
        .clone()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| slug_from_path(path, root));

    let raw = RawNode {
        slug: Some(slug),
        fields: None,
        frontmatter: fm,
        excerpt: None,
    };

    ContentNode::try_from(raw)
}

/// Convert a parsed document into nodes, skipping invalid entries
///
/// Accepted shapes: a list of nodes or `{node}` edges, `{edges}`, `{nodes}`,
/// `{data: {<connection>: {edges|nodes}}}`, or a single node object.
fn nodes_from_document(doc: Value, path: &Path) -> Vec<ContentNode> {
    let mut values = Vec::new();
    collect_node_values(doc, &mut values);

    values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let node = serde_json::from_value::<RawNode>(value)
                .map_err(|e| e.to_string())
                .and_then(|raw| ContentNode::try_from(raw).map_err(|e| e.to_string()));

            match node {
                Ok(node) => Some(node),
                Err(e) => {
                    tracing::warn!("Skipping node #{} in {:?}: {}", index, path, e);
                    None
                }
            }
        })
        .collect()
}

fn collect_node_values(doc: Value, out: &mut Vec<Value>) {
    match doc {
        Value::Array(items) => out.extend(items.into_iter().map(unwrap_edge)),
        Value::Object(mut map) => {
            if matches!(map.get("data"), Some(Value::Object(_))) {
                if let Some(Value::Object(connections)) = map.remove("data") {
                    for (_, connection) in connections {
                        collect_node_values(connection, out);
                    }
                }
            } else if matches!(map.get("edges"), Some(Value::Array(_))) {
                if let Some(edges) = map.remove("edges") {
                    collect_node_values(edges, out);
                }
            } else if matches!(map.get("nodes"), Some(Value::Array(_))) {
                if let Some(nodes) = map.remove("nodes") {
                    collect_node_values(nodes, out);
                }
            } else {
                out.push(unwrap_edge(Value::Object(map)));
            }
        }
        other => out.push(other),
    }
}

/// `{node: {...}}` -> `{...}`
fn unwrap_edge(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.len() == 1 && map.contains_key("node") => {
            map.remove("node").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Order nodes by `order_by`: `-date` newest first, `date` oldest first,
/// anything else keeps input order. Undated nodes go last, in input order.
fn sort_nodes(nodes: &mut Vec<ContentNode>, order_by: &str) {
    let descending = match order_by.trim() {
        "-date" => true,
        "date" => false,
        _ => return,
    };

    let mut keyed: Vec<_> = nodes
        .drain(..)
        .map(|node| (node.frontmatter.parse_date(), node))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) if descending => b.cmp(a),
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    nodes.extend(keyed.into_iter().map(|(_, node)| node));
}

/// `posts/hello.md` -> `/posts/hello/`, `posts/index.md` -> `/posts/`
fn slug_from_path(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let without_ext = relative.with_extension("");

    let mut parts: Vec<String> = without_ext
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if parts.last().map(|p| p == "index").unwrap_or(false) {
        parts.pop();
    }

    if parts.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", parts.join("/"))
    }
}

fn input_format(path: &Path) -> Option<InputFormat> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Some(InputFormat::Json),
        Some("yml") | Some("yaml") => Some(InputFormat::Yaml),
        Some("md") | Some("markdown") => Some(InputFormat::Markdown),
        _ => None,
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::TempDir;

    fn test_site(dir: &TempDir) -> Site {
        Site::with_config(dir.path(), SiteConfig::default())
    }

    fn slugs(nodes: &[ContentNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.slug()).collect()
    }

    #[test]
    fn test_load_query_result() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("query.json");
        fs::write(
            &path,
            r#"{
  "data": {
    "allMarkdownRemark": {
      "edges": [
        {"node": {"fields": {"slug": "/post-1"}, "frontmatter": {"title": "Hello World", "date": "2020-01-01"}, "excerpt": "<p>Intro text</p>"}},
        {"node": {"fields": {"slug": "/post-2"}, "frontmatter": {"date": "2021-06-01"}, "excerpt": ""}}
      ]
    }
  }
}"#,
        )
        .unwrap();

        let site = test_site(&dir);
        let nodes = NodeLoader::new(&site).load(&path).unwrap();
        // Newest first by default
        assert_eq!(slugs(&nodes), vec!["/post-2", "/post-1"]);
        assert_eq!(nodes[1].display_title(), "Hello World");
        assert_eq!(nodes[0].display_title(), "/post-2");
    }

    #[test]
    fn test_load_yaml_list_keeps_nodes_with_odd_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nodes.yml");
        fs::write(
            &path,
            r#"
- slug: /a
  frontmatter:
    title: A
    date: 2020-01-01
- frontmatter:
    title: No slug here
- slug: /b
  frontmatter:
    title: [not, a, scalar]
- slug: /c
  frontmatter:
    title: C
    date: 2020-02-01
"#,
        )
        .unwrap();

        let site = test_site(&dir);
        let nodes = NodeLoader::new(&site).load(&path).unwrap();
        // Only the slug-less node is dropped; undated /b goes last
        assert_eq!(slugs(&nodes), vec!["/c", "/a", "/b"]);
        assert_eq!(nodes[2].display_title(), "/b");
    }

    #[test]
    fn test_non_scalar_title_or_date_does_not_drop_node() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nodes.json");
        fs::write(
            &path,
            r#"[
                {"slug": "/a", "frontmatter": {"title": {"en": "Hi"}}},
                {"slug": "/b", "frontmatter": {"title": "B", "date": ["2020"]}}
            ]"#,
        )
        .unwrap();

        let site = test_site(&dir);
        let nodes = NodeLoader::new(&site).load(&path).unwrap();
        assert_eq!(slugs(&nodes), vec!["/a", "/b"]);
        assert_eq!(nodes[0].display_title(), "/a");
        assert_eq!(nodes[1].display_title(), "B");
        assert_eq!(nodes[1].date(), "");
    }

    #[test]
    fn test_load_directory() {
        let dir = TempDir::new().unwrap();
        let content = dir.path().join("content");
        fs::create_dir_all(content.join("posts")).unwrap();
        fs::create_dir_all(content.join(".cache")).unwrap();

        fs::write(
            content.join("posts/hello.md"),
            "---\ntitle: Hello\ndate: 2022-03-01\nexcerpt: \"<p>Hi</p>\"\n---\n\nBody text.\n",
        )
        .unwrap();
        fs::write(
            content.join("posts/index.md"),
            "---\ntitle: Posts\ndate: 2022-01-01\n---\n",
        )
        .unwrap();
        fs::write(
            content.join("extra.json"),
            r#"[{"slug": "/extra", "frontmatter": {"date": "2022-02-01"}}]"#,
        )
        .unwrap();
        fs::write(content.join("broken.json"), "{ not json").unwrap();
        fs::write(content.join("notes.txt"), "ignored").unwrap();
        fs::write(
            content.join(".cache/stale.json"),
            r#"[{"slug": "/stale"}]"#,
        )
        .unwrap();

        let site = test_site(&dir);
        let nodes = NodeLoader::new(&site).load(&content).unwrap();
        assert_eq!(slugs(&nodes), vec!["/posts/hello/", "/extra", "/posts/"]);
        assert_eq!(nodes[0].excerpt.as_str(), "<p>Hi</p>");
    }

    #[test]
    fn test_markdown_frontmatter_slug_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("post.md");
        fs::write(&path, "---\ntitle: Custom\nslug: /custom-path\n---\n").unwrap();

        let site = test_site(&dir);
        let nodes = NodeLoader::new(&site).load(&path).unwrap();
        assert_eq!(slugs(&nodes), vec!["/custom-path"]);
    }

    #[test]
    fn test_unpublished_nodes_are_dropped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nodes.json");
        fs::write(
            &path,
            r#"{"nodes": [
                {"slug": "/live"},
                {"slug": "/draft", "frontmatter": {"published": false}}
            ]}"#,
        )
        .unwrap();

        let mut site = test_site(&dir);
        let nodes = NodeLoader::new(&site).load(&path).unwrap();
        assert_eq!(slugs(&nodes), vec!["/live"]);

        site.config.render_drafts = true;
        let nodes = NodeLoader::new(&site).load(&path).unwrap();
        assert_eq!(slugs(&nodes), vec!["/live", "/draft"]);
    }

    #[test]
    fn test_order_by() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nodes.json");
        fs::write(
            &path,
            r#"[
                {"slug": "/undated"},
                {"slug": "/old", "frontmatter": {"date": "2019-01-01"}},
                {"slug": "/new", "frontmatter": {"date": "2023-01-01"}}
            ]"#,
        )
        .unwrap();

        let mut site = test_site(&dir);
        let nodes = NodeLoader::new(&site).load(&path).unwrap();
        assert_eq!(slugs(&nodes), vec!["/new", "/old", "/undated"]);

        site.config.excerpt.order_by = "date".to_string();
        let nodes = NodeLoader::new(&site).load(&path).unwrap();
        assert_eq!(slugs(&nodes), vec!["/old", "/new", "/undated"]);

        site.config.excerpt.order_by = String::new();
        let nodes = NodeLoader::new(&site).load(&path).unwrap();
        assert_eq!(slugs(&nodes), vec!["/undated", "/old", "/new"]);
    }

    #[test]
    fn test_single_file_errors() {
        let dir = TempDir::new().unwrap();
        let site = test_site(&dir);
        let loader = NodeLoader::new(&site);

        let missing = dir.path().join("missing.json");
        assert!(matches!(loader.load(&missing), Err(LoadError::NotFound(_))));

        let txt = dir.path().join("nodes.txt");
        fs::write(&txt, "[]").unwrap();
        assert!(matches!(
            loader.load(&txt),
            Err(LoadError::UnsupportedFormat(_))
        ));

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "[").unwrap();
        assert!(matches!(loader.load(&bad), Err(LoadError::Json { .. })));
    }

    #[test]
    fn test_slug_from_path() {
        let root = Path::new("/site/content");
        assert_eq!(
            slug_from_path(Path::new("/site/content/posts/hello.md"), root),
            "/posts/hello/"
        );
        assert_eq!(
            slug_from_path(Path::new("/site/content/posts/index.md"), root),
            "/posts/"
        );
        assert_eq!(
            slug_from_path(Path::new("/site/content/index.md"), root),
            "/"
        );
    }
}
