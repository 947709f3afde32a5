//! List content nodes

use anyhow::Result;
use std::path::Path;

use crate::content::ContentNode;
use crate::helpers::{strip_html, truncate};
use crate::Site;

const PREVIEW_LENGTH: usize = 60;

/// Print one line per node: date, slug, title, thumbnail flag and a preview
pub fn run(site: &Site, input: Option<&Path>) -> Result<()> {
    let input = match input {
        Some(path) => site.resolve(path),
        None => site.source_dir.clone(),
    };

    let nodes = site.load_nodes(&input)?;
    println!("Nodes ({}):", nodes.len());
    for node in &nodes {
        println!("  {}", summary_line(node));
    }

    Ok(())
}

fn summary_line(node: &ContentNode) -> String {
    let date = if node.date().is_empty() {
        "-"
    } else {
        node.date()
    };
    let thumbnail = if node.thumbnail_src().is_some() {
        "[img]"
    } else {
        "[no img]"
    };
    let preview = strip_html(node.excerpt.as_str());
    let preview = truncate(
        &preview.split_whitespace().collect::<Vec<_>>().join(" "),
        PREVIEW_LENGTH,
        None,
    );

    format!(
        "{} - {} [{}] {} {}",
        date,
        node.display_title(),
        node.slug(),
        thumbnail,
        preview
    )
    .trim_end()
    .to_string()
}
