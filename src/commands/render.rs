//! Render excerpt cards

use anyhow::Result;
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode, DebounceEventResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::config::SiteConfig;
use crate::excerpt::Markup;
use crate::helpers::{css, full_url_for, html_escape};
use crate::Site;

/// Options of the `render` command
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Input file or directory; defaults to the source directory
    pub input: Option<PathBuf>,
    /// Output page; defaults to `<public_dir>/index.html`
    pub output: Option<PathBuf>,
    /// Print bare fragments instead of writing a page
    pub stdout: bool,
}

impl RenderOptions {
    fn input(&self, site: &Site) -> PathBuf {
        match &self.input {
            Some(path) => site.resolve(path),
            None => site.source_dir.clone(),
        }
    }

    fn output(&self, site: &Site) -> PathBuf {
        match &self.output {
            Some(path) => site.resolve(path),
            None => site.public_dir.join("index.html"),
        }
    }
}

/// Load the nodes and render them once
pub fn run(site: &Site, options: &RenderOptions) -> Result<()> {
    let start = Instant::now();

    let input = options.input(site);
    let nodes = site.load_nodes(&input)?;
    tracing::info!("Loaded {} content nodes from {:?}", nodes.len(), input);

    let renderer = site.renderer()?;
    let fragments = renderer.render_all(&nodes);

    if options.stdout {
        println!("{}", fragments);
        return Ok(());
    }

    let output = options.output(site);
    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output, index_page(&site.config, &fragments))?;

    let duration = start.elapsed();
    tracing::info!(
        "Rendered {} excerpts to {:?} in {:.2}s",
        nodes.len(),
        output,
        duration.as_secs_f64()
    );

    Ok(())
}

/// Watch the input and configuration, re-rendering on change until Ctrl+C
pub async fn watch(site: &Site, options: &RenderOptions) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Fires once after changes settle, so the last save is always rendered
    let mut debouncer = new_debouncer(
        Duration::from_millis(500),
        move |res: DebounceEventResult| {
            let _ = tx.send(res);
        },
    )?;

    let input = options.input(site);
    let mode = if input.is_dir() {
        RecursiveMode::Recursive
    } else {
        RecursiveMode::NonRecursive
    };
    debouncer.watcher().watch(&input, mode)?;
    tracing::debug!("Watching: {:?}", input);

    let config_path = site.config_path();
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    let output = options.output(site);

    tracing::info!("Watching {:?} for changes. Press Ctrl+C to stop.", input);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                tracing::info!("Stopping watcher");
                break;
            }
            res = rx.recv() => {
                let Some(res) = res else { break };

                let events = match res {
                    Ok(events) => events,
                    Err(e) => {
                        tracing::warn!("Watch error: {}", e);
                        continue;
                    }
                };

                let changed: Vec<&Path> = events.iter().map(|e| e.path.as_path()).collect();
                if !needs_render(&changed, &output) {
                    continue;
                }

                for path in &changed {
                    tracing::debug!("File changed: {:?}", path);
                }

                tracing::info!("Change detected, re-rendering...");
                match Site::new(&site.base_dir) {
                    Ok(fresh) => {
                        if let Err(e) = run(&fresh, options) {
                            tracing::error!("Render failed: {}", e);
                        }
                    }
                    Err(e) => tracing::error!("Failed to reload configuration: {}", e),
                }
            }
        }
    }

    Ok(())
}

/// Whether a settled batch of changed paths warrants a re-render
///
/// Our own output and editor or VCS noise never do.
fn needs_render(changed: &[&Path], output: &Path) -> bool {
    changed.iter().any(|path| {
        let path_str = path.to_string_lossy();
        *path != output
            && !path_str.contains(".git")
            && !path_str.contains(".DS_Store")
            && !path_str.ends_with('~')
            && !path_str.ends_with(".swp")
    })
}

/// Wrap rendered cards in a minimal HTML5 page
pub fn index_page(config: &SiteConfig, fragments: &Markup) -> String {
    let stylesheet = config
        .stylesheet
        .as_deref()
        .map(|path| format!("\n{}", css(config, path)))
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="canonical" href="{canonical}">{stylesheet}
</head>
<body>
<main class="excerpts">
{fragments}
</main>
</body>
</html>
"#,
        lang = html_escape(&config.language),
        title = html_escape(&config.title),
        canonical = html_escape(&full_url_for(config, "")),
        stylesheet = stylesheet,
        fragments = fragments,
    )
}
