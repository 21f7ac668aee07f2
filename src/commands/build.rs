//! Build the static site

use anyhow::Result;
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use std::path::Path;
use std::time::{Duration, Instant};

use crate::generator::{staging_dir, BuildReport, Generator};
use crate::Blog;

/// Build the site once
pub fn run(blog: &Blog) -> Result<BuildReport> {
    let start = Instant::now();

    let generator = Generator::new(blog)?;
    let report = generator.build()?;

    for rejected in &report.rejected {
        tracing::warn!("Skipped {:?}: {}", rejected.path, rejected.reason);
    }

    let duration = start.elapsed();
    tracing::info!(
        "Generated {} posts and {} assets in {:.2}s",
        report.posts,
        report.assets,
        duration.as_secs_f64()
    );

    Ok(report)
}

/// Watch the source tree and rebuild on every change
pub async fn watch(blog: &Blog) -> Result<()> {
    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let blog = blog.clone();
    // The debouncer blocks on a std channel
    tokio::task::spawn_blocking(move || watch_and_rebuild(&blog, || {})).await?
}

/// Rebuild after every burst of changes, calling `on_rebuild` after each
/// successful build.
///
/// Events are debounced on the trailing edge, so edits saved while a build
/// runs are picked up by the next one.
pub fn watch_and_rebuild<F>(blog: &Blog, mut on_rebuild: F) -> Result<()>
where
    F: FnMut(),
{
    let (tx, rx) = std::sync::mpsc::channel();
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    let config_path = blog.config_path();
    for (path, mode) in [
        (&blog.source_dir, RecursiveMode::Recursive),
        (&blog.static_dir, RecursiveMode::Recursive),
        (&config_path, RecursiveMode::NonRecursive),
    ] {
        if path.exists() {
            debouncer.watcher().watch(path, mode)?;
            tracing::debug!("Watching: {:?}", path);
        }
    }

    // Watcher events carry absolute paths
    let public_dir = blog
        .public_dir
        .canonicalize()
        .unwrap_or_else(|_| blog.public_dir.clone());
    let staging = staging_dir(&public_dir);

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant: Vec<_> = events
                    .iter()
                    .filter(|e| is_relevant(&e.path, &public_dir, &staging))
                    .collect();
                if relevant.is_empty() {
                    continue;
                }

                for event in &relevant {
                    tracing::info!("File changed: {}", event.path.display());
                }

                match reload(blog).and_then(|b| run(&b)) {
                    Ok(_) => on_rebuild(),
                    Err(e) => tracing::error!("Build failed: {:#}", e),
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

/// Editor droppings and our own output never trigger a rebuild
fn is_relevant(path: &Path, public_dir: &Path, staging: &Path) -> bool {
    if path.starts_with(public_dir) || path.starts_with(staging) {
        return false;
    }
    let path_str = path.to_string_lossy();
    !path_str.contains(".git")
        && !path_str.contains(".DS_Store")
        && !path_str.ends_with('~')
        && !path_str.ends_with(".swp")
}

/// Re-read the configuration so edits to it take effect
pub fn reload(blog: &Blog) -> Result<Blog> {
    Blog::new(&blog.base_dir)
}
