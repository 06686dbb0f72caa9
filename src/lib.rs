use chrono::{Local, NaiveDate};
use std::env;
use std::error::Error;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub mod chart;
pub mod formatting;
pub mod post;
pub mod recency;

use chart::{ChartLayout, DEFAULT_CUTOFF};
use formatting::FormatContext;

pub fn entry() -> Result<(), Box<dyn Error>> {
    run(Local::now().date_naive())
}

/// Drive the whole pipeline against an explicit reference date: list the
/// dated posts, extract dates and titles, keep the recent ones, and render
/// the header image.
pub fn run(reference: NaiveDate) -> Result<(), Box<dyn Error>> {
    let fmt = FormatContext::from_env();
    let posts_root = posts_dir();
    let out_path = output_path();

    let names = post::list_posts(&posts_root)?;
    println!("{} posts found", fmt.format_count(names.len()));

    let posts = post::load_posts(&posts_root, &names)?;
    let recent = recency::filter_recent(&posts, reference, DEFAULT_CUTOFF);

    let columns = formatting::terminal_columns();
    for kept in &recent {
        println!(
            "  {} {}",
            fmt.format_offset(kept.offset),
            fmt.format_title(&kept.title, columns.saturating_sub(8)),
        );
    }
    println!(
        "{} posts within the last {} days",
        fmt.format_count(recent.len()),
        DEFAULT_CUTOFF.abs(),
    );

    let layout = ChartLayout::new(&recent, DEFAULT_CUTOFF);
    println!(
        "Days since posting: {} {}",
        layout.days_since,
        fmt.format_mood(layout.mood),
    );

    println!("Rendering chart...");
    ensure_parent(&out_path)?;
    chart::render(&layout, &out_path)?;
    println!("Saved {}", out_path.display());
    Ok(())
}

/// Posts directory, `BLOG_HEADER_POSTS_DIR` overriding the `_posts/`
/// default next to the working directory.
pub fn posts_dir() -> PathBuf {
    if let Ok(dir) = env::var("BLOG_HEADER_POSTS_DIR") {
        return PathBuf::from(dir);
    }
    PathBuf::from("_posts")
}

/// Output image path, `BLOG_HEADER_OUT` overriding `images/header.png`.
pub fn output_path() -> PathBuf {
    if let Ok(path) = env::var("BLOG_HEADER_OUT") {
        return PathBuf::from(path);
    }
    PathBuf::from("images").join("header.png")
}

fn ensure_parent(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_parent_creates_missing_dirs() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().join("images").join("header.png");
        ensure_parent(&target).unwrap();
        assert!(tmp.path().join("images").is_dir());
        // A bare filename has no parent to create.
        ensure_parent(Path::new("header.png")).unwrap();
    }
}
