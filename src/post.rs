use chrono::NaiveDate;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DATE_PREFIX_LEN: usize = 10;
pub const TITLE_MARKER: &str = "title:";
pub const TITLE_SENTINEL: &str = "UH OH!";
pub const TITLE_SCAN_LINES: usize = 11;

#[derive(Debug, Clone)]
pub struct Post {
    pub name: String,
    pub date: NaiveDate,
    pub title: String,
}

/// True when the first 10 characters of `name` are positionally `YYYY-MM-DD`.
/// Only the shape is checked here; whether the digits form a real calendar
/// date is decided by [`extract_date`].
pub fn has_date_prefix(name: &str) -> bool {
    let bytes = name.as_bytes();
    if bytes.len() < DATE_PREFIX_LEN {
        return false;
    }
    bytes[..DATE_PREFIX_LEN]
        .iter()
        .enumerate()
        .all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// List the entry names in `dir` that carry a date prefix, sorted by name.
/// Subdirectories and unrelated files are skipped silently; an unreadable
/// directory is the caller's problem.
pub fn list_posts(dir: &Path) -> io::Result<Vec<String>> {
    let mut names: Vec<String> = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if has_date_prefix(name) {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

/// Parse the leading `YYYY-MM-DD` of a post name into a calendar date.
/// Date-shaped but impossible prefixes (month 13, day 40) fail the run.
pub fn extract_date(name: &str) -> Result<NaiveDate, chrono::ParseError> {
    let prefix = name.get(..DATE_PREFIX_LEN).unwrap_or(name);
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d")
}

/// Scan the first [`TITLE_SCAN_LINES`] lines for one containing the
/// `title:` marker and return the remainder after it, trimmed.
pub fn scan_title(content: &str) -> Option<String> {
    content.lines().take(TITLE_SCAN_LINES).find_map(|line| {
        line.find(TITLE_MARKER)
            .map(|idx| line[idx + TITLE_MARKER.len()..].trim().to_string())
    })
}

/// Read a post file and extract its display title. A post without a usable
/// `title:` line gets the sentinel instead of aborting the batch; an
/// unreadable file still propagates.
pub fn extract_title(path: &Path) -> io::Result<String> {
    let raw = fs::read_to_string(path)?;
    Ok(scan_title(&raw).unwrap_or_else(|| TITLE_SENTINEL.to_string()))
}

/// Build a [`Post`] record for each listed name.
pub fn load_posts(dir: &Path, names: &[String]) -> Result<Vec<Post>, Box<dyn std::error::Error>> {
    let mut posts = Vec::with_capacity(names.len());
    for name in names {
        let date = extract_date(name)?;
        let title = extract_title(&post_path(dir, name))?;
        posts.push(Post {
            name: name.clone(),
            date,
            title,
        });
    }
    Ok(posts)
}

fn post_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(name)
}
