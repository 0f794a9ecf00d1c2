//! File-backed store for saved summaries: one markdown file per note,
//! never mutated or deleted by the app. The directory is the source of
//! truth; listing rescans it on every call.

use chrono::Local;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const FALLBACK_NAME: &str = "summary";

/// `YYYYmmdd_HHMMSS` prefix, optional `-N` collision counter, then the
/// sanitized title.
static FILE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{8}_\d{6}(?:-\d+)?_(?P<title>.+)\.md$").expect("valid file name pattern")
});

#[derive(Clone, Debug)]
pub struct RepositoryNote {
    pub path: PathBuf,
    pub file_name: String,
    /// Sanitized title recovered from the file name, for list display.
    pub display_title: String,
    pub modified: SystemTime,
}

pub fn ensure_repository_dir(dir: &Path) -> io::Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Keeps alphanumerics, space, hyphen and underscore, collapses whitespace
/// runs to single underscores, and falls back to a default when nothing
/// survives.
pub fn safe_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|ch| ch.is_alphanumeric() || matches!(ch, '-' | '_' | ' '))
        .collect();
    let joined = cleaned.split_whitespace().collect::<Vec<_>>().join("_");
    if joined.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        joined
    }
}

/// Writes one note file and returns its path. The second-granularity
/// timestamp prefix keeps repeated titles apart; same-second collisions get
/// a `-N` counter so two saves in one second still yield two files.
pub fn save_summary(
    dir: &Path,
    title: &str,
    body: &str,
    source_type: &str,
    source_name: Option<&str>,
) -> io::Result<PathBuf> {
    ensure_repository_dir(dir)?;

    let now = Local::now();
    let stamp = now.format("%Y%m%d_%H%M%S").to_string();
    let safe = safe_filename(title);

    let mut path = dir.join(format!("{stamp}_{safe}.md"));
    let mut counter = 0usize;
    while path.exists() {
        counter += 1;
        path = dir.join(format!("{stamp}-{counter}_{safe}.md"));
    }

    let mut content = String::new();
    content.push_str(&format!("# {title}\n"));
    content.push('\n');
    content.push_str(&format!("- Created: {}\n", now.format("%Y-%m-%dT%H:%M:%S")));
    content.push_str(&format!("- Source type: {source_type}\n"));
    content.push_str(&format!("- Source name: {}\n", source_name.unwrap_or("N/A")));
    content.push('\n');
    content.push_str("---\n");
    content.push('\n');
    content.push_str(body.trim());
    content.push('\n');

    fs::write(&path, content)?;
    log::info!("saved summary to {}", path.display());
    Ok(path)
}

/// Lists saved notes newest-modified-first, rescanning the directory every
/// time. Only `*.md` files count; anything else in the directory is ignored.
pub fn list_summaries(dir: &Path) -> io::Result<Vec<RepositoryNote>> {
    ensure_repository_dir(dir)?;

    let mut notes = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(_) => continue,
        };
        let path = entry.path();
        if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("md") {
            continue;
        }
        let file_name = match path.file_name().and_then(|s| s.to_str()) {
            Some(name) => name.to_string(),
            None => continue,
        };
        let modified = entry
            .metadata()
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        let display_title = display_title_from_file_name(&file_name);
        notes.push(RepositoryNote {
            path,
            file_name,
            display_title,
            modified,
        });
    }

    notes.sort_by(|a, b| b.modified.cmp(&a.modified).then(b.file_name.cmp(&a.file_name)));
    Ok(notes)
}

pub fn read_summary(path: &Path) -> io::Result<String> {
    fs::read_to_string(path)
}

fn display_title_from_file_name(file_name: &str) -> String {
    if let Some(caps) = FILE_NAME_RE.captures(file_name) {
        caps["title"].replace('_', " ")
    } else {
        file_name.trim_end_matches(".md").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn safe_filename_keeps_allowed_chars_and_collapses_whitespace() {
        assert_eq!(safe_filename("Weekly  sync notes"), "Weekly_sync_notes");
        assert_eq!(safe_filename("a/b\\c: d?"), "abc_d");
        assert_eq!(safe_filename("under_score-kept"), "under_score-kept");
    }

    #[test]
    fn safe_filename_falls_back_when_nothing_survives() {
        assert_eq!(safe_filename("???///"), "summary");
        assert_eq!(safe_filename(""), "summary");
    }

    #[test]
    fn saved_note_round_trips_title_and_body() {
        let dir = TempDir::new().expect("temp dir");
        let body = "First line.\n\nSecond paragraph.";
        let path =
            save_summary(dir.path(), "Meeting notes", body, "Text file", Some("notes.txt"))
                .expect("save");

        let content = read_summary(&path).expect("read back");
        let mut lines = content.lines();
        assert_eq!(lines.next(), Some("# Meeting notes"));
        assert!(content.contains("- Source type: Text file"));
        assert!(content.contains("- Source name: notes.txt"));

        let (_, read_body) = content.split_once("---\n").expect("separator present");
        assert_eq!(read_body.trim(), body);
    }

    #[test]
    fn missing_source_name_is_recorded_as_na() {
        let dir = TempDir::new().expect("temp dir");
        let path = save_summary(dir.path(), "t", "b", "Audio file", None).expect("save");
        let content = read_summary(&path).expect("read");
        assert!(content.contains("- Source name: N/A"));
    }

    #[test]
    fn same_second_saves_yield_distinct_files() {
        let dir = TempDir::new().expect("temp dir");
        // Saves race the wall clock; within one second the counter suffix
        // must keep the paths apart.
        let first = save_summary(dir.path(), "Same title", "a", "Text file", None).expect("save");
        let second = save_summary(dir.path(), "Same title", "b", "Text file", None).expect("save");
        let third = save_summary(dir.path(), "Same title", "c", "Text file", None).expect("save");

        assert_ne!(first, second);
        assert_ne!(second, third);
        assert!(first.exists() && second.exists() && third.exists());
    }

    #[test]
    fn list_summaries_returns_newest_first_and_ignores_non_md() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(dir.path().join("ignored.txt"), "nope").unwrap();
        let older = save_summary(dir.path(), "older", "a", "Text file", None).expect("save");
        let newer = save_summary(dir.path(), "newer", "b", "Text file", None).expect("save");

        // Make the ordering deterministic even on coarse mtime filesystems.
        let earlier = SystemTime::UNIX_EPOCH;
        let file = fs::File::options().append(true).open(&older).unwrap();
        drop(file);
        filetime_set(&older, earlier);

        let notes = list_summaries(dir.path()).expect("list");
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].path, newer);
        assert_eq!(notes[1].path, older);
    }

    #[test]
    fn display_title_strips_timestamp_and_counter() {
        assert_eq!(
            display_title_from_file_name("20260829_101500_Weekly_notes.md"),
            "Weekly notes"
        );
        assert_eq!(
            display_title_from_file_name("20260829_101500-2_Weekly_notes.md"),
            "Weekly notes"
        );
        assert_eq!(display_title_from_file_name("odd-name.md"), "odd-name");
    }

    #[test]
    fn list_rescans_directory_every_call() {
        let dir = TempDir::new().expect("temp dir");
        assert!(list_summaries(dir.path()).expect("list").is_empty());
        save_summary(dir.path(), "new", "b", "Text file", None).expect("save");
        assert_eq!(list_summaries(dir.path()).expect("list").len(), 1);
    }

    fn filetime_set(path: &Path, time: SystemTime) {
        // Touch the file back in time via the only portable hook std offers.
        let file = fs::File::options().write(true).open(path).unwrap();
        let _ = file.set_modified(time);
    }
}
