//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

const QUALIFIER: &str = "dev";
const ORGANIZATION: &str = "recon";
const APPLICATION: &str = "recon-tui";

/// Keep this many archived logs besides `latest.log`.
const MAX_OLD_LOGS: usize = 25;

const LATEST_LOG: &str = "latest.log";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Cache directory, home of the log files.
///
/// - Linux: `$XDG_CACHE_HOME/recon-tui` or `~/.cache/recon-tui`
/// - macOS: `~/Library/Caches/dev.recon.recon-tui`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Config directory.
///
/// - Linux: `$XDG_CONFIG_HOME/recon-tui` or `~/.config/recon-tui`
/// - macOS: `~/Library/Application Support/dev.recon.recon-tui`
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.json"))
}

pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(LATEST_LOG))
}

/// Archive the previous `latest.log` and prune old archives.
///
/// Call at startup before creating the new log file.
pub fn rotate_logs() {
    let Some(cache) = cache_dir() else { return };
    rotate_logs_in(&cache, &chrono::Local::now().format("%Y%m%d_%H%M%S").to_string());
}

fn rotate_logs_in(dir: &Path, timestamp: &str) {
    let latest = dir.join(LATEST_LOG);
    if latest.exists() {
        let _ = fs::rename(&latest, dir.join(format!("{timestamp}.log")));
    }
    cleanup_old_logs(dir);
}

fn cleanup_old_logs(dir: &Path) {
    let Ok(entries) = fs::read_dir(dir) else { return };

    let mut logs: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".log") && name != LATEST_LOG
        })
        .collect();

    // Oldest first; timestamped names sort chronologically.
    logs.sort_by_key(|e| e.file_name());

    if logs.len() > MAX_OLD_LOGS {
        for entry in logs.iter().take(logs.len() - MAX_OLD_LOGS) {
            let _ = fs::remove_file(entry.path());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("recon-tui-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn latest_log_is_archived() {
        let dir = scratch_dir("archive");
        fs::write(dir.join(LATEST_LOG), "old run").unwrap();

        rotate_logs_in(&dir, "20240115_093000");

        assert!(!dir.join(LATEST_LOG).exists());
        let archived = fs::read_to_string(dir.join("20240115_093000.log")).unwrap();
        assert_eq!(archived, "old run");
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn old_logs_are_pruned() {
        let dir = scratch_dir("prune");
        for i in 0..(MAX_OLD_LOGS + 3) {
            fs::write(dir.join(format!("20240101_{i:06}.log")), "").unwrap();
        }
        fs::write(dir.join("notes.txt"), "").unwrap();

        rotate_logs_in(&dir, "20240102_000000");

        let logs = fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".log"))
            .count();
        assert_eq!(logs, MAX_OLD_LOGS);
        assert!(!dir.join("20240101_000000.log").exists());
        assert!(dir.join("notes.txt").exists());
        fs::remove_dir_all(&dir).unwrap();
    }
}
