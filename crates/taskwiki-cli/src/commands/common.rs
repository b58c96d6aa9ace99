//! Shared helpers for CLI commands.

use chrono::Duration;
use taskwiki_core::{Config, Wiki, WikiConfig};

/// Load configuration and open the wiki rooted at the effective root.
pub fn open_wiki() -> Result<(Config, Wiki), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let root = config.wiki_root()?;
    let wiki = Wiki::open(WikiConfig { root })?;
    Ok((config, wiki))
}

/// Compact `1h02m` / `34m` / `12s` rendering of a duration.
pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.num_seconds().max(0);
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{hours}h{minutes:02}m")
    } else if minutes > 0 {
        format!("{minutes}m")
    } else {
        format!("{seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_rendering() {
        assert_eq!(format_duration(Duration::seconds(12)), "12s");
        assert_eq!(format_duration(Duration::minutes(34)), "34m");
        assert_eq!(format_duration(Duration::minutes(62)), "1h02m");
        assert_eq!(format_duration(Duration::seconds(-5)), "0s");
    }
}
