use colored::Colorize;

use super::cache::UpdateRecord;
use crate::config::PACKAGE_NAME;

/// Command users run to upgrade.
pub fn upgrade_command() -> String {
    format!("npm install -g {}", PACKAGE_NAME)
}

/// Upgrade notice for an outdated record, or `None` when nothing should be shown.
pub fn format_notice(record: Option<&UpdateRecord>) -> Option<String> {
    let record = record?;
    if record.is_outdated != Some(true) {
        return None;
    }

    let current = record.current.as_deref().unwrap_or("unknown");
    let latest = record.latest.as_deref().unwrap_or("unknown");
    Some(format!(
        "{}  {} {} → {}\n   Run {} to update",
        "⚠".yellow(),
        "New version available!".bold(),
        current.dimmed(),
        latest.green(),
        upgrade_command().cyan()
    ))
}

/// Print the upgrade notice if the record says the tool is outdated.
pub fn display_update_notification(record: Option<&UpdateRecord>) {
    if let Some(notice) = format_notice(record) {
        println!("\n{}\n", notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(is_outdated: Option<bool>) -> UpdateRecord {
        UpdateRecord {
            current: Some("1.0.0".to_string()),
            latest: Some("2.0.0".to_string()),
            is_outdated,
            timestamp: 0,
            status: 200,
            status_text: "OK".to_string(),
            error: None,
        }
    }

    #[test]
    fn test_outdated_notice_mentions_both_versions() {
        colored::control::set_override(false);
        let notice = format_notice(Some(&record(Some(true)))).unwrap();
        assert!(notice.contains("1.0.0 → 2.0.0"));
        assert!(notice.contains("npm install -g @codeinspector/cli"));
    }

    #[test]
    fn test_no_notice_when_current_or_unknown() {
        assert!(format_notice(Some(&record(Some(false)))).is_none());
        assert!(format_notice(Some(&record(None))).is_none());
        assert!(format_notice(None).is_none());
    }
}
