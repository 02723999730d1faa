//! Label and timestamp formatting for revision rows.

#![forbid(unsafe_code)]

use chrono::{DateTime, Utc};
use revdeck_core::RevisionMeta;

/// Formatting collaborators used by the projector.
pub trait RevisionFormatter: Send + Sync {
    fn revision_label(&self, meta: &RevisionMeta) -> String;
    fn created_label(&self, created: Option<DateTime<Utc>>) -> String;
}

#[derive(Debug, Clone, Copy)]
pub struct DefaultFormatter {
    /// Reference time for relative labels; `None` means the wall clock.
    pub now: Option<DateTime<Utc>>,
    pub relative: bool,
}

impl Default for DefaultFormatter {
    fn default() -> Self { Self { now: None, relative: true } }
}

impl DefaultFormatter {
    pub fn relative_at(now: DateTime<Utc>) -> Self { Self { now: Some(now), relative: true } }
    pub fn absolute() -> Self { Self { now: None, relative: false } }
}

fn ago(n: i64, unit: &str) -> String {
    if n == 1 { format!("1 {} ago", unit) } else { format!("{} {}s ago", n, unit) }
}

pub fn render_relative(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - ts).num_seconds().max(0);
    let days = secs / 86_400;
    if secs < 10 { "just now".to_string() }
    else if secs < 60 { ago(secs, "second") }
    else if secs < 3600 { ago(secs / 60, "minute") }
    else if secs < 86_400 { ago(secs / 3600, "hour") }
    else if days < 30 { ago(days, "day") }
    else if days < 365 { ago(days / 30, "month") }
    else { ago(days / 365, "year") }
}

impl RevisionFormatter for DefaultFormatter {
    fn revision_label(&self, meta: &RevisionMeta) -> String {
        meta.revision
            .as_deref()
            .filter(|r| !r.is_empty())
            .or(meta.workspace_name.as_deref().filter(|w| !w.is_empty()))
            .map(|s| s.to_string())
            .unwrap_or_else(|| meta.lifecycle.to_string())
    }

    fn created_label(&self, created: Option<DateTime<Utc>>) -> String {
        let Some(ts) = created else { return "-".to_string() };
        if self.relative {
            render_relative(ts, self.now.unwrap_or_else(Utc::now))
        } else {
            ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use revdeck_core::Lifecycle;

    fn meta(revision: Option<&str>, workspace: Option<&str>, lifecycle: Lifecycle) -> RevisionMeta {
        RevisionMeta {
            name: "repo-abc".into(),
            package_name: "pkg".into(),
            repository: "repo".into(),
            revision: revision.map(|s| s.to_string()),
            workspace_name: workspace.map(|s| s.to_string()),
            lifecycle,
            created: None,
        }
    }

    #[test]
    fn label_prefers_revision_then_workspace_then_lifecycle() {
        let f = DefaultFormatter::default();
        assert_eq!(f.revision_label(&meta(Some("v3"), Some("ws"), Lifecycle::Published)), "v3");
        assert_eq!(f.revision_label(&meta(Some(""), Some("ws-2"), Lifecycle::Draft)), "ws-2");
        assert_eq!(f.revision_label(&meta(None, None, Lifecycle::Proposed)), "Proposed");
    }

    #[test]
    fn relative_labels() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let f = DefaultFormatter::relative_at(now);
        assert_eq!(f.created_label(None), "-");
        assert_eq!(f.created_label(Some(now)), "just now");
        assert_eq!(f.created_label(Some(now + Duration::minutes(5))), "just now");
        assert_eq!(f.created_label(Some(now - Duration::seconds(30))), "30 seconds ago");
        assert_eq!(f.created_label(Some(now - Duration::minutes(1))), "1 minute ago");
        assert_eq!(f.created_label(Some(now - Duration::hours(5))), "5 hours ago");
        assert_eq!(f.created_label(Some(now - Duration::days(3))), "3 days ago");
        assert_eq!(f.created_label(Some(now - Duration::days(65))), "2 months ago");
        assert_eq!(f.created_label(Some(now - Duration::days(800))), "2 years ago");
    }

    #[test]
    fn absolute_label() {
        let ts = Utc.with_ymd_and_hms(2022, 6, 13, 14, 2, 3).unwrap();
        assert_eq!(DefaultFormatter::absolute().created_label(Some(ts)), "2022-06-13 14:02:03 UTC");
    }
}
