//! Logging setup for the viewer
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=gridview::grid::selection=debug` - module-level filtering
//!
//! Logs are also written to `~/.config/gridview/logs/gridview.log` with daily
//! rotation, always at debug level.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize tracing subscriber with console and file logging
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender =
                tracing_appender::rolling::daily(logs_dir, crate::config_paths::LOG_FILE_PREFIX);
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Compact description of the selection, logged around state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSnapshot {
    pub current: Option<(usize, usize)>,
    pub rows: usize,
    pub cols: usize,
}

impl SelectionSnapshot {
    pub fn from_selection(selection: &crate::grid::SelectionState) -> Self {
        Self {
            current: selection.current().map(|p| (p.row, p.col)),
            rows: selection.multi_rows().len(),
            cols: selection.multi_cols().len(),
        }
    }

    /// Describe what changed between two snapshots
    pub fn diff(&self, other: &SelectionSnapshot) -> Option<String> {
        let mut changes = Vec::new();
        if self.current != other.current {
            changes.push(format!("current: {:?} → {:?}", self.current, other.current));
        }
        if self.rows != other.rows || self.cols != other.cols {
            changes.push(format!(
                "extent: {}x{} → {}x{}",
                self.rows, self.cols, other.rows, other.cols
            ));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_diff() {
        let a = SelectionSnapshot {
            current: Some((0, 0)),
            rows: 1,
            cols: 1,
        };
        let b = SelectionSnapshot {
            current: Some((3, 0)),
            rows: 4,
            cols: 1,
        };
        assert_eq!(a.diff(&a), None);
        assert_eq!(
            b.diff(&a).as_deref(),
            Some("current: Some((3, 0)) → Some((0, 0)); extent: 4x1 → 1x1")
        );
    }
}
