pub(crate) mod config;
pub(crate) mod init;
pub(crate) mod project;
pub(crate) mod track;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

/// Print a green check-marked confirmation line.
pub(crate) fn log_success(msg: &str) {
    log::info!("{} {}", "✓".if_supports_color(Stdout, |t| t.green()), msg);
}

/// Show `value`, or a dimmed placeholder when it is empty.
pub(crate) fn or_none(value: &str) -> String {
    if value.is_empty() {
        "(none)".if_supports_color(Stdout, |t| t.dimmed()).to_string()
    } else {
        value.to_string()
    }
}
