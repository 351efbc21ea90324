// Text layout for paginated rendering: fixed page geometry and line placement.
// CPU-bound; callers run it inside tokio::task::spawn_blocking.

pub mod font_metrics;
pub mod paginator;

// Re-export the public API consumed by other modules (render, main).
pub use font_metrics::{default_page_config, PageConfig};
pub use paginator::{paginate, PageLayout};

/// Splits resume text into its physical lines.
///
/// Splits on `\n` and drops a trailing `\r` from each line. The empty string is one empty
/// line, and a trailing newline yields a trailing empty line, so the result is never empty.
pub fn resume_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}
