//! Pagination: places resume lines onto fixed-size pages.
//!
//! Every input line becomes exactly one output line. Lines are never wrapped: a line wider
//! than the text area is placed as-is and marked `overflows`. Pages fill top to bottom; a new
//! page starts when the space left above the bottom margin cannot hold another line.

use crate::layout::font_metrics::PageConfig;

/// A line positioned on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    /// Baseline y coordinate in PDF user space (origin bottom-left).
    pub baseline_y: f32,
    /// Wider than the text area; emitted unwrapped.
    pub overflows: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
}

/// Result of paginating a resume. Always holds at least one page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub pages: Vec<Page>,
}

impl PageLayout {
    pub fn line_count(&self) -> usize {
        self.pages.iter().map(|p| p.lines.len()).sum()
    }

    pub fn overflowing_lines(&self) -> usize {
        self.pages
            .iter()
            .flat_map(|p| &p.lines)
            .filter(|l| l.overflows)
            .count()
    }
}

/// Lays `lines` out on pages of `config` geometry.
pub fn paginate(lines: &[&str], config: &PageConfig) -> PageLayout {
    let top = config.page_height_pt - config.margin_top_pt;
    let mut pages = vec![Page::default()];
    let mut cursor = top;

    for &line in lines {
        if cursor - config.line_height_pt < config.margin_bottom_pt {
            pages.push(Page::default());
            cursor = top;
        }

        let placed = PlacedLine {
            text: line.to_string(),
            baseline_y: cursor - config.font_size_pt,
            overflows: config.overflows(line),
        };
        // `pages` is never empty.
        if let Some(page) = pages.last_mut() {
            page.lines.push(placed);
        }
        cursor -= config.line_height_pt;
    }

    PageLayout { pages }
}
