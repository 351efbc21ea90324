//! Fixed font metrics and page geometry for paginated rendering.
//!
//! Resumes are set in a standard PDF base font, so no font file is embedded and the metric is
//! exact rather than approximated: Courier advances every glyph by 600/1000 em.
//! All lengths are PDF points (1/72 inch).

/// Metrics for one of the 14 standard PDF fonts.
#[derive(Debug, PartialEq)]
pub struct FontMetrics {
    /// PostScript name used as `/BaseFont` in the PDF font dictionary.
    pub base_font: &'static str,
    /// Advance width of every glyph, in em units.
    pub char_width_em: f32,
}

pub static COURIER: FontMetrics = FontMetrics {
    base_font: "Courier",
    char_width_em: 0.6,
};

impl FontMetrics {
    /// Rendered width of a string in points at `font_size_pt`.
    pub fn measure_str(&self, s: &str, font_size_pt: f32) -> f32 {
        s.chars().count() as f32 * self.char_width_em * font_size_pt
    }
}

/// Page geometry and type settings for the paginated format.
///
/// Not user-configurable; constructed once at startup via `default_page_config`.
#[derive(Debug, Clone)]
pub struct PageConfig {
    pub font: &'static FontMetrics,
    pub font_size_pt: f32,
    /// Vertical distance between consecutive baselines.
    pub line_height_pt: f32,
    pub page_width_pt: f32,
    pub page_height_pt: f32,
    pub margin_top_pt: f32,
    pub margin_bottom_pt: f32,
    pub margin_left_pt: f32,
    pub margin_right_pt: f32,
}

/// US letter (8.5" × 11"), 1" margins, Courier 11pt on a 14pt line: 46 lines per page.
pub fn default_page_config() -> PageConfig {
    PageConfig {
        font: &COURIER,
        font_size_pt: 11.0,
        line_height_pt: 14.0,
        page_width_pt: 612.0,
        page_height_pt: 792.0,
        margin_top_pt: 72.0,
        margin_bottom_pt: 72.0,
        margin_left_pt: 72.0,
        margin_right_pt: 72.0,
    }
}

impl PageConfig {
    /// Horizontal space between the left and right margins.
    pub fn text_width_pt(&self) -> f32 {
        self.page_width_pt - self.margin_left_pt - self.margin_right_pt
    }

    /// Vertical space between the top and bottom margins.
    pub fn usable_height_pt(&self) -> f32 {
        self.page_height_pt - self.margin_top_pt - self.margin_bottom_pt
    }

    /// Maximum number of lines a single page can hold.
    pub fn lines_per_page(&self) -> usize {
        (self.usable_height_pt() / self.line_height_pt).floor() as usize
    }

    /// True if `line` is wider than the text area and will run past the right margin.
    pub fn overflows(&self, line: &str) -> bool {
        self.font.measure_str(line, self.font_size_pt) > self.text_width_pt()
    }
}
