//! PDF writer for paginated layouts.
//!
//! Emits a PDF 1.4 file by hand: catalog, page tree, one Courier font resource shared by all
//! pages, a document info dictionary, then a page object and content stream per page.
//! Content streams are left uncompressed.

use chrono::{DateTime, Utc};

use crate::layout::paginator::Page;
use crate::layout::{PageConfig, PageLayout};
use crate::render::RenderError;

const CATALOG_OBJ: u32 = 1;
const PAGES_OBJ: u32 = 2;
const FONT_OBJ: u32 = 3;
const INFO_OBJ: u32 = 4;
const FIRST_PAGE_OBJ: u32 = 5;

const PRODUCER: &str = "resume-api";

/// Tracks byte offsets of indirect objects while the file is written.
struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<(u32, usize)>,
}

impl PdfWriter {
    fn new() -> Self {
        let mut buf = Vec::with_capacity(8 * 1024);
        buf.extend_from_slice(b"%PDF-1.4\n");
        // Binary marker so transfer tools treat the file as binary.
        buf.extend_from_slice(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n']);
        Self {
            buf,
            offsets: Vec::new(),
        }
    }

    fn write_object(&mut self, obj_num: u32, body: &str) {
        self.offsets.push((obj_num, self.buf.len()));
        self.buf
            .extend_from_slice(format!("{obj_num} 0 obj\n{body}\nendobj\n").as_bytes());
    }

    fn write_stream_object(&mut self, obj_num: u32, data: &[u8]) {
        self.offsets.push((obj_num, self.buf.len()));
        self.buf.extend_from_slice(
            format!("{obj_num} 0 obj\n<< /Length {} >>\nstream\n", data.len()).as_bytes(),
        );
        self.buf.extend_from_slice(data);
        self.buf.extend_from_slice(b"\nendstream\nendobj\n");
    }

    fn finish(mut self) -> Result<Vec<u8>, RenderError> {
        self.offsets.sort_by_key(|&(num, _)| num);
        let size = self.offsets.len() + 1;
        // Object numbers are allocated densely from 1.
        if self
            .offsets
            .iter()
            .enumerate()
            .any(|(i, &(num, _))| num as usize != i + 1)
        {
            return Err(RenderError::Pdf("object numbers are not contiguous".into()));
        }

        let xref_offset = self.buf.len();
        let mut tail = format!("xref\n0 {size}\n0000000000 65535 f \n");
        for &(_, offset) in &self.offsets {
            tail.push_str(&format!("{offset:010} 00000 n \n"));
        }
        tail.push_str(&format!(
            "trailer\n<< /Size {size} /Root {CATALOG_OBJ} 0 R /Info {INFO_OBJ} 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n"
        ));
        self.buf.extend_from_slice(tail.as_bytes());
        Ok(self.buf)
    }
}

/// Serializes `layout` into PDF bytes. Every placed line yields exactly one `Tj` operator.
pub fn write_pdf(layout: &PageLayout, config: &PageConfig) -> Result<Vec<u8>, RenderError> {
    let mut writer = PdfWriter::new();

    let page_objs: Vec<u32> = (0..layout.pages.len() as u32)
        .map(|i| FIRST_PAGE_OBJ + 2 * i)
        .collect();
    let kids = page_objs
        .iter()
        .map(|n| format!("{n} 0 R"))
        .collect::<Vec<_>>()
        .join(" ");

    writer.write_object(
        CATALOG_OBJ,
        &format!("<< /Type /Catalog /Pages {PAGES_OBJ} 0 R >>"),
    );
    writer.write_object(
        PAGES_OBJ,
        &format!(
            "<< /Type /Pages /Kids [{kids}] /Count {} /MediaBox [0 0 {} {}] >>",
            page_objs.len(),
            fmt_num(config.page_width_pt),
            fmt_num(config.page_height_pt)
        ),
    );
    writer.write_object(
        FONT_OBJ,
        &format!(
            "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
            config.font.base_font
        ),
    );
    writer.write_object(INFO_OBJ, &info_dict(Utc::now()));

    for (page, &page_obj) in layout.pages.iter().zip(&page_objs) {
        let content_obj = page_obj + 1;
        writer.write_object(
            page_obj,
            &format!(
                "<< /Type /Page /Parent {PAGES_OBJ} 0 R /Resources << /Font << /F1 {FONT_OBJ} 0 R >> >> /Contents {content_obj} 0 R >>"
            ),
        );
        writer.write_stream_object(content_obj, &page_content(page, config));
    }

    writer.finish()
}

fn info_dict(created: DateTime<Utc>) -> String {
    format!(
        "<< /Producer ({PRODUCER}) /CreationDate (D:{}Z) >>",
        created.format("%Y%m%d%H%M%S")
    )
}

fn page_content(page: &Page, config: &PageConfig) -> Vec<u8> {
    let size = fmt_num(config.font_size_pt);
    let x = fmt_num(config.margin_left_pt);
    let mut data = Vec::with_capacity(page.lines.len() * 96);
    for line in &page.lines {
        data.extend_from_slice(
            format!("BT /F1 {size} Tf {x} {} Td (", fmt_num(line.baseline_y)).as_bytes(),
        );
        push_literal(&mut data, &encode_win_ansi(&line.text));
        data.extend_from_slice(b") Tj ET\n");
    }
    data
}

/// Maps text onto WinAnsiEncoding. Tabs become spaces; anything without a WinAnsi glyph
/// becomes `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\t' => b' ',
            ' '..='~' => c as u8,
            '\u{A0}'..='\u{FF}' => c as u32 as u8,
            '€' => 0x80,
            '‚' => 0x82,
            'ƒ' => 0x83,
            '„' => 0x84,
            '…' => 0x85,
            '†' => 0x86,
            '‡' => 0x87,
            'ˆ' => 0x88,
            '‰' => 0x89,
            'Š' => 0x8A,
            '‹' => 0x8B,
            'Œ' => 0x8C,
            'Ž' => 0x8E,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '˜' => 0x98,
            '™' => 0x99,
            'š' => 0x9A,
            '›' => 0x9B,
            'œ' => 0x9C,
            'ž' => 0x9E,
            'Ÿ' => 0x9F,
            _ => b'?',
        })
        .collect()
}

/// Appends `bytes` as the body of a PDF literal string.
fn push_literal(out: &mut Vec<u8>, bytes: &[u8]) {
    for &b in bytes {
        match b {
            b'(' | b')' | b'\\' => {
                out.push(b'\\');
                out.push(b);
            }
            0x20..=0x7E => out.push(b),
            _ => out.extend_from_slice(format!("\\{b:03o}").as_bytes()),
        }
    }
}

fn fmt_num(n: f32) -> String {
    if n.fract() == 0.0 {
        format!("{n:.0}")
    } else {
        let s = format!("{n:.2}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{default_page_config, paginate};
    use crate::test_support::{pdf_page_count, pdf_shown_strings, pdf_text_lines};

    fn render(lines: &[&str]) -> Vec<u8> {
        let config = default_page_config();
        write_pdf(&paginate(lines, &config), &config).unwrap()
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack.windows(needle.len()).position(|w| w == needle)
    }

    #[test]
    fn test_file_has_header_and_eof_marker() {
        let pdf = render(&["Jane Doe"]);
        assert!(pdf.starts_with(b"%PDF-1.4\n"));
        assert!(pdf.ends_with(b"%%EOF\n"));
    }

    #[test]
    fn test_startxref_points_at_xref_table() {
        let pdf = render(&["Jane Doe", "Engineer"]);
        let marker = find(&pdf, b"startxref\n").unwrap() + b"startxref\n".len();
        let tail = std::str::from_utf8(&pdf[marker..]).unwrap();
        let offset: usize = tail.lines().next().unwrap().parse().unwrap();
        assert!(pdf[offset..].starts_with(b"xref\n"));
    }

    #[test]
    fn test_xref_entries_point_at_their_objects() {
        let lines: Vec<String> = (0..60).map(|i| format!("line {i}")).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let pdf = render(&refs);

        let xref = find(&pdf, b"xref\n").unwrap();
        let table = std::str::from_utf8(&pdf[xref..]).unwrap();
        let mut rows = table.lines().skip(1);
        let count: usize = rows
            .next()
            .unwrap()
            .split(' ')
            .nth(1)
            .unwrap()
            .parse()
            .unwrap();
        // Catalog, pages, font, info, then two objects per page.
        assert_eq!(count, 1 + 4 + 2 * 2);
        rows.next();
        for obj_num in 1..count {
            let offset: usize = rows.next().unwrap()[..10].parse().unwrap();
            let header = format!("{obj_num} 0 obj\n");
            assert!(pdf[offset..].starts_with(header.as_bytes()), "object {obj_num}");
        }
    }

    #[test]
    fn test_one_show_operator_per_line_in_order() {
        let lines = ["Jane Doe", "", "(555) 010-2000", "C:\\path"];
        let pdf = render(&lines);
        let shown = pdf_shown_strings(&pdf);
        let expected: Vec<Vec<u8>> = lines.iter().map(|l| l.as_bytes().to_vec()).collect();
        assert_eq!(shown, expected);
        assert_eq!(pdf_page_count(&pdf), 1);
    }

    #[test]
    fn test_page_count_follows_layout() {
        let lines: Vec<String> = (0..100).map(|i| format!("line {i}")).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let pdf = render(&refs);
        assert_eq!(pdf_page_count(&pdf), 3);
        assert_eq!(pdf_shown_strings(&pdf).len(), 100);
        assert!(find(&pdf, b"/Count 3").is_some());
    }

    #[test]
    fn test_latin1_text_uses_win_ansi_codes() {
        let pdf = render(&["Café – naïve"]);
        let shown = pdf_shown_strings(&pdf);
        assert_eq!(shown[0], b"Caf\xE9 \x96 na\xEFve".to_vec());
    }

    #[test]
    fn test_unmappable_characters_become_question_marks() {
        let pdf = render(&["日本"]);
        assert_eq!(pdf_shown_strings(&pdf)[0], b"??".to_vec());
    }

    #[test]
    fn test_pdf_reader_extracts_every_line() {
        let lines: Vec<String> = (1..=60).map(|i| format!("line {i} (x) \\ Café")).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let pdf = render(&refs);

        assert_eq!(pdf_text_lines(&pdf), lines);
        assert_eq!(pdf_page_count(&pdf), 2);
    }

    #[test]
    fn test_tabs_become_spaces() {
        let pdf = render(&["a\tb", "Skills:\tRust"]);
        let shown = pdf_shown_strings(&pdf);
        assert_eq!(shown[0], b"a b".to_vec());
        assert_eq!(shown[1], b"Skills: Rust".to_vec());
        assert_eq!(pdf_text_lines(&pdf), vec!["a b", "Skills: Rust"]);
    }

    #[test]
    fn test_font_resource_is_courier() {
        let pdf = render(&["x"]);
        assert!(find(&pdf, b"/BaseFont /Courier /Encoding /WinAnsiEncoding").is_some());
    }

    #[test]
    fn test_fmt_num_trims_trailing_zeros() {
        assert_eq!(fmt_num(72.0), "72");
        assert_eq!(fmt_num(709.5), "709.5");
        assert_eq!(fmt_num(0.25), "0.25");
    }
}
