// Rendering-surface contract and the plain-text adapter that backs it.
//
// The report emitter decides *what* to render; a surface decides how a
// cell ends up on a page. Surfaces own the page chrome: the header and
// footer repeat on every page without the emitter asking.
use std::fs;
use std::path::Path;

use crate::error::ReportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Header/footer content repeated on every page.
#[derive(Debug, Clone)]
pub struct PageChrome {
    pub title: String,
    pub generated_at: String,
}

/// Abstract drawing surface for paginated reports.
///
/// Widths are in surface units (characters for the text adapter); a cell
/// width of `0` means "the rest of the line", mirroring the convention of
/// common PDF cell APIs.
pub trait RenderSurface {
    fn add_page(&mut self);
    fn set_font(&mut self, style: FontStyle, size: u8);
    /// Draw one fixed-width cell. `advance` ends the current line.
    fn cell(&mut self, width: usize, text: &str, border: bool, align: Align, advance: bool);
    /// Draw a word-wrapped block spanning the full content width.
    fn multi_cell(&mut self, text: &str);
    /// End the current line and leave one blank line.
    fn line_break(&mut self);
    fn content_width(&self) -> usize;
    fn save(&mut self, path: &Path) -> Result<(), ReportError>;
}

const HEADER_LINES: usize = 3;

fn pad(text: &str, width: usize, align: Align) -> String {
    let clipped: String = text.chars().take(width).collect();
    match align {
        Align::Left => format!("{:<width$}", clipped),
        Align::Center => format!("{:^width$}", clipped),
        Align::Right => format!("{:>width$}", clipped),
    }
}

fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

/// Monospace page-grid surface serializing to a plain-text file.
///
/// Pages are a fixed number of body lines; overflowing a page starts the
/// next one automatically, re-drawing the chrome.
pub struct TextSurface {
    width: usize,
    body_lines: usize,
    chrome: PageChrome,
    pages: Vec<Vec<String>>,
    line: String,
}

impl TextSurface {
    pub fn new(chrome: PageChrome) -> Self {
        Self::with_geometry(120, 54, chrome)
    }

    pub fn with_geometry(width: usize, body_lines: usize, chrome: PageChrome) -> Self {
        Self {
            width,
            body_lines,
            chrome,
            pages: Vec::new(),
            line: String::new(),
        }
    }

    fn open_page(&mut self) {
        let mut page = Vec::with_capacity(HEADER_LINES + self.body_lines);
        page.push(pad(&self.chrome.title, self.width, Align::Center));
        page.push(pad(
            &format!("Generated on: {}", self.chrome.generated_at),
            self.width,
            Align::Center,
        ));
        page.push(String::new());
        self.pages.push(page);
    }

    fn flush_line(&mut self) {
        let text = std::mem::take(&mut self.line);
        let capacity = HEADER_LINES + self.body_lines;
        if self.pages.last().map_or(true, |p| p.len() >= capacity) {
            self.open_page();
        }
        if let Some(page) = self.pages.last_mut() {
            page.push(text);
        }
    }

    /// Rendered document text: pages padded to full height, footered with
    /// their page number, separated by form feeds.
    pub fn contents(&self) -> String {
        let total = self.pages.len();
        let mut out = String::new();
        for (i, page) in self.pages.iter().enumerate() {
            for line in page {
                out.push_str(line.trim_end());
                out.push('\n');
            }
            for _ in page.len()..(HEADER_LINES + self.body_lines) {
                out.push('\n');
            }
            out.push_str(pad(&format!("Page {}", i + 1), self.width, Align::Center).trim_end());
            out.push('\n');
            if i + 1 < total {
                out.push('\x0c');
                out.push('\n');
            }
        }
        out
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

impl RenderSurface for TextSurface {
    fn add_page(&mut self) {
        if !self.line.is_empty() {
            self.flush_line();
        }
        self.open_page();
    }

    fn set_font(&mut self, _style: FontStyle, _size: u8) {
        // A monospace sink has no weights or sizes; richer backends honor
        // the style the emitter names here.
    }

    fn cell(&mut self, width: usize, text: &str, border: bool, align: Align, advance: bool) {
        let w = if width == 0 {
            self.width.saturating_sub(self.line.chars().count())
        } else {
            width
        };
        if border {
            self.line.push('|');
            self.line.push_str(&pad(text, w.saturating_sub(2), align));
            self.line.push('|');
        } else {
            self.line.push_str(&pad(text, w, align));
        }
        if advance {
            self.flush_line();
        }
    }

    fn multi_cell(&mut self, text: &str) {
        if !self.line.is_empty() {
            self.flush_line();
        }
        for line in wrap(text, self.width) {
            self.line.push_str(&line);
            self.flush_line();
        }
    }

    fn line_break(&mut self) {
        if !self.line.is_empty() {
            self.flush_line();
        }
        self.flush_line();
    }

    fn content_width(&self) -> usize {
        self.width
    }

    fn save(&mut self, path: &Path) -> Result<(), ReportError> {
        if !self.line.is_empty() {
            self.flush_line();
        }
        fs::write(path, self.contents())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chrome() -> PageChrome {
        PageChrome {
            title: "Test Report".to_string(),
            generated_at: "2024-03-01 12:00:00".to_string(),
        }
    }

    fn surface() -> TextSurface {
        TextSurface::with_geometry(40, 4, chrome())
    }

    #[test]
    fn pages_carry_header_and_footer() {
        let mut s = surface();
        s.add_page();
        s.cell(0, "hello", false, Align::Left, true);
        let text = s.contents();
        assert!(text.contains("Test Report"));
        assert!(text.contains("Generated on: 2024-03-01 12:00:00"));
        assert!(text.contains("Page 1"));
    }

    #[test]
    fn overflow_starts_a_new_page_with_chrome() {
        let mut s = surface();
        s.add_page();
        for i in 0..6 {
            s.cell(0, &format!("line {}", i), false, Align::Left, true);
        }
        assert_eq!(s.page_count(), 2);
        let text = s.contents();
        assert!(text.contains("Page 2"));
        assert_eq!(text.matches("Test Report").count(), 2);
    }

    #[test]
    fn zero_width_cell_takes_the_rest_of_the_line() {
        let mut s = surface();
        s.add_page();
        s.cell(10, "a", false, Align::Left, false);
        s.cell(0, "b", true, Align::Left, true);
        let line = &s.pages[0][HEADER_LINES];
        assert_eq!(line.chars().count(), 40);
        assert!(line.ends_with('|'));
    }

    #[test]
    fn multi_cell_wraps_words() {
        let mut s = surface();
        s.add_page();
        s.multi_cell("one two three four five six seven eight nine ten");
        let body = &s.pages[0][HEADER_LINES..];
        assert!(body.len() > 1);
        assert!(body.iter().all(|l| l.chars().count() <= 40));
    }

    #[test]
    fn save_into_a_missing_directory_is_a_render_error() {
        let mut s = surface();
        s.add_page();
        s.cell(0, "hello", false, Align::Left, true);
        let result = s.save(Path::new("no/such/dir/report.txt"));
        assert!(matches!(result, Err(ReportError::Render(_))));
    }

    #[test]
    fn save_writes_the_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        let mut s = surface();
        s.add_page();
        s.cell(0, "hello", false, Align::Left, true);
        s.save(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, s.contents());
    }
}
