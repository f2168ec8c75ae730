//! # Page Layout
//!
//! A tiny cursor-based layout engine on top of lopdf content streams.
//!
//! ## Coordinate System
//! ```text
//!  (0,842) ┌──────────────────────────────────────┐
//!          │ ← MARGIN →                           │
//!          │  CONTENT_TOP ─ cursor starts here    │
//!          │      │                               │
//!          │      ▼ advance(dy) moves down        │
//!          │                                      │
//!          │  CONTENT_BOTTOM ─ no row below this  │
//!          │        "Page i of n"  (footer band)  │
//!    (0,0) └──────────────────────────────────────┘ (595,0)
//! ```
//!
//! PDF's origin is the bottom-left corner, so "down the page" means a
//! decreasing `y`. Callers ask [`Layout::ensure_space`] before drawing a
//! block; when the block doesn't fit, a fresh page is started and the
//! caller can repeat any header it needs.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use crate::error::{RenderError, RenderResult};

/// A4 portrait, in points.
pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;
pub const MARGIN: f32 = 40.0;

/// Height reserved at the bottom of each page for the page number.
const FOOTER_BAND: f32 = 30.0;

pub const CONTENT_TOP: f32 = PAGE_HEIGHT - MARGIN;
pub const CONTENT_BOTTOM: f32 = MARGIN + FOOTER_BAND;
pub const CONTENT_RIGHT: f32 = PAGE_WIDTH - MARGIN;

/// The two base-14 faces every document uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource_name(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

// =============================================================================
// Text Metrics
// =============================================================================

/// Helvetica advance widths for ASCII 32..=126, in 1/1000 em.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Approximate rendered width of `text` at `size` points.
///
/// Uses regular Helvetica metrics for both faces; bold runs a few percent
/// wider, which only matters for right-aligned columns by a point or two.
pub fn text_width(text: &str, size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|c| match c as u32 {
            code @ 32..=126 => HELVETICA_WIDTHS[(code - 32) as usize] as u32,
            _ => 556,
        })
        .sum();
    units as f32 * size / 1000.0
}

/// Shortens `text` with a trailing "..." so it fits in `max_width`.
pub fn fit_text(text: &str, max_width: f32, size: f32) -> String {
    if text_width(text, size) <= max_width {
        return text.to_string();
    }

    let mut fitted = String::new();
    for c in text.chars() {
        fitted.push(c);
        if text_width(&fitted, size) + text_width("...", size) > max_width {
            fitted.pop();
            break;
        }
    }
    format!("{}...", fitted.trim_end())
}

/// Greedy word wrap. Words longer than a line are cut with [`fit_text`].
pub fn wrap_text(text: &str, max_width: f32, size: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", line, word)
            };

            if text_width(&candidate, size) <= max_width {
                line = candidate;
            } else {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                line = fit_text(word, max_width, size);
            }
        }
        if !line.is_empty() {
            lines.push(line);
        }
    }

    lines
}

/// Encodes text for a WinAnsi simple font.
///
/// Latin-1 characters map to themselves, a few typographic characters map
/// to their WinAnsi slots, the rupee sign becomes "Rs." and anything else
/// becomes '?'.
pub fn encode_text(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    for c in text.chars() {
        match c {
            ' '..='~' | '\u{A0}'..='\u{FF}' => bytes.push(c as u8),
            '\u{20AC}' => bytes.push(0x80),
            '\u{2018}' => bytes.push(0x91),
            '\u{2019}' => bytes.push(0x92),
            '\u{201C}' => bytes.push(0x93),
            '\u{201D}' => bytes.push(0x94),
            '\u{2022}' => bytes.push(0x95),
            '\u{2013}' => bytes.push(0x96),
            '\u{2014}' => bytes.push(0x97),
            '\u{20B9}' => bytes.extend_from_slice(b"Rs."),
            '\t' => bytes.push(b' '),
            _ => bytes.push(b'?'),
        }
    }
    bytes
}

// =============================================================================
// Layout
// =============================================================================

/// Accumulates drawing operations page by page.
#[derive(Debug)]
pub struct Layout {
    pages: Vec<Vec<Operation>>,
    y: f32,
}

impl Default for Layout {
    fn default() -> Self {
        Layout::new()
    }
}

impl Layout {
    pub fn new() -> Self {
        Layout {
            pages: vec![Vec::new()],
            y: CONTENT_TOP,
        }
    }

    /// Current baseline position.
    #[inline]
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Moves the cursor down by `dy` points.
    #[inline]
    pub fn advance(&mut self, dy: f32) {
        self.y -= dy;
    }

    #[inline]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn new_page(&mut self) {
        self.pages.push(Vec::new());
        self.y = CONTENT_TOP;
    }

    /// Makes sure a block of `height` points fits below the cursor.
    ///
    /// Returns `true` if a new page had to be started.
    pub fn ensure_space(&mut self, height: f32) -> RenderResult<bool> {
        if height > CONTENT_TOP - CONTENT_BOTTOM {
            return Err(RenderError::Layout(format!(
                "block of {height:.0}pt is taller than a page"
            )));
        }

        if self.y - height < CONTENT_BOTTOM {
            self.new_page();
            return Ok(true);
        }
        Ok(false)
    }

    fn ops(&mut self) -> &mut Vec<Operation> {
        // `pages` starts non-empty and only grows
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Draws `text` with its left edge at `x` and baseline at `y`.
    pub fn text(&mut self, x: f32, y: f32, font: Font, size: f32, text: &str) {
        if text.is_empty() {
            return;
        }
        let ops = self.ops();
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new(
            "Tf",
            vec![font.resource_name().into(), size.into()],
        ));
        ops.push(Operation::new("Td", vec![x.into(), y.into()]));
        ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(encode_text(text))],
        ));
        ops.push(Operation::new("ET", vec![]));
    }

    /// Draws `text` with its right edge at `right`.
    pub fn text_right(&mut self, right: f32, y: f32, font: Font, size: f32, text: &str) {
        let x = right - text_width(text, size);
        self.text(x, y, font, size, text);
    }

    /// Draws `text` centred on the page.
    pub fn text_centered(&mut self, y: f32, font: Font, size: f32, text: &str) {
        let x = (PAGE_WIDTH - text_width(text, size)) / 2.0;
        self.text(x, y, font, size, text);
    }

    /// Sets the fill gray level (0 black, 1 white) for following text and shapes.
    pub fn gray(&mut self, level: f32) {
        self.ops().push(Operation::new("g", vec![level.into()]));
    }

    /// Horizontal rule from `x1` to `x2` at `y`.
    pub fn rule(&mut self, x1: f32, x2: f32, y: f32, width: f32) {
        let ops = self.ops();
        ops.push(Operation::new("w", vec![width.into()]));
        ops.push(Operation::new("m", vec![x1.into(), y.into()]));
        ops.push(Operation::new("l", vec![x2.into(), y.into()]));
        ops.push(Operation::new("S", vec![]));
    }

    /// Filled rectangle with its lower-left corner at (`x`, `y`).
    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, gray: f32) {
        self.gray(gray);
        let ops = self.ops();
        ops.push(Operation::new(
            "re",
            vec![x.into(), y.into(), width.into(), height.into()],
        ));
        ops.push(Operation::new("f", vec![]));
        self.gray(0.0);
    }

    /// Stamps "Page i of n" on every page and hands back the operations.
    pub fn finish(mut self) -> Vec<Vec<Operation>> {
        let total = self.pages.len();
        for index in 0..total {
            let label = format!("Page {} of {}", index + 1, total);
            let x = (PAGE_WIDTH - text_width(&label, 8.0)) / 2.0;
            let ops = &mut self.pages[index];
            ops.push(Operation::new("BT", vec![]));
            ops.push(Operation::new("Tf", vec!["F1".into(), 8.0f32.into()]));
            ops.push(Operation::new("Td", vec![x.into(), (MARGIN - 10.0).into()]));
            ops.push(Operation::new(
                "Tj",
                vec![Object::string_literal(encode_text(&label))],
            ));
            ops.push(Operation::new("ET", vec![]));
        }
        self.pages
    }
}

// =============================================================================
// Document Assembly
// =============================================================================

/// Wraps finished pages into a complete PDF file.
///
/// No creation date or random file id is written, so identical pages
/// produce identical bytes.
pub fn build_document(pages: Vec<Vec<Operation>>, title: &str) -> RenderResult<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            Font::Regular.resource_name() => regular_id,
            Font::Bold.resource_name() => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for operations in pages {
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    let media_box: Vec<Object> = vec![
        Object::Integer(0),
        Object::Integer(0),
        PAGE_WIDTH.into(),
        PAGE_HEIGHT.into(),
    ];
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            "Resources" => resources_id,
            "MediaBox" => media_box,
        }),
    );

    let info_id = doc.add_object(dictionary! {
        "Title" => Object::string_literal(encode_text(title)),
        "Producer" => Object::string_literal("Bizvoice"),
    });
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);

    doc.compress();

    let mut out = Vec::new();
    doc.save_to(&mut out)?;
    Ok(out)
}

// =============================================================================
// Unit Tests
// =============================================================================
