// Page layout of the check-in sheet. Positions are in millimeters, measured from the
// top left corner of the page. Nothing here depends on the PDF library.

use crate::checkin::*;

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 10.0;
/// A row never goes below this distance from the bottom edge.
pub const BOTTOM_MARGIN_MM: f32 = 20.0;

pub const TITLE_HEIGHT_MM: f32 = 10.0;
pub const TITLE_LINE_HEIGHT_MM: f32 = 8.0;
pub const ROW_HEIGHT_MM: f32 = 10.0;
pub const LINE_HEIGHT_MM: f32 = 6.0;
pub const CELL_PADDING_MM: f32 = 1.0;

pub const TITLE_FONT_SIZE: f32 = 16.0;
pub const BODY_FONT_SIZE: f32 = 12.0;

pub const CHECKBOX: &str = "[ ]";

const MM_PER_PT: f32 = 25.4 / 72.0;

// Glyph widths of the standard Type 1 fonts, in 1/1000 em, for the characters 32 to 126.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' ' to '/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // digits
    278, 278, 584, 584, 584, 556, 1015, // ':' to '@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A' to 'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N' to 'Z'
    278, 278, 278, 469, 556, 333, // '[' to '`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a' to 'm'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n' to 'z'
    334, 260, 334, 584, // '{' to '~'
];

const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' ' to '/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // digits
    333, 333, 584, 584, 584, 611, 975, // ':' to '@'
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // 'A' to 'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N' to 'Z'
    333, 278, 333, 584, 556, 333, // '[' to '`'
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // 'a' to 'm'
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // 'n' to 'z'
    389, 280, 389, 584, // '{' to '~'
];

// Used for the characters outside of the table.
const DEFAULT_GLYPH_WIDTH: u16 = 556;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum FontStyle {
    Regular,
    Bold,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Align {
    Left,
    Center,
}

fn glyph_width(c: char, style: FontStyle) -> u16 {
    let table = match style {
        FontStyle::Regular => &HELVETICA_WIDTHS,
        FontStyle::Bold => &HELVETICA_BOLD_WIDTHS,
    };
    let code = c as u32;
    if (32..=126).contains(&code) {
        table[(code - 32) as usize]
    } else {
        DEFAULT_GLYPH_WIDTH
    }
}

/// Width of the text once printed, in millimeters.
pub fn text_width_mm(text: &str, style: FontStyle, font_size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| glyph_width(c, style) as u32).sum();
    units as f32 / 1000.0 * font_size * MM_PER_PT
}

/// Greedy word wrap: words are separated by spaces, and each line takes as many
/// words as fit in `max_width_mm`. A word that does not fit on a line of its own
/// is cut between characters. Empty text gives no line.
pub fn wrap_text(text: &str, max_width_mm: f32, style: FontStyle, font_size: f32) -> Vec<String> {
    let fits = |s: &str| text_width_mm(s, style, font_size) <= max_width_mm;
    let mut lines: Vec<String> = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let candidate = if line.is_empty() {
            word.to_string()
        } else {
            format!("{} {}", line, word)
        };
        if fits(&candidate) {
            line = candidate;
            continue;
        }
        if !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if fits(word) {
            line = word.to_string();
            continue;
        }
        // Cut the long word. A single glyph always goes on its line, even when too wide.
        for c in word.chars() {
            line.push(c);
            if !fits(&line) && line.chars().count() > 1 {
                line.pop();
                lines.push(std::mem::take(&mut line));
                line.push(c);
            }
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// A column of the table.
#[derive(PartialEq, Debug, Clone)]
pub struct ColumnSpec {
    pub title: &'static str,
    pub width: f32,
    pub border: bool,
}

/// The columns span the 190 mm between the margins.
pub fn table_columns(has_notes: bool) -> Vec<ColumnSpec> {
    let col = |title: &'static str, width: f32, border: bool| ColumnSpec {
        title,
        width,
        border,
    };
    if has_notes {
        vec![
            col("", 10.0, false),
            col("Last Name, First Name", 50.0, true),
            col("Tickets", 18.0, true),
            col("Seats", 60.0, true),
            col("Notes", 52.0, true),
        ]
    } else {
        vec![
            col("", 10.0, false),
            col("Last Name, First Name", 60.0, true),
            col("Tickets", 20.0, true),
            col("Seats", 100.0, true),
        ]
    }
}

/// A text run, positioned on its baseline.
#[derive(PartialEq, Debug, Clone)]
pub struct TextRun {
    pub x: f32,
    pub baseline: f32,
    pub text: String,
}

/// A rectangle of the table with its (already wrapped) lines of text.
#[derive(PartialEq, Debug, Clone)]
pub struct CellBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub lines: Vec<String>,
    pub line_height: f32,
    pub style: FontStyle,
    pub font_size: f32,
    pub align: Align,
    pub border: bool,
}

impl CellBox {
    /// The lines are stacked from the top and the block is centered vertically.
    pub fn text_runs(&self) -> Vec<TextRun> {
        let block_height = self.lines.len() as f32 * self.line_height;
        let top = self.y + (self.height - block_height) / 2.0;
        let ascent = 0.3 * self.font_size * MM_PER_PT;
        self.lines
            .iter()
            .enumerate()
            .map(|(idx, line)| {
                let x = match self.align {
                    Align::Left => self.x + CELL_PADDING_MM,
                    Align::Center => {
                        self.x
                            + (self.width - text_width_mm(line, self.style, self.font_size)) / 2.0
                    }
                };
                TextRun {
                    x,
                    baseline: top
                        + idx as f32 * self.line_height
                        + self.line_height / 2.0
                        + ascent,
                    text: line.clone(),
                }
            })
            .collect()
    }
}

#[derive(PartialEq, Debug, Clone, Default)]
pub struct PageLayout {
    pub cells: Vec<CellBox>,
}

#[derive(PartialEq, Debug, Clone, Default)]
pub struct SheetLayout {
    pub pages: Vec<PageLayout>,
}

/// Height of a table row holding `lines` lines of text.
pub fn row_height(lines: usize) -> f32 {
    (lines.max(1) as f32 * LINE_HEIGHT_MM + 2.0 * CELL_PADDING_MM).max(ROW_HEIGHT_MM)
}

// The wrapped lines of each cell of a row.
fn wrap_row(texts: &[String], columns: &[ColumnSpec], style: FontStyle) -> Vec<Vec<String>> {
    texts
        .iter()
        .zip(columns.iter())
        .map(|(t, col)| {
            wrap_text(
                t,
                col.width - 2.0 * CELL_PADDING_MM,
                style,
                BODY_FONT_SIZE,
            )
        })
        .collect()
}

fn max_lines(wrapped: &[Vec<String>]) -> usize {
    wrapped.iter().map(|l| l.len()).max().unwrap_or(0)
}

fn record_texts(r: &PatronRecord, has_notes: bool) -> Vec<String> {
    let mut texts = vec![
        CHECKBOX.to_string(),
        r.display_name(),
        r.tickets_ordered.to_string(),
        r.seats_text(),
    ];
    if has_notes {
        texts.push(r.notes_text());
    }
    texts
}

// Fills the pages from top to bottom.
struct SheetWriter<'a> {
    columns: &'a [ColumnSpec],
    pages: Vec<PageLayout>,
    cells: Vec<CellBox>,
    y: f32,
    rows_on_page: usize,
}

impl<'a> SheetWriter<'a> {
    fn bottom() -> f32 {
        PAGE_HEIGHT_MM - BOTTOM_MARGIN_MM
    }

    // All the cells of a row share the height of the tallest one so that the borders line up.
    fn place_row(&mut self, wrapped: Vec<Vec<String>>, style: FontStyle) {
        let height = row_height(max_lines(&wrapped));
        let mut x = MARGIN_MM;
        for (lines, col) in wrapped.into_iter().zip(self.columns.iter()) {
            self.cells.push(CellBox {
                x,
                y: self.y,
                width: col.width,
                height,
                lines,
                line_height: LINE_HEIGHT_MM,
                style,
                font_size: BODY_FONT_SIZE,
                align: Align::Left,
                border: col.border,
            });
            x += col.width;
        }
        self.y += height;
    }

    fn add_header(&mut self) {
        let titles: Vec<String> = self.columns.iter().map(|c| c.title.to_string()).collect();
        let wrapped = wrap_row(&titles, self.columns, FontStyle::Bold);
        self.place_row(wrapped, FontStyle::Bold);
    }

    fn new_page(&mut self) {
        debug!(
            "layout_sheet: page {} full after {} rows",
            self.pages.len() + 1,
            self.rows_on_page
        );
        self.pages.push(PageLayout {
            cells: std::mem::take(&mut self.cells),
        });
        self.y = MARGIN_MM;
        self.rows_on_page = 0;
        self.add_header();
    }

    // A row taller than the space left on an empty page is cut between lines and
    // continues on the next pages.
    fn add_row(&mut self, mut wrapped: Vec<Vec<String>>) {
        loop {
            let needed = row_height(max_lines(&wrapped));
            if self.y + needed <= Self::bottom() {
                break;
            }
            if self.rows_on_page > 0 {
                self.new_page();
                continue;
            }
            let room = Self::bottom() - self.y - 2.0 * CELL_PADDING_MM;
            let fitting = ((room / LINE_HEIGHT_MM).floor() as usize).max(1);
            if fitting >= max_lines(&wrapped) {
                break;
            }
            let rest: Vec<Vec<String>> = wrapped
                .iter_mut()
                .map(|lines| lines.split_off(fitting.min(lines.len())))
                .collect();
            debug!(
                "layout_sheet: splitting a row after {} lines, {} lines left",
                fitting,
                max_lines(&rest)
            );
            self.place_row(wrapped, FontStyle::Regular);
            self.rows_on_page += 1;
            self.new_page();
            wrapped = rest;
        }
        self.place_row(wrapped, FontStyle::Regular);
        self.rows_on_page += 1;
    }

    fn finish(mut self) -> SheetLayout {
        self.pages.push(PageLayout { cells: self.cells });
        SheetLayout { pages: self.pages }
    }
}

/// Places the title, the header row and one row per patron on as many pages as needed.
/// The header row is repeated at the top of every page.
pub fn layout_sheet(report: &PatronReport, title: &str, has_notes: bool) -> SheetLayout {
    let columns = table_columns(has_notes);

    let title_width = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
    let title_lines = wrap_text(title, title_width, FontStyle::Bold, TITLE_FONT_SIZE);
    let title_height = (title_lines.len() as f32 * TITLE_LINE_HEIGHT_MM).max(TITLE_HEIGHT_MM);
    let title_cell = CellBox {
        x: MARGIN_MM,
        y: MARGIN_MM,
        width: title_width,
        height: title_height,
        lines: title_lines,
        line_height: TITLE_LINE_HEIGHT_MM,
        style: FontStyle::Bold,
        font_size: TITLE_FONT_SIZE,
        align: Align::Center,
        border: false,
    };

    let mut writer = SheetWriter {
        columns: &columns,
        pages: Vec::new(),
        cells: vec![title_cell],
        y: MARGIN_MM + title_height,
        rows_on_page: 0,
    };
    writer.add_header();
    for r in report.records.iter() {
        let wrapped = wrap_row(&record_texts(r, has_notes), &columns, FontStyle::Regular);
        writer.add_row(wrapped);
    }
    writer.finish()
}
