// Draws a sheet layout with printpdf.

use printpdf::{BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point};

use crate::checkin::pdf_layout::*;
use crate::checkin::*;

const BORDER_THICKNESS_PT: f32 = 0.57;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

impl Fonts {
    fn get(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
        }
    }
}

// The layout counts from the top of the page, PDF from the bottom.
fn pdf_y(y: f32) -> Mm {
    Mm(PAGE_HEIGHT_MM - y)
}

fn draw_border(layer: &PdfLayerReference, cell: &CellBox) {
    let (left, right) = (cell.x, cell.x + cell.width);
    let (top, bottom) = (cell.y, cell.y + cell.height);
    let points = vec![
        (Point::new(Mm(left), pdf_y(top)), false),
        (Point::new(Mm(right), pdf_y(top)), false),
        (Point::new(Mm(right), pdf_y(bottom)), false),
        (Point::new(Mm(left), pdf_y(bottom)), false),
    ];
    layer.add_line(Line {
        points,
        is_closed: true,
    });
}

fn draw_page(layer: &PdfLayerReference, page: &PageLayout, fonts: &Fonts) {
    layer.set_outline_thickness(BORDER_THICKNESS_PT);
    for cell in page.cells.iter() {
        if cell.border {
            draw_border(layer, cell);
        }
        for run in cell.text_runs() {
            layer.use_text(
                run.text,
                cell.font_size,
                Mm(run.x),
                pdf_y(run.baseline),
                fonts.get(cell.style),
            );
        }
    }
}

/// Renders all the pages and returns the bytes of the PDF document.
pub fn render_sheet(layout: &SheetLayout, title: &str) -> CheckinResult<Vec<u8>> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        title,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Layer 1",
    );
    let regular = match doc.add_builtin_font(BuiltinFont::Helvetica) {
        Ok(f) => f,
        Err(e) => whatever!("Cannot load the Helvetica font: {:?}", e),
    };
    let bold = match doc.add_builtin_font(BuiltinFont::HelveticaBold) {
        Ok(f) => f,
        Err(e) => whatever!("Cannot load the Helvetica-Bold font: {:?}", e),
    };
    let fonts = Fonts { regular, bold };

    for (idx, page) in layout.pages.iter().enumerate() {
        let layer = if idx == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (p, l) = doc.add_page(
                Mm(PAGE_WIDTH_MM),
                Mm(PAGE_HEIGHT_MM),
                format!("Layer {}", idx + 1),
            );
            doc.get_page(p).get_layer(l)
        };
        debug!(
            "render_sheet: page {} with {} cells",
            idx + 1,
            page.cells.len()
        );
        draw_page(&layer, page, &fonts);
    }

    match doc.save_to_bytes() {
        Ok(bytes) => Ok(bytes),
        Err(e) => whatever!("Error generating the PDF: {:?}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patron(i: usize) -> PatronRecord {
        PatronRecord {
            first_name: "Pat".to_string(),
            last_name: format!("Ron{:03}", i),
            tickets_ordered: 1,
            seats: vec![format!("R{}", i)],
            notes: vec!["Wheelchair access".to_string()],
            ticket_ids: vec![i.to_string()],
        }
    }

    #[test]
    fn empty_sheet() {
        let layout = layout_sheet(&PatronReport::default(), "Patron Check-in List", false);
        let bytes = render_sheet(&layout, "Patron Check-in List").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn several_pages() {
        let report = PatronReport {
            records: (0..80).map(patron).collect(),
            ..PatronReport::default()
        };
        let layout = layout_sheet(&report, "Gala night", true);
        assert!(layout.pages.len() > 1);
        let bytes = render_sheet(&layout, "Gala night").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        let single = render_sheet(
            &layout_sheet(&PatronReport::default(), "Gala night", true),
            "Gala night",
        )
        .unwrap();
        assert!(bytes.len() > single.len());
    }

    #[test]
    fn flips_the_vertical_axis() {
        assert_eq!(pdf_y(0.0), Mm(PAGE_HEIGHT_MM));
        assert_eq!(pdf_y(PAGE_HEIGHT_MM), Mm(0.0));
    }
}
