//! Invoice rendering

use crate::schema::*;
use crate::Result;
use billing::{format_amount, format_date_ddmmyyyy, Record};
use pdf_core::{Align, Overlay, PdfDocument};
use std::path::Path;

/// Role of a table row, which decides its fonts and alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Header,
    Charge,
    Total,
}

/// One row of the charge table, cells in column order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub kind: RowKind,
    pub cells: [String; 4],
}

impl TableRow {
    /// Alignment of the cell in `column`
    pub fn align(&self, column: usize) -> Align {
        match (self.kind, column) {
            (_, 0) => Align::Center,
            (RowKind::Charge | RowKind::Total, 2) => Align::Right,
            (RowKind::Total, 1) => Align::Right,
            _ => Align::Left,
        }
    }

    /// Font of the cell in `column`
    pub fn font(&self, column: usize, table: &TableLayout) -> Font {
        match (self.kind, column) {
            (RowKind::Header, _) => table.header_font,
            (RowKind::Total, 1 | 2) => table.total_font,
            _ => table.body_font,
        }
    }
}

/// Rows of the charge table: header, one row per printable charge, total
///
/// Charges are numbered after filtering, so serial numbers have no gaps.
pub fn table_rows(record: &Record, table: &TableLayout) -> Vec<TableRow> {
    let mut rows = vec![TableRow {
        kind: RowKind::Header,
        cells: table.headers.clone(),
    }];

    rows.extend(
        record
            .printable_charges()
            .enumerate()
            .map(|(i, charge)| TableRow {
                kind: RowKind::Charge,
                cells: [
                    (i + 1).to_string(),
                    charge.charge_type.clone(),
                    format_amount(charge.amount),
                    charge.remark.clone(),
                ],
            }),
    );

    rows.push(TableRow {
        kind: RowKind::Total,
        cells: [
            String::new(),
            table.total_label.clone(),
            format_amount(record.total),
            String::new(),
        ],
    });

    rows
}

/// Invoice renderer
///
/// Builds the overlay for a record and stamps it onto page one of the
/// pre-printed form.
pub struct InvoiceRenderer<'a> {
    layout: &'a InvoiceLayout,
}

impl<'a> InvoiceRenderer<'a> {
    /// Create a new renderer for a layout
    pub fn new(layout: &'a InvoiceLayout) -> Self {
        Self { layout }
    }

    /// Build the overlay page for a record
    pub fn build_overlay(&self, record: &Record) -> Overlay {
        let mut overlay = Overlay::new(self.layout.page.width, self.layout.page.height);

        self.draw_name(&mut overlay, record);
        self.draw_dates(&mut overlay, record);
        let table_bottom = self.draw_table(&mut overlay, record);
        self.draw_footer(&mut overlay, table_bottom);

        overlay
    }

    /// Stamp the record onto page one of `base` and serialize it
    ///
    /// Every other page of `base` is dropped.
    pub fn render(&self, base: &mut PdfDocument, record: &Record) -> Result<Vec<u8>> {
        let overlay = self.build_overlay(record);
        base.retain_first_page()?;
        base.stamp_overlay(1, &overlay)?;
        Ok(base.to_bytes()?)
    }

    /// Render onto the template PDF at `template_path`
    pub fn render_file<P: AsRef<Path>>(
        &self,
        template_path: P,
        record: &Record,
    ) -> Result<Vec<u8>> {
        let mut base = PdfDocument::open(template_path)?;
        self.render(&mut base, record)
    }

    /// Render onto a template PDF held in memory
    pub fn render_bytes(&self, template: &[u8], record: &Record) -> Result<Vec<u8>> {
        let mut base = PdfDocument::open_from_bytes(template)?;
        self.render(&mut base, record)
    }

    /// The overlay alone on a blank page
    pub fn render_overlay(&self, record: &Record) -> Result<Vec<u8>> {
        Ok(self.build_overlay(record).to_pdf_bytes()?)
    }

    fn draw_name(&self, overlay: &mut Overlay, record: &Record) {
        let block = &self.layout.name;
        let Position { x, y } = block.position;

        overlay.set_font(block.first_line_font.builtin(), block.first_line_font.size);
        overlay.draw_text(record.display_name(), x, y, Align::Left);

        overlay.set_font(block.font.builtin(), block.font.size);
        for (i, line) in record.continuation_lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let step = (i + 1) as f64 * block.line_step;
            overlay.draw_text(line, x, y - step, Align::Left);
        }
    }

    fn draw_dates(&self, overlay: &mut Overlay, record: &Record) {
        let block = &self.layout.dates;
        overlay.set_font(block.font.builtin(), block.font.size);

        for (value, pos) in [
            (&record.date, block.date),
            (&record.from_date, block.from_date),
            (&record.to_date, block.to_date),
        ] {
            overlay.draw_text(&format_date_ddmmyyyy(value), pos.x, pos.y, Align::Left);
        }
    }

    /// Draw the grid and cell text, returning the table's bottom edge
    fn draw_table(&self, overlay: &mut Overlay, record: &Record) -> f64 {
        let table = &self.layout.table;
        let rows = table_rows(record, table);

        let left = table.position.x;
        let right = left + table.width();
        let top = table.position.y;
        let bottom = table.bottom(rows.len());

        overlay.set_line_width(table.line_width);
        for r in 0..=rows.len() {
            let y = top - table.row_height * r as f64;
            overlay.line(left, y, right, y);
        }
        for c in 0..=table.column_widths.len() {
            let x = table.column_x(c);
            overlay.line(x, top, x, bottom);
        }

        for (r, row) in rows.iter().enumerate() {
            let row_bottom = top - table.row_height * (r + 1) as f64;

            for (c, text) in row.cells.iter().enumerate() {
                if text.is_empty() {
                    continue;
                }

                let font = row.font(c, table);
                let builtin = font.builtin();
                let cap_height = builtin.cap_height() as f64 * font.size as f64 / 1000.0;
                let baseline = row_bottom + (table.row_height - cap_height) / 2.0;

                let cell_x = table.column_x(c);
                let width = table.column_widths[c];
                let align = row.align(c);
                let x = match align {
                    Align::Left => cell_x + table.padding,
                    Align::Center => cell_x + width / 2.0,
                    Align::Right => cell_x + width - table.padding,
                };

                overlay.set_font(builtin, font.size);
                overlay.draw_text(text, x, baseline, align);
            }
        }

        bottom
    }

    fn draw_footer(&self, overlay: &mut Overlay, table_bottom: f64) {
        let footer = &self.layout.footer;
        overlay.set_font(footer.font.builtin(), footer.font.size);

        let mut y = table_bottom - footer.gap;
        for line in &footer.lines {
            overlay.draw_text(line, footer.x, y, Align::Left);
            y -= footer.line_step;
        }
    }
}
