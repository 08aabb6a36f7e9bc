//! Renders a [ReportTable] to a PDF document.
//!
//! The table is laid out on A4 pages with one inch margins, centred
//! horizontally. Rows that do not fit on a page continue on the next one.

use std::ops::Range;

use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::report::{
    fonts::{encode_win_ansi, text_width, truncate_to_width},
    style::{Alignment, CellKind, CellStyle, Color, Font, Span, cell_kind},
    table::{ColumnWidths, ReportTable},
};

/// A4 in points.
pub const PAGE_WIDTH: f32 = 595.2756;
pub const PAGE_HEIGHT: f32 = 841.8898;
const MARGIN: f32 = 72.0;
const FRAME_PADDING: f32 = 6.0;

/// The widest a table with automatic column widths may be.
const MAX_AUTO_TABLE_WIDTH: f32 = PAGE_WIDTH - 2.0 * (MARGIN + FRAME_PADDING);
const AVAILABLE_HEIGHT: f32 = PAGE_HEIGHT - 2.0 * (MARGIN + FRAME_PADDING);
const TABLE_TOP: f32 = PAGE_HEIGHT - MARGIN - FRAME_PADDING;

/// The proportion of the font size that glyphs descend below the baseline.
const DESCENT: f32 = 0.207;

const REGULAR_FONT_NAME: Name<'static> = Name(b"F1");
const BOLD_FONT_NAME: Name<'static> = Name(b"F2");

/// Every cell's style along with the size of the table.
struct StyledTable<'a> {
    table: &'a ReportTable,
    columns: usize,
    rows: usize,
    spans: Vec<Span>,
}

impl<'a> StyledTable<'a> {
    fn new(table: &'a ReportTable) -> Self {
        let columns = table.column_count();
        let rows = table.rows.len();
        let spans = table.style.spans(columns, rows);

        Self {
            table,
            columns,
            rows,
            spans,
        }
    }

    fn style(&self, column: usize, row: usize) -> CellStyle {
        self.table
            .style
            .cell_style(column, row, self.columns, self.rows)
    }

    fn text(&self, column: usize, row: usize) -> &str {
        self.table.rows[row]
            .get(column)
            .map(String::as_str)
            .unwrap_or_default()
    }

    fn is_spanned(&self, column: usize, row: usize) -> bool {
        cell_kind(&self.spans, column, row) != CellKind::Single
    }
}

/// The size and position of every row and column.
#[derive(Debug, PartialEq)]
struct Layout {
    column_widths: Vec<f32>,
    row_heights: Vec<f32>,
    /// The rows drawn on each page.
    pages: Vec<Range<usize>>,
}

fn layout(table: &StyledTable) -> Layout {
    let column_widths = column_widths(table);
    let row_heights = (0..table.rows)
        .map(|row| {
            (0..table.columns)
                .map(|column| table.style(column, row).min_height())
                .fold(0.0, f32::max)
        })
        .collect::<Vec<_>>();
    let pages = paginate(&row_heights, AVAILABLE_HEIGHT);

    Layout {
        column_widths,
        row_heights,
        pages,
    }
}

fn column_widths(table: &StyledTable) -> Vec<f32> {
    if let ColumnWidths::Fixed(widths) = &table.table.column_widths {
        let mut widths = widths.clone();
        widths.resize(table.columns, widths.last().copied().unwrap_or(0.0));
        return widths;
    }

    let widths = (0..table.columns)
        .map(|column| {
            (0..table.rows)
                .filter(|&row| !table.is_spanned(column, row))
                .map(|row| {
                    let style = table.style(column, row);
                    let text = encode_win_ansi(table.text(column, row));

                    text_width(&text, style.font, style.font_size)
                        + style.left_padding
                        + style.right_padding
                })
                .fold(0.0, f32::max)
        })
        .collect::<Vec<_>>();

    let total: f32 = widths.iter().sum();
    if total > MAX_AUTO_TABLE_WIDTH {
        let scale = MAX_AUTO_TABLE_WIDTH / total;
        widths.into_iter().map(|width| width * scale).collect()
    } else {
        widths
    }
}

/// Split rows into pages so that the rows on each page fit in `available_height`.
///
/// A row taller than a page is placed on a page of its own.
fn paginate(row_heights: &[f32], available_height: f32) -> Vec<Range<usize>> {
    let mut pages = Vec::new();
    let mut page_start = 0;
    let mut used = 0.0;

    for (row, &height) in row_heights.iter().enumerate() {
        if used + height > available_height && row > page_start {
            pages.push(page_start..row);
            page_start = row;
            used = 0.0;
        }

        used += height;
    }

    if page_start < row_heights.len() || pages.is_empty() {
        pages.push(page_start..row_heights.len());
    }

    pages
}

fn set_fill_color(content: &mut Content, color: Color) {
    content.set_fill_rgb(color.red, color.green, color.blue);
}

fn font_name(font: Font) -> Name<'static> {
    match font {
        Font::Helvetica => REGULAR_FONT_NAME,
        Font::HelveticaBold => BOLD_FONT_NAME,
    }
}

/// A cell positioned on a page.
struct PlacedCell {
    column: usize,
    row: usize,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

/// The cells drawn on the page holding `rows`, skipping cells covered by a merged cell.
fn place_cells(table: &StyledTable, layout: &Layout, rows: &Range<usize>) -> Vec<PlacedCell> {
    let table_width: f32 = layout.column_widths.iter().sum();
    let left = (PAGE_WIDTH - table_width) / 2.0;
    let mut cells = Vec::new();
    let mut top = TABLE_TOP;

    for row in rows.clone() {
        let row_height = layout.row_heights[row];
        let mut x = left;

        for column in 0..table.columns {
            let column_width = layout.column_widths[column];

            let (width, height) = match cell_kind(&table.spans, column, row) {
                CellKind::Single => (column_width, row_height),
                CellKind::SpanOrigin(span) => {
                    let width: f32 = layout.column_widths[span.columns].iter().sum();
                    let last_row = (*span.rows.end()).min(rows.end - 1);
                    let height: f32 = layout.row_heights[row..=last_row].iter().sum();
                    (width, height)
                }
                CellKind::Covered => {
                    x += column_width;
                    continue;
                }
            };

            cells.push(PlacedCell {
                column,
                row,
                x,
                y: top - height,
                width,
                height,
            });
            x += column_width;
        }

        top -= row_height;
    }

    cells
}

fn draw_page(table: &StyledTable, cells: &[PlacedCell]) -> Content {
    let mut content = Content::new();

    for cell in cells {
        if let Some(background) = table.style(cell.column, cell.row).background {
            content.save_state();
            set_fill_color(&mut content, background);
            content.rect(cell.x, cell.y, cell.width, cell.height);
            content.fill_nonzero();
            content.restore_state();
        }
    }

    for cell in cells {
        let style = table.style(cell.column, cell.row);
        let text = encode_win_ansi(table.text(cell.column, cell.row));

        if text.is_empty() {
            continue;
        }

        let available = cell.width - style.left_padding - style.right_padding;
        let text = truncate_to_width(&text, style.font, style.font_size, available);
        let width = text_width(&text, style.font, style.font_size);
        let x = match style.alignment {
            Alignment::Left => cell.x + style.left_padding,
            Alignment::Center => cell.x + style.left_padding + (available - width) / 2.0,
        };
        let baseline = cell.y + style.bottom_padding + DESCENT * style.font_size;

        content.begin_text();
        content.set_font(font_name(style.font), style.font_size);
        set_fill_color(&mut content, style.text_color);
        content.next_line(x, baseline);
        content.show(Str(&text));
        content.end_text();
    }

    for cell in cells {
        if let Some((line_width, color)) = table.style(cell.column, cell.row).grid {
            content.save_state();
            content.set_stroke_rgb(color.red, color.green, color.blue);
            content.set_line_width(line_width);
            content.rect(cell.x, cell.y, cell.width, cell.height);
            content.stroke();
            content.restore_state();
        }
    }

    content
}

/// Render `table` to the bytes of a PDF document.
pub fn render_table_pdf(table: &ReportTable) -> Vec<u8> {
    let styled = StyledTable::new(table);
    let layout = layout(&styled);

    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let regular_font_id = Ref::new(3);
    let bold_font_id = Ref::new(4);
    let info_id = Ref::new(5);
    let first_page_id = 6;

    // Each page takes two ids, one for the page and one for its content.
    let page_ids = (0..layout.pages.len())
        .map(|page| {
            let id = first_page_id + 2 * page as i32;
            (Ref::new(id), Ref::new(id + 1))
        })
        .collect::<Vec<_>>();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id)
        .kids(page_ids.iter().map(|&(page_id, _)| page_id))
        .count(page_ids.len() as i32);

    for (rows, &(page_id, content_id)) in layout.pages.iter().zip(&page_ids) {
        let mut page = pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
        page.parent(page_tree_id);
        page.contents(content_id);
        page.resources()
            .fonts()
            .pair(REGULAR_FONT_NAME, regular_font_id)
            .pair(BOLD_FONT_NAME, bold_font_id);
        page.finish();

        let cells = place_cells(&styled, &layout, rows);
        let content = draw_page(&styled, &cells).finish();
        pdf.stream(content_id, &content);
    }

    pdf.type1_font(regular_font_id)
        .base_font(Name(b"Helvetica"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    pdf.type1_font(bold_font_id)
        .base_font(Name(b"Helvetica-Bold"))
        .encoding_predefined(Name(b"WinAnsiEncoding"));
    pdf.document_info(info_id)
        .title(TextStr(&table.document_title))
        .producer(TextStr("expense_tracker"));

    tracing::debug!(
        "Rendered report \"{}\" with {} rows on {} pages",
        table.document_title,
        table.rows.len(),
        layout.pages.len()
    );

    pdf.finish()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use time::{Month, macros::date};

    use crate::{
        report::table::{all_transactions_table, monthly_table},
        transaction::Transaction,
    };

    use super::{AVAILABLE_HEIGHT, StyledTable, layout, paginate, render_table_pdf};

    fn transactions(count: i64) -> Vec<Transaction> {
        (1..=count)
            .map(|id| Transaction {
                id,
                title: format!("Purchase {id}"),
                amount: Decimal::new(id * 100, 2),
                category: "Misc".to_owned(),
                date: date!(2024 - 01 - 05),
                image: None,
            })
            .collect()
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack
            .windows(needle.len())
            .any(|window| window == needle)
    }

    #[test]
    fn renders_a_pdf_document_with_cell_text() {
        let table = all_transactions_table(&transactions(2));

        let pdf = render_table_pdf(&table);

        assert!(pdf.starts_with(b"%PDF-"));
        assert!(contains(&pdf, b"(Purchase 1)"));
        assert!(contains(&pdf, b"(Purchase 2)"));
        assert!(contains(&pdf, b"(Amount)"));
        assert!(contains(&pdf, b"/Helvetica-Bold"));
    }

    #[test]
    fn header_labels_are_not_truncated_when_data_is_narrower() {
        let short = Transaction {
            id: 1,
            title: "Tea".to_owned(),
            amount: Decimal::new(100, 2),
            category: "A".to_owned(),
            date: date!(2024 - 01 - 05),
            image: None,
        };

        for transactions in [vec![], vec![short]] {
            let pdf = render_table_pdf(&all_transactions_table(&transactions));

            for label in ["(ID)", "(Title)", "(Amount)", "(Category)", "(Date)"] {
                assert!(
                    contains(&pdf, label.as_bytes()),
                    "want header {label} in PDF with {} transactions",
                    transactions.len()
                );
            }
            assert!(!contains(&pdf, b"...)"));
        }
    }

    #[test]
    fn monthly_title_is_drawn_once() {
        let table = monthly_table(Month::January, 2024, &transactions(1));

        let pdf = render_table_pdf(&table);

        assert!(contains(&pdf, b"(January 2024 - Monthly Expenses)"));
    }

    #[test]
    fn fixed_widths_are_kept() {
        let table = monthly_table(Month::January, 2024, &[]);

        let layout = layout(&StyledTable::new(&table));

        assert_eq!(layout.column_widths, vec![70.0, 120.0, 80.0, 120.0, 100.0]);
    }

    #[test]
    fn auto_widths_fit_the_widest_cell() {
        let mut long = transactions(1);
        long[0].title = "A much longer title than the rest".to_owned();
        let table = all_transactions_table(&long);

        let layout = layout(&StyledTable::new(&table));

        assert!(layout.column_widths[1] > layout.column_widths[0]);
        assert_eq!(layout.row_heights.len(), 2);
        // The header has extra padding at the bottom.
        assert!(layout.row_heights[0] > layout.row_heights[1]);
    }

    #[test]
    fn long_tables_continue_on_the_next_page() {
        let table = all_transactions_table(&transactions(100));

        let layout = layout(&StyledTable::new(&table));

        assert!(layout.pages.len() > 1);
        let drawn_rows: usize = layout.pages.iter().map(|page| page.len()).sum();
        assert_eq!(drawn_rows, 101);
        assert_eq!(layout.pages[0].start, 0);
        assert_eq!(layout.pages.last().map(|page| page.end), Some(101));
    }

    #[test]
    fn paginate_splits_when_page_is_full() {
        assert_eq!(paginate(&[10.0, 10.0, 10.0], 25.0), vec![0..2, 2..3]);
        assert_eq!(paginate(&[10.0, 10.0], 20.0), vec![0..2]);
        assert_eq!(paginate(&[50.0, 10.0], 25.0), vec![0..1, 1..2]);
        assert_eq!(paginate(&[], AVAILABLE_HEIGHT), vec![0..0]);
    }
}
