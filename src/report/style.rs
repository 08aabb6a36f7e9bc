//! A declarative description of how a report table looks.
//!
//! A [TableStyle] is a list of [StyleCommand]s, each applying to a
//! rectangular [CellRange]. Commands are applied in order, so a later command
//! overrides an earlier one for the cells they share.

use std::ops::RangeInclusive;

/// An RGB colour with components from 0.0 to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl Color {
    const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
        }
    }

    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const LIGHT_BLUE: Self = Self::rgb(173, 216, 230);
    pub const LIGHT_GREY: Self = Self::rgb(211, 211, 211);
    pub const WHITE_SMOKE: Self = Self::rgb(245, 245, 245);
}

/// The standard fonts available to reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

/// Horizontal placement of text within a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
}

/// A rectangle of cells given by its top left and bottom right corners as
/// `(column, row)` pairs, both inclusive.
///
/// Negative indices count back from the end, so `(-1, -1)` is the bottom
/// right cell of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub start: (i32, i32),
    pub end: (i32, i32),
}

impl CellRange {
    pub const fn new(start: (i32, i32), end: (i32, i32)) -> Self {
        Self { start, end }
    }

    /// The column and row indices covered by the range in a table of the
    /// given size. Either range is empty if the range lies outside the table.
    pub fn resolve(
        &self,
        columns: usize,
        rows: usize,
    ) -> (RangeInclusive<usize>, RangeInclusive<usize>) {
        (
            resolve_span(self.start.0, self.end.0, columns),
            resolve_span(self.start.1, self.end.1, rows),
        )
    }

    fn contains(&self, column: usize, row: usize, columns: usize, rows: usize) -> bool {
        let (column_range, row_range) = self.resolve(columns, rows);
        column_range.contains(&column) && row_range.contains(&row)
    }
}

fn resolve_span(start: i32, end: i32, len: usize) -> RangeInclusive<usize> {
    let len = i64::try_from(len).unwrap_or(i64::MAX);
    let absolute = |index: i32| {
        let index = i64::from(index);
        if index < 0 { len + index } else { index }
    };

    let start = absolute(start).max(0);
    let end = absolute(end).min(len - 1);

    match (usize::try_from(start), usize::try_from(end)) {
        (Ok(start), Ok(end)) if start <= end => start..=end,
        _ => RangeInclusive::new(1, 0),
    }
}

/// One styling instruction for a range of cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StyleCommand {
    /// Fill the cells with a colour.
    Background(CellRange, Color),
    /// Set the colour of the text.
    TextColor(CellRange, Color),
    Align(CellRange, Alignment),
    FontName(CellRange, Font),
    /// Set the font size in points.
    FontSize(CellRange, f32),
    /// Set the space between the text and the bottom of the cell in points.
    BottomPadding(CellRange, f32),
    /// Draw lines of the given width and colour around every cell.
    Grid(CellRange, f32, Color),
    /// Merge the cells into one cell that shows the text of the top left cell.
    Span(CellRange),
}

impl StyleCommand {
    fn range(&self) -> CellRange {
        match *self {
            StyleCommand::Background(range, _)
            | StyleCommand::TextColor(range, _)
            | StyleCommand::Align(range, _)
            | StyleCommand::FontName(range, _)
            | StyleCommand::FontSize(range, _)
            | StyleCommand::BottomPadding(range, _)
            | StyleCommand::Grid(range, _, _)
            | StyleCommand::Span(range) => range,
        }
    }
}

/// The resolved style of a single cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellStyle {
    pub background: Option<Color>,
    pub text_color: Color,
    pub alignment: Alignment,
    pub font: Font,
    pub font_size: f32,
    pub left_padding: f32,
    pub right_padding: f32,
    pub top_padding: f32,
    pub bottom_padding: f32,
    /// Line width and colour of the cell border, if any.
    pub grid: Option<(f32, Color)>,
}

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            background: None,
            text_color: Color::BLACK,
            alignment: Alignment::Left,
            font: Font::Helvetica,
            font_size: 10.0,
            left_padding: 6.0,
            right_padding: 6.0,
            top_padding: 3.0,
            bottom_padding: 3.0,
            grid: None,
        }
    }
}

impl CellStyle {
    /// The height of one line of text.
    pub fn leading(&self) -> f32 {
        (self.font_size * 1.2).max(12.0)
    }

    /// The smallest height of a cell that fits one line of text.
    pub fn min_height(&self) -> f32 {
        self.leading() + self.top_padding + self.bottom_padding
    }
}

/// A group of merged cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub columns: RangeInclusive<usize>,
    pub rows: RangeInclusive<usize>,
}

impl Span {
    fn contains(&self, column: usize, row: usize) -> bool {
        self.columns.contains(&column) && self.rows.contains(&row)
    }
}

/// An ordered list of style commands for a table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableStyle {
    commands: Vec<StyleCommand>,
}

impl TableStyle {
    pub fn new(commands: Vec<StyleCommand>) -> Self {
        Self { commands }
    }

    /// The style of the cell at `column` and `row` in a table of the given size.
    pub fn cell_style(&self, column: usize, row: usize, columns: usize, rows: usize) -> CellStyle {
        let mut style = CellStyle::default();

        for command in &self.commands {
            if !command.range().contains(column, row, columns, rows) {
                continue;
            }

            match *command {
                StyleCommand::Background(_, color) => style.background = Some(color),
                StyleCommand::TextColor(_, color) => style.text_color = color,
                StyleCommand::Align(_, alignment) => style.alignment = alignment,
                StyleCommand::FontName(_, font) => style.font = font,
                StyleCommand::FontSize(_, size) => style.font_size = size,
                StyleCommand::BottomPadding(_, padding) => style.bottom_padding = padding,
                StyleCommand::Grid(_, width, color) => style.grid = Some((width, color)),
                StyleCommand::Span(_) => {}
            }
        }

        style
    }

    /// The merged cell groups in a table of the given size.
    pub fn spans(&self, columns: usize, rows: usize) -> Vec<Span> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                StyleCommand::Span(range) => {
                    let (columns, rows) = range.resolve(columns, rows);
                    (!columns.is_empty() && !rows.is_empty()).then_some(Span { columns, rows })
                }
                _ => None,
            })
            .collect()
    }
}

/// Where a cell sits with respect to merged cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellKind {
    /// A cell that is not merged.
    Single,
    /// The top left cell of a merged group, drawn over the whole group.
    SpanOrigin(Span),
    /// A cell covered by a merged group, not drawn.
    Covered,
}

/// Classify the cell at `column` and `row` given the merged groups `spans`.
pub fn cell_kind(spans: &[Span], column: usize, row: usize) -> CellKind {
    match spans.iter().find(|span| span.contains(column, row)) {
        Some(span) if *span.columns.start() == column && *span.rows.start() == row => {
            CellKind::SpanOrigin(span.clone())
        }
        Some(_) => CellKind::Covered,
        None => CellKind::Single,
    }
}

const ALL_CELLS: CellRange = CellRange::new((0, 0), (-1, -1));

/// The style of the report with every transaction.
///
/// A bold header on light blue over a white smoke body, centred text and a
/// black grid.
pub fn all_transactions_style() -> TableStyle {
    let header = CellRange::new((0, 0), (-1, 0));

    TableStyle::new(vec![
        StyleCommand::Background(header, Color::LIGHT_BLUE),
        StyleCommand::TextColor(header, Color::BLACK),
        StyleCommand::Align(ALL_CELLS, Alignment::Center),
        StyleCommand::FontName(header, Font::HelveticaBold),
        StyleCommand::BottomPadding(header, 12.0),
        StyleCommand::Background(CellRange::new((0, 1), (-1, -1)), Color::WHITE_SMOKE),
        StyleCommand::Grid(ALL_CELLS, 1.0, Color::BLACK),
    ])
}

/// The style of the report for a single month.
///
/// A title row spanning the table on light grey, then a light blue header and
/// a white smoke body.
pub fn monthly_style() -> TableStyle {
    let title = CellRange::new((0, 0), (-1, 0));
    let header = CellRange::new((0, 1), (-1, 1));

    TableStyle::new(vec![
        StyleCommand::Span(title),
        StyleCommand::Background(title, Color::LIGHT_GREY),
        StyleCommand::Align(title, Alignment::Center),
        StyleCommand::FontName(title, Font::HelveticaBold),
        StyleCommand::FontSize(title, 14.0),
        StyleCommand::BottomPadding(title, 12.0),
        StyleCommand::Background(header, Color::LIGHT_BLUE),
        StyleCommand::TextColor(header, Color::BLACK),
        StyleCommand::FontName(header, Font::HelveticaBold),
        StyleCommand::Align(ALL_CELLS, Alignment::Center),
        StyleCommand::Background(CellRange::new((0, 2), (-1, -1)), Color::WHITE_SMOKE),
        StyleCommand::Grid(ALL_CELLS, 1.0, Color::BLACK),
    ])
}
