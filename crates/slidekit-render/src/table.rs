//! Table grids with theme-resolved styling.

use crate::shapes::TOLERANCE;
use crate::text::TextBox;
use crate::visual::{Primitive, StrokeVisual, TextRun};
use kurbo::{BezPath, Point, Rect, Shape, Size};
use slidekit_core::elements::{HorizontalAlign, SerializableColor, TableContent, VerticalAlign};
use slidekit_core::theme::{ResolvedTheme, ThemeTable};

const DEFAULT_FONT_SIZE: f64 = 14.0;
const DEFAULT_BORDER_WIDTH: f64 = 1.0;
const DEFAULT_CELL_PADDING: f64 = 6.0;

/// Concrete table styling after applying overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct TableLook {
    pub header_fill: SerializableColor,
    pub header_text: SerializableColor,
    pub body_fill: SerializableColor,
    pub stripe_fill: SerializableColor,
    pub text_color: SerializableColor,
    pub border_color: SerializableColor,
    pub border_width: f64,
    pub font_size: f64,
    pub cell_padding: f64,
}

impl TableLook {
    /// Element override, then theme value, then built-in default.
    pub fn resolve(table: &TableContent, themes: &ThemeTable) -> Self {
        let theme: ResolvedTheme = themes.resolve(table.theme.as_deref());
        let style = &table.style;
        Self {
            header_fill: style.header_fill.unwrap_or(theme.header_fill),
            header_text: style.header_text.unwrap_or(theme.header_text),
            body_fill: style.body_fill.unwrap_or(theme.body_fill),
            stripe_fill: style.stripe_fill.unwrap_or(theme.stripe_fill),
            text_color: style.text_color.unwrap_or(theme.text_color),
            border_color: style.border_color.unwrap_or(theme.border_color),
            border_width: style.border_width.unwrap_or(DEFAULT_BORDER_WIDTH).max(0.0),
            font_size: style.font_size.unwrap_or(DEFAULT_FONT_SIZE),
            cell_padding: style.cell_padding.unwrap_or(DEFAULT_CELL_PADDING),
        }
    }

    fn row_fill(&self, table: &TableContent, row: usize) -> SerializableColor {
        if table.is_header(row) {
            self.header_fill
        } else if table.is_striped(row) {
            self.stripe_fill
        } else {
            self.body_fill
        }
    }
}

pub fn render_table(table: &TableContent, size: Size, themes: &ThemeTable) -> Vec<Primitive> {
    if table.rows == 0 || table.cols == 0 {
        return Vec::new();
    }
    let look = TableLook::resolve(table, themes);
    let cell_w = size.width / table.cols as f64;
    let cell_h = size.height / table.rows as f64;
    let mut prims = Vec::new();

    for row in 0..table.rows {
        let header = table.is_header(row);
        let row_fill = look.row_fill(table, row);
        for col in 0..table.cols {
            let rect = Rect::new(
                col as f64 * cell_w,
                row as f64 * cell_h,
                (col + 1) as f64 * cell_w,
                (row + 1) as f64 * cell_h,
            );
            let cell = table.cell(row, col);
            let style = cell.map(|c| &c.style);
            let fill = style.and_then(|s| s.fill).unwrap_or(row_fill);
            prims.push(Primitive::fill(rect.to_path(TOLERANCE), fill));

            let Some(cell) = cell.filter(|c| !c.text.is_empty()) else {
                continue;
            };
            let default_color = if header { look.header_text } else { look.text_color };
            let text_box = TextBox {
                size: rect.size(),
                padding: look.cell_padding,
                font_size: look.font_size,
                line_height: 1.2,
                align: HorizontalAlign::Left,
                vertical_align: VerticalAlign::Middle,
            };
            let mut lines = text_box.layout(&cell.text);
            for line in &mut lines {
                line.origin += rect.origin().to_vec2();
            }
            prims.push(Primitive::Text(TextRun {
                lines,
                font_family: "Inter".to_string(),
                font_size: look.font_size,
                color: cell.style.text_color.unwrap_or(default_color),
                bold: cell.style.bold.unwrap_or(header),
                italic: false,
                underline: false,
            }));
        }
    }

    if look.border_width > 0.0 {
        let mut grid = BezPath::new();
        for row in 0..=table.rows {
            let y = row as f64 * cell_h;
            grid.move_to(Point::new(0.0, y));
            grid.line_to(Point::new(size.width, y));
        }
        for col in 0..=table.cols {
            let x = col as f64 * cell_w;
            grid.move_to(Point::new(x, 0.0));
            grid.line_to(Point::new(x, size.height));
        }
        prims.push(Primitive::stroke(grid, StrokeVisual::solid(look.border_color, look.border_width)));
    }
    prims
}

#[cfg(test)]
mod tests {
    use super::*;
    use slidekit_core::theme::StyleBundle;

    fn fills(prims: &[Primitive]) -> Vec<SerializableColor> {
        prims
            .iter()
            .filter_map(|p| match p {
                Primitive::Path { fill: Some(c), .. } => Some(*c),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_override_beats_theme_beats_default() {
        let mut themes = ThemeTable::new();
        let red = SerializableColor::rgb(255, 0, 0);
        let blue = SerializableColor::rgb(0, 0, 255);
        themes.insert(
            "brand",
            StyleBundle {
                header_fill: Some(red),
                body_fill: Some(red),
                ..Default::default()
            },
        );
        let mut table = TableContent::new(2, 1);
        table.theme = Some("brand".into());
        table.style.body_fill = Some(blue);

        let look = TableLook::resolve(&table, &themes);
        assert_eq!(look.header_fill, red);
        assert_eq!(look.body_fill, blue);
        assert_eq!(look.stripe_fill, ResolvedTheme::default().stripe_fill);
    }

    #[test]
    fn test_zebra_rows() {
        let themes = ThemeTable::new();
        let mut table = TableContent::new(4, 1);
        table.zebra = true;
        let look = TableLook::resolve(&table, &themes);
        let prims = render_table(&table, Size::new(100.0, 80.0), &themes);
        assert_eq!(
            fills(&prims),
            vec![look.header_fill, look.body_fill, look.stripe_fill, look.body_fill]
        );
    }

    #[test]
    fn test_cell_text_and_header_bold() {
        let themes = ThemeTable::new();
        let mut table = TableContent::new(2, 2);
        table.set_cell(0, 1, "Revenue");
        table.set_cell(1, 1, "42");
        let prims = render_table(&table, Size::new(200.0, 60.0), &themes);
        let runs: Vec<&TextRun> = prims
            .iter()
            .filter_map(|p| match p {
                Primitive::Text(run) => Some(run),
                _ => None,
            })
            .collect();
        assert_eq!(runs.len(), 2);
        assert!(runs[0].bold);
        assert!(!runs[1].bold);
        assert!(runs[1].lines[0].origin.x >= 100.0);
    }

    #[test]
    fn test_empty_grid() {
        let table = TableContent::new(0, 3);
        assert!(render_table(&table, Size::new(10.0, 10.0), &ThemeTable::new()).is_empty());
    }
}
