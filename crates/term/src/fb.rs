//! Framebuffer and style types for terminal rendering.

use crate::types::InputStyle;

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Console colors.
pub mod palette {
    use super::Rgb;

    pub const BACKGROUND: Rgb = Rgb::new(8, 8, 8);
    /// Transcript text, and input that starts with a command word.
    pub const FOREGROUND: Rgb = Rgb::new(64, 255, 16);
    /// Input that starts with `shutdown`, `exit` or `halt`.
    pub const WARNING: Rgb = Rgb::new(215, 201, 32);
    pub const NEUTRAL_INPUT: Rgb = Rgb::new(231, 231, 231);
    pub const STATUS_BG: Rgb = Rgb::new(40, 40, 48);
    pub const STATUS_FG: Rgb = Rgb::new(200, 200, 200);
}

/// Minimal per-cell styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub fg: Rgb,
    pub bg: Rgb,
    pub bold: bool,
    pub dim: bool,
}

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            fg: palette::FOREGROUND,
            bg: palette::BACKGROUND,
            bold: false,
            dim: false,
        }
    }
}

impl CellStyle {
    /// Style of the input line for a highlight class.
    pub fn for_input(style: InputStyle) -> Self {
        let fg = match style {
            InputStyle::Neutral => palette::NEUTRAL_INPUT,
            InputStyle::Command => palette::FOREGROUND,
            InputStyle::Warning => palette::WARNING,
        };
        Self {
            fg,
            ..Self::default()
        }
    }

    pub fn status_bar() -> Self {
        Self {
            fg: palette::STATUS_FG,
            bg: palette::STATUS_BG,
            bold: false,
            dim: false,
        }
    }

    pub fn into_cell(self, ch: char) -> Cell {
        Cell { ch, style: self }
    }
}

/// A single terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: CellStyle,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            style: CellStyle::default(),
        }
    }
}

/// 2D framebuffer of styled character cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            cells: vec![Cell::default(); len],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Resize the framebuffer, keeping the allocation when possible.
    pub fn resize(&mut self, width: u16, height: u16) {
        if self.width == width && self.height == height {
            return;
        }
        self.width = width;
        self.height = height;
        let len = (width as usize) * (height as usize);
        self.cells.resize(len, Cell::default());
    }

    #[inline(always)]
    fn idx(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        self.idx(x, y).map(|i| self.cells[i])
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(i) = self.idx(x, y) {
            self.cells[i] = cell;
        }
    }

    pub fn clear(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    /// Write `s` starting at `(x, y)`, clipped at the right edge.
    ///
    /// Returns the column after the last written char.
    pub fn put_str(&mut self, x: u16, y: u16, s: &str, style: CellStyle) -> u16 {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width {
                break;
            }
            self.set(cx, y, style.into_cell(ch));
            cx += 1;
        }
        cx
    }

    /// Paint a whole row with `style`.
    pub fn fill_row(&mut self, y: u16, style: CellStyle) {
        for x in 0..self.width {
            self.set(x, y, style.into_cell(' '));
        }
    }

    /// Text of row `y`, trailing blanks removed. Handy in tests.
    pub fn row_text(&self, y: u16) -> String {
        let row: String = (0..self.width)
            .filter_map(|x| self.get(x, y))
            .map(|c| c.ch)
            .collect();
        row.trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_str_clips_at_right_edge() {
        let mut fb = FrameBuffer::new(4, 1);
        let end = fb.put_str(1, 0, "abcdef", CellStyle::default());
        assert_eq!(end, 4);
        assert_eq!(fb.row_text(0), " abc");
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.set(5, 5, CellStyle::default().into_cell('x'));
        assert_eq!(fb.get(5, 5), None);
        assert_eq!(fb.row_text(1), "");
    }

    #[test]
    fn input_styles_use_console_colors() {
        assert_eq!(CellStyle::for_input(InputStyle::Command).fg, palette::FOREGROUND);
        assert_eq!(CellStyle::for_input(InputStyle::Warning).fg, palette::WARNING);
        assert_eq!(
            CellStyle::for_input(InputStyle::Neutral).fg,
            palette::NEUTRAL_INPUT
        );
    }

    #[test]
    fn resize_keeps_dimensions_consistent() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.resize(3, 1);
        assert_eq!((fb.width(), fb.height()), (3, 1));
        assert!(fb.get(2, 0).is_some());
        assert!(fb.get(0, 1).is_none());
    }
}
