use crate::error::GameError;
use crate::input::{self, InputEvent, InputSource};
use crate::render::{Color, Renderer, BLACK};
use crate::Coords;
use std::{io::{self, Stdout, Write, stdout}, time::Duration};

use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::style::{Attribute, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{BeginSynchronizedUpdate, ClearType, EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, read, poll};

// Upper half block: foreground paints the top pixel, background the bottom one.
const HALF_BLOCK: char = '▀';
const BOLD_FONT_SIZE: u16 = 40;

/// Owns the terminal modes for the lifetime of the game and reads its keys.
pub struct TermManager {
    stdout: Stdout,
}

impl TermManager {
    pub fn new() -> Self {
        TermManager { stdout: stdout() }
    }

    pub fn setup(&mut self) -> io::Result<()> {
        execute!(self.stdout, EnterAlternateScreen)?;
        self.set_raw_mode(true)?;
        self.set_cursor_visibility(false)?;
        self.set_cursor_blink(false)
    }

    pub fn restore(&mut self) -> io::Result<()> {
        self.set_raw_mode(false)?;
        self.set_cursor_visibility(true)?;
        self.set_cursor_blink(true)?;
        execute!(self.stdout, style::ResetColor, LeaveAlternateScreen)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn set_raw_mode(&self, option: bool) -> io::Result<()> {
        if option {
            terminal::enable_raw_mode()
        } else {
            terminal::disable_raw_mode()
        }
    }

    fn set_cursor_blink(&mut self, option: bool) -> io::Result<()> {
        if option {
            execute!(self.stdout, cursor::EnableBlinking)
        } else {
            execute!(self.stdout, cursor::DisableBlinking)
        }
    }

    fn set_cursor_visibility(&mut self, option: bool) -> io::Result<()> {
        if option {
            execute!(self.stdout, cursor::Show)
        } else {
            execute!(self.stdout, cursor::Hide)
        }
    }
}

impl InputSource for TermManager {
    fn poll_events(&mut self) -> Result<Vec<InputEvent>, GameError> {
        let mut events = vec![];

        while poll(Duration::ZERO)? {
            if let Event::Key(ev) = read()? {
                events.extend(input::from_key_event(&ev));
            }
        }

        Ok(events)
    }
}

struct TextOverlay {
    col: u16,
    row: u16,
    text: String,
    color: Color,
    bold: bool,
}

/// Off-screen frame at terminal resolution. Board pixels are scaled down by
/// `scale`; each terminal row holds two pixel rows.
pub struct PixelBuffer {
    cols: u16,
    pixel_rows: u16,
    scale: i32,
    pixels: Vec<Color>,
    texts: Vec<TextOverlay>,
}

impl PixelBuffer {
    /// Smallest integer scale that fits a `width`x`height` board into the terminal.
    pub fn fit(width: i32, height: i32, term_cols: u16, term_rows: u16) -> Self {
        let cols = term_cols.max(1) as i32;
        let pixel_rows = term_rows.max(1) as i32 * 2;
        let scale = div_ceil(width, cols).max(div_ceil(height, pixel_rows)).max(1);

        let cols = div_ceil(width, scale) as u16;
        let pixel_rows = div_ceil(height, scale) as u16;
        PixelBuffer {
            cols,
            pixel_rows,
            scale,
            pixels: vec![BLACK; cols as usize * pixel_rows as usize],
            texts: vec![],
        }
    }

    #[cfg(test)]
    pub fn scale(&self) -> i32 {
        self.scale
    }

    #[cfg(test)]
    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.pixel_rows)
    }

    pub fn pixel(&self, col: u16, row: u16) -> Color {
        self.pixels[self.cols as usize * row as usize + col as usize]
    }

    pub fn fill(&mut self, color: Color) {
        self.pixels.iter_mut().for_each(|p| *p = color);
        self.texts.clear();
    }

    pub fn fill_rect(&mut self, pos: Coords, width: i32, height: i32, color: Color) {
        let (x, y) = pos;
        self.fill_where(pos, (x + width, y + height), color, |cx, cy| {
            cx >= x as f64 && cx < (x + width) as f64 && cy >= y as f64 && cy < (y + height) as f64
        });
    }

    pub fn fill_polygon(&mut self, points: &[Coords], color: Color) {
        if points.len() < 3 {
            return;
        }
        let min = points.iter().fold((i32::MAX, i32::MAX), |m, p| (m.0.min(p.0), m.1.min(p.1)));
        let max = points.iter().fold((i32::MIN, i32::MIN), |m, p| (m.0.max(p.0), m.1.max(p.1)));

        self.fill_where(min, max, color, |cx, cy| point_in_polygon(points, cx, cy));
    }

    pub fn add_text(&mut self, text: &str, pos: Coords, color: Color, font_size: u16) {
        let col = (pos.0.max(0) / self.scale) as u16;
        let row = (pos.1.max(0) / self.scale / 2) as u16;
        if col >= self.cols || row >= self.term_rows() {
            return;
        }

        let room = (self.cols - col) as usize;
        self.texts.push(TextOverlay {
            col,
            row,
            text: text.chars().take(room).collect(),
            color,
            bold: font_size >= BOLD_FONT_SIZE,
        });
    }

    fn term_rows(&self) -> u16 {
        (self.pixel_rows + 1) / 2
    }

    fn pixel_or_black(&self, col: u16, row: u16) -> Color {
        if row < self.pixel_rows { self.pixel(col, row) } else { BLACK }
    }

    /// Paints every pixel in the board-space box whose centre passes `inside`.
    fn fill_where<F>(&mut self, from: Coords, to: Coords, color: Color, inside: F)
    where
        F: Fn(f64, f64) -> bool,
    {
        let s = self.scale;
        let col_range = (from.0.max(0) / s)..(div_ceil(to.0.max(0), s).min(self.cols as i32));
        let row_range = (from.1.max(0) / s)..(div_ceil(to.1.max(0), s).min(self.pixel_rows as i32));

        for row in row_range {
            let cy = (row as f64 + 0.5) * s as f64;
            for col in col_range.clone() {
                let cx = (col as f64 + 0.5) * s as f64;
                if inside(cx, cy) {
                    self.pixels[self.cols as usize * row as usize + col as usize] = color;
                }
            }
        }
    }
}

/// Even-odd crossing test.
fn point_in_polygon(points: &[Coords], x: f64, y: f64) -> bool {
    let mut inside = false;
    let mut j = points.len() - 1;

    for i in 0..points.len() {
        let (xi, yi) = (points[i].0 as f64, points[i].1 as f64);
        let (xj, yj) = (points[j].0 as f64, points[j].1 as f64);
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }

    inside
}

fn div_ceil(a: i32, b: i32) -> i32 {
    ((a as i64 + b as i64 - 1) / b as i64) as i32
}

/// [`Renderer`] that draws into a [`PixelBuffer`] and blits it to stdout.
pub struct TermCanvas {
    stdout: Stdout,
    board_size: (i32, i32),
    term_size: (u16, u16),
    buffer: PixelBuffer,
}

impl TermCanvas {
    pub fn new(board_width: i32, board_height: i32) -> io::Result<Self> {
        let term_size = terminal::size()?;
        Ok(TermCanvas {
            stdout: stdout(),
            board_size: (board_width, board_height),
            term_size,
            buffer: PixelBuffer::fit(board_width, board_height, term_size.0, term_size.1),
        })
    }

    fn refit(&mut self) -> io::Result<()> {
        let size = terminal::size()?;
        if size != self.term_size {
            self.term_size = size;
            self.buffer = PixelBuffer::fit(self.board_size.0, self.board_size.1, size.0, size.1);
            queue!(self.stdout, style::ResetColor, terminal::Clear(ClearType::All))?;
        }
        Ok(())
    }
}

impl Renderer for TermCanvas {
    fn clear(&mut self, color: Color) -> Result<(), GameError> {
        self.refit()?;
        self.buffer.fill(color);
        Ok(())
    }

    fn fill_rect(&mut self, pos: Coords, width: i32, height: i32, color: Color) -> Result<(), GameError> {
        self.buffer.fill_rect(pos, width, height, color);
        Ok(())
    }

    fn fill_polygon(&mut self, points: &[Coords], color: Color) -> Result<(), GameError> {
        self.buffer.fill_polygon(points, color);
        Ok(())
    }

    fn draw_text(&mut self, text: &str, pos: Coords, color: Color, font_size: u16) -> Result<(), GameError> {
        self.buffer.add_text(text, pos, color, font_size);
        Ok(())
    }

    fn present(&mut self) -> Result<(), GameError> {
        let buf = &self.buffer;
        queue!(self.stdout, BeginSynchronizedUpdate)?;

        for row in 0..buf.term_rows() {
            queue!(self.stdout, cursor::MoveTo(0, row))?;
            let mut last: Option<(Color, Color)> = None;

            for col in 0..buf.cols {
                let top = buf.pixel_or_black(col, row * 2);
                let bottom = buf.pixel_or_black(col, row * 2 + 1);
                if last != Some((top, bottom)) {
                    queue!(self.stdout, SetForegroundColor(to_term(top)), SetBackgroundColor(to_term(bottom)))?;
                    last = Some((top, bottom));
                }
                queue!(self.stdout, style::Print(HALF_BLOCK))?;
            }
        }

        for text in buf.texts.iter() {
            queue!(
                self.stdout,
                cursor::MoveTo(text.col, text.row),
                SetForegroundColor(to_term(text.color)),
                SetBackgroundColor(to_term(BLACK)),
            )?;
            if text.bold {
                queue!(self.stdout, SetAttribute(Attribute::Bold))?;
            }
            queue!(self.stdout, style::Print(&text.text), SetAttribute(Attribute::Reset))?;
        }

        queue!(self.stdout, style::ResetColor, EndSynchronizedUpdate)?;
        self.stdout.flush()?;
        Ok(())
    }
}

fn to_term(color: Color) -> style::Color {
    style::Color::Rgb { r: color.r, g: color.g, b: color.b }
}
