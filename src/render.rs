use crate::error::GameError;
use crate::Coords;

/// Offset of the shaded faces that give each cell its extruded look.
pub const CUBE_DEPTH: i32 = 5;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }
}

pub const BLACK: Color = Color::rgb(0, 0, 0);
pub const WHITE: Color = Color::rgb(255, 255, 255);
pub const RED: Color = Color::rgb(255, 0, 0);
pub const DARK_GREEN: Color = Color::rgb(0, 100, 0);
pub const YELLOW: Color = Color::rgb(255, 255, 0);
pub const GRID_GRAY: Color = Color::rgb(40, 40, 40);

/// Side faces of every cube use this shade regardless of the top colour.
pub const SIDE_SHADE: Color = DARK_GREEN;

/// 2D drawing backend. Coordinates are board pixels.
pub trait Renderer {
    fn clear(&mut self, color: Color) -> Result<(), GameError>;

    fn fill_rect(&mut self, pos: Coords, width: i32, height: i32, color: Color) -> Result<(), GameError>;

    fn fill_polygon(&mut self, points: &[Coords], color: Color) -> Result<(), GameError>;

    fn draw_text(&mut self, text: &str, pos: Coords, color: Color, font_size: u16) -> Result<(), GameError>;

    fn present(&mut self) -> Result<(), GameError>;

    /// Top face in `color`, right and bottom faces in [`SIDE_SHADE`].
    fn draw_cube(&mut self, pos: Coords, size: i32, color: Color) -> Result<(), GameError> {
        self.fill_rect(pos, size, size, color)?;
        for face in side_faces(pos, size).iter() {
            self.fill_polygon(face, SIDE_SHADE)?;
        }
        Ok(())
    }
}

/// Right and bottom faces of a cube whose top face sits at `pos`.
pub fn side_faces(pos: Coords, size: i32) -> [[Coords; 4]; 2] {
    let (x, y) = pos;
    let d = CUBE_DEPTH;

    let right = [
        (x + size, y),
        (x + size + d, y + d),
        (x + size + d, y + size + d),
        (x + size, y + size),
    ];
    let bottom = [
        (x, y + size),
        (x + d, y + size + d),
        (x + size + d, y + size + d),
        (x + size, y + size),
    ];

    [right, bottom]
}
