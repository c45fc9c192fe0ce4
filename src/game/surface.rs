/// Something the game can paint cells onto
///
/// Coordinates and sizes are in pixels. The game only ever paints whole
/// grid-aligned cells, except for the food glyph which clears sub-cells.
pub trait Surface {
    fn draw_cell(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn erase_cell(&mut self, x: i32, y: i32, width: i32, height: i32);
    fn width(&self) -> i32;
    fn height(&self) -> i32;
}

/// In-memory monochrome bitmap implementing [`Surface`]
///
/// Rectangles are clipped to the bitmap, so drawing partly outside is fine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelCanvas {
    width: i32,
    height: i32,
    pixels: Vec<bool>,
}

impl PixelCanvas {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        Self {
            width,
            height,
            pixels: vec![false; (width as usize).saturating_mul(height as usize)],
        }
    }

    /// Whether the pixel at (x, y) is filled; out of range reads as empty
    pub fn is_filled(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return false;
        }
        self.pixels[self.offset(x, y)]
    }

    /// Number of filled pixels
    pub fn filled_count(&self) -> usize {
        self.pixels.iter().filter(|&&p| p).count()
    }

    fn offset(&self, x: i32, y: i32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn fill(&mut self, x: i32, y: i32, width: i32, height: i32, value: bool) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + width).min(self.width);
        let y1 = (y + height).min(self.height);

        for py in y0..y1 {
            for px in x0..x1 {
                let i = self.offset(px, py);
                self.pixels[i] = value;
            }
        }
    }
}

impl Surface for PixelCanvas {
    fn draw_cell(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.fill(x, y, width, height, true);
    }

    fn erase_cell(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.fill(x, y, width, height, false);
    }

    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }
}
