//! Procedural sprite sheets, so the demo ships without image files.

use tessera_engine::assets::TextureId;

pub const TILES: TextureId = TextureId(1);
pub const FONT: TextureId = TextureId(2);
pub const LABELS: TextureId = TextureId(3);

pub const TILE: u32 = 16;
pub const TILE_COLUMNS: u32 = 4;
pub const TILE_ROWS: u32 = 2;

pub const GLYPH_CELL: (u32, u32) = (4, 6);
pub const GLYPH_COLUMNS: u32 = 16;
pub const GLYPH_ROWS: u32 = 4;
pub const FIRST_GLYPH: char = ' ';
pub const GLYPH_COUNT: u32 = ('Z' as u32) - (FIRST_GLYPH as u32) + 1;

/// Tightly packed RGBA8 image.
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Image {
    fn new(width: u32, height: u32) -> Self {
        Self { width, height, rgba: vec![0; (width * height * 4) as usize] }
    }

    fn put(&mut self, x: u32, y: u32, c: [u8; 4]) {
        if x < self.width && y < self.height {
            let i = ((y * self.width + x) * 4) as usize;
            self.rgba[i..i + 4].copy_from_slice(&c);
        }
    }

    fn fill_cell(&mut self, col: u32, row: u32, shade: impl Fn(u32, u32) -> Option<[u8; 4]>) {
        for y in 0..TILE {
            for x in 0..TILE {
                if let Some(c) = shade(x, y) {
                    self.put(col * TILE + x, row * TILE + y, c);
                }
            }
        }
    }
}

fn speckle(x: u32, y: u32) -> u32 {
    (x.wrapping_mul(73) ^ y.wrapping_mul(151)).wrapping_mul(0x9e37) >> 5 & 7
}

/// Row 0: grass, water, stone, arrow. Row 1: four coin spin frames.
pub fn tile_sheet() -> Image {
    let mut img = Image::new(TILE * TILE_COLUMNS, TILE * TILE_ROWS);

    img.fill_cell(0, 0, |x, y| {
        let s = speckle(x, y) as u8;
        Some([40 + s * 3, 120 + s * 8, 48, 255])
    });

    img.fill_cell(1, 0, |x, y| {
        let crest = (x + y / 4 * 3) % 8 == 0 && y % 4 == 1;
        Some(if crest { [170, 210, 255, 255] } else { [40, 90, 200, 255] })
    });

    img.fill_cell(2, 0, |x, y| {
        let edge = x == 0 || y == 0 || x == TILE - 1 || y == TILE - 1;
        let s = speckle(x, y) as u8;
        Some(if edge { [70, 70, 78, 255] } else { [120 + s * 4, 120 + s * 4, 128 + s * 4, 255] })
    });

    // Right-pointing arrow; rotations and mirrors are easy to read off it.
    img.fill_cell(3, 0, |x, y| {
        let shaft = (3..10).contains(&x) && (7..9).contains(&y);
        let head = (9..14).contains(&x) && y.abs_diff(8).max(y.abs_diff(7)) + (x - 9) <= 5;
        let tail = x == 3 && (5..11).contains(&y);
        (shaft || head || tail).then_some([250, 240, 220, 255])
    });

    for (frame, radius_x) in [6u32, 4, 1, 4].into_iter().enumerate() {
        img.fill_cell(frame as u32, 1, |x, y| {
            let dx = (x as f32 - 7.5) / (radius_x as f32 + 0.5);
            let dy = (y as f32 - 7.5) / 6.5;
            let d = dx * dx + dy * dy;
            if d > 1.0 {
                None
            } else if d > 0.6 {
                Some([180, 120, 20, 255])
            } else {
                Some([255, 210, 60, 255])
            }
        });
    }

    img
}

/// 3x5 glyphs for `' '..='Z'`, one per 4x6 cell in row-major order.
pub fn font_sheet() -> Image {
    let (cw, ch) = GLYPH_CELL;
    let mut img = Image::new(cw * GLYPH_COLUMNS, ch * GLYPH_ROWS);

    for index in 0..GLYPH_COUNT {
        let Some(c) = char::from_u32(FIRST_GLYPH as u32 + index) else {
            continue;
        };
        let (col, row) = (index % GLYPH_COLUMNS, index / GLYPH_COLUMNS);
        for (y, bits) in glyph_rows(c).into_iter().enumerate() {
            for x in 0..3 {
                if bits & (0b100 >> x) != 0 {
                    img.put(col * cw + x, row * ch + y as u32, [255, 255, 255, 255]);
                }
            }
        }
    }
    img
}

/// Five rows of three pixels; bit 2 is the left column.
fn glyph_rows(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b011, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'A' => [0b010, 0b101, 0b111, 0b101, 0b101],
        'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'C' => [0b011, 0b100, 0b100, 0b100, 0b011],
        'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'E' => [0b111, 0b100, 0b110, 0b100, 0b111],
        'F' => [0b111, 0b100, 0b110, 0b100, 0b100],
        'G' => [0b011, 0b100, 0b101, 0b101, 0b011],
        'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'J' => [0b001, 0b001, 0b001, 0b101, 0b010],
        'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'M' => [0b101, 0b111, 0b111, 0b101, 0b101],
        'N' => [0b110, 0b101, 0b101, 0b101, 0b101],
        'O' => [0b010, 0b101, 0b101, 0b101, 0b010],
        'P' => [0b110, 0b101, 0b110, 0b100, 0b100],
        'Q' => [0b010, 0b101, 0b101, 0b110, 0b011],
        'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        'S' => [0b011, 0b100, 0b010, 0b001, 0b110],
        'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'V' => [0b101, 0b101, 0b101, 0b101, 0b010],
        'W' => [0b101, 0b101, 0b111, 0b111, 0b101],
        'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'Y' => [0b101, 0b101, 0b010, 0b010, 0b010],
        'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '(' => [0b001, 0b010, 0b010, 0b010, 0b001],
        ')' => [0b100, 0b010, 0b010, 0b010, 0b100],
        _ => [0; 5],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheets_match_their_grids() {
        let tiles = tile_sheet();
        assert_eq!(tiles.rgba.len() as u32, tiles.width * tiles.height * 4);
        assert_eq!((tiles.width, tiles.height), (64, 32));

        let font = font_sheet();
        assert_eq!((font.width, font.height), (64, 24));
        assert!(GLYPH_COUNT <= GLYPH_COLUMNS * GLYPH_ROWS);
    }

    #[test]
    fn space_is_blank_and_letters_are_not() {
        let font = font_sheet();
        let alpha_at = |x: u32, y: u32| font.rgba[((y * font.width + x) * 4 + 3) as usize];
        assert!((0..4).all(|x| (0..6).all(|y| alpha_at(x, y) == 0)));
        // 'A' is glyph 33: column 1, row 2; its top-middle pixel is set.
        assert_eq!(alpha_at(4 + 1, 12), 255);
    }
}
