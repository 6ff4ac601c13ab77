/// Row-by-row rectangle packer for glyph sheets.
///
/// Rectangles are placed left to right; when one does not fit the remaining
/// width a new shelf starts below the tallest rectangle of the current one.
#[derive(Debug, Clone)]
pub struct ShelfPacker {
    width: u32,
    padding: u32,
    cursor_x: u32,
    cursor_y: u32,
    row_height: u32,
}

impl ShelfPacker {
    pub fn new(width: u32, padding: u32) -> Self {
        Self {
            width,
            padding,
            cursor_x: padding,
            cursor_y: padding,
            row_height: 0,
        }
    }

    /// Reserves a `w x h` rectangle and returns its top-left corner.
    ///
    /// Returns `None` only if the rectangle is wider than the sheet.
    pub fn place(&mut self, w: u32, h: u32) -> Option<(u32, u32)> {
        if w + 2 * self.padding > self.width {
            return None;
        }
        if self.cursor_x + w + self.padding > self.width {
            self.cursor_y += self.row_height + self.padding;
            self.cursor_x = self.padding;
            self.row_height = 0;
        }

        let origin = (self.cursor_x, self.cursor_y);
        self.cursor_x += w + self.padding;
        self.row_height = self.row_height.max(h);
        Some(origin)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Sheet height needed for everything placed so far.
    #[inline]
    pub fn used_height(&self) -> u32 {
        self.cursor_y + self.row_height + self.padding
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_a_row_then_wraps() {
        let mut p = ShelfPacker::new(32, 1);
        assert_eq!(p.place(10, 5), Some((1, 1)));
        assert_eq!(p.place(10, 8), Some((12, 1)));
        // 23 + 10 + 1 > 32: next shelf under the 8px glyph.
        assert_eq!(p.place(10, 4), Some((1, 10)));
        assert_eq!(p.used_height(), 15);
    }

    #[test]
    fn rejects_rects_wider_than_sheet() {
        let mut p = ShelfPacker::new(16, 1);
        assert_eq!(p.place(15, 2), None);
        assert_eq!(p.place(14, 2), Some((1, 1)));
    }

    #[test]
    fn placements_never_overlap() {
        let mut p = ShelfPacker::new(64, 1);
        let sizes = [(7, 9), (12, 3), (30, 11), (5, 5), (20, 14), (9, 9), (40, 2), (3, 17)];
        let rects: Vec<_> = sizes
            .iter()
            .map(|&(w, h)| {
                let (x, y) = p.place(w, h).unwrap();
                (x, y, w, h)
            })
            .collect();
        for (i, a) in rects.iter().enumerate() {
            assert!(a.0 + a.2 <= 64);
            for b in &rects[i + 1..] {
                let apart = a.0 + a.2 <= b.0 || b.0 + b.2 <= a.0 || a.1 + a.3 <= b.1 || b.1 + b.3 <= a.1;
                assert!(apart, "{a:?} overlaps {b:?}");
            }
        }
    }
}
