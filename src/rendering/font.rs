//! Built-in 5x7 bitmap font for the sketch's text.
//!
//! Each glyph is seven rows of five bits, bit 4 being the leftmost column.
//! Glyphs sit on the baseline and are as tall as the requested text size.

use crate::sketch::{Rect, TextAlign};

const GLYPH_COLS: usize = 5;
const GLYPH_ROWS: usize = 7;

/// Horizontal advance per character, in glyph pixels (glyph + 1 gap)
const ADVANCE: usize = GLYPH_COLS + 1;

type Glyph = [u8; GLYPH_ROWS];

const UNKNOWN: Glyph = [
    0b11111, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11111,
];

#[rustfmt::skip]
fn glyph(ch: char) -> Glyph {
    match ch.to_ascii_lowercase() {
        ' ' => [0; GLYPH_ROWS],
        'a' => [0b00000, 0b00000, 0b01110, 0b00001, 0b01111, 0b10001, 0b01111],
        'b' => [0b10000, 0b10000, 0b10110, 0b11001, 0b10001, 0b10001, 0b11110],
        'c' => [0b00000, 0b00000, 0b01110, 0b10000, 0b10000, 0b10001, 0b01110],
        'd' => [0b00001, 0b00001, 0b01101, 0b10011, 0b10001, 0b10001, 0b01111],
        'e' => [0b00000, 0b00000, 0b01110, 0b10001, 0b11111, 0b10000, 0b01110],
        'f' => [0b00110, 0b01001, 0b01000, 0b11100, 0b01000, 0b01000, 0b01000],
        'g' => [0b00000, 0b01111, 0b10001, 0b10001, 0b01111, 0b00001, 0b01110],
        'h' => [0b10000, 0b10000, 0b10110, 0b11001, 0b10001, 0b10001, 0b10001],
        'i' => [0b00100, 0b00000, 0b01100, 0b00100, 0b00100, 0b00100, 0b01110],
        'j' => [0b00010, 0b00000, 0b00110, 0b00010, 0b00010, 0b10010, 0b01100],
        'k' => [0b10000, 0b10000, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010],
        'l' => [0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        'm' => [0b00000, 0b00000, 0b11010, 0b10101, 0b10101, 0b10001, 0b10001],
        'n' => [0b00000, 0b00000, 0b10110, 0b11001, 0b10001, 0b10001, 0b10001],
        'o' => [0b00000, 0b00000, 0b01110, 0b10001, 0b10001, 0b10001, 0b01110],
        'p' => [0b00000, 0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000],
        'q' => [0b00000, 0b01111, 0b10001, 0b10001, 0b01111, 0b00001, 0b00001],
        'r' => [0b00000, 0b00000, 0b10110, 0b11001, 0b10000, 0b10000, 0b10000],
        's' => [0b00000, 0b00000, 0b01110, 0b10000, 0b01110, 0b00001, 0b11110],
        't' => [0b01000, 0b01000, 0b11100, 0b01000, 0b01000, 0b01001, 0b00110],
        'u' => [0b00000, 0b00000, 0b10001, 0b10001, 0b10001, 0b10011, 0b01101],
        'v' => [0b00000, 0b00000, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100],
        'w' => [0b00000, 0b00000, 0b10001, 0b10001, 0b10101, 0b10101, 0b01010],
        'x' => [0b00000, 0b00000, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001],
        'y' => [0b00000, 0b10001, 0b10001, 0b10001, 0b01111, 0b00001, 0b01110],
        'z' => [0b00000, 0b00000, 0b11111, 0b00010, 0b00100, 0b01000, 0b11111],
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b01100, 0b01100],
        '-' => [0b00000, 0b00000, 0b00000, 0b11111, 0b00000, 0b00000, 0b00000],
        '+' => [0b00000, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0b00000],
        '@' => [0b01110, 0b10001, 0b00001, 0b01101, 0b10101, 0b10101, 0b01110],
        _ => UNKNOWN,
    }
}

/// Width of a line of text at the given size
pub fn text_width(content: &str, size: f64) -> f64 {
    let chars = content.chars().count();
    if chars == 0 {
        return 0.0;
    }
    let pixel = size / GLYPH_ROWS as f64;
    (chars * ADVANCE - 1) as f64 * pixel
}

/// Rectangles covering the lit pixels of `content`.
///
/// Horizontal runs within a glyph row are merged into one rectangle.
pub fn text_rects(content: &str, x: f64, y: f64, size: f64, align: TextAlign) -> Vec<Rect> {
    let pixel = size / GLYPH_ROWS as f64;
    let left = match align {
        TextAlign::Left => x,
        TextAlign::Center => x - text_width(content, size) / 2.0,
    };
    let top = y - size;

    let mut rects = Vec::new();
    for (index, ch) in content.chars().enumerate() {
        let glyph_x = left + (index * ADVANCE) as f64 * pixel;
        for (row, bits) in glyph(ch).iter().enumerate() {
            let row_y = top + row as f64 * pixel;
            let mut col = 0;
            while col < GLYPH_COLS {
                if !lit(*bits, col) {
                    col += 1;
                    continue;
                }
                let start = col;
                while col < GLYPH_COLS && lit(*bits, col) {
                    col += 1;
                }
                rects.push(Rect::new(
                    glyph_x + start as f64 * pixel,
                    row_y,
                    (col - start) as f64 * pixel,
                    pixel,
                ));
            }
        }
    }
    rects
}

fn lit(bits: u8, col: usize) -> bool {
    bits & (1 << (GLYPH_COLS - 1 - col)) != 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_width() {
        assert_eq!(text_width("", 7.0), 0.0);
        assert_eq!(text_width("a", 7.0), 5.0);
        assert_eq!(text_width("ab", 7.0), 11.0);
    }

    #[test]
    fn test_space_draws_nothing() {
        assert!(text_rects("   ", 0.0, 0.0, 7.0, TextAlign::Left).is_empty());
    }

    #[test]
    fn test_runs_are_merged() {
        // '-' is a single full-width run on the middle row
        let rects = text_rects("-", 10.0, 20.0, 7.0, TextAlign::Left);
        assert_eq!(rects, vec![Rect::new(10.0, 16.0, 5.0, 1.0)]);
    }

    #[test]
    fn test_glyphs_sit_on_baseline() {
        let rects = text_rects("l", 0.0, 70.0, 14.0, TextAlign::Left);
        let top = rects.iter().map(|r| r.y).fold(f64::INFINITY, f64::min);
        let bottom = rects
            .iter()
            .map(|r| r.y + r.height)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(top, 56.0);
        assert_eq!(bottom, 70.0);
    }

    #[test]
    fn test_center_alignment() {
        let rects = text_rects("--", 100.0, 0.0, 7.0, TextAlign::Center);
        let left = rects.iter().map(|r| r.x).fold(f64::INFINITY, f64::min);
        let right = rects
            .iter()
            .map(|r| r.x + r.width)
            .fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(left, 94.5);
        assert_eq!(right, 105.5);
    }

    #[test]
    fn test_title_and_digits_have_glyphs() {
        for ch in "nanovisual@ jakub illukowicz0123456789.-".chars() {
            if ch != ' ' {
                assert_ne!(glyph(ch), UNKNOWN, "missing glyph {:?}", ch);
            }
        }
    }
}
