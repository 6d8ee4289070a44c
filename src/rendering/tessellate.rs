//! CPU tessellation of a display list into coloured triangles.

use bytemuck::{Pod, Zeroable};

use super::font;
use crate::sketch::{Color, DrawCommand, DrawList, Rect};

/// Vertex in logical-pixel space with a flat colour
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

/// Geometry for one frame
#[derive(Debug, Default)]
pub struct Tessellation {
    /// Colour the surface is cleared to before drawing
    pub clear: Color,
    pub vertices: Vec<Vertex>,
}

/// Turn draw calls into triangles, preserving draw order.
///
/// A background call discards everything drawn before it.
pub fn tessellate(list: &DrawList) -> Tessellation {
    let mut out = Tessellation::default();

    for command in list.commands() {
        match command {
            DrawCommand::Background(color) => {
                out.clear = *color;
                out.vertices.clear();
            }
            DrawCommand::FillRect { rect, color } => push_rect(&mut out.vertices, *rect, *color),
            DrawCommand::StrokeRect {
                rect,
                color,
                weight,
            } => push_outline(&mut out.vertices, *rect, *color, *weight),
            DrawCommand::Text {
                content,
                x,
                y,
                size,
                align,
                color,
            } => {
                for glyph_rect in font::text_rects(content, *x, *y, *size, *align) {
                    push_rect(&mut out.vertices, glyph_rect, *color);
                }
            }
        }
    }

    out
}

fn push_rect(vertices: &mut Vec<Vertex>, rect: Rect, color: Color) {
    let rect = rect.normalized();
    if !(rect.width > 0.0 && rect.height > 0.0) {
        return;
    }

    let color = color.to_array();
    let x0 = rect.x as f32;
    let y0 = rect.y as f32;
    let x1 = (rect.x + rect.width) as f32;
    let y1 = (rect.y + rect.height) as f32;

    let v = |x: f32, y: f32| Vertex {
        position: [x, y],
        color,
    };
    vertices.extend_from_slice(&[
        v(x0, y0),
        v(x0, y1),
        v(x1, y1),
        v(x0, y0),
        v(x1, y1),
        v(x1, y0),
    ]);
}

/// Four bars straddling the outline by half the stroke weight each side
fn push_outline(vertices: &mut Vec<Vertex>, rect: Rect, color: Color, weight: f64) {
    let rect = rect.normalized();
    let half = weight.abs() / 2.0;
    let outer = Rect::new(
        rect.x - half,
        rect.y - half,
        rect.width + 2.0 * half,
        rect.height + 2.0 * half,
    );

    if rect.width <= 2.0 * half || rect.height <= 2.0 * half {
        // Stroke swallows the interior
        push_rect(vertices, outer, color);
        return;
    }

    let inner_height = rect.height - 2.0 * half;
    // top, bottom, left, right
    push_rect(vertices, Rect::new(outer.x, outer.y, outer.width, 2.0 * half), color);
    push_rect(
        vertices,
        Rect::new(outer.x, rect.y + rect.height - half, outer.width, 2.0 * half),
        color,
    );
    push_rect(
        vertices,
        Rect::new(outer.x, rect.y + half, 2.0 * half, inner_height),
        color,
    );
    push_rect(
        vertices,
        Rect::new(rect.x + rect.width - half, rect.y + half, 2.0 * half, inner_height),
        color,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sketch::TextAlign;

    #[test]
    fn test_fill_rect_is_two_triangles() {
        let mut list = DrawList::new();
        list.fill_rect(Rect::new(0.0, 0.0, 10.0, 5.0), Color::WHITE);
        let tess = tessellate(&list);
        assert_eq!(tess.vertices.len(), 6);
        assert_eq!(tess.vertices[2].position, [10.0, 5.0]);
    }

    #[test]
    fn test_degenerate_rects_are_skipped() {
        let mut list = DrawList::new();
        list.fill_rect(Rect::new(0.0, 0.0, 0.0, 5.0), Color::WHITE);
        list.fill_rect(Rect::new(0.0, 0.0, f64::NAN, 5.0), Color::WHITE);
        assert!(tessellate(&list).vertices.is_empty());
    }

    #[test]
    fn test_background_resets_geometry() {
        let mut list = DrawList::new();
        list.fill_rect(Rect::new(0.0, 0.0, 10.0, 5.0), Color::WHITE);
        list.background(Color::gray(51.0));
        list.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE);
        let tess = tessellate(&list);
        assert_eq!(tess.vertices.len(), 6);
        assert_eq!(tess.clear, Color::gray(51.0));
    }

    #[test]
    fn test_outline_has_four_bars() {
        let mut list = DrawList::new();
        list.stroke_rect(Rect::new(10.0, 10.0, 80.0, 80.0), Color::WHITE, 4.0);
        let tess = tessellate(&list);
        assert_eq!(tess.vertices.len(), 24);

        let xs: Vec<f32> = tess.vertices.iter().map(|v| v.position[0]).collect();
        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        assert_eq!(min_x, 8.0);
        assert_eq!(max_x, 92.0);
    }

    #[test]
    fn test_thin_outline_becomes_solid() {
        let mut list = DrawList::new();
        list.stroke_rect(Rect::new(10.0, 10.0, 2.0, 2.0), Color::WHITE, 4.0);
        assert_eq!(tessellate(&list).vertices.len(), 6);
    }

    #[test]
    fn test_text_emits_quads() {
        let mut list = DrawList::new();
        list.text("-", 0.0, 7.0, 7.0, TextAlign::Left, Color::WHITE);
        assert_eq!(tessellate(&list).vertices.len(), 6);
    }
}
