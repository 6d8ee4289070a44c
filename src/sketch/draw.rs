//! Display list produced by the sketch each frame.
//!
//! The sketch never talks to the GPU; it records what a canvas would be asked
//! to draw, in call order, and the renderer rasterises the list.

/// RGBA colour with components in [0, 1]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Grey level on the 0-255 canvas scale, clamped like a canvas fill
    pub fn gray(level: f64) -> Self {
        let v = if level.is_nan() {
            0.0
        } else {
            (level.clamp(0.0, 255.0) / 255.0) as f32
        };
        Self::rgb(v, v, v)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// Axis-aligned rectangle, top-left corner plus size
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle of the given size centred on `(cx, cy)`
    pub fn centered(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        Self::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }

    /// Same area with non-negative width and height
    pub fn normalized(self) -> Self {
        let (x, width) = if self.width < 0.0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        Self::new(x, y, width, height)
    }
}

/// Horizontal text anchoring
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// One canvas call
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Clear the whole surface
    Background(Color),

    /// Filled rectangle, no outline
    FillRect { rect: Rect, color: Color },

    /// Outline only; the stroke straddles the rectangle edge
    StrokeRect {
        rect: Rect,
        color: Color,
        weight: f64,
    },

    /// Single line of text, `y` is the baseline
    Text {
        content: String,
        x: f64,
        y: f64,
        size: f64,
        align: TextAlign,
        color: Color,
    },
}

/// Ordered list of draw calls for one frame
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn background(&mut self, color: Color) {
        self.commands.push(DrawCommand::Background(color));
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    pub fn stroke_rect(&mut self, rect: Rect, color: Color, weight: f64) {
        self.commands
            .push(DrawCommand::StrokeRect { rect, color, weight });
    }

    pub fn text(
        &mut self,
        content: impl Into<String>,
        x: f64,
        y: f64,
        size: f64,
        align: TextAlign,
        color: Color,
    ) {
        self.commands.push(DrawCommand::Text {
            content: content.into(),
            x,
            y,
            size,
            align,
            color,
        });
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Text contents in draw order
    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { content, .. } => Some(content.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gray_clamps() {
        assert_eq!(Color::gray(-10.0), Color::BLACK);
        assert_eq!(Color::gray(300.0), Color::WHITE);
        assert_eq!(Color::gray(f64::NAN), Color::BLACK);
        let mid = Color::gray(51.0);
        assert!((mid.r - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_normalized_flips_negative_size() {
        let rect = Rect::new(10.0, 10.0, -4.0, -6.0).normalized();
        assert_eq!(rect, Rect::new(6.0, 4.0, 4.0, 6.0));
    }

    #[test]
    fn test_centered() {
        assert_eq!(
            Rect::centered(50.0, 50.0, 20.0, 10.0),
            Rect::new(40.0, 45.0, 20.0, 10.0)
        );
    }

    #[test]
    fn test_texts_in_order() {
        let mut list = DrawList::new();
        list.background(Color::BLACK);
        list.text("a", 0.0, 0.0, 1.0, TextAlign::Left, Color::WHITE);
        list.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::WHITE);
        list.text("b", 0.0, 0.0, 1.0, TextAlign::Left, Color::WHITE);
        assert_eq!(list.texts().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(list.len(), 4);
    }
}
