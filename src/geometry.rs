/// Shared geometric and color primitives used across app and editor modules.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToolPoint {
    pub x: i32,
    pub y: i32,
}

impl ToolPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(self, other: ToolPoint) -> f64 {
        let dx = f64::from(other.x) - f64::from(self.x);
        let dy = f64::from(other.y) - f64::from(self.y);
        dx.hypot(dy)
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

/// Axis-aligned box anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToolBounds {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl ToolBounds {
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Normalizes two opposite corners given in any order.
    pub fn from_corners(a: ToolPoint, b: ToolPoint) -> Self {
        let width = (i64::from(b.x) - i64::from(a.x)).unsigned_abs();
        let height = (i64::from(b.y) - i64::from(a.y)).unsigned_abs();
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: u32::try_from(width).unwrap_or(u32::MAX),
            height: u32::try_from(height).unwrap_or(u32::MAX),
        }
    }

    pub fn right(&self) -> i64 {
        i64::from(self.x) + i64::from(self.width)
    }

    pub fn bottom(&self) -> i64 {
        i64::from(self.y) + i64::from(self.height)
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, point: ToolPoint) -> bool {
        let x = i64::from(point.x);
        let y = i64::from(point.y);
        x >= i64::from(self.x) && x < self.right() && y >= i64::from(self.y) && y < self.bottom()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const RED: Color = Color::new(0xFF, 0x00, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub const fn rgb(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Parses `#RRGGBB`; the leading `#` is optional.
    pub fn from_hex(value: &str) -> Option<Self> {
        let hex = value.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let red = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let green = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let blue = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self::new(red, green, blue))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn to_cairo_rgba(self) -> (f64, f64, f64, f64) {
        (
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
            f64::from(self.a) / 255.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_from_corners_is_order_independent() {
        let forward = ToolBounds::from_corners(ToolPoint::new(0, 0), ToolPoint::new(100, 50));
        let backward = ToolBounds::from_corners(ToolPoint::new(100, 50), ToolPoint::new(0, 0));
        assert_eq!(forward, ToolBounds::new(0, 0, 100, 50));
        assert_eq!(forward, backward);
    }

    #[test]
    fn bounds_contains_excludes_far_edges() {
        let bounds = ToolBounds::new(10, 10, 20, 20);
        assert!(bounds.contains(ToolPoint::new(10, 10)));
        assert!(bounds.contains(ToolPoint::new(29, 29)));
        assert!(!bounds.contains(ToolPoint::new(30, 15)));
    }

    #[test]
    fn color_hex_parses_with_and_without_hash() {
        assert_eq!(Color::from_hex("#00FF00"), Some(Color::new(0, 255, 0)));
        assert_eq!(Color::from_hex("0000ff"), Some(Color::new(0, 0, 255)));
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#GG0000"), None);
        assert_eq!(Color::new(0, 255, 0).to_hex(), "#00FF00");
    }
}
