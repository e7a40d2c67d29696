use std::collections::VecDeque;

use crate::editor::surface::{Pen, TextStyle};
use crate::geometry::Color;

pub const LINE_WIDTH_MIN: u32 = 1;
pub const LINE_WIDTH_MAX: u32 = 50;
pub const ERASER_SIZE_MIN: u32 = 5;
pub const ERASER_SIZE_MAX: u32 = 100;
pub const ERASER_SIZE_DEFAULT: u32 = 20;
pub const FONT_SIZE_MIN: u32 = 12;
pub const FONT_SIZE_MAX: u32 = 72;
pub const FONT_SIZE_DEFAULT: u32 = 24;

pub const fn clamp_line_width(width: u32) -> u32 {
    clamp_u32_range(width, LINE_WIDTH_MIN, LINE_WIDTH_MAX)
}

pub const fn clamp_eraser_size(size: u32) -> u32 {
    clamp_u32_range(size, ERASER_SIZE_MIN, ERASER_SIZE_MAX)
}

pub const fn clamp_font_size(size: u32) -> u32 {
    clamp_u32_range(size, FONT_SIZE_MIN, FONT_SIZE_MAX)
}

const fn clamp_u32_range(value: u32, min: u32, max: u32) -> u32 {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Style handed to every tool the canvas builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolStyle {
    pub color: Color,
    pub fill_color: Option<Color>,
    pub line_width: u32,
    pub font_size: u32,
    pub opacity: u8,
}

impl Default for ToolStyle {
    fn default() -> Self {
        Self {
            color: Color::RED,
            fill_color: None,
            line_width: 3,
            font_size: FONT_SIZE_DEFAULT,
            opacity: 255,
        }
    }
}

impl ToolStyle {
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn set_fill_color(&mut self, fill_color: Option<Color>) {
        self.fill_color = fill_color;
    }

    pub fn set_line_width(&mut self, width: u32) {
        self.line_width = clamp_line_width(width);
    }

    pub fn set_font_size(&mut self, size: u32) {
        self.font_size = clamp_font_size(size);
    }

    pub fn set_opacity(&mut self, opacity: u8) {
        self.opacity = opacity;
    }

    pub const fn stroke_color(&self) -> Color {
        self.color.with_alpha(self.opacity)
    }

    pub fn fill(&self) -> Option<Color> {
        self.fill_color.map(|fill| fill.with_alpha(self.opacity))
    }

    pub const fn pen(&self) -> Pen {
        Pen::new(self.stroke_color(), self.line_width)
    }

    pub const fn text_style(&self) -> TextStyle {
        TextStyle {
            color: self.stroke_color(),
            font_size: self.font_size,
            bold: false,
            italic: false,
        }
    }
}

pub const RECENT_COLORS_MAX: usize = 10;

const RECENT_COLOR_SEED: [Color; 6] = [
    Color::new(0xFF, 0x00, 0x00),
    Color::new(0x00, 0xFF, 0x00),
    Color::new(0x00, 0x00, 0xFF),
    Color::new(0xFF, 0xFF, 0x00),
    Color::new(0xFF, 0x00, 0xFF),
    Color::new(0x00, 0xFF, 0xFF),
];

/// Most-recently-used colors, newest first, without duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentColors {
    colors: VecDeque<Color>,
}

impl Default for RecentColors {
    fn default() -> Self {
        Self {
            colors: RECENT_COLOR_SEED.into_iter().collect(),
        }
    }
}

impl RecentColors {
    pub fn push(&mut self, color: Color) {
        let color = color.with_alpha(255);
        self.colors.retain(|existing| *existing != color);
        self.colors.push_front(color);
        self.colors.truncate(RECENT_COLORS_MAX);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Color> {
        self.colors.iter()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
