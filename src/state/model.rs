#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayMode {
    #[default]
    Drawing,
    ClickThrough,
}

impl OverlayMode {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Drawing => Self::ClickThrough,
            Self::ClickThrough => Self::Drawing,
        }
    }

    pub const fn is_drawing(self) -> bool {
        matches!(self, Self::Drawing)
    }

    pub const fn window_attributes(self) -> WindowAttributes {
        WindowAttributes {
            frameless: true,
            always_on_top: true,
            input_transparent: matches!(self, Self::ClickThrough),
            intercept_pointer: matches!(self, Self::Drawing),
        }
    }
}

/// Window-level flags the host must apply for a mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowAttributes {
    pub frameless: bool,
    pub always_on_top: bool,
    pub input_transparent: bool,
    pub intercept_pointer: bool,
}
