use crate::editor::ToolKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutKey {
    Character(char),
    Delete,
    Escape,
    Function(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShortcutModifiers {
    pub ctrl: bool,
    pub shift: bool,
}

impl ShortcutModifiers {
    pub const fn new(ctrl: bool, shift: bool) -> Self {
        Self { ctrl, shift }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputContext {
    pub dialog_open: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    SelectTool(ToolKind),
    Undo,
    Redo,
    Clear,
    Save,
    Exit,
    ToggleMode,
}

/// One key chord such as `Ctrl+Z` or `F9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
    pub key: ShortcutKey,
    pub modifiers: ShortcutModifiers,
}

impl Shortcut {
    /// Parses `+`-separated chords; modifier and key names are case-insensitive.
    pub fn parse(chord: &str) -> Option<Self> {
        let mut modifiers = ShortcutModifiers::default();
        let mut key = None;
        for part in chord.split('+').map(str::trim) {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => modifiers.ctrl = true,
                "shift" => modifiers.shift = true,
                "delete" | "del" => key = Some(ShortcutKey::Delete),
                "escape" | "esc" => key = Some(ShortcutKey::Escape),
                name => key = Some(parse_key_name(name)?),
            }
        }
        key.map(|key| Self { key, modifiers })
    }

    fn matches(&self, key: ShortcutKey, modifiers: ShortcutModifiers) -> bool {
        self.key == normalize_key(key) && self.modifiers == modifiers
    }
}

fn parse_key_name(name: &str) -> Option<ShortcutKey> {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if ch.is_ascii_alphanumeric() => {
            Some(ShortcutKey::Character(ch.to_ascii_lowercase()))
        }
        (Some('f'), Some(_)) => name[1..]
            .parse::<u8>()
            .ok()
            .filter(|n| (1..=24).contains(n))
            .map(ShortcutKey::Function),
        _ => None,
    }
}

fn normalize_key(key: ShortcutKey) -> ShortcutKey {
    match key {
        ShortcutKey::Character(ch) => ShortcutKey::Character(ch.to_ascii_lowercase()),
        other => other,
    }
}

const DEFAULT_BINDINGS: &[(&str, ShortcutAction)] = &[
    ("B", ShortcutAction::SelectTool(ToolKind::Brush)),
    ("E", ShortcutAction::SelectTool(ToolKind::Eraser)),
    ("L", ShortcutAction::SelectTool(ToolKind::Line)),
    ("R", ShortcutAction::SelectTool(ToolKind::Rectangle)),
    ("C", ShortcutAction::SelectTool(ToolKind::Circle)),
    ("T", ShortcutAction::SelectTool(ToolKind::Text)),
    ("M", ShortcutAction::SelectTool(ToolKind::Magnifier)),
    ("Ctrl+Z", ShortcutAction::Undo),
    ("Ctrl+Y", ShortcutAction::Redo),
    ("Delete", ShortcutAction::Clear),
    ("Ctrl+S", ShortcutAction::Save),
    ("Escape", ShortcutAction::Exit),
    ("F9", ShortcutAction::ToggleMode),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortcutBindings {
    bindings: Vec<(Shortcut, ShortcutAction)>,
}

impl Default for ShortcutBindings {
    fn default() -> Self {
        let bindings = DEFAULT_BINDINGS
            .iter()
            .filter_map(|(chord, action)| Shortcut::parse(chord).map(|shortcut| (shortcut, *action)))
            .collect();
        Self { bindings }
    }
}

impl ShortcutBindings {
    /// Rebinds `action` to `chord`; returns `false` if the chord does not parse.
    pub fn rebind(&mut self, action: ShortcutAction, chord: &str) -> bool {
        let Some(shortcut) = Shortcut::parse(chord) else {
            tracing::warn!(chord, ?action, "ignoring unparseable shortcut");
            return false;
        };
        self.bindings.retain(|(_, bound)| *bound != action);
        self.bindings.push((shortcut, action));
        true
    }

    pub fn resolve(
        &self,
        key: ShortcutKey,
        modifiers: ShortcutModifiers,
        context: InputContext,
    ) -> Option<ShortcutAction> {
        if context.dialog_open {
            return None;
        }
        self.bindings
            .iter()
            .find(|(shortcut, _)| shortcut.matches(key, modifiers))
            .map(|(_, action)| *action)
    }
}
