mod shortcut;

pub use shortcut::{
    InputContext, Shortcut, ShortcutAction, ShortcutBindings, ShortcutKey, ShortcutModifiers,
};
