use crate::input::{ShortcutKey, ShortcutModifiers};

fn shortcut_character_from_keycode(keycode: u32) -> Option<char> {
    // XKB keycodes (evdev+8), so tool letters survive non-latin layouts.
    match keycode {
        56 => Some('b'),
        26 => Some('e'),
        46 => Some('l'),
        27 => Some('r'),
        54 => Some('c'),
        28 => Some('t'),
        58 => Some('m'),
        39 => Some('s'),
        52 => Some('z'),
        29 => Some('y'),
        _ => None,
    }
}

fn function_key_number(key: gtk4::gdk::Key) -> Option<u8> {
    let name = key.name()?;
    let number: u8 = name.strip_prefix('F')?.parse().ok()?;
    (1..=24).contains(&number).then_some(number)
}

pub(super) fn normalize_shortcut_key(key: gtk4::gdk::Key, keycode: u32) -> Option<ShortcutKey> {
    if key == gtk4::gdk::Key::Escape {
        return Some(ShortcutKey::Escape);
    }
    if matches!(key, gtk4::gdk::Key::Delete | gtk4::gdk::Key::KP_Delete) {
        return Some(ShortcutKey::Delete);
    }
    if let Some(number) = function_key_number(key) {
        return Some(ShortcutKey::Function(number));
    }

    match key
        .to_unicode()
        .filter(|character| !character.is_control())
        .map(|character| character.to_ascii_lowercase())
    {
        Some(character) if character.is_ascii() => Some(ShortcutKey::Character(character)),
        Some(_) | None => shortcut_character_from_keycode(keycode).map(ShortcutKey::Character),
    }
}

pub(super) fn shortcut_modifiers(modifier: gtk4::gdk::ModifierType) -> ShortcutModifiers {
    ShortcutModifiers::new(
        modifier.contains(gtk4::gdk::ModifierType::CONTROL_MASK),
        modifier.contains(gtk4::gdk::ModifierType::SHIFT_MASK),
    )
}
