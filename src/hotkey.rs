/// Key identifier that cancels hotkey capture instead of committing.
pub const CANCEL_KEY: &str = "Escape";

const NAMED_KEYS: &[&str] = &[
    "Space",
    "Tab",
    "Enter",
    "Escape",
    "Backspace",
    "Delete",
    "Insert",
    "Home",
    "End",
    "PageUp",
    "PageDown",
    "ArrowLeft",
    "ArrowRight",
    "ArrowUp",
    "ArrowDown",
];

/// Normalize a key identifier like `"h"`, `"f2"` or `"escape"` into the
/// canonical form stored in [`crate::state::PanelState::hotkey`]. Returns
/// `None` for identifiers that cannot act as a toggle binding.
pub fn normalize_key(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    let upper = trimmed.to_ascii_uppercase();
    if upper.len() == 1 {
        let c = upper.chars().next()?;
        return c.is_ascii_alphanumeric().then(|| upper.clone());
    }
    if let Some(digits) = upper.strip_prefix('F') {
        if let Ok(n) = digits.parse::<u8>() {
            if (1..=12).contains(&n) {
                return Some(format!("F{n}"));
            }
        }
    }
    NAMED_KEYS
        .iter()
        .find(|name| name.eq_ignore_ascii_case(trimmed))
        .map(|name| name.to_string())
}
