use super::ThemeVariant;

/// Guesses the terminal background from its luma. Falls back to dark when
/// the terminal doesn't answer.
pub fn detect_terminal_theme() -> ThemeVariant {
    match terminal_light::luma() {
        Ok(luma) if luma > 0.6 => ThemeVariant::Light,
        _ => ThemeVariant::Dark,
    }
}
