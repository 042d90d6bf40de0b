use ratatui::style::Color;

use super::{Theme, ThemeVariant};

pub fn all_themes() -> Vec<Theme> {
    vec![dark(), light(), neon()]
}

pub fn by_name(name: &str) -> Option<Theme> {
    all_themes().into_iter().find(|t| t.name == name)
}

pub fn default_for_variant(variant: ThemeVariant) -> Theme {
    match variant {
        ThemeVariant::Dark => dark(),
        ThemeVariant::Light => light(),
    }
}

pub fn dark() -> Theme {
    Theme {
        name: "dark".to_string(),
        variant: ThemeVariant::Dark,
        foreground: Color::White,
        foreground_dim: Color::Rgb(0x8A, 0x8F, 0x98),
        border: Color::Rgb(0x4B, 0x50, 0x5A),
        selection_bg: Color::DarkGray,
        primary: Color::Rgb(0xF9, 0x4F, 0x8A),
        success: Color::Green,
        warning: Color::Yellow,
        error: Color::Red,
        video_title: Color::White,
        creator: Color::Cyan,
        likes: Color::Rgb(0xF9, 0x4F, 0x8A),
        gifts: Color::Yellow,
        counter: Color::Rgb(0xC8, 0xCC, 0xD4),
        locked: Color::Rgb(0xFF, 0xB8, 0x4D),
        status_bar_bg: Color::Rgb(0x26, 0x28, 0x2E),
        status_bar_fg: Color::White,
        spinner: Color::Rgb(0xF9, 0x4F, 0x8A),
    }
}

pub fn light() -> Theme {
    Theme {
        name: "light".to_string(),
        variant: ThemeVariant::Light,
        foreground: Color::Black,
        foreground_dim: Color::DarkGray,
        border: Color::Gray,
        selection_bg: Color::LightBlue,
        primary: Color::Rgb(0xC2, 0x18, 0x5B),
        success: Color::Green,
        warning: Color::Rgb(0xB2, 0x6A, 0x00),
        error: Color::Red,
        video_title: Color::Black,
        creator: Color::Blue,
        likes: Color::Rgb(0xC2, 0x18, 0x5B),
        gifts: Color::Rgb(0xB2, 0x6A, 0x00),
        counter: Color::DarkGray,
        locked: Color::Rgb(0xB2, 0x6A, 0x00),
        status_bar_bg: Color::Blue,
        status_bar_fg: Color::White,
        spinner: Color::Blue,
    }
}

pub fn neon() -> Theme {
    Theme {
        name: "neon".to_string(),
        variant: ThemeVariant::Dark,
        foreground: Color::Rgb(0xE6, 0xE6, 0xFA),
        foreground_dim: Color::Rgb(0x6C, 0x6F, 0x93),
        border: Color::Rgb(0x41, 0x3C, 0x6B),
        selection_bg: Color::Rgb(0x2A, 0x25, 0x4A),
        primary: Color::Rgb(0x00, 0xF5, 0xD4),
        success: Color::Rgb(0x00, 0xF5, 0xD4),
        warning: Color::Rgb(0xFE, 0xE4, 0x40),
        error: Color::Rgb(0xFF, 0x4D, 0x6D),
        video_title: Color::Rgb(0xE6, 0xE6, 0xFA),
        creator: Color::Rgb(0x9B, 0x5D, 0xE5),
        likes: Color::Rgb(0xF1, 0x5B, 0xB5),
        gifts: Color::Rgb(0xFE, 0xE4, 0x40),
        counter: Color::Rgb(0xB8, 0xB8, 0xD1),
        locked: Color::Rgb(0xFE, 0xE4, 0x40),
        status_bar_bg: Color::Rgb(0x1A, 0x16, 0x33),
        status_bar_fg: Color::Rgb(0xE6, 0xE6, 0xFA),
        spinner: Color::Rgb(0x00, 0xF5, 0xD4),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique() {
        let themes = all_themes();
        let mut names: Vec<_> = themes.iter().map(|t| t.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), themes.len());
    }

    #[test]
    fn lookup_by_name() {
        assert_eq!(by_name("neon").unwrap().name, "neon");
        assert!(by_name("monokai").is_none());
    }

    #[test]
    fn variant_defaults() {
        assert_eq!(default_for_variant(ThemeVariant::Light).name, "light");
        assert_eq!(default_for_variant(ThemeVariant::Dark).variant, ThemeVariant::Dark);
    }
}
