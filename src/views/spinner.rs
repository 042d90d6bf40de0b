use std::time::{Instant, SystemTime, UNIX_EPOCH};

const FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const FRAME_MS: u128 = 80;

/// Spinner glyph for an operation that started at `start`. Without a start
/// time the wall clock drives the animation.
pub fn spinner_frame(start: Option<Instant>) -> &'static str {
    let elapsed = match start {
        Some(start) => start.elapsed().as_millis(),
        None => SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0),
    };
    FRAMES[(elapsed / FRAME_MS) as usize % FRAMES.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_start_shows_first_frame() {
        assert_eq!(spinner_frame(Some(Instant::now())), "⠋");
    }

    #[test]
    fn frame_is_always_a_known_glyph() {
        assert!(FRAMES.contains(&spinner_frame(None)));
    }
}
