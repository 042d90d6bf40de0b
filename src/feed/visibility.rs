//! Picks the single active feed index from how much of each item is on screen.

/// Minimum visible percentage for an item to count as viewable.
pub const VISIBILITY_THRESHOLD: u8 = 95;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewableEntry {
    pub index: usize,
    pub percent: u8,
}

#[derive(Debug)]
pub struct VisibilityTracker {
    active: usize,
    focused: bool,
}

impl Default for VisibilityTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl VisibilityTracker {
    pub fn new() -> Self {
        Self {
            active: 0,
            focused: true,
        }
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn reset(&mut self) {
        self.active = 0;
    }

    /// Returns the new active index when it changes. The most visible entry at
    /// or above the threshold wins; the earlier entry wins a tie.
    pub fn on_viewable_changed(&mut self, entries: &[ViewableEntry]) -> Option<usize> {
        if !self.focused {
            return None;
        }
        let best = entries
            .iter()
            .filter(|e| e.percent >= VISIBILITY_THRESHOLD)
            .fold(None::<ViewableEntry>, |best, e| match best {
                Some(b) if b.percent >= e.percent => Some(b),
                _ => Some(*e),
            })?;
        if best.index == self.active {
            return None;
        }
        self.active = best.index;
        Some(best.index)
    }
}

/// Computes visibility for a column of equally tall items scrolled by
/// `scroll_rows`.
pub fn visible_entries(
    scroll_rows: usize,
    item_height: usize,
    viewport_rows: usize,
    count: usize,
) -> Vec<ViewableEntry> {
    if item_height == 0 || viewport_rows == 0 {
        return Vec::new();
    }
    let view_end = scroll_rows + viewport_rows;
    let first = scroll_rows / item_height;
    (first..count)
        .map_while(|index| {
            let top = index * item_height;
            if top >= view_end {
                return None;
            }
            let bottom = top + item_height;
            let shown = bottom.min(view_end) - top.max(scroll_rows);
            let percent = (shown * 100 / item_height).min(100) as u8;
            Some(ViewableEntry { index, percent })
        })
        .filter(|e| e.percent > 0)
        .collect()
}
