use hopscroll_core::{Platform, StripRow, StripView, STRIP_CAPACITY};

/// Fixed-capacity store of platform slots.
///
/// The store is a flat array: wraparound is resolved by callers when they
/// build a [`StripRow`], never here.
#[derive(Clone, Debug)]
pub(crate) struct PlatformStrip {
    platforms: [Platform; STRIP_CAPACITY],
    generations: [u32; STRIP_CAPACITY],
}

impl PlatformStrip {
    pub(crate) const fn new() -> Self {
        Self {
            platforms: [Platform::absent(); STRIP_CAPACITY],
            generations: [0; STRIP_CAPACITY],
        }
    }

    pub(crate) fn get(&self, row: StripRow) -> Platform {
        debug_assert!(row.get() < STRIP_CAPACITY);
        self.platforms[row.get()]
    }

    /// Stores a freshly generated platform and counts the generation.
    pub(crate) fn set(&mut self, row: StripRow, platform: Platform) {
        debug_assert!(row.get() < STRIP_CAPACITY);
        self.platforms[row.get()] = platform;
        self.generations[row.get()] = self.generations[row.get()].saturating_add(1);
    }

    /// Removes the item from a row without counting a new generation.
    pub(crate) fn take_item(&mut self, row: StripRow) -> bool {
        let platform = self.get(row);
        if !platform.has_item() {
            return false;
        }
        self.platforms[row.get()] = platform.without_item();
        true
    }

    pub(crate) fn generations(&self, row: StripRow) -> u32 {
        self.generations[row.get()]
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::new();
    }

    pub(crate) const fn view(&self) -> StripView<'_> {
        StripView::new(&self.platforms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_counts_generations_per_row() {
        let mut strip = PlatformStrip::new();
        let row = StripRow::wrapping(12);
        strip.set(row, Platform::at(7));
        strip.set(row, Platform::absent());
        assert_eq!(strip.generations(row), 2);
        assert_eq!(strip.generations(StripRow::wrapping(13)), 0);
        assert_eq!(strip.get(row), Platform::absent());
    }

    #[test]
    fn take_item_only_touches_the_item_flag() {
        let mut strip = PlatformStrip::new();
        let row = StripRow::wrapping(3);
        strip.set(row, Platform::at(9).with_item(true));
        assert!(strip.take_item(row));
        assert!(!strip.take_item(row));
        assert_eq!(strip.get(row), Platform::at(9));
        assert_eq!(strip.generations(row), 1);
    }

    #[test]
    fn clear_forgets_contents_and_generations() {
        let mut strip = PlatformStrip::new();
        strip.set(StripRow::wrapping(0), Platform::at(4));
        strip.clear();
        assert_eq!(strip.get(StripRow::wrapping(0)), Platform::absent());
        assert_eq!(strip.generations(StripRow::wrapping(0)), 0);
    }
}
