//! Saved position slots.

/// Number of slots, numbered `1..=SLOT_COUNT`.
pub const SLOT_COUNT: usize = 4;

/// Fixed set of operator-saved positions, all starting at the origin.
///
/// Lives only as long as the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SavedPositions {
    slots: [(i32, i32); SLOT_COUNT],
}

impl SavedPositions {
    /// All slots at `(0, 0)`.
    pub const fn new() -> Self {
        Self {
            slots: [(0, 0); SLOT_COUNT],
        }
    }

    fn index(slot: u8) -> Option<usize> {
        let slot = slot as usize;
        (1..=SLOT_COUNT).contains(&slot).then(|| slot - 1)
    }

    /// Stored position, or `None` for a slot number outside `1..=4`.
    pub fn get(&self, slot: u8) -> Option<(i32, i32)> {
        Self::index(slot).map(|i| self.slots[i])
    }

    /// Store a position. Returns `false` (and changes nothing) for an invalid slot.
    pub fn save(&mut self, slot: u8, position: (i32, i32)) -> bool {
        match Self::index(slot) {
            Some(i) => {
                self.slots[i] = position;
                true
            }
            None => false,
        }
    }

    /// All slots with their numbers.
    pub fn iter(&self) -> impl Iterator<Item = (u8, (i32, i32))> + '_ {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, pos)| (i as u8 + 1, *pos))
    }
}
