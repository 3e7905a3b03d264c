// Copyright (c) 2024 Mike Tsao

use core::fmt::{self, Display};

/// One of the 24 orderings of fingers 1 through 4. Slot `n` of a bar is
/// played by finger `self.finger_at(n)`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub struct Permutation(usize);
impl Permutation {
    /// How many fingers take part in a bar.
    pub const FINGER_COUNT: usize = 4;

    /// How many distinct orderings exist (4!).
    pub const COUNT: usize = 24;

    /// Every ordering, in lexicographic order. A [Permutation]'s index points
    /// into this table and is what the pattern log records.
    pub const ALL: [[u8; Self::FINGER_COUNT]; Self::COUNT] = [
        [1, 2, 3, 4],
        [1, 2, 4, 3],
        [1, 3, 2, 4],
        [1, 3, 4, 2],
        [1, 4, 2, 3],
        [1, 4, 3, 2],
        [2, 1, 3, 4],
        [2, 1, 4, 3],
        [2, 3, 1, 4],
        [2, 3, 4, 1],
        [2, 4, 1, 3],
        [2, 4, 3, 1],
        [3, 1, 2, 4],
        [3, 1, 4, 2],
        [3, 2, 1, 4],
        [3, 2, 4, 1],
        [3, 4, 1, 2],
        [3, 4, 2, 1],
        [4, 1, 2, 3],
        [4, 1, 3, 2],
        [4, 2, 1, 3],
        [4, 2, 3, 1],
        [4, 3, 1, 2],
        [4, 3, 2, 1],
    ];

    /// Returns the ordering at `index`, or None if it's out of range.
    pub fn from_index(index: usize) -> Option<Self> {
        (index < Self::COUNT).then_some(Self(index))
    }

    /// This ordering's position in [Permutation::ALL].
    pub fn index(&self) -> usize {
        self.0
    }

    /// The 1-based finger that plays in the given 0-based slot.
    pub fn finger_at(&self, slot: usize) -> u8 {
        Self::ALL[self.0][slot]
    }

    /// The fingers in slot order.
    pub fn fingers(&self) -> &'static [u8; Self::FINGER_COUNT] {
        &Self::ALL[self.0]
    }
}
impl Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.fingers();
        write!(f, "{a}{b}{c}{d}")
    }
}
