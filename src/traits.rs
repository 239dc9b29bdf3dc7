//! Core trait definitions for closed label and symbol universes.
//!
//! A [`Model`](crate::model::Model) is generic over any hashable label and
//! symbol types, so string-keyed models loaded from configuration work out of
//! the box. When the universe is fixed at compile time, implement
//! [`Vocabulary`] for a plain enum instead:
//! - the declared order of [`Vocabulary::ALL`] becomes the model's label (or
//!   symbol) order, and therefore the Viterbi tie-break order;
//! - [`Vocabulary::ordinal`] is the enum's position in that order;
//! - [`Vocabulary::name`] is the display/configuration spelling.
//!
//! See [`crate::pos`] for the reference implementations.

use std::fmt::Debug;
use std::hash::Hash;

/// A finite, ordered, compile-time-known set of labels or symbols.
pub trait Vocabulary: Copy + Eq + Hash + Debug + 'static {
    /// Every member, in declaration order.
    const ALL: &'static [Self];

    /// Position of `self` within [`Self::ALL`].
    fn ordinal(self) -> usize;

    /// Canonical spelling used for display and parsing.
    fn name(self) -> &'static str;

    /// Look a member up by its canonical spelling.
    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::Vocabulary;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    enum Coin {
        Heads,
        Tails,
    }

    impl Vocabulary for Coin {
        const ALL: &'static [Self] = &[Coin::Heads, Coin::Tails];

        fn ordinal(self) -> usize {
            self as usize
        }

        fn name(self) -> &'static str {
            match self {
                Coin::Heads => "H",
                Coin::Tails => "T",
            }
        }
    }

    #[test]
    fn ordinals_follow_declaration_order() {
        for (i, c) in Coin::ALL.iter().enumerate() {
            assert_eq!(c.ordinal(), i);
        }
    }

    #[test]
    fn from_name_is_exact() {
        assert_eq!(Coin::from_name("H"), Some(Coin::Heads));
        assert_eq!(Coin::from_name("t"), None);
    }
}
