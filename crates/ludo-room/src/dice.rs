//! Dice: the relay's only source of randomness.

use rand::Rng;

/// Something that produces die faces in `1..=6`.
///
/// The registry owns one boxed `Dice`. Production uses [`RandomDice`];
/// tests inject a [`ScriptedDice`] so turn rotation is deterministic.
pub trait Dice: Send {
    /// Rolls once.
    fn roll(&mut self) -> u8;
}

/// A fair six-sided die backed by the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomDice;

impl Dice for RandomDice {
    fn roll(&mut self) -> u8 {
        rand::rng().random_range(1..=6)
    }
}

/// A die that replays a fixed sequence, cycling when it runs out.
///
/// ```rust
/// use ludo_room::{Dice, ScriptedDice};
///
/// let mut dice = ScriptedDice::new([6, 3]);
/// assert_eq!(dice.roll(), 6);
/// assert_eq!(dice.roll(), 3);
/// assert_eq!(dice.roll(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    faces: Vec<u8>,
    next: usize,
}

impl ScriptedDice {
    /// Creates a die that rolls `faces` in order. An empty script always
    /// rolls 1.
    pub fn new(faces: impl IntoIterator<Item = u8>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
            next: 0,
        }
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self) -> u8 {
        let Some(face) = self.faces.get(self.next).copied() else {
            return 1;
        };
        self.next = (self.next + 1) % self.faces.len();
        face
    }
}
