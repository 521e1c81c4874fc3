mod appendable;
mod capabilities;

pub use appendable::Appendable;
pub use capabilities::{Capabilities, DiceRng, StdDiceRng};
