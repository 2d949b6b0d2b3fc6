//! Domain layer: pure game rules, projections, and board generation.

pub mod board;
pub mod game;
pub mod player_view;
pub mod transitions;
pub mod update;
pub mod words;

#[cfg(test)]
pub(crate) mod test_helpers;
#[cfg(test)]
mod tests_props_board;
#[cfg(test)]
mod tests_transitions;
#[cfg(test)]
mod tests_views;

// Re-exports for ergonomics
pub use game::{Card, CardColor, Game, GameStatus, Team, Turn};
pub use update::GameUpdate;
pub use words::WordList;
