//! Board generation.
//!
//! Draws 25 distinct words by sampling indices without replacement, then
//! shuffles a fixed color pool over them, so no draw can ever loop and card
//! position carries no information about color.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::game::{Card, CardColor};
use crate::domain::words::WordList;
use crate::error::AppError;

pub const BOARD_SIZE: usize = 25;
pub const BLACK_CARDS: usize = 1;
pub const RED_CARDS: usize = 8;
pub const BLUE_CARDS: usize = 9;
pub const NEUTRAL_CARDS: usize = BOARD_SIZE - BLACK_CARDS - RED_CARDS - BLUE_CARDS;

/// Generate a 25-card board: 1 black, 8 red, 9 blue, 7 neutral, each color
/// uniformly assigned to a distinct word. Word draw and color assignment
/// are both O(BOARD_SIZE).
pub fn generate_board<R: Rng + ?Sized>(
    words: &WordList,
    rng: &mut R,
) -> Result<BTreeMap<String, Card>, AppError> {
    if words.len() < BOARD_SIZE {
        return Err(AppError::internal(format!(
            "word list shrank below {BOARD_SIZE} words"
        )));
    }

    let drawn = rand::seq::index::sample(rng, words.len(), BOARD_SIZE);

    let mut colors = Vec::with_capacity(BOARD_SIZE);
    colors.extend(std::iter::repeat(CardColor::Black).take(BLACK_CARDS));
    colors.extend(std::iter::repeat(CardColor::Red).take(RED_CARDS));
    colors.extend(std::iter::repeat(CardColor::Blue).take(BLUE_CARDS));
    colors.extend(std::iter::repeat(CardColor::Neutral).take(NEUTRAL_CARDS));
    colors.shuffle(rng);

    let mut cards = BTreeMap::new();
    for (position, word_index) in drawn.iter().enumerate() {
        cards.insert(
            words.words()[word_index].clone(),
            Card {
                index: position,
                belongs_to: colors[position],
                guessed: false,
            },
        );
    }
    Ok(cards)
}
