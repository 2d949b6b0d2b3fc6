use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::board::{
    generate_board, BLACK_CARDS, BLUE_CARDS, BOARD_SIZE, NEUTRAL_CARDS, RED_CARDS,
};
use crate::domain::game::CardColor;
use crate::domain::words::WordList;

fn word_pool(size: usize) -> WordList {
    let raw: String = (0..size).map(|i| format!("word{i:03}\n")).collect();
    WordList::from_lines(&raw).unwrap()
}

proptest! {
    #[test]
    fn color_counts_hold_for_any_seed_and_pool(seed in any::<u64>(), extra in 0usize..400) {
        let words = word_pool(BOARD_SIZE + extra);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let cards = generate_board(&words, &mut rng).unwrap();

        prop_assert_eq!(cards.len(), BOARD_SIZE);
        let count = |color: CardColor| cards.values().filter(|c| c.belongs_to == color).count();
        prop_assert_eq!(count(CardColor::Black), BLACK_CARDS);
        prop_assert_eq!(count(CardColor::Red), RED_CARDS);
        prop_assert_eq!(count(CardColor::Blue), BLUE_CARDS);
        prop_assert_eq!(count(CardColor::Neutral), NEUTRAL_CARDS);
    }

    #[test]
    fn indices_are_a_permutation(seed in any::<u64>()) {
        let words = word_pool(120);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let cards = generate_board(&words, &mut rng).unwrap();

        let mut indices: Vec<usize> = cards.values().map(|c| c.index).collect();
        indices.sort_unstable();
        prop_assert_eq!(indices, (0..BOARD_SIZE).collect::<Vec<_>>());
    }

    #[test]
    fn every_word_comes_from_the_pool(seed in any::<u64>()) {
        let words = word_pool(60);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let cards = generate_board(&words, &mut rng).unwrap();
        for word in cards.keys() {
            prop_assert!(words.words().iter().any(|w| w == word));
        }
    }
}

#[test]
fn undersized_pool_is_rejected() {
    let words = word_pool(BOARD_SIZE);
    assert!(generate_board(&words, &mut ChaCha8Rng::seed_from_u64(0)).is_ok());

    let short: String = (0..BOARD_SIZE - 1).map(|i| format!("w{i}\n")).collect();
    assert!(WordList::from_lines(&short).is_err());
}
