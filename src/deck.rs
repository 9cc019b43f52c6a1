use crate::cards::{join_cards, Card, Rank, Suit};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A standard 52-card deck, suits outermost: 2c..Ac, 2d..Ad, 2h..Ah, 2s..As.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// ```
    /// use poker_round::deck::Deck;
    ///
    /// let deck = Deck::standard();
    /// assert_eq!(deck.len(), 52);
    /// ```
    pub fn standard() -> Self {
        let mut cards = Vec::with_capacity(52);
        for s in Suit::ALL {
            for r in Rank::ALL {
                cards.push(Card::new(r, s));
            }
        }
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    /// Shuffle using a seeded RNG for reproducibility.
    pub fn shuffle_seeded(&mut self, seed: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.cards.shuffle(&mut rng);
    }

    /// Fisher-Yates shuffle driven by the caller's RNG.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Draw one card from the top of the deck.
    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Draw `n` cards from the top of the deck.
    pub fn draw_n(&mut self, n: usize) -> Vec<Card> {
        (0..n).filter_map(|_| self.draw()).collect()
    }
}

/// Shuffle a fresh deck and return its first `n` cards as one token string.
///
/// ```
/// use poker_round::deck::make_cards;
/// use rand::SeedableRng;
///
/// let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(3);
/// assert_eq!(make_cards(7, &mut rng).len(), 14);
/// ```
pub fn make_cards<R: Rng + ?Sized>(n: usize, rng: &mut R) -> String {
    let mut deck = Deck::standard();
    deck.shuffle_with(rng);
    join_cards(&deck.draw_n(n))
}

/// Cards for one `deal`: two per seat plus the five community cards.
pub fn make_deal<R: Rng + ?Sized>(seats: usize, rng: &mut R) -> String {
    make_cards(5 + seats * 2, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::split_cards;
    use std::collections::HashSet;

    #[test]
    fn standard_deck_has_52_distinct_cards() {
        let d = Deck::standard();
        assert_eq!(d.len(), 52);
        let set: HashSet<Card> = d.as_slice().iter().copied().collect();
        assert_eq!(set.len(), 52);
        assert_eq!(d.as_slice()[0].to_string(), "2c");
        assert_eq!(d.as_slice()[13].to_string(), "2d");
    }

    #[test]
    fn seeded_shuffle_is_reproducible() {
        let mut d1 = Deck::standard();
        let mut d2 = Deck::standard();
        d1.shuffle_seeded(42);
        d2.shuffle_seeded(42);
        assert_eq!(d1.cards, d2.cards);
    }

    #[test]
    fn draw_reduces_length_and_returns_cards() {
        let mut d = Deck::standard();
        d.shuffle_seeded(7);
        let c1 = d.draw().unwrap();
        let c2 = d.draw().unwrap();
        assert_ne!(c1, c2);
        assert_eq!(d.len(), 50);
        let hand = d.draw_n(5);
        assert_eq!(hand.len(), 5);
        assert_eq!(d.len(), 45);
    }

    #[test]
    fn make_deal_sizes_for_the_table() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let deal = make_deal(3, &mut rng);
        let cards = split_cards(&deal).unwrap();
        assert_eq!(cards.len(), 11);
        let set: HashSet<Card> = cards.iter().copied().collect();
        assert_eq!(set.len(), 11);
    }

    #[test]
    fn seeded_deck_deals_a_round() {
        let mut deck = Deck::standard();
        deck.shuffle_seeded(3);
        let deal = join_cards(&deck.draw_n(9));
        assert_eq!(deck.len(), 43);
        let mut round = crate::round::Round::new(10, 1, &[500, 500]).unwrap();
        round.act(&format!("deal {deal}")).unwrap();
        assert!(round.action_seat().is_some());
    }
}
