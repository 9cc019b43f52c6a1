use poker_round::cards::{Card, Rank, Suit};
use poker_round::evaluator::{classify, evaluate_5, evaluate_6, evaluate_7, BEST_RANK, WORST_RANK};
use proptest::prelude::*;
use proptest::sample::subsequence;

fn deck() -> Vec<Card> {
    (0..52).filter_map(Card::from_id).collect()
}

fn best_of_five(cards: &[Card; 7]) -> u16 {
    let mut best = u16::MAX;
    for a in 0..7 {
        for b in a + 1..7 {
            let hand: Vec<Card> = (0..7).filter(|&i| i != a && i != b).map(|i| cards[i]).collect();
            best = best.min(evaluate_5(&hand.try_into().unwrap()));
        }
    }
    best
}

fn best_of_six(cards: &[Card; 6]) -> u16 {
    (0..6)
        .map(|skip| {
            let hand: Vec<Card> = (0..6).filter(|&i| i != skip).map(|i| cards[i]).collect();
            evaluate_5(&hand.try_into().unwrap())
        })
        .min()
        .unwrap()
}

proptest! {
    #[test]
    fn ranks_stay_in_range(cards in subsequence(deck(), 7)) {
        let seven: [Card; 7] = cards.try_into().unwrap();
        let r = evaluate_7(&seven);
        prop_assert!((BEST_RANK..=WORST_RANK).contains(&r));
    }

    #[test]
    fn seven_cards_play_the_best_five(cards in subsequence(deck(), 7)) {
        let seven: [Card; 7] = cards.try_into().unwrap();
        prop_assert_eq!(evaluate_7(&seven), best_of_five(&seven));
    }

    #[test]
    fn six_cards_play_the_best_five(cards in subsequence(deck(), 6)) {
        let six: [Card; 6] = cards.try_into().unwrap();
        prop_assert_eq!(evaluate_6(&six), best_of_six(&six));
    }

    #[test]
    fn card_order_is_irrelevant(cards in subsequence(deck(), 7).prop_shuffle()) {
        let mut sorted = cards.clone();
        sorted.sort();
        let a: [Card; 7] = cards.try_into().unwrap();
        let b: [Card; 7] = sorted.try_into().unwrap();
        prop_assert_eq!(evaluate_7(&a), evaluate_7(&b));
    }

    #[test]
    fn suit_relabeling_keeps_strength(cards in subsequence(deck(), 7), shift in 1u8..4) {
        let relabeled: Vec<Card> = cards
            .iter()
            .map(|c| Card::new(c.rank(), Suit::ALL[((c.suit().index() + shift) % 4) as usize]))
            .collect();
        let a: [Card; 7] = cards.try_into().unwrap();
        let b: [Card; 7] = relabeled.try_into().unwrap();
        prop_assert_eq!(evaluate_7(&a), evaluate_7(&b));
    }

    #[test]
    fn classification_agrees_with_rank_order(a in subsequence(deck(), 5), b in subsequence(deck(), 5)) {
        let ra = evaluate_5(&a.try_into().unwrap());
        let rb = evaluate_5(&b.try_into().unwrap());
        if ra < rb {
            prop_assert!(classify(ra).category >= classify(rb).category);
        }
    }
}

#[test]
fn royal_flush_and_seven_high_bound_the_scale() {
    let royal = [Rank::Ace, Rank::King, Rank::Queen, Rank::Jack, Rank::Ten].map(|r| Card::new(r, Suit::Hearts));
    assert_eq!(evaluate_5(&royal), BEST_RANK);
    let worst = [
        Card::new(Rank::Seven, Suit::Clubs),
        Card::new(Rank::Five, Suit::Diamonds),
        Card::new(Rank::Four, Suit::Hearts),
        Card::new(Rank::Three, Suit::Spades),
        Card::new(Rank::Two, Suit::Clubs),
    ];
    assert_eq!(evaluate_5(&worst), WORST_RANK);
}
