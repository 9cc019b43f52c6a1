use super::tables::{
    for_each_combination, unpaired_five_sets, FLUSH_START, FOUR_OF_A_KIND_START,
    FULL_HOUSE_START, HIGH_CARD_START, ONE_PAIR_START, STRAIGHT_START, THREE_OF_A_KIND_START,
    TWO_PAIR_START,
};
use super::{HandRank, WORST_RANK};
use crate::cards::Rank;
use std::fmt;
use std::sync::OnceLock;

/// Poker hand category from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
#[repr(u8)]
pub enum Category {
    HighCard = 0,
    Pair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl Category {
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Bucket a raw rank (1 = best) into its category.
    pub const fn of_rank(rank: HandRank) -> Category {
        if rank >= HIGH_CARD_START {
            Category::HighCard
        } else if rank >= ONE_PAIR_START {
            Category::Pair
        } else if rank >= TWO_PAIR_START {
            Category::TwoPair
        } else if rank >= THREE_OF_A_KIND_START {
            Category::ThreeOfAKind
        } else if rank >= STRAIGHT_START {
            Category::Straight
        } else if rank >= FLUSH_START {
            Category::Flush
        } else if rank >= FULL_HOUSE_START {
            Category::FullHouse
        } else if rank >= FOUR_OF_A_KIND_START {
            Category::FourOfAKind
        } else {
            Category::StraightFlush
        }
    }

    /// Number of equivalence classes in this category.
    pub const fn class_count(self) -> u16 {
        match self {
            Category::HighCard | Category::Flush => 1277,
            Category::Pair => 2860,
            Category::TwoPair | Category::ThreeOfAKind => 858,
            Category::Straight | Category::StraightFlush => 10,
            Category::FullHouse | Category::FourOfAKind => 156,
        }
    }

    /// Classes in every weaker category, i.e. the klass just below this block.
    const fn klass_floor(self) -> u16 {
        match self {
            Category::HighCard => 0,
            Category::Pair => 1277,
            Category::TwoPair => 4137,
            Category::ThreeOfAKind => 4995,
            Category::Straight => 5853,
            Category::Flush => 5863,
            Category::FullHouse => 7140,
            Category::FourOfAKind => 7296,
            Category::StraightFlush => 7452,
        }
    }

    pub const fn abbr(self) -> &'static str {
        match self {
            Category::HighCard => "HC",
            Category::Pair => "1P",
            Category::TwoPair => "2P",
            Category::ThreeOfAKind => "3K",
            Category::Straight => "S",
            Category::Flush => "F",
            Category::FullHouse => "FH",
            Category::FourOfAKind => "4K",
            Category::StraightFlush => "SF",
        }
    }

    const fn short_word(self) -> &'static str {
        match self {
            Category::HighCard => "high",
            Category::Pair => "pair",
            Category::TwoPair => "ppair",
            Category::ThreeOfAKind => "set",
            Category::Straight => "straight",
            Category::Flush => "flush",
            Category::FullHouse => "full",
            Category::FourOfAKind => "quads",
            Category::StraightFlush => "sflush",
        }
    }

    /// How many kickers the short description spells out.
    const fn short_len(self) -> usize {
        match self {
            Category::HighCard | Category::Flush => 5,
            Category::Pair => 4,
            Category::TwoPair | Category::ThreeOfAKind => 3,
            Category::FullHouse => 2,
            Category::Straight | Category::FourOfAKind | Category::StraightFlush => 1,
        }
    }
}

/// A decoded hand rank.
///
/// `klass = 7463 - rank`, so a larger klass is a stronger hand; `offset` is the 1-based
/// position of the hand inside its category (larger is stronger) and `kickers` lists
/// the ranks that order hands inside the category, most significant first.
///
/// ```
/// use poker_round::evaluator::{classify, evaluate_str, Category};
///
/// let class = classify(evaluate_str("KcKh2s9h3d6c7d").unwrap());
/// assert_eq!(class.category, Category::Pair);
/// assert_eq!(class.short_desc(), "pair K976");
/// assert_eq!(class.description(), "Pair of Kings");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct HandClass {
    pub rank: HandRank,
    pub klass: u16,
    pub category: Category,
    pub offset: u16,
    pub kickers: Vec<Rank>,
}

pub fn classify(rank: HandRank) -> HandClass {
    let rank = rank.clamp(1, WORST_RANK);
    let klass = WORST_RANK + 1 - rank;
    let category = Category::of_rank(rank);
    let offset = klass - category.klass_floor();
    let kickers = kickers(category, offset);
    HandClass { rank, klass, category, offset, kickers }
}

impl HandClass {
    pub fn abbr(&self) -> &'static str {
        self.category.abbr()
    }

    /// Compact form such as `"full KJ"` or `"pair K976"`.
    pub fn short_desc(&self) -> String {
        let ranks: String =
            self.kickers.iter().take(self.category.short_len()).map(|r| r.to_char()).collect();
        format!("{} {}", self.category.short_word(), ranks)
    }

    /// Long form such as `"Queens Full over Eights"`.
    pub fn description(&self) -> String {
        if self.klass == WORST_RANK {
            return "Royal Flush".to_string();
        }
        let one = self.kickers.first().map(|r| r.names()).unwrap_or(("", ""));
        let two = self.kickers.get(1).map(|r| r.names()).unwrap_or(("", ""));
        match self.category {
            Category::HighCard => format!("{}-High", one.0),
            Category::Pair => format!("Pair of {}", one.1),
            Category::TwoPair => format!("{} and {}", one.1, two.1),
            Category::ThreeOfAKind => format!("Three {}", one.1),
            Category::Straight => format!("{}-High Straight", one.0),
            Category::Flush => format!("{}-High Flush", one.0),
            Category::FullHouse => format!("{} Full over {}", one.1, two.1),
            Category::FourOfAKind => format!("Four {}", one.1),
            Category::StraightFlush => format!("{}-High Straight Flush", one.0),
        }
    }
}

impl fmt::Display for HandClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

fn kickers(category: Category, offset: u16) -> Vec<Rank> {
    let i = offset as usize - 1;
    let k = kicker_tables();
    let idx: Vec<u8> = match category {
        Category::StraightFlush | Category::Straight => unrank(offset, &[10]),
        Category::FourOfAKind | Category::FullHouse => unrank(offset, &[13, 12]),
        Category::Flush | Category::HighCard => k.unpaired[i].to_vec(),
        Category::ThreeOfAKind => k.set[i].to_vec(),
        Category::TwoPair => k.two_pair[i].to_vec(),
        Category::Pair => k.pair[i].to_vec(),
    };
    idx.into_iter().map(|r| Rank::ALL[r as usize]).collect()
}

/// Decode a 1-based offset over nested choices of distinct ranks, weakest first.
///
/// Position `i` picks among `ds[i]` ranks (highest `ds[i]` still unused); the last
/// position varies fastest.
fn unrank(offset: u16, ds: &[u32]) -> Vec<u8> {
    let mut r = offset as u32;
    let mut remaining: Vec<Vec<u8>> = ds.iter().map(|_| (0..13u8).rev().collect()).collect();
    let mut out = Vec::with_capacity(ds.len());
    for i in 0..ds.len() {
        let unit: u32 = ds[i + 1..].iter().product();
        let a = (r + unit - 1) / unit;
        r -= (a - 1) * unit;
        let v = remaining[i][(ds[i] - a) as usize];
        out.push(v);
        for rest in remaining.iter_mut().skip(i + 1) {
            rest.retain(|&x| x != v);
        }
    }
    out
}

/// Kicker lists for the categories whose order is not a plain product of choices,
/// weakest hand first so that `table[offset - 1]` decodes an offset.
struct KickerTables {
    unpaired: Vec<[u8; 5]>,
    set: Vec<[u8; 3]>,
    two_pair: Vec<[u8; 3]>,
    pair: Vec<[u8; 4]>,
}

fn kicker_tables() -> &'static KickerTables {
    static TABLES: OnceLock<KickerTables> = OnceLock::new();
    TABLES.get_or_init(|| {
        let desc: Vec<u8> = (0..13u8).rev().collect();
        let without = |x: u8| -> Vec<u8> { desc.iter().copied().filter(|&r| r != x).collect() };

        let mut unpaired = unpaired_five_sets();
        unpaired.reverse();

        let mut set = Vec::with_capacity(858);
        for &t in &desc {
            for_each_combination(&without(t), 2, &mut |ks| set.push([t, ks[0], ks[1]]));
        }
        set.reverse();

        let mut two_pair = Vec::with_capacity(858);
        for_each_combination(&desc, 2, &mut |ps| {
            for &k in desc.iter().filter(|&&k| !ps.contains(&k)) {
                two_pair.push([ps[0], ps[1], k]);
            }
        });
        two_pair.reverse();

        let mut pair = Vec::with_capacity(2860);
        for &p in &desc {
            for_each_combination(&without(p), 3, &mut |ks| pair.push([p, ks[0], ks[1], ks[2]]));
        }
        pair.reverse();

        KickerTables { unpaired, set, two_pair, pair }
    })
}
