//! Perfect-hash lookup tables for the evaluator.
//!
//! Nothing here is stored on disk: the tables are derived once, on first use, from the
//! canonical ordering of the 7462 five-card equivalence classes (1 = royal flush,
//! 7462 = 7-5-4-3-2 offsuit). Non-flush hands are looked up by a perfect hash over the
//! rank histogram ("quinary": one base-5 digit per rank); flushes by the 13-bit rank mask
//! of the flush suit.

use std::sync::OnceLock;

pub(crate) const NOFLUSH5_SIZE: usize = 6175;
pub(crate) const NOFLUSH6_SIZE: usize = 18395;
pub(crate) const NOFLUSH7_SIZE: usize = 49205;

/// First rank of each category block, best block first.
pub(crate) const STRAIGHT_FLUSH_START: u16 = 1;
pub(crate) const FOUR_OF_A_KIND_START: u16 = 11;
pub(crate) const FULL_HOUSE_START: u16 = 167;
pub(crate) const FLUSH_START: u16 = 323;
pub(crate) const STRAIGHT_START: u16 = 1600;
pub(crate) const THREE_OF_A_KIND_START: u16 = 1610;
pub(crate) const TWO_PAIR_START: u16 = 2468;
pub(crate) const ONE_PAIR_START: u16 = 3326;
pub(crate) const HIGH_CARD_START: u16 = 6186;
pub(crate) const CLASS_COUNT: u16 = 7462;

pub(crate) type Quinary = [u8; 13];

pub(crate) struct Tables {
    /// `dp[d][r][k]`: number of quinaries over `r` ranks summing to `k` that are
    /// skipped by putting a digit `< d` in the current position.
    dp: [[[u32; 10]; 14]; 5],
    /// Suit hash (3 bits per suit) to flush suit + 1, or 0 when no suit has five cards.
    suits: Vec<u8>,
    flush: Vec<u16>,
    noflush5: Vec<u16>,
    noflush6: Vec<u16>,
    noflush7: Vec<u16>,
}

static TABLES: OnceLock<Tables> = OnceLock::new();

pub(crate) fn tables() -> &'static Tables {
    TABLES.get_or_init(Tables::generate)
}

impl Tables {
    fn generate() -> Self {
        let dp = quinary_dp();
        let mut t = Tables {
            dp,
            suits: suit_table(),
            flush: vec![0; 1 << 13],
            noflush5: vec![0; NOFLUSH5_SIZE],
            noflush6: vec![0; NOFLUSH6_SIZE],
            noflush7: vec![0; NOFLUSH7_SIZE],
        };
        t.fill_five_card_classes();
        t.fill_flush_supersets();
        t.fill_noflush(6);
        t.fill_noflush(7);
        t
    }

    #[inline]
    pub(crate) fn flush_suit(&self, suit_hash: usize) -> Option<usize> {
        match self.suits[suit_hash] {
            0 => None,
            s => Some(s as usize - 1),
        }
    }

    #[inline]
    pub(crate) fn flush_rank(&self, rank_mask: usize) -> u16 {
        self.flush[rank_mask]
    }

    #[inline]
    pub(crate) fn noflush_rank(&self, q: &Quinary, k: usize) -> u16 {
        let h = self.hash_quinary(q, k);
        match k {
            5 => self.noflush5[h],
            6 => self.noflush6[h],
            _ => self.noflush7[h],
        }
    }

    #[inline]
    pub(crate) fn hash_quinary(&self, q: &Quinary, k: usize) -> usize {
        let mut sum = 0usize;
        let mut k = k as i32;
        for (i, &digit) in q.iter().enumerate() {
            sum += self.dp[digit as usize][12 - i][k as usize] as usize;
            k -= digit as i32;
            if k <= 0 {
                break;
            }
        }
        sum
    }

    fn set_five(&mut self, q: &Quinary, rank: u16) {
        let h = self.hash_quinary(q, 5);
        self.noflush5[h] = rank;
    }

    /// Walk the canonical class order, best first, filling the 5-card tables.
    fn fill_five_card_classes(&mut self) {
        let desc: Vec<u8> = (0..13u8).rev().collect();
        let straights = straight_masks();
        let mut rank: u16 = STRAIGHT_FLUSH_START;

        for &mask in &straights {
            self.flush[mask as usize] = rank;
            rank += 1;
        }
        debug_assert_eq!(rank, FOUR_OF_A_KIND_START);

        for &quad in &desc {
            for &kicker in desc.iter().filter(|&&k| k != quad) {
                self.set_five(&quinary_of(&[(quad, 4), (kicker, 1)]), rank);
                rank += 1;
            }
        }
        debug_assert_eq!(rank, FULL_HOUSE_START);

        for &trips in &desc {
            for &pair in desc.iter().filter(|&&p| p != trips) {
                self.set_five(&quinary_of(&[(trips, 3), (pair, 2)]), rank);
                rank += 1;
            }
        }
        debug_assert_eq!(rank, FLUSH_START);

        let unpaired = unpaired_five_sets();
        for set in &unpaired {
            self.flush[rank_mask(set) as usize] = rank;
            rank += 1;
        }
        debug_assert_eq!(rank, STRAIGHT_START);

        for &mask in &straights {
            let mut q = [0u8; 13];
            for (i, digit) in q.iter_mut().enumerate() {
                *digit = ((mask >> i) & 1) as u8;
            }
            self.set_five(&q, rank);
            rank += 1;
        }
        debug_assert_eq!(rank, THREE_OF_A_KIND_START);

        for &trips in &desc {
            let pool: Vec<u8> = desc.iter().copied().filter(|&r| r != trips).collect();
            for_each_combination(&pool, 2, &mut |ks| {
                self.set_five(&quinary_of(&[(trips, 3), (ks[0], 1), (ks[1], 1)]), rank);
                rank += 1;
            });
        }
        debug_assert_eq!(rank, TWO_PAIR_START);

        for_each_combination(&desc, 2, &mut |pairs| {
            for &kicker in desc.iter().filter(|&&k| !pairs.contains(&k)) {
                self.set_five(&quinary_of(&[(pairs[0], 2), (pairs[1], 2), (kicker, 1)]), rank);
                rank += 1;
            }
        });
        debug_assert_eq!(rank, ONE_PAIR_START);

        for &pair in &desc {
            let pool: Vec<u8> = desc.iter().copied().filter(|&r| r != pair).collect();
            for_each_combination(&pool, 3, &mut |ks| {
                let q = quinary_of(&[(pair, 2), (ks[0], 1), (ks[1], 1), (ks[2], 1)]);
                self.set_five(&q, rank);
                rank += 1;
            });
        }
        debug_assert_eq!(rank, HIGH_CARD_START);

        for set in &unpaired {
            let parts: Vec<(u8, u8)> = set.iter().map(|&r| (r, 1)).collect();
            self.set_five(&quinary_of(&parts), rank);
            rank += 1;
        }
        debug_assert_eq!(rank, CLASS_COUNT + 1);
    }

    /// Six and seven suited cards play their best five.
    fn fill_flush_supersets(&mut self) {
        for mask in 0..(1usize << 13) {
            let bits = mask.count_ones();
            if !(6..=7).contains(&bits) {
                continue;
            }
            let ranks: Vec<u8> = (0..13u8).filter(|r| mask & (1 << r) != 0).collect();
            let mut best = u16::MAX;
            for_each_combination(&ranks, 5, &mut |five| {
                let sub: usize = five.iter().map(|&r| 1usize << r).sum();
                best = best.min(self.flush[sub]);
            });
            self.flush[mask] = best;
        }
    }

    fn fill_noflush(&mut self, k: usize) {
        let mut entries = Vec::new();
        for_each_quinary(k, &mut |q| {
            let mut best = u16::MAX;
            for_each_sub_quinary(q, 5, &mut |sub| {
                best = best.min(self.noflush5[self.hash_quinary(sub, 5)]);
            });
            entries.push((self.hash_quinary(q, k), best));
        });
        let table = if k == 6 { &mut self.noflush6 } else { &mut self.noflush7 };
        for (h, rank) in entries {
            table[h] = rank;
        }
    }
}

fn quinary_dp() -> [[[u32; 10]; 14]; 5] {
    // ways[len][k]: digit strings of length `len`, digits 0..=4, summing to `k`
    let mut ways = [[0u32; 10]; 14];
    ways[0][0] = 1;
    for len in 1..14 {
        for k in 0..10 {
            let n: u32 = (0..5).filter(|&d| d <= k).map(|d| ways[len - 1][k - d]).sum();
            ways[len][k] = n;
        }
    }
    let mut dp = [[[0u32; 10]; 14]; 5];
    for (d, plane) in dp.iter_mut().enumerate() {
        for (r, row) in plane.iter_mut().enumerate() {
            for (k, cell) in row.iter_mut().enumerate() {
                *cell = (0..d).filter(|&j| j <= k).map(|j| ways[r][k - j]).sum();
            }
        }
    }
    dp
}

fn suit_table() -> Vec<u8> {
    (0..4096usize)
        .map(|h| {
            (0..4)
                .find(|s| (h >> (3 * s)) & 7 >= 5)
                .map(|s| s as u8 + 1)
                .unwrap_or(0)
        })
        .collect()
}

/// Straight rank masks, ace-high first, the wheel last.
pub(crate) fn straight_masks() -> [u16; 10] {
    let mut out = [0u16; 10];
    for (i, hi) in (4..=12u16).rev().enumerate() {
        out[i] = 0b11111 << (hi - 4);
    }
    out[9] = (1 << 12) | 0b1111;
    out
}

fn rank_mask(set: &[u8]) -> u16 {
    set.iter().fold(0, |m, &r| m | (1 << r))
}

/// The 1277 sets of five distinct rank indices that do not form a straight, each
/// descending, best set first.
pub(crate) fn unpaired_five_sets() -> Vec<[u8; 5]> {
    let desc: Vec<u8> = (0..13u8).rev().collect();
    let straights = straight_masks();
    let mut out = Vec::with_capacity(1277);
    for_each_combination(&desc, 5, &mut |c| {
        if !straights.contains(&rank_mask(c)) {
            out.push([c[0], c[1], c[2], c[3], c[4]]);
        }
    });
    out
}

fn quinary_of(parts: &[(u8, u8)]) -> Quinary {
    let mut q = [0u8; 13];
    for &(rank, count) in parts {
        q[rank as usize] += count;
    }
    q
}

/// Visit every `k`-subset of `pool`, in lexicographic order of positions.
pub(crate) fn for_each_combination<F: FnMut(&[u8])>(pool: &[u8], k: usize, f: &mut F) {
    fn go<F: FnMut(&[u8])>(pool: &[u8], k: usize, start: usize, cur: &mut Vec<u8>, f: &mut F) {
        if cur.len() == k {
            f(cur);
            return;
        }
        for i in start..pool.len() {
            if pool.len() - i < k - cur.len() {
                break;
            }
            cur.push(pool[i]);
            go(pool, k, i + 1, cur, f);
            cur.pop();
        }
    }
    let mut cur = Vec::with_capacity(k);
    go(pool, k, 0, &mut cur, f);
}

fn for_each_quinary<F: FnMut(&Quinary)>(k: usize, f: &mut F) {
    fn go<F: FnMut(&Quinary)>(i: usize, rem: usize, q: &mut Quinary, f: &mut F) {
        if i == 13 {
            if rem == 0 {
                f(q);
            }
            return;
        }
        for d in 0..=rem.min(4) {
            q[i] = d as u8;
            go(i + 1, rem - d, q, f);
        }
        q[i] = 0;
    }
    go(0, k, &mut [0u8; 13], f);
}

fn for_each_sub_quinary<F: FnMut(&Quinary)>(q: &Quinary, k: usize, f: &mut F) {
    fn go<F: FnMut(&Quinary)>(
        q: &Quinary,
        i: usize,
        rem: usize,
        sub: &mut Quinary,
        f: &mut F,
    ) {
        if rem == 0 {
            f(sub);
            return;
        }
        if i == 13 {
            return;
        }
        for take in 0..=rem.min(q[i] as usize) {
            sub[i] = take as u8;
            go(q, i + 1, rem - take, sub, f);
        }
        sub[i] = 0;
    }
    go(q, 0, k, &mut [0u8; 13], f);
}
