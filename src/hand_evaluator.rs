use std::fmt;

use once_cell::sync::Lazy;

use crate::cards::Card;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandCategory {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

pub const CATEGORY_COUNT: usize = 10;

/// Worst to best.
pub const ALL_CATEGORIES: [HandCategory; CATEGORY_COUNT] = [
    HandCategory::HighCard,
    HandCategory::OnePair,
    HandCategory::TwoPair,
    HandCategory::ThreeOfAKind,
    HandCategory::Straight,
    HandCategory::Flush,
    HandCategory::FullHouse,
    HandCategory::FourOfAKind,
    HandCategory::StraightFlush,
    HandCategory::RoyalFlush,
];

impl HandCategory {
    pub fn index(self) -> usize {
        self as usize
    }

    /// Snake-case identifier used in serialized tallies.
    pub fn key(self) -> &'static str {
        match self {
            HandCategory::HighCard => "high_card",
            HandCategory::OnePair => "one_pair",
            HandCategory::TwoPair => "two_pair",
            HandCategory::ThreeOfAKind => "three_of_a_kind",
            HandCategory::Straight => "straight",
            HandCategory::Flush => "flush",
            HandCategory::FullHouse => "full_house",
            HandCategory::FourOfAKind => "four_of_a_kind",
            HandCategory::StraightFlush => "straight_flush",
            HandCategory::RoyalFlush => "royal_flush",
        }
    }
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandCategory::HighCard => write!(f, "High Card"),
            HandCategory::OnePair => write!(f, "One Pair"),
            HandCategory::TwoPair => write!(f, "Two Pair"),
            HandCategory::ThreeOfAKind => write!(f, "Three of a Kind"),
            HandCategory::Straight => write!(f, "Straight"),
            HandCategory::Flush => write!(f, "Flush"),
            HandCategory::FullHouse => write!(f, "Full House"),
            HandCategory::FourOfAKind => write!(f, "Four of a Kind"),
            HandCategory::StraightFlush => write!(f, "Straight Flush"),
            HandCategory::RoyalFlush => write!(f, "Royal Flush"),
        }
    }
}

/// The categories achievable by some subset of a hand. Several can hold at
/// once: a full house also reports one pair, two pair and trips.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CategorySet(u16);

impl CategorySet {
    pub fn empty() -> CategorySet {
        CategorySet(0)
    }

    pub fn insert(&mut self, category: HandCategory) {
        self.0 |= 1 << category.index();
    }

    fn set(&mut self, category: HandCategory, achieved: bool) {
        self.0 |= (achieved as u16) << category.index();
    }

    pub fn contains(&self, category: HandCategory) -> bool {
        self.0 & (1 << category.index()) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = HandCategory> + '_ {
        ALL_CATEGORIES.iter().copied().filter(move |&c| self.contains(c))
    }

    /// Best category present, if any.
    pub fn best(&self) -> Option<HandCategory> {
        self.iter().last()
    }
}

impl FromIterator<HandCategory> for CategorySet {
    fn from_iter<I: IntoIterator<Item = HandCategory>>(iter: I) -> Self {
        let mut set = CategorySet::empty();
        for category in iter {
            set.insert(category);
        }
        set
    }
}

// ---------------------------------------------------------------------------
// Rank masks (bit i = rank index i, deuce = bit 0, ace = bit 12)
// ---------------------------------------------------------------------------

struct RankMasks {
    straights: [u16; 10],
    royal: u16,
}

impl RankMasks {
    fn build() -> RankMasks {
        let mut straights = [0u16; 10];
        for (low, mask) in straights.iter_mut().take(9).enumerate() {
            *mask = 0b11111 << low;
        }
        // Wheel: A-2-3-4-5, the ace sits at the top bit.
        straights[9] = (1 << 12) | 0b1111;
        RankMasks {
            straights,
            royal: 0b11111 << 8,
        }
    }

    #[inline]
    fn has_straight(&self, occupancy: u16) -> bool {
        self.straights.iter().any(|&m| occupancy & m == m)
    }
}

static RANK_MASKS: Lazy<RankMasks> = Lazy::new(RankMasks::build);

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// Frequency tables reused across classifications. One per worker.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    rank_counts: [u8; 13],
    suit_counts: [u8; 4],
    suit_masks: [u16; 4],
}

impl Classifier {
    pub fn new() -> Classifier {
        Classifier::default()
    }

    /// Single pass over the cards, then constant work on the tables.
    pub fn classify(&mut self, cards: &[Card]) -> CategorySet {
        let mut result = CategorySet::empty();
        if cards.is_empty() {
            return result;
        }

        self.rank_counts = [0; 13];
        self.suit_counts = [0; 4];
        self.suit_masks = [0; 4];
        for card in cards {
            let rank = card.rank.index();
            let suit = card.suit.index();
            self.rank_counts[rank] = self.rank_counts[rank].saturating_add(1);
            self.suit_counts[suit] = self.suit_counts[suit].saturating_add(1);
            self.suit_masks[suit] |= 1 << rank;
        }

        let masks = &*RANK_MASKS;
        let combined = self.suit_masks.iter().fold(0u16, |acc, &m| acc | m);

        let mut flush = false;
        let mut straight_flush = false;
        let mut royal_flush = false;
        for (&count, &suit_mask) in self.suit_counts.iter().zip(&self.suit_masks) {
            if count < 5 {
                continue;
            }
            flush = true;
            if masks.has_straight(suit_mask) {
                straight_flush = true;
                royal_flush |= suit_mask & masks.royal == masks.royal;
            }
        }

        let (mut pairs, mut trips, mut quads) = (0u8, 0u8, 0u8);
        for &count in &self.rank_counts {
            pairs += (count >= 2) as u8;
            trips += (count >= 3) as u8;
            quads += (count >= 4) as u8;
        }

        result.insert(HandCategory::HighCard);
        result.set(HandCategory::OnePair, pairs >= 1);
        // A quad holds two disjoint pairs on its own.
        result.set(HandCategory::TwoPair, pairs >= 2 || quads >= 1);
        result.set(HandCategory::ThreeOfAKind, trips >= 1);
        result.set(HandCategory::Straight, masks.has_straight(combined));
        result.set(HandCategory::Flush, flush);
        result.set(HandCategory::FullHouse, (trips >= 1 && pairs >= 2) || trips >= 2);
        result.set(HandCategory::FourOfAKind, quads >= 1);
        result.set(HandCategory::StraightFlush, straight_flush);
        result.set(HandCategory::RoyalFlush, royal_flush);
        result
    }
}

/// Classifies with a throwaway scratch table.
pub fn classify(cards: &[Card]) -> CategorySet {
    Classifier::new().classify(cards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;
    use HandCategory::*;

    fn assert_categories(hand: &str, expected: &[HandCategory]) {
        let cards = parse_cards(hand).unwrap();
        let actual = classify(&cards);
        let expected: CategorySet = expected.iter().copied().collect();
        assert_eq!(
            actual.iter().collect::<Vec<_>>(),
            expected.iter().collect::<Vec<_>>(),
            "hand {}",
            hand
        );
    }

    #[test]
    fn test_masks_cover_every_straight() {
        let masks = RankMasks::build();
        assert_eq!(masks.straights.len(), 10);
        assert!(masks.straights.iter().all(|m| m.count_ones() == 5));
        assert!(masks.straights.contains(&masks.royal));
    }

    #[test]
    fn test_empty_hand_reports_nothing() {
        assert!(classify(&[]).is_empty());
    }

    #[test]
    fn test_single_card() {
        assert_categories("AS", &[HighCard]);
    }

    #[test]
    fn test_wheel_is_straight() {
        assert_categories("AS 2H 3C 4D 5H", &[HighCard, Straight]);
    }

    #[test]
    fn test_no_wrap_around() {
        assert_categories("QS KH AC 2D 3S", &[HighCard]);
    }

    #[test]
    fn test_straight_and_flush_in_different_cards() {
        assert_categories(
            "10H JD QC KS AH 2C 3C 5C 7C 9C",
            &[HighCard, Straight, Flush],
        );
    }

    #[test]
    fn test_trips_and_pair_is_full_house() {
        assert_categories(
            "KS KH KC 2S 2H",
            &[HighCard, OnePair, TwoPair, ThreeOfAKind, FullHouse],
        );
    }

    #[test]
    fn test_two_trips_is_full_house() {
        assert_categories(
            "KS KH KC 2S 2H 2D",
            &[HighCard, OnePair, TwoPair, ThreeOfAKind, FullHouse],
        );
    }

    #[test]
    fn test_quads_without_pair_is_not_full_house() {
        assert_categories(
            "AS AH AC AD 5C 7D 9H",
            &[HighCard, OnePair, TwoPair, ThreeOfAKind, FourOfAKind],
        );
    }

    #[test]
    fn test_best_category() {
        let set = classify(&parse_cards("10S JS QS KS AS").unwrap());
        assert_eq!(set.best(), Some(RoyalFlush));
        assert_eq!(set.len(), 5);
    }
}
