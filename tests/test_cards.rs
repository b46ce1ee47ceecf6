use discarder::cards::*;
use discarder::error::DiscarderError;

#[test]
fn test_card_creation() {
    let c = Card::new(Rank::Ace, Suit::Spades);
    assert_eq!(c.rank, Rank::Ace);
    assert_eq!(c.suit, Suit::Spades);
    assert_eq!(c.value(), 14);
}

#[test]
fn test_invalid_rank() {
    assert!(matches!(Rank::parse("X"), Err(DiscarderError::InvalidRank(_))));
    assert!(Rank::parse("1").is_err());
    assert!(Rank::parse("11").is_err());
}

#[test]
fn test_invalid_suit() {
    assert!(matches!(Suit::from_char('x'), Err(DiscarderError::InvalidSuit('x'))));
}

#[test]
fn test_card_str() {
    assert_eq!(Card::new(Rank::King, Suit::Diamonds).to_string(), "KD");
    assert_eq!(Card::new(Rank::Ten, Suit::Hearts).to_string(), "10H");
}

#[test]
fn test_card_pretty() {
    let c = Card::new(Rank::Ace, Suit::Spades);
    assert_eq!(c.pretty(), "A\u{2660}");
}

#[test]
fn test_card_ordering_is_suit_then_rank() {
    let two_spades = Card::new(Rank::Two, Suit::Spades);
    let ace_spades = Card::new(Rank::Ace, Suit::Spades);
    let two_hearts = Card::new(Rank::Two, Suit::Hearts);
    assert!(two_spades < ace_spades);
    assert!(ace_spades < two_hearts);

    let mut cards = parse_cards("2H AS 3S KC").unwrap();
    cards.sort();
    assert_eq!(format_cards(&cards), "3S AS 2H KC");
}

#[test]
fn test_card_equality() {
    let a1 = Card::new(Rank::Ace, Suit::Spades);
    let a2 = Card::new(Rank::Ace, Suit::Spades);
    let a3 = Card::new(Rank::Ace, Suit::Hearts);
    assert_eq!(a1, a2);
    assert_ne!(a1, a3);
}

#[test]
fn test_card_hashable() {
    use std::collections::HashSet;
    let mut s = HashSet::new();
    s.insert(Card::new(Rank::Ace, Suit::Spades));
    s.insert(Card::new(Rank::Ace, Suit::Spades)); // duplicate
    s.insert(Card::new(Rank::King, Suit::Hearts));
    assert_eq!(s.len(), 2);
}

#[test]
fn test_parse_card_basic() {
    assert_eq!(parse_card("AS").unwrap(), Card::new(Rank::Ace, Suit::Spades));
    assert_eq!(parse_card("10H").unwrap(), Card::new(Rank::Ten, Suit::Hearts));
    assert_eq!(parse_card("TD").unwrap(), Card::new(Rank::Ten, Suit::Diamonds));
}

#[test]
fn test_parse_card_case_insensitive() {
    assert_eq!(parse_card("ah").unwrap(), Card::new(Rank::Ace, Suit::Hearts));
    assert_eq!(parse_card("qc").unwrap(), Card::new(Rank::Queen, Suit::Clubs));
}

#[test]
fn test_parse_card_invalid() {
    assert!(parse_card("").is_err());
    assert!(parse_card("S").is_err());
    assert!(parse_card("ABC").is_err());
    assert!(parse_card("100H").is_err());
}

#[test]
fn test_card_from_str() {
    let c: Card = "7C".parse().unwrap();
    assert_eq!(c, Card::new(Rank::Seven, Suit::Clubs));
}

#[test]
fn test_parse_cards_separators() {
    let cards = parse_cards("2S 3H,4C  10D").unwrap();
    assert_eq!(cards.len(), 4);
    assert_eq!(cards[3], Card::new(Rank::Ten, Suit::Diamonds));
    assert!(parse_cards("").unwrap().is_empty());
    assert!(parse_cards("2S XX").is_err());
}

#[test]
fn test_text_form_round_trip() {
    for card in Deck::standard().cards {
        assert_eq!(parse_card(&card.to_string()).unwrap(), card);
    }
}

#[test]
fn test_deck_full() {
    let d = Deck::standard();
    assert_eq!(d.len(), 52);
    let unique: std::collections::HashSet<Card> = d.cards.iter().copied().collect();
    assert_eq!(unique.len(), 52);
}

#[test]
fn test_deck_without() {
    let excluded = vec![
        Card::new(Rank::Ace, Suit::Spades),
        Card::new(Rank::King, Suit::Hearts),
    ];
    let d = Deck::without(&excluded);
    assert_eq!(d.len(), 50);
    assert!(!d.contains(&excluded[0]));
    assert!(!d.contains(&excluded[1]));
}

#[test]
fn test_deck_from_cards() {
    let d: Deck = parse_cards("6H AS").unwrap().into();
    assert_eq!(d.len(), 2);
    assert!(!d.is_empty());
    assert!(Deck::default().is_empty());
}
