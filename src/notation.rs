// src/notation.rs
//! トランプのカード名 ("10H", "QS" みたいな「ランク + スートの1文字」) の読み書き。
//!
//! カード自体は名前しか持っていないので、ルール側はここでスートやランクを取り出すよ。

use serde::{Deserialize, Serialize};

/// スート (マーク)。カード名の最後の1文字。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Heart,   // H
    Diamond, // D
    Club,    // C
    Spade,   // S
}

pub const ALL_SUITS: [Suit; 4] = [Suit::Club, Suit::Diamond, Suit::Spade, Suit::Heart];

impl Suit {
    pub fn letter(self) -> char {
        match self {
            Suit::Heart => 'H',
            Suit::Diamond => 'D',
            Suit::Club => 'C',
            Suit::Spade => 'S',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'H' => Some(Suit::Heart),
            'D' => Some(Suit::Diamond),
            'C' => Some(Suit::Club),
            'S' => Some(Suit::Spade),
            _ => None,
        }
    }

    /// "hearts" / "spades" / "clubs" / "diamonds" から。
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "hearts" => Some(Suit::Heart),
            "diamonds" => Some(Suit::Diamond),
            "clubs" => Some(Suit::Club),
            "spades" => Some(Suit::Spade),
            _ => None,
        }
    }
}

/// ランク。トリックテイキングの強さ順 (2 が一番弱くて A が一番強い) に並べてあるので、
/// `Ord` でそのまま強さを比べられる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    Two = 2,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

pub const ALL_RANKS: [Rank; 13] = [
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
    Rank::Ace,
];

impl Rank {
    pub fn symbol(self) -> &'static str {
        match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        ALL_RANKS.iter().copied().find(|rank| rank.symbol() == symbol)
    }
}

/// 名前から (ランク, スート) を読む。トランプじゃない名前 ("villager" とか) は None。
pub fn parse_card(name: &str) -> Option<(Rank, Suit)> {
    let suit = Suit::from_letter(name.chars().last()?)?;
    let rank = Rank::from_symbol(&name[..name.len() - 1])?;
    Some((rank, suit))
}

pub fn suit_of(name: &str) -> Option<Suit> {
    parse_card(name).map(|(_, suit)| suit)
}

pub fn rank_of(name: &str) -> Option<Rank> {
    parse_card(name).map(|(rank, _)| rank)
}

pub fn card_name(rank: Rank, suit: Suit) -> String {
    format!("{}{}", rank.symbol(), suit.letter())
}

/// 52 枚全部の名前。スートごとに 2 から A の順。
pub fn standard_deck_names() -> Vec<String> {
    ALL_SUITS.iter().flat_map(|&suit| ALL_RANKS.iter().map(move |&rank| card_name(rank, suit))).collect()
}

/// `cards` のうち `suit` のカードで一番強いもの。そのスートが1枚もなければ None。
pub fn strongest_card<'a>(cards: &[&'a str], suit: Suit) -> Option<&'a str> {
    cards
        .iter()
        .copied()
        .filter_map(|name| parse_card(name).filter(|&(_, s)| s == suit).map(|(rank, _)| (rank, name)))
        .max_by_key(|&(rank, _)| rank)
        .map(|(_, name)| name)
}

/// 人数で割り切れるように抜くカード。
pub fn trick_taking_removals(players: usize) -> Result<&'static [&'static str], String> {
    match players {
        3 => Ok(&["2C"]),
        4 => Ok(&[]),
        5 => Ok(&["2C", "2D"]),
        6 => Ok(&["2C", "2D", "3C", "2S"]),
        _ => Err(format!("Trick-taking games need 3 to 6 players, got {}", players)),
    }
}

/// トリックテイキング用のデッキ (52 枚から人数に合わせて抜いたもの)。
pub fn trick_taking_deck_names(players: usize) -> Result<Vec<String>, String> {
    let removals = trick_taking_removals(players)?;
    Ok(standard_deck_names().into_iter().filter(|name| !removals.contains(&name.as_str())).collect())
}
