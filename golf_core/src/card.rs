use serde::Serialize;
use std::fmt;

// --- 核心数据结构定义 ---

/// 花色 (Suit)，大小王单独作为一种花色
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize)]
pub enum Suit {
    Spades,   // 黑桃 ♠️
    Hearts,   // 红心 ♥️
    Diamonds, // 方块 ♦️
    Clubs,    // 梅花 ♣️
    Joker,    // 王
}

impl Suit {
    /// 四种普通花色，按发牌顺序排列
    pub const STANDARD: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];
}

/// 一副牌的总张数：52 张普通牌加 2 张王
pub const DECK_SIZE: usize = 54;

/// 参考牌组所有牌的分数之和。
/// 每种花色 1 + (2..=10) + 10 + 10 + 0 = 75，四种花色共 300，两张王各 -2。
pub const REFERENCE_DECK_SCORE: i32 = 296;

/// 单张扑克牌 (Card)
///
/// 分数在构造时计算一次，之后不可变，
/// 因此 `score` 永远只取决于 `(suit, rank)`。
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Serialize)]
pub struct Card {
    suit: Suit,
    rank: Option<u8>, // 1..=13，王没有点数
    score: i32,
}

impl Card {
    /// 创建一张普通牌。点数不在 1..=13 之间，或花色是王时返回 `None`。
    pub fn new(suit: Suit, rank: u8) -> Option<Card> {
        if suit == Suit::Joker || !(1..=13).contains(&rank) {
            return None;
        }
        Some(Card { suit, rank: Some(rank), score: score_of(suit, Some(rank)) })
    }

    pub fn joker() -> Card {
        Card { suit: Suit::Joker, rank: None, score: score_of(Suit::Joker, None) }
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }

    pub fn rank(&self) -> Option<u8> {
        self.rank
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn is_joker(&self) -> bool {
        self.suit == Suit::Joker
    }

    /// 同一列的两张牌是否能抵消：点数相同，或者两张都是王
    pub fn matches(&self, other: &Card) -> bool {
        match (self.rank, other.rank) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.is_joker() && other.is_joker(),
            _ => false,
        }
    }

    /// 渲染网格时用的简短写法，例如 `A♠`、`10♥`、`JK`
    pub fn short(&self) -> String {
        match self.rank {
            None => "JK".to_string(),
            Some(rank) => format!("{}{}", rank_label(rank), self.suit),
        }
    }
}

fn score_of(suit: Suit, rank: Option<u8>) -> i32 {
    match (suit, rank) {
        (Suit::Joker, _) | (_, None) => -2,
        (_, Some(13)) => 0,
        (_, Some(11 | 12)) => 10,
        (_, Some(r)) => r as i32,
    }
}

fn rank_label(rank: u8) -> String {
    match rank {
        1 => "A".to_string(),
        11 => "J".to_string(),
        12 => "Q".to_string(),
        13 => "K".to_string(),
        r => r.to_string(),
    }
}

// --- 实现辅助功能 ---

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Suit::Spades => "♠",
            Suit::Hearts => "♥",
            Suit::Diamonds => "♦",
            Suit::Clubs => "♣",
            Suit::Joker => "🃏",
        })
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let suit_name = match self.suit {
            Suit::Spades => "Spades",
            Suit::Hearts => "Hearts",
            Suit::Diamonds => "Diamonds",
            Suit::Clubs => "Clubs",
            Suit::Joker => return write!(f, "Joker"),
        };
        match self.rank {
            Some(1) => write!(f, "Ace of {}", suit_name),
            Some(11) => write!(f, "Jack of {}", suit_name),
            Some(12) => write!(f, "Queen of {}", suit_name),
            Some(13) => write!(f, "King of {}", suit_name),
            Some(r) => write!(f, "{} of {}", r, suit_name),
            None => write!(f, "Joker"),
        }
    }
}

// --- 参考牌组 ---

/// 创建一副完整的 54 张牌：按花色、点数顺序排列的 52 张牌，最后是两张王
pub fn standard_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for &suit in &Suit::STANDARD {
        for rank in 1..=13 {
            deck.push(Card { suit, rank: Some(rank), score: score_of(suit, Some(rank)) });
        }
    }
    deck.push(Card::joker());
    deck.push(Card::joker());
    deck
}

// --- 单元测试 ---

#[cfg(test)]
mod tests {
    use super::*;
    use Suit::*;

    fn card(suit: Suit, rank: u8) -> Card {
        Card::new(suit, rank).unwrap()
    }

    #[test]
    fn test_score_table() {
        assert_eq!(card(Spades, 1).score(), 1);
        assert_eq!(card(Diamonds, 7).score(), 7);
        assert_eq!(card(Hearts, 10).score(), 10);
        assert_eq!(card(Clubs, 11).score(), 10);
        assert_eq!(card(Spades, 12).score(), 10);
        assert_eq!(card(Hearts, 13).score(), 0);
        assert_eq!(Card::joker().score(), -2);
    }

    #[test]
    fn test_score_is_pure() {
        // 同样的 (suit, rank) 无论何时构造，分数都一样
        for (a, b) in standard_deck().iter().zip(standard_deck().iter()) {
            assert_eq!(a, b);
            assert_eq!(a.score(), b.score());
        }
    }

    #[test]
    fn test_invalid_cards_rejected() {
        assert!(Card::new(Spades, 0).is_none());
        assert!(Card::new(Hearts, 14).is_none());
        assert!(Card::new(Joker, 5).is_none());
    }

    #[test]
    fn test_matches() {
        assert!(card(Spades, 5).matches(&card(Hearts, 5)));
        assert!(!card(Spades, 5).matches(&card(Spades, 6)));
        assert!(Card::joker().matches(&Card::joker()));
        assert!(!Card::joker().matches(&card(Clubs, 13)));
    }

    #[test]
    fn test_standard_deck_composition() {
        let deck = standard_deck();
        assert_eq!(deck.len(), DECK_SIZE);
        assert_eq!(deck.iter().filter(|c| c.is_joker()).count(), 2);
        assert_eq!(deck.iter().map(Card::score).sum::<i32>(), REFERENCE_DECK_SCORE);
        for &suit in &Suit::STANDARD {
            assert_eq!(deck.iter().filter(|c| c.suit() == suit).count(), 13);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(card(Spades, 1).to_string(), "Ace of Spades");
        assert_eq!(card(Hearts, 10).to_string(), "10 of Hearts");
        assert_eq!(card(Clubs, 13).to_string(), "King of Clubs");
        assert_eq!(Card::joker().to_string(), "Joker");
        assert_eq!(card(Diamonds, 12).short(), "Q♦");
        assert_eq!(Card::joker().short(), "JK");
    }
}
