use crate::card::{standard_deck, Card};
use crate::error::{GolfError, GolfResult};
use crate::state::PileKind;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::collections::VecDeque;

/// 牌堆顶对外可见的样子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TopCard {
    Empty,
    Concealed, // 抽牌堆，牌面朝下
    Face(Card),
}

/// 牌堆 (Pile)
///
/// 下标 0 是堆顶：新牌压在顶上，抽牌也从顶上抽。
/// `hidden` 决定调用方能否看到堆顶的牌面（抽牌堆隐藏，弃牌堆公开）。
#[derive(Debug, Clone)]
pub struct Pile {
    kind: PileKind,
    cards: VecDeque<Card>,
    hidden: bool,
}

impl Pile {
    pub fn draw_pile() -> Pile {
        Pile { kind: PileKind::Draw, cards: VecDeque::new(), hidden: true }
    }

    pub fn discard_pile() -> Pile {
        Pile { kind: PileKind::Discard, cards: VecDeque::new(), hidden: false }
    }

    pub fn kind(&self) -> PileKind {
        self.kind
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// 放入完整的一副牌（52 张 + 2 张王）。只能对空牌堆调用。
    pub fn fill_standard_deck(&mut self) -> GolfResult<()> {
        if !self.cards.is_empty() {
            return Err(GolfError::DeckNotEmpty);
        }
        self.cards.extend(standard_deck());
        Ok(())
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.make_contiguous().shuffle(rng);
    }

    pub fn push_top(&mut self, card: Card) {
        self.cards.push_front(card);
    }

    pub fn pop_top(&mut self) -> GolfResult<Card> {
        self.cards.pop_front().ok_or(GolfError::EmptyPile { pile: self.kind })
    }

    pub fn size(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// 堆顶的牌面。隐藏的牌堆只返回 `Concealed`。
    pub fn peek_top_visible(&self) -> TopCard {
        match self.cards.front() {
            None => TopCard::Empty,
            Some(_) if self.hidden => TopCard::Concealed,
            Some(&card) => TopCard::Face(card),
        }
    }

    /// 公开牌堆的堆顶，隐藏牌堆永远返回 `None`
    pub fn top(&self) -> Option<Card> {
        match self.peek_top_visible() {
            TopCard::Face(card) => Some(card),
            _ => None,
        }
    }

    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// 抽牌堆用完时，把弃牌堆除堆顶以外的牌洗匀后放回抽牌堆。
    /// 返回移动的张数；弃牌堆只剩堆顶时返回 0。
    pub fn recycle_into<R: Rng + ?Sized>(&mut self, target: &mut Pile, rng: &mut R) -> usize {
        if self.cards.len() <= 1 {
            return 0;
        }
        let rest = self.cards.split_off(1);
        let moved = rest.len();
        target.cards.extend(rest);
        target.shuffle(rng);
        moved
    }
}

// --- 单元测试 ---

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Suit, DECK_SIZE};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn card(suit: Suit, rank: u8) -> Card {
        Card::new(suit, rank).unwrap()
    }

    #[test]
    fn test_fill_standard_deck() {
        let mut pile = Pile::draw_pile();
        pile.fill_standard_deck().unwrap();
        assert_eq!(pile.size(), DECK_SIZE);
        // 不能对非空牌堆再次填充
        assert_eq!(pile.fill_standard_deck(), Err(GolfError::DeckNotEmpty));
        assert_eq!(pile.size(), DECK_SIZE);
    }

    #[test]
    fn test_push_and_pop_from_top() {
        let mut pile = Pile::discard_pile();
        pile.push_top(card(Suit::Spades, 2));
        pile.push_top(card(Suit::Hearts, 3));
        assert_eq!(pile.pop_top(), Ok(card(Suit::Hearts, 3)));
        assert_eq!(pile.pop_top(), Ok(card(Suit::Spades, 2)));
        assert_eq!(pile.pop_top(), Err(GolfError::EmptyPile { pile: PileKind::Discard }));
    }

    #[test]
    fn test_peek_respects_hidden_flag() {
        let mut draw = Pile::draw_pile();
        let mut discard = Pile::discard_pile();
        assert_eq!(draw.peek_top_visible(), TopCard::Empty);
        draw.push_top(card(Suit::Clubs, 9));
        discard.push_top(card(Suit::Clubs, 9));
        assert_eq!(draw.peek_top_visible(), TopCard::Concealed);
        assert_eq!(draw.top(), None);
        assert_eq!(discard.peek_top_visible(), TopCard::Face(card(Suit::Clubs, 9)));
    }

    #[test]
    fn test_shuffle_is_permutation_and_seedable() {
        let mut a = Pile::draw_pile();
        let mut b = Pile::draw_pile();
        a.fill_standard_deck().unwrap();
        b.fill_standard_deck().unwrap();
        a.shuffle(&mut StdRng::seed_from_u64(7));
        b.shuffle(&mut StdRng::seed_from_u64(7));
        let a_cards: Vec<Card> = a.cards().copied().collect();
        let b_cards: Vec<Card> = b.cards().copied().collect();
        assert_eq!(a_cards, b_cards);

        let mut sorted = a_cards.clone();
        sorted.sort();
        let mut reference = standard_deck();
        reference.sort();
        assert_eq!(sorted, reference);
    }

    #[test]
    fn test_recycle_keeps_discard_top() {
        let mut draw = Pile::draw_pile();
        let mut discard = Pile::discard_pile();
        for rank in 1..=5 {
            discard.push_top(card(Suit::Hearts, rank));
        }
        let moved = discard.recycle_into(&mut draw, &mut StdRng::seed_from_u64(1));
        assert_eq!(moved, 4);
        assert_eq!(discard.size(), 1);
        assert_eq!(discard.top(), Some(card(Suit::Hearts, 5)));
        assert_eq!(draw.size(), 4);

        // 只剩一张时无法回收
        assert_eq!(discard.recycle_into(&mut draw, &mut StdRng::seed_from_u64(1)), 0);
    }
}
