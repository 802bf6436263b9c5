use crate::card::Card;
use crate::error::{GolfError, GolfResult};
use crate::pile::Pile;
use serde::Serialize;

/// 手牌固定两行
pub const ROWS: usize = 2;

/// 手牌网格中的一个位置 (row, col)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Cell {
        Cell { row, col }
    }
}

/// 网格中的一格：牌和它是否已翻开放在一起，保证每一格都有牌
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Slot {
    pub card: Card,
    pub face_up: bool,
}

/// 手牌 (Hand)：2×W 的网格。
///
/// 计分按列进行：同一列两张牌都翻开且能配对时，该列记 0 分；
/// 否则只累加已翻开的牌的分数，扣着的牌不计分。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hand {
    rows: [Vec<Slot>; ROWS],
}

impl Hand {
    /// 从牌堆顶依次发 2×width 张牌组成手牌，全部扣着。
    /// 牌不够时不动牌堆，直接返回错误。
    pub fn deal(pile: &mut Pile, width: usize) -> GolfResult<Hand> {
        if pile.size() < ROWS * width {
            return Err(GolfError::EmptyPile { pile: pile.kind() });
        }
        let mut rows: [Vec<Slot>; ROWS] = [Vec::with_capacity(width), Vec::with_capacity(width)];
        for row in rows.iter_mut() {
            for _ in 0..width {
                let card = pile.pop_top()?;
                row.push(Slot { card, face_up: false });
            }
        }
        Ok(Hand { rows })
    }

    /// 直接用给定的两行构造手牌，两行长度必须一致
    pub fn from_rows(top: Vec<Slot>, bottom: Vec<Slot>) -> Option<Hand> {
        if top.len() != bottom.len() || top.is_empty() {
            return None;
        }
        Some(Hand { rows: [top, bottom] })
    }

    pub fn width(&self) -> usize {
        self.rows[0].len()
    }

    pub fn total_slots(&self) -> usize {
        ROWS * self.width()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < ROWS && cell.col < self.width()
    }

    fn check(&self, cell: Cell) -> GolfResult<()> {
        if self.contains(cell) {
            Ok(())
        } else {
            Err(GolfError::InvalidCell { row: cell.row, col: cell.col })
        }
    }

    pub fn slot(&self, cell: Cell) -> GolfResult<&Slot> {
        self.check(cell)?;
        Ok(&self.rows[cell.row][cell.col])
    }

    /// 所有位置，按行优先顺序
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..ROWS).flat_map(move |row| (0..self.width()).map(move |col| Cell { row, col }))
    }

    pub fn slots(&self) -> impl Iterator<Item = (Cell, &Slot)> + '_ {
        self.cells().map(move |cell| (cell, &self.rows[cell.row][cell.col]))
    }

    pub fn cards(&self) -> impl Iterator<Item = &Card> + '_ {
        self.rows.iter().flatten().map(|slot| &slot.card)
    }

    pub fn visible_cards(&self) -> impl Iterator<Item = &Card> + '_ {
        self.rows.iter().flatten().filter(|slot| slot.face_up).map(|slot| &slot.card)
    }

    /// 单列的得分
    pub fn column_score(&self, col: usize) -> GolfResult<i32> {
        self.check(Cell { row: 0, col })?;
        Ok(self.column_total(col))
    }

    fn column_total(&self, col: usize) -> i32 {
        let top = &self.rows[0][col];
        let bottom = &self.rows[1][col];
        if top.face_up && bottom.face_up && top.card.matches(&bottom.card) {
            return 0;
        }
        [top, bottom]
            .iter()
            .filter(|slot| slot.face_up)
            .map(|slot| slot.card.score())
            .sum()
    }

    pub fn score(&self) -> i32 {
        (0..self.width()).map(|col| self.column_total(col)).sum()
    }

    pub fn num_face_up(&self) -> usize {
        self.rows.iter().flatten().filter(|slot| slot.face_up).count()
    }

    pub fn is_fully_revealed(&self) -> bool {
        self.num_face_up() == self.total_slots()
    }

    /// 翻开一张牌；对已翻开的牌重复调用没有影响。
    /// 返回这张牌是否是第一次被翻开。
    pub fn reveal(&mut self, cell: Cell) -> GolfResult<bool> {
        self.check(cell)?;
        let slot = &mut self.rows[cell.row][cell.col];
        let newly = !slot.face_up;
        slot.face_up = true;
        Ok(newly)
    }

    /// 翻开所有牌，返回此前扣着的那些牌
    pub fn reveal_all(&mut self) -> Vec<Card> {
        let mut newly = Vec::new();
        for slot in self.rows.iter_mut().flatten() {
            if !slot.face_up {
                slot.face_up = true;
                newly.push(slot.card);
            }
        }
        newly
    }

    /// 用新牌替换某个位置的牌，返回被换下来的牌。
    /// 不会改变该位置的翻开状态，调用方需要自己决定是否翻开。
    pub fn replace(&mut self, cell: Cell, card: Card) -> GolfResult<Card> {
        self.check(cell)?;
        let slot = &mut self.rows[cell.row][cell.col];
        Ok(std::mem::replace(&mut slot.card, card))
    }
}

// --- 单元测试 ---

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Suit::{self, *};

    fn card(suit: Suit, rank: u8) -> Card {
        Card::new(suit, rank).unwrap()
    }

    fn up(card: Card) -> Slot {
        Slot { card, face_up: true }
    }

    fn down(card: Card) -> Slot {
        Slot { card, face_up: false }
    }

    #[test]
    fn test_matched_pair_cancels() {
        let hand = Hand::from_rows(
            vec![up(card(Spades, 5)), up(card(Hearts, 3)), down(card(Clubs, 9))],
            vec![up(card(Hearts, 5)), up(card(Clubs, 12)), down(card(Spades, 9))],
        )
        .unwrap();
        assert_eq!(hand.column_score(0), Ok(0));
        assert_eq!(hand.column_score(1), Ok(13));
        assert_eq!(hand.column_score(2), Ok(0));
        assert_eq!(hand.score(), 13);
        assert_eq!(hand.column_score(3), Err(GolfError::InvalidCell { row: 0, col: 3 }));
    }

    #[test]
    fn test_two_jokers_cancel() {
        let hand = Hand::from_rows(vec![up(Card::joker())], vec![up(Card::joker())]).unwrap();
        assert_eq!(hand.score(), 0);

        let single = Hand::from_rows(vec![up(Card::joker())], vec![up(card(Spades, 4))]).unwrap();
        assert_eq!(single.score(), 2);
    }

    #[test]
    fn test_concealed_cards_never_score() {
        let hand = Hand::from_rows(
            vec![down(card(Spades, 12)), up(card(Hearts, 7))],
            vec![down(card(Clubs, 10)), down(card(Hearts, 7))],
        )
        .unwrap();
        assert_eq!(hand.column_score(0), Ok(0));
        // 只有一张翻开，不会配对
        assert_eq!(hand.column_score(1), Ok(7));
        assert_eq!(hand.num_face_up(), 1);
    }

    #[test]
    fn test_reveal_is_idempotent() {
        let mut hand = Hand::from_rows(vec![down(card(Spades, 2))], vec![down(card(Spades, 3))]).unwrap();
        assert_eq!(hand.reveal(Cell::new(0, 0)), Ok(true));
        assert_eq!(hand.reveal(Cell::new(0, 0)), Ok(false));
        assert_eq!(hand.num_face_up(), 1);
        assert_eq!(hand.reveal(Cell::new(2, 0)), Err(GolfError::InvalidCell { row: 2, col: 0 }));
        assert_eq!(hand.reveal(Cell::new(0, 1)), Err(GolfError::InvalidCell { row: 0, col: 1 }));
    }

    #[test]
    fn test_replace_keeps_face_up_flag() {
        let mut hand = Hand::from_rows(vec![down(card(Spades, 2))], vec![up(card(Spades, 3))]).unwrap();
        let old = hand.replace(Cell::new(0, 0), card(Hearts, 8)).unwrap();
        assert_eq!(old, card(Spades, 2));
        let slot = hand.slot(Cell::new(0, 0)).unwrap();
        assert_eq!(slot.card, card(Hearts, 8));
        assert!(!slot.face_up);
    }

    #[test]
    fn test_deal_drains_pile() {
        let mut pile = Pile::draw_pile();
        pile.fill_standard_deck().unwrap();
        let hand = Hand::deal(&mut pile, 3).unwrap();
        assert_eq!(hand.total_slots(), 6);
        assert_eq!(hand.num_face_up(), 0);
        assert_eq!(pile.size(), 48);

        let mut short = Pile::draw_pile();
        short.push_top(card(Clubs, 1));
        assert!(Hand::deal(&mut short, 3).is_err());
        assert_eq!(short.size(), 1);
    }

    #[test]
    fn test_reveal_all_returns_newly_revealed() {
        let mut hand = Hand::from_rows(
            vec![up(card(Spades, 2)), down(card(Spades, 4))],
            vec![down(card(Hearts, 6)), up(card(Hearts, 8))],
        )
        .unwrap();
        let newly = hand.reveal_all();
        assert_eq!(newly, vec![card(Spades, 4), card(Hearts, 6)]);
        assert!(hand.is_fully_revealed());
        assert_eq!(hand.score(), 20);
    }
}
