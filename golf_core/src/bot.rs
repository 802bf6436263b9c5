//! 电脑对手的决策逻辑。
//!
//! 思路是"模拟后打分"：把候选牌依次放到自己的每个位置上，
//! 计算放置前后手牌分数的差值 (delta，越大越好)，
//! 再按被替换的位置原来是否已翻开分成两组分别判断是否值得放。
//!
//! 弃牌堆顶的牌是已知的，优先考虑；不合适时再用"期望牌"
//! 估算从抽牌堆抽一张未知牌的价值。期望值来自电脑记住的牌：
//! 整副牌的总分减去见过的牌的总分，再除以没见过的张数。
//!
//! 这里的函数只读取状态，从不修改 `GameState`；真正执行动作由 `logic` 完成。

use crate::card::{Card, DECK_SIZE, REFERENCE_DECK_SCORE};
use crate::hand::{Cell, Hand, ROWS};
use crate::state::PileKind;
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

const EPSILON: f64 = 1e-9;

/// 电脑的策略参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotPolicy {
    /// 替换扣着的牌时 delta 至少要达到的值，实际使用时不会低于 0
    pub face_down_threshold: f64,
    /// 替换已翻开的牌时 delta 必须超过的值
    pub face_up_threshold: f64,
    /// 开局阶段替换已翻开的牌的门槛
    pub early_face_up_threshold: f64,
    /// 自己翻开的牌少于这个数时算作开局阶段
    pub early_game_face_up: usize,
    /// 自己分数比对手高（落后）时，翻开组门槛额外增加的值
    pub losing_tighten: f64,
}

impl Default for BotPolicy {
    fn default() -> Self {
        BotPolicy {
            face_down_threshold: 0.0,
            face_up_threshold: 3.0,
            early_face_up_threshold: 1.0,
            early_game_face_up: 3,
            losing_tighten: 1.0,
        }
    }
}

/// 某一时刻实际生效的门槛
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub face_up: f64,
    pub face_down: f64,
}

impl BotPolicy {
    pub fn thresholds(&self, own: &Hand, opponent_score: i32) -> Thresholds {
        let early = own.num_face_up() < self.early_game_face_up;
        let mut face_up = if early { self.early_face_up_threshold } else { self.face_up_threshold };
        if own.score() > opponent_score {
            face_up += self.losing_tighten;
        }
        Thresholds { face_up, face_down: self.face_down_threshold.max(0.0) }
    }
}

/// 电脑的记牌器：只增不减，记录每一张公开过的牌
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardMemory {
    seen: Vec<Card>,
}

impl CardMemory {
    /// 记住一张牌，返回是否是新记住的。
    /// 每张牌最多记一次（王最多两次），所以洗回抽牌堆再抽出来的牌不会重复计算。
    pub fn record(&mut self, card: Card) -> bool {
        let limit = if card.is_joker() { 2 } else { 1 };
        if self.seen.iter().filter(|seen| **seen == card).count() >= limit {
            return false;
        }
        self.seen.push(card);
        true
    }

    pub fn seen_cards(&self) -> &[Card] {
        &self.seen
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// 一张没见过的牌的期望分数
    pub fn expected_unseen_score(&self) -> f64 {
        let unseen = DECK_SIZE - self.seen.len();
        if unseen == 0 {
            return 0.0;
        }
        let seen_total: i32 = self.seen.iter().map(Card::score).sum();
        (REFERENCE_DECK_SCORE - seen_total) as f64 / unseen as f64
    }
}

/// 被替换位置的分组
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Pool {
    FaceUp,   // 替换已知的牌
    FaceDown, // 替换扣着的牌
}

/// 准备放置的候选牌
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Candidate {
    Known(Card),
    Expected(f64),
}

/// 一个被接受的放置方案
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub cell: Cell,
    pub pool: Pool,
    pub delta: f64,
}

/// 某一组中 delta 最大的那些位置
#[derive(Debug, Clone, PartialEq)]
pub struct PoolBest {
    pub delta: f64,
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    pub face_up: Option<PoolBest>,
    pub face_down: Option<PoolBest>,
}

/// 电脑决定的行动：从哪个牌堆抽、放到哪里
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Plan {
    pub source: PileKind,
    pub target: Option<Cell>,
    pub keep: bool,
    pub placement: Option<Placement>,
    /// 做决定时估算的未知牌期望分数
    pub expected_value: f64,
}

/// 把候选牌翻开放到 `cell` 之后手牌的分数
pub fn score_after(hand: &Hand, cell: Cell, candidate: Candidate) -> f64 {
    let partner = hand
        .slot(Cell::new(ROWS - 1 - cell.row, cell.col))
        .ok()
        .filter(|slot| slot.face_up)
        .map(|slot| slot.card);
    let partner_score = partner.map_or(0, |card| card.score()) as f64;

    let column_after = match (candidate, partner) {
        (Candidate::Known(card), Some(other)) if card.matches(&other) => 0.0,
        (Candidate::Known(card), _) => card.score() as f64 + partner_score,
        // 期望牌没有点数，不会和任何牌配对
        (Candidate::Expected(value), _) => value + partner_score,
    };
    (hand.score() - hand.column_score(cell.col).unwrap_or(0)) as f64 + column_after
}

/// 对每个位置模拟放置，按分组记录 delta 最大的位置（并列的全部保留）
pub fn evaluate(hand: &Hand, candidate: Candidate) -> Evaluation {
    let before = hand.score() as f64;
    let mut evaluation = Evaluation::default();

    for (cell, slot) in hand.slots() {
        let delta = before - score_after(hand, cell, candidate);
        let best = if slot.face_up { &mut evaluation.face_up } else { &mut evaluation.face_down };
        match best {
            Some(pool) if delta > pool.delta + EPSILON => {
                pool.delta = delta;
                pool.cells = vec![cell];
            }
            Some(pool) if (delta - pool.delta).abs() <= EPSILON => pool.cells.push(cell),
            Some(_) => {}
            None => *best = Some(PoolBest { delta, cells: vec![cell] }),
        }
    }
    evaluation
}

/// 按门槛筛选两组，选出最终的位置；并列时随机选一个
pub fn choose<R: Rng + ?Sized>(
    evaluation: &Evaluation,
    thresholds: Thresholds,
    rng: &mut R,
) -> Option<Placement> {
    // 扣着的牌：不能让分数变差
    let face_down = evaluation
        .face_down
        .as_ref()
        .filter(|best| best.delta >= thresholds.face_down)
        .map(|best| (Pool::FaceDown, best));
    // 翻开的牌：必须有足够的改进
    let face_up = evaluation
        .face_up
        .as_ref()
        .filter(|best| best.delta > thresholds.face_up.max(0.0))
        .map(|best| (Pool::FaceUp, best));

    let (pool, best) = match (face_up, face_down) {
        (Some(up), Some(down)) => {
            if down.1.delta > up.1.delta + EPSILON { down } else { up }
        }
        (Some(up), None) => up,
        (None, Some(down)) => down,
        (None, None) => return None,
    };

    let cell = *best.cells.choose(rng)?;
    Some(Placement { cell, pool, delta: best.delta })
}

/// 已知一张牌时，电脑会把它放在哪里（不放则返回 `None`）
pub fn place_card<R: Rng + ?Sized>(
    own: &Hand,
    card: Card,
    opponent_score: i32,
    policy: &BotPolicy,
    rng: &mut R,
) -> Option<Placement> {
    let thresholds = policy.thresholds(own, opponent_score);
    choose(&evaluate(own, Candidate::Known(card)), thresholds, rng)
}

/// 决定本回合的行动。先看弃牌堆顶，再看抽牌堆的期望牌，都不合适就抽牌后直接弃掉。
pub fn plan<R: Rng + ?Sized>(
    own: &Hand,
    opponent_score: i32,
    discard_top: Option<Card>,
    memory: &CardMemory,
    policy: &BotPolicy,
    rng: &mut R,
) -> Plan {
    let thresholds = policy.thresholds(own, opponent_score);
    let expected_value = memory.expected_unseen_score();

    if let Some(card) = discard_top {
        let evaluation = evaluate(own, Candidate::Known(card));
        debug!(?card, ?evaluation, ?thresholds, "评估弃牌堆顶");
        if let Some(placement) = choose(&evaluation, thresholds, rng) {
            return Plan {
                source: PileKind::Discard,
                target: Some(placement.cell),
                keep: true,
                placement: Some(placement),
                expected_value,
            };
        }
    }

    let evaluation = evaluate(own, Candidate::Expected(expected_value));
    debug!(expected_value, ?evaluation, "评估抽牌堆的期望牌");
    match choose(&evaluation, thresholds, rng) {
        Some(placement) => Plan {
            source: PileKind::Draw,
            target: Some(placement.cell),
            keep: true,
            placement: Some(placement),
            expected_value,
        },
        None => Plan { source: PileKind::Draw, target: None, keep: false, placement: None, expected_value },
    }
}

// --- 单元测试 ---
