use crate::bot::{BotPolicy, CardMemory};
use crate::card::Card;
use crate::hand::{Cell, Hand};
use crate::pile::Pile;
use crate::view::{HandView, TableView};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 对局中的两个座位：人类玩家和电脑
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    Human,
    Bot,
}

impl Seat {
    pub fn other(self) -> Seat {
        match self {
            Seat::Human => Seat::Bot,
            Seat::Bot => Seat::Human,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Seat::Human => 0,
            Seat::Bot => 1,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            Seat::Human => "玩家",
            Seat::Bot => "电脑",
        })
    }
}

/// 抽牌时可以选择的两个牌堆
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PileKind {
    Draw,
    Discard,
}

impl fmt::Display for PileKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", match self {
            PileKind::Draw => "抽牌堆",
            PileKind::Discard => "弃牌堆",
        })
    }
}

/// 一局游戏的配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// 洗牌和电脑打破平局用的随机种子
    pub seed: u64,
    /// 每行的牌数 W，手牌共 2×W 张
    pub hand_width: usize,
    pub policy: BotPolicy,
}

pub const DEFAULT_HAND_WIDTH: usize = 3;

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig { seed: 0, hand_width: DEFAULT_HAND_WIDTH, policy: BotPolicy::default() }
    }
}

/// 整局游戏的状态。
///
/// 只能通过 `logic` 中的操作修改，这样每一步之后
/// 两个牌堆加两份手牌里的牌始终是完整的 54 张。
#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) draw: Pile,
    pub(crate) discard: Pile,
    pub(crate) hands: [Hand; 2],
    pub(crate) turn: Seat,
    // 第一个全部翻开的座位，另一方还有最后一个回合
    pub(crate) final_lap: Option<Seat>,
    pub(crate) finished: bool,
    pub(crate) initial_revealed: [bool; 2],
    pub(crate) turns_played: u32,
    // 电脑记住的所有公开过的牌
    pub(crate) memory: CardMemory,
    pub(crate) policy: BotPolicy,
    pub(crate) rng: StdRng,
}

// --- GameState 的实现方法 ---

impl GameState {
    pub fn hand(&self, seat: Seat) -> &Hand {
        &self.hands[seat.index()]
    }

    pub(crate) fn hand_mut(&mut self, seat: Seat) -> &mut Hand {
        &mut self.hands[seat.index()]
    }

    pub fn draw_pile(&self) -> &Pile {
        &self.draw
    }

    pub fn discard_pile(&self) -> &Pile {
        &self.discard
    }

    pub fn pile(&self, kind: PileKind) -> &Pile {
        match kind {
            PileKind::Draw => &self.draw,
            PileKind::Discard => &self.discard,
        }
    }

    pub(crate) fn pile_mut(&mut self, kind: PileKind) -> &mut Pile {
        match kind {
            PileKind::Draw => &mut self.draw,
            PileKind::Discard => &mut self.discard,
        }
    }

    /// 当前应该行动的座位
    pub fn turn(&self) -> Seat {
        self.turn
    }

    pub fn final_lap(&self) -> Option<Seat> {
        self.final_lap
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn has_revealed_initial(&self, seat: Seat) -> bool {
        self.initial_revealed[seat.index()]
    }

    pub(crate) fn mark_initial_revealed(&mut self, seat: Seat) {
        self.initial_revealed[seat.index()] = true;
    }

    pub fn turns_played(&self) -> u32 {
        self.turns_played
    }

    pub fn memory(&self) -> &CardMemory {
        &self.memory
    }

    pub fn policy(&self) -> &BotPolicy {
        &self.policy
    }

    /// 场上所有的牌：两个牌堆加两份手牌
    pub fn all_cards(&self) -> Vec<Card> {
        self.draw
            .cards()
            .chain(self.discard.cards())
            .chain(self.hands.iter().flat_map(|hand| hand.cards()))
            .copied()
            .collect()
    }

    /// 以某个座位的视角生成桌面快照：对方扣着的牌和自己扣着的牌都隐藏
    pub fn view(&self, viewer: Seat) -> TableView {
        let hand_view = |seat: Seat| {
            let hand = self.hand(seat);
            let rows = (0..crate::hand::ROWS)
                .map(|row| {
                    (0..hand.width())
                        .map(|col| {
                            hand.slot(Cell::new(row, col))
                                .ok()
                                .filter(|slot| slot.face_up)
                                .map(|slot| slot.card)
                        })
                        .collect::<Vec<_>>()
                })
                .collect();
            HandView { seat, rows, visible_score: hand.score(), face_up: hand.num_face_up() }
        };

        TableView {
            viewer,
            turn: self.turn,
            draw_size: self.draw.size(),
            discard_top: self.discard.top(),
            discard_size: self.discard.size(),
            own: hand_view(viewer),
            opponent: hand_view(viewer.other()),
            final_lap: self.final_lap,
            finished: self.finished,
            turns_played: self.turns_played,
        }
    }
}
