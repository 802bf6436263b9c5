use crate::state::{PileKind, Seat};
use thiserror::Error;

/// 核心逻辑可能返回的错误。
///
/// 所有错误都是可恢复的：出错时 `GameState` 保持原样，
/// 由上层（终端输入层）重新提示用户即可。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GolfError {
    #[error("{pile}是空的，无法抽牌")]
    EmptyPile { pile: PileKind },

    #[error("位置 ({row}, {col}) 超出手牌范围")]
    InvalidCell { row: usize, col: usize },

    #[error("不能重复选择同一个位置 ({row}, {col})")]
    DuplicateCell { row: usize, col: usize },

    #[error("{seat}已经翻开过初始的两张牌")]
    AlreadyRevealed { seat: Seat },

    #[error("{seat}还没有翻开初始的两张牌")]
    RevealPending { seat: Seat },

    #[error("现在不是{seat}的回合")]
    OutOfTurn { seat: Seat },

    #[error("游戏已经结束")]
    GameOver,

    #[error("每行 {width} 张牌无法用一副牌发完两份手牌")]
    InvalidHandWidth { width: usize },

    #[error("牌堆不为空，不能重新填充整副牌")]
    DeckNotEmpty,

    #[error("选择保留这张牌时必须指定放置的位置")]
    MissingTarget,
}

pub type GolfResult<T> = Result<T, GolfError>;
