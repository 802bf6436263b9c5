//! # 高尔夫纸牌核心逻辑库
//!
//! 这个 `core` crate 包含了高尔夫纸牌（玩家对电脑）的全部规则：
//! 牌、牌堆、手牌计分、回合流程，以及电脑对手的决策算法。
//! 它与终端渲染、输入解析完全解耦，上层只需要调用 `logic` 中的操作，
//! 再用 `view` 中的快照来展示即可。

pub mod bot;
mod card;
mod error;
mod hand;
mod logic;
mod pile;
mod state;
mod view;

pub use bot::{BotPolicy, CardMemory, Plan, Placement, Pool};

pub use card::*;

pub use error::*;

pub use hand::*;

pub use logic::*;

pub use pile::*;

pub use state::*;

pub use view::*;
