use crate::bot::Plan;
use crate::card::Card;
use crate::hand::Cell;
use crate::state::{PileKind, Seat};
use serde::Serialize;

// --- 交给渲染层的快照和结果 ---
// 这些结构只用于展示，渲染层拿到后不需要再访问 GameState。

/// 某个座位看到的一份手牌，扣着的牌为 None
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct HandView {
    pub seat: Seat,
    pub rows: Vec<Vec<Option<Card>>>,
    /// 只计算已翻开的牌
    pub visible_score: i32,
    pub face_up: usize,
}

/// 某个座位看到的整张桌面
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TableView {
    pub viewer: Seat,
    pub turn: Seat,
    pub draw_size: usize,
    pub discard_top: Option<Card>,
    pub discard_size: usize,
    pub own: HandView,
    pub opponent: HandView,
    pub final_lap: Option<Seat>,
    pub finished: bool,
    pub turns_played: u32,
}

/// 放下一张牌后被换下来的牌
#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Swap {
    pub cell: Cell,
    pub displaced: Card,
}

/// 一个回合执行完毕后发生的事情
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TurnReport {
    pub seat: Seat,
    pub source: PileKind,
    pub drawn: Card,
    /// 保留时的放置结果；为 None 表示抽到的牌被弃掉了
    pub swap: Option<Swap>,
    /// 抽牌堆用完时从弃牌堆洗回去的张数
    pub recycled: usize,
    pub final_lap_started: bool,
    pub game_over: bool,
}

/// 电脑一个回合的决定和实际执行结果
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DecisionOutcome {
    pub plan: Plan,
    /// 计划失效（抽到的牌不值得放，或目标位置无效）时为 true
    pub fell_back: bool,
    pub report: TurnReport,
}

/// 最终结果，分数低者获胜
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    HumanWins,
    BotWins,
    Draw,
}

// --- 单元测试 ---

#[cfg(test)]
mod tests {
    use crate::hand::Cell;
    use crate::logic::{begin_game, reveal_initial};
    use crate::state::Seat;

    #[test]
    fn test_view_hides_concealed_cards() {
        let mut state = begin_game(4);
        reveal_initial(&mut state, Seat::Human, [Cell::new(0, 0), Cell::new(1, 1)]).unwrap();

        let view = state.view(Seat::Human);
        assert_eq!(view.own.face_up, 2);
        assert!(view.own.rows[0][0].is_some());
        assert!(view.own.rows[0][1].is_none());
        assert!(view.own.rows[1][1].is_some());
        assert!(view.opponent.rows.iter().flatten().all(Option::is_none));
        assert_eq!(view.discard_top, state.discard_pile().top());
        assert_eq!(view.draw_size, state.draw_pile().size());
        assert_eq!(view.own.visible_score, state.hand(Seat::Human).score());
    }

    #[test]
    fn test_view_serializes_to_json() {
        let state = begin_game(4);
        let json = serde_json::to_value(state.view(Seat::Bot)).unwrap();
        assert_eq!(json["viewer"], "Bot");
        assert_eq!(json["turn"], "Human");
        assert_eq!(json["own"]["rows"].as_array().unwrap().len(), 2);
        assert_eq!(json["own"]["rows"][0][0], serde_json::Value::Null);
        assert_eq!(json["finished"], false);
    }
}
