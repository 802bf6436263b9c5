use crate::bot;
use crate::card::Card;
use crate::error::{GolfError, GolfResult};
use crate::hand::{Cell, Hand};
use crate::pile::Pile;
use crate::state::*;
use crate::view::{DecisionOutcome, Outcome, Swap, TurnReport};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use tracing::{debug, info};

/// 一副牌最多支持的每行张数：两份手牌 4×13 = 52 张，再加 1 张弃牌
pub const MAX_HAND_WIDTH: usize = 13;

// --- 核心游戏流程函数 ---

/// 用默认配置开始一局新游戏
pub fn begin_game(seed: u64) -> GameState {
    begin_game_with(GameConfig { seed, ..GameConfig::default() })
        .expect("默认配置下牌堆一定够发两份手牌")
}

/// 开始一局新游戏
///
/// - 填充整副牌并用 `seed` 洗牌。
/// - 先给玩家、再给电脑各发 2×W 张扣着的牌。
/// - 翻开一张牌作为弃牌堆的第一张，电脑记住它。
/// - 玩家先行动。
pub fn begin_game_with(config: GameConfig) -> GolfResult<GameState> {
    let width = config.hand_width;
    if width == 0 || width > MAX_HAND_WIDTH {
        return Err(GolfError::InvalidHandWidth { width });
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut draw = Pile::draw_pile();
    draw.fill_standard_deck()?;
    draw.shuffle(&mut rng);

    let human = Hand::deal(&mut draw, width)?;
    let bot = Hand::deal(&mut draw, width)?;

    let mut discard = Pile::discard_pile();
    let first = draw.pop_top()?;
    discard.push_top(first);

    let mut memory = bot::CardMemory::default();
    memory.record(first);

    info!(seed = config.seed, width, %first, "新的一局开始");

    Ok(GameState {
        draw,
        discard,
        hands: [human, bot],
        turn: Seat::Human,
        final_lap: None,
        finished: false,
        initial_revealed: [false, false],
        turns_played: 0,
        memory,
        policy: config.policy,
        rng,
    })
}

/// 开局时翻开自己的两张牌。两个位置必须都在范围内且不相同，每个座位只能翻一次。
pub fn reveal_initial(state: &mut GameState, seat: Seat, positions: [Cell; 2]) -> GolfResult<()> {
    if state.finished {
        return Err(GolfError::GameOver);
    }
    if state.has_revealed_initial(seat) {
        return Err(GolfError::AlreadyRevealed { seat });
    }
    let hand = state.hand(seat);
    for cell in positions {
        if !hand.contains(cell) {
            return Err(GolfError::InvalidCell { row: cell.row, col: cell.col });
        }
    }
    if positions[0] == positions[1] {
        return Err(GolfError::DuplicateCell { row: positions[0].row, col: positions[0].col });
    }

    for cell in positions {
        if state.hand_mut(seat).reveal(cell)? {
            let card = state.hand(seat).slot(cell)?.card;
            state.memory.record(card);
        }
    }
    state.mark_initial_revealed(seat);
    debug!(%seat, ?positions, "翻开初始的两张牌");
    Ok(())
}

/// 电脑随机选两个不同的位置翻开
pub fn reveal_initial_bot(state: &mut GameState) -> GolfResult<[Cell; 2]> {
    let cells: Vec<Cell> = state.hand(Seat::Bot).cells().collect();
    let picked: Vec<Cell> = cells.choose_multiple(&mut state.rng, 2).copied().collect();
    let positions = match picked[..] {
        [a, b] => [a, b],
        _ => return Err(GolfError::InvalidHandWidth { width: state.hand(Seat::Bot).width() }),
    };
    reveal_initial(state, Seat::Bot, positions)?;
    Ok(positions)
}

/// 选择抽牌堆之后、决定是否保留之前，先看一眼将要抽到的牌。
///
/// 抽牌堆空时会先把弃牌堆洗回去，返回 (将要抽到的牌, 回收的张数)。
/// 这张牌仍留在抽牌堆顶，直到 `take_turn_human` 真正抽走它。
pub fn peek_draw(state: &mut GameState, seat: Seat) -> GolfResult<(Card, usize)> {
    check_can_act(state, seat)?;
    let mut recycled = 0;
    if state.draw.is_empty() {
        recycled = state.discard.recycle_into(&mut state.draw, &mut state.rng);
        info!(recycled, "抽牌堆已空，弃牌堆洗回抽牌堆");
    }
    let card = *state.draw.cards().next().ok_or(GolfError::EmptyPile { pile: PileKind::Draw })?;
    Ok((card, recycled))
}

/// 玩家的一个回合：从 `pile` 抽一张牌，`keep` 为 true 时放到 `target`，否则弃掉
pub fn take_turn_human(
    state: &mut GameState,
    pile: PileKind,
    keep: bool,
    target: Option<Cell>,
) -> GolfResult<TurnReport> {
    let action = TurnAction { pile, keep, target };
    validate(state, Seat::Human, &action)?;
    let target = if keep { target } else { None };
    play_turn(state, Seat::Human, pile, |_, _| target)
}

/// 电脑的一个回合：先决策，再交给回合流程执行。
///
/// 从抽牌堆抽牌时，电脑会用真实的牌重新评估一次；
/// 不值得放就直接弃掉，等同于过牌。
pub fn take_turn_bot(state: &mut GameState) -> GolfResult<DecisionOutcome> {
    check_can_act(state, Seat::Bot)?;

    let opponent_score = state.hand(Seat::Human).score();
    // 在副本上决策，校验通过后才提交随机数状态
    let mut rng = state.rng.clone();
    let plan = bot::plan(
        &state.hands[Seat::Bot.index()],
        opponent_score,
        state.discard.top(),
        &state.memory,
        &state.policy,
        &mut rng,
    );
    debug!(?plan, "电脑的计划");

    // 目标位置由回合流程检查，无效时退回到弃牌
    validate(state, Seat::Bot, &TurnAction { pile: plan.source, keep: false, target: None })?;
    state.rng = rng;

    let mut fell_back = false;
    let report = play_turn(state, Seat::Bot, plan.source, |state, card| {
        if !plan.keep {
            return None;
        }
        let chosen = match plan.source {
            PileKind::Discard => plan.target,
            PileKind::Draw => bot::place_card(
                &state.hands[Seat::Bot.index()],
                card,
                opponent_score,
                &state.policy,
                &mut state.rng,
            )
            .map(|placement| placement.cell),
        };
        let valid = chosen.filter(|&cell| state.hand(Seat::Bot).contains(cell));
        fell_back = valid.is_none();
        valid
    })?;

    Ok(DecisionOutcome { plan, fell_back, report })
}

pub fn is_game_over(state: &GameState) -> bool {
    state.finished
}

/// (玩家分数, 电脑分数)。游戏结束后所有牌都已翻开，这就是最终得分。
pub fn final_scores(state: &GameState) -> (i32, i32) {
    (state.hand(Seat::Human).score(), state.hand(Seat::Bot).score())
}

/// 游戏结束后的胜负，分数低者获胜
pub fn outcome(state: &GameState) -> Option<Outcome> {
    if !state.finished {
        return None;
    }
    let (human, bot) = final_scores(state);
    Some(match human.cmp(&bot) {
        std::cmp::Ordering::Less => Outcome::HumanWins,
        std::cmp::Ordering::Greater => Outcome::BotWins,
        std::cmp::Ordering::Equal => Outcome::Draw,
    })
}

// --- 回合状态机 ---

/// 一个回合所经历的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    AwaitingDrawChoice,
    CardDrawn(Card),
    Placing(Card, Cell),
    Discarding(Card),
    TurnComplete,
}

/// 经过校验的回合动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnAction {
    pub pile: PileKind,
    pub keep: bool,
    pub target: Option<Cell>,
}

fn check_can_act(state: &GameState, seat: Seat) -> GolfResult<()> {
    if state.finished {
        return Err(GolfError::GameOver);
    }
    if state.turn != seat {
        return Err(GolfError::OutOfTurn { seat });
    }
    for pending in [seat, seat.other()] {
        if !state.has_revealed_initial(pending) {
            return Err(GolfError::RevealPending { seat: pending });
        }
    }
    Ok(())
}

/// 执行前的全部检查，任何一项不通过都不会修改状态
fn validate(state: &GameState, seat: Seat, action: &TurnAction) -> GolfResult<()> {
    check_can_act(state, seat)?;
    if action.keep {
        let cell = action.target.ok_or(GolfError::MissingTarget)?;
        if !state.hand(seat).contains(cell) {
            return Err(GolfError::InvalidCell { row: cell.row, col: cell.col });
        }
    }
    let available = match action.pile {
        PileKind::Discard => !state.discard.is_empty(),
        // 抽牌堆空了可以从弃牌堆回收
        PileKind::Draw => !state.draw.is_empty() || state.discard.size() > 1,
    };
    if !available {
        return Err(GolfError::EmptyPile { pile: action.pile });
    }
    Ok(())
}

/// 按阶段推进一个已通过校验的回合。
///
/// `decide` 在抽到牌之后被调用，返回放置的位置；返回 `None`
/// 或越界的位置时这张牌被弃掉。
fn play_turn<F>(state: &mut GameState, seat: Seat, source: PileKind, decide: F) -> GolfResult<TurnReport>
where
    F: FnOnce(&mut GameState, Card) -> Option<Cell>,
{
    let mut recycled = 0;
    if source == PileKind::Draw && state.draw.is_empty() {
        recycled = state.discard.recycle_into(&mut state.draw, &mut state.rng);
        info!(recycled, "抽牌堆已空，弃牌堆洗回抽牌堆");
    }

    let mut decide = Some(decide);
    let mut drawn = None;
    let mut swap = None;
    let mut phase = TurnPhase::AwaitingDrawChoice;

    loop {
        debug!(%seat, ?phase, "回合阶段");
        phase = match phase {
            TurnPhase::AwaitingDrawChoice => {
                let card = state.pile_mut(source).pop_top()?;
                drawn = Some(card);
                TurnPhase::CardDrawn(card)
            }
            TurnPhase::CardDrawn(card) => {
                let target = decide.take().and_then(|decide| decide(state, card));
                match target {
                    Some(cell) if state.hand(seat).contains(cell) => TurnPhase::Placing(card, cell),
                    _ => TurnPhase::Discarding(card),
                }
            }
            TurnPhase::Placing(card, cell) => {
                let hand = state.hand_mut(seat);
                let was_face_up = hand.slot(cell).map(|slot| slot.face_up).unwrap_or(true);
                match hand.replace(cell, card) {
                    Ok(displaced) => {
                        let _ = hand.reveal(cell);
                        state.discard.push_top(displaced);
                        if source == PileKind::Draw {
                            state.memory.record(card);
                        }
                        if !was_face_up {
                            state.memory.record(displaced);
                        }
                        swap = Some(Swap { cell, displaced });
                        TurnPhase::TurnComplete
                    }
                    Err(_) => TurnPhase::Discarding(card),
                }
            }
            TurnPhase::Discarding(card) => {
                state.discard.push_top(card);
                if source == PileKind::Draw {
                    state.memory.record(card);
                }
                TurnPhase::TurnComplete
            }
            TurnPhase::TurnComplete => break,
        };
    }

    let drawn = drawn.ok_or(GolfError::EmptyPile { pile: source })?;
    let (final_lap_started, game_over) = finish_turn(state, seat);
    Ok(TurnReport { seat, source, drawn, swap, recycled, final_lap_started, game_over })
}

/// 回合结束后的检查：最后一圈是否开始、游戏是否结束，然后交换行动权
fn finish_turn(state: &mut GameState, seat: Seat) -> (bool, bool) {
    state.turns_played += 1;

    if state.final_lap == Some(seat.other()) {
        end_game(state);
        return (false, true);
    }

    let mut final_lap_started = false;
    if state.final_lap.is_none() && state.hand(seat).is_fully_revealed() {
        state.final_lap = Some(seat);
        final_lap_started = true;
        info!(%seat, "所有牌已翻开，对手还有最后一个回合");
    }
    state.turn = seat.other();
    (final_lap_started, false)
}

/// 结束游戏：翻开两边所有剩下的牌
fn end_game(state: &mut GameState) {
    for seat in [Seat::Human, Seat::Bot] {
        for card in state.hand_mut(seat).reveal_all() {
            state.memory.record(card);
        }
    }
    state.finished = true;
    let (human, bot) = final_scores(state);
    info!(human, bot, turns = state.turns_played, "游戏结束");
}

// --- 单元测试 ---
