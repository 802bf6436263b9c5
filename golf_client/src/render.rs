use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::style::{StyledContent, Stylize};
use crossterm::terminal::{Clear, ClearType};
use golf_core::{Card, DecisionOutcome, HandView, Outcome, PileKind, Seat, Suit, TableView, TurnReport};
use std::io::{self, Write};

/// 清屏，`--no-clear` 时什么也不做
pub fn clear(enabled: bool) -> io::Result<()> {
    if enabled {
        execute!(io::stdout(), Clear(ClearType::All), MoveTo(0, 0))?;
    }
    Ok(())
}

fn styled_card(card: Option<Card>) -> StyledContent<String> {
    match card {
        None => format!("{:^4}", "##").dark_grey(),
        Some(card) => {
            let text = format!("{:^4}", card.short());
            match card.suit() {
                Suit::Hearts | Suit::Diamonds => text.red().bold(),
                Suit::Joker => text.magenta().bold(),
                Suit::Spades | Suit::Clubs => text.bold(),
            }
        }
    }
}

fn render_hand(title: &str, hand: &HandView) {
    println!("{}  (明牌得分 {}, 已翻开 {})", title.bold(), hand.visible_score, hand.face_up);
    let width = hand.rows.first().map_or(0, Vec::len);
    let header: String = (0..width).map(|col| format!("{:^6}", col)).collect();
    println!("     {}", header.dark_grey());
    for (row, cards) in hand.rows.iter().enumerate() {
        print!("  {}  ", row.to_string().dark_grey());
        for &card in cards {
            print!("[{}]", styled_card(card));
        }
        println!();
    }
}

/// 以玩家视角画出整张桌面
pub fn render_table(view: &TableView) {
    render_hand("电脑", &view.opponent);
    println!();
    println!(
        "  抽牌堆: [{}] 剩 {} 张    弃牌堆: [{}] 共 {} 张",
        styled_card(None),
        view.draw_size,
        match view.discard_top {
            Some(card) => styled_card(Some(card)),
            None => format!("{:^4}", "空").dark_grey(),
        },
        view.discard_size,
    );
    if let Some(seat) = view.final_lap {
        println!("  {}", format!("{}已全部翻开，这是最后一圈！", seat).yellow().bold());
    }
    println!();
    render_hand("你", &view.own);
    println!();
}

/// 描述电脑这一回合做了什么
pub fn narrate_bot(outcome: &DecisionOutcome) -> String {
    let TurnReport { source, drawn, swap, .. } = &outcome.report;
    let source_text = match source {
        PileKind::Draw => "从抽牌堆抽到了",
        PileKind::Discard => "从弃牌堆拿走了",
    };
    match swap {
        Some(swap) => format!(
            "电脑{} {}，放在 ({}, {})，换下了 {}",
            source_text, drawn, swap.cell.row, swap.cell.col, swap.displaced
        ),
        None => format!("电脑{} {}，直接弃掉", source_text, drawn),
    }
}

pub fn narrate_human(report: &TurnReport) -> String {
    match &report.swap {
        Some(swap) => format!(
            "你把 {} 放在 ({}, {})，换下了 {}",
            report.drawn, swap.cell.row, swap.cell.col, swap.displaced
        ),
        None => format!("你弃掉了 {}", report.drawn),
    }
}

pub fn render_result(view: &TableView, scores: (i32, i32), outcome: Option<Outcome>) {
    println!("{}", "===== 游戏结束 =====".bold());
    render_table(view);
    println!("你的得分: {}    电脑得分: {}", scores.0, scores.1);
    let verdict = match outcome {
        Some(Outcome::HumanWins) => "你赢了！".green().bold(),
        Some(Outcome::BotWins) => "电脑赢了。".red().bold(),
        Some(Outcome::Draw) => "平局。".yellow().bold(),
        None => "游戏未完成。".dark_grey(),
    };
    println!("{}", verdict);
}

pub fn prompt(text: &str) -> io::Result<()> {
    print!("{} > ", text);
    io::stdout().flush()
}

pub fn seat_label(seat: Seat) -> &'static str {
    match seat {
        Seat::Human => "你",
        Seat::Bot => "电脑",
    }
}
