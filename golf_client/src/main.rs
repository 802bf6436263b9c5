mod render;

use clap::Parser;
use golf_core::{
    begin_game_with, final_scores, is_game_over, outcome, peek_draw, reveal_initial, reveal_initial_bot,
    take_turn_bot, take_turn_human, BotPolicy, Card, Cell, GameConfig, GameState, GolfError, PileKind, Seat,
    DEFAULT_HAND_WIDTH,
};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

type Input = Lines<BufReader<Stdin>>;

/// 高尔夫纸牌：在终端里和电脑对战
#[derive(Parser, Debug)]
#[command(name = "golf", version)]
struct Args {
    /// 随机种子，不指定时随机生成
    #[arg(long)]
    seed: Option<u64>,

    /// 每行的牌数，手牌共 2×width 张
    #[arg(long, default_value_t = DEFAULT_HAND_WIDTH)]
    width: usize,

    /// 电脑"思考"的停顿时间（毫秒）
    #[arg(long, default_value_t = 800)]
    think_ms: u64,

    /// 电脑策略参数的 JSON 文件
    #[arg(long)]
    policy: Option<PathBuf>,

    /// 日志过滤规则，RUST_LOG 优先
    #[arg(long, default_value = "warn")]
    log: String,

    /// 不清屏，方便查看历史输出
    #[arg(long)]
    no_clear: bool,

    /// 游戏结束后以 JSON 打印最终桌面
    #[arg(long)]
    dump: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let config = GameConfig {
        seed: args.seed.unwrap_or_else(rand::random),
        hand_width: args.width,
        policy: load_policy(args.policy.as_ref())?,
    };
    info!(seed = config.seed, "使用的随机种子");

    let mut state = begin_game_with(config)?;
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let think = Duration::from_millis(args.think_ms);
    let clear = !args.no_clear;

    render::clear(clear)?;
    println!("--- 高尔夫纸牌 ---");
    println!("目标：让手牌总分尽量低。同一列两张相同点数的牌抵消为 0。");
    println!("位置用 `行 列` 表示，从 0 开始。");
    println!();
    render::render_table(&state.view(Seat::Human));

    // 开局两边各翻两张
    loop {
        render::prompt("选择两张要翻开的牌 (例如 0 0 1 2)")?;
        let Some(line) = stdin.next_line().await? else { return Ok(()) };
        let Some(positions) = parse_two_cells(&line) else {
            println!("格式应为四个数字：行 列 行 列");
            continue;
        };
        match reveal_initial(&mut state, Seat::Human, positions) {
            Ok(()) => break,
            Err(e) => println!("{}", e),
        }
    }
    let bot_cells = reveal_initial_bot(&mut state)?;
    info!(?bot_cells, "电脑翻开了初始的两张牌");

    let mut last_message = String::new();
    while !is_game_over(&state) {
        render::clear(clear)?;
        if !last_message.is_empty() {
            println!("{}", last_message);
            println!();
        }
        render::render_table(&state.view(Seat::Human));

        match state.turn() {
            Seat::Human => {
                println!("轮到{}了。", render::seat_label(Seat::Human));
                match human_turn(&mut stdin, &mut state).await? {
                    Some(message) => last_message = message,
                    None => return Ok(()),
                }
            }
            Seat::Bot => {
                println!("{}正在思考...", render::seat_label(Seat::Bot));
                tokio::time::sleep(think).await;
                let decision = take_turn_bot(&mut state)?;
                if decision.fell_back {
                    warn!(plan = ?decision.plan, "电脑的计划没有执行，改为弃牌");
                }
                last_message = render::narrate_bot(&decision);
                println!("{}", last_message);
                tokio::time::sleep(think).await;
            }
        }
    }

    render::clear(clear)?;
    if !last_message.is_empty() {
        println!("{}", last_message);
        println!();
    }
    let view = state.view(Seat::Human);
    render::render_result(&view, final_scores(&state), outcome(&state));
    if args.dump {
        println!("{}", serde_json::to_string_pretty(&view)?);
    }

    Ok(())
}

fn load_policy(path: Option<&PathBuf>) -> Result<BotPolicy, Box<dyn std::error::Error>> {
    match path {
        None => Ok(BotPolicy::default()),
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&text)?)
        }
    }
}

/// 玩家的一个回合。输入结束时返回 `None`。
async fn human_turn(stdin: &mut Input, state: &mut GameState) -> Result<Option<String>, Box<dyn std::error::Error>> {
    let (pile, card) = loop {
        let discard_text = state.discard_pile().top().map_or("空".to_string(), |card| card.to_string());
        render::prompt(&format!("从哪里抽牌？[d] 抽牌堆  [p] 弃牌堆 ({})", discard_text))?;
        let Some(line) = stdin.next_line().await? else { return Ok(None) };
        let Some(pile) = parse_pile(&line) else {
            println!("请输入 d 或 p");
            continue;
        };
        let card: Option<Card> = match pile {
            PileKind::Discard => state.discard_pile().top(),
            PileKind::Draw => match peek_draw(state, Seat::Human) {
                Ok((card, recycled)) => {
                    if recycled > 0 {
                        println!("抽牌堆用完了，{} 张弃牌被洗回抽牌堆。", recycled);
                    }
                    Some(card)
                }
                Err(e) => {
                    println!("{}", e);
                    None
                }
            },
        };
        match card {
            Some(card) => break (pile, card),
            None => println!("{}是空的，换一个吧", pile),
        }
    };
    println!("你拿到了 {}", card);

    let keep = loop {
        render::prompt("要保留这张牌吗？[y/n]")?;
        let Some(line) = stdin.next_line().await? else { return Ok(None) };
        match parse_yes_no(&line) {
            Some(keep) => break keep,
            None => println!("请输入 y 或 n"),
        }
    };

    loop {
        let target = if keep {
            render::prompt("放在哪个位置？(行 列)")?;
            let Some(line) = stdin.next_line().await? else { return Ok(None) };
            match parse_cell(&line) {
                Some(cell) => Some(cell),
                None => {
                    println!("格式应为两个数字：行 列");
                    continue;
                }
            }
        } else {
            None
        };

        match take_turn_human(state, pile, keep, target) {
            Ok(report) => return Ok(Some(render::narrate_human(&report))),
            Err(e @ (GolfError::InvalidCell { .. } | GolfError::MissingTarget)) => println!("{}", e),
            Err(e) => return Err(e.into()),
        }
    }
}

// --- 输入解析 ---

fn parse_numbers(line: &str) -> Option<Vec<usize>> {
    line.split_whitespace().map(|part| part.parse().ok()).collect()
}

fn parse_cell(line: &str) -> Option<Cell> {
    match parse_numbers(line)?[..] {
        [row, col] => Some(Cell::new(row, col)),
        _ => None,
    }
}

fn parse_two_cells(line: &str) -> Option<[Cell; 2]> {
    match parse_numbers(line)?[..] {
        [r1, c1, r2, c2] => Some([Cell::new(r1, c1), Cell::new(r2, c2)]),
        _ => None,
    }
}

fn parse_pile(line: &str) -> Option<PileKind> {
    match line.trim().to_lowercase().as_str() {
        "d" | "draw" | "0" => Some(PileKind::Draw),
        "p" | "discard" | "1" => Some(PileKind::Discard),
        _ => None,
    }
}

fn parse_yes_no(line: &str) -> Option<bool> {
    match line.trim().to_lowercase().as_str() {
        "y" | "yes" | "是" => Some(true),
        "n" | "no" | "否" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell("1 2"), Some(Cell::new(1, 2)));
        assert_eq!(parse_cell("  0   0 "), Some(Cell::new(0, 0)));
        assert_eq!(parse_cell("1"), None);
        assert_eq!(parse_cell("a b"), None);
        assert_eq!(parse_cell("-1 0"), None);
    }

    #[test]
    fn test_parse_two_cells() {
        assert_eq!(parse_two_cells("0 0 1 2"), Some([Cell::new(0, 0), Cell::new(1, 2)]));
        assert_eq!(parse_two_cells("0 0 1"), None);
    }

    #[test]
    fn test_parse_choices() {
        assert_eq!(parse_pile("D"), Some(PileKind::Draw));
        assert_eq!(parse_pile("p"), Some(PileKind::Discard));
        assert_eq!(parse_pile("x"), None);
        assert_eq!(parse_yes_no("Y"), Some(true));
        assert_eq!(parse_yes_no("n"), Some(false));
        assert_eq!(parse_yes_no("maybe"), None);
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from(["golf", "--seed", "7", "--width", "4", "--no-clear"]).unwrap();
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.width, 4);
        assert!(args.no_clear);
        assert_eq!(args.think_ms, 800);
    }

    #[test]
    fn test_policy_json_uses_defaults_for_missing_fields() {
        let policy: BotPolicy = serde_json::from_str(r#"{"face_up_threshold": 5.0}"#).unwrap();
        assert_eq!(policy.face_up_threshold, 5.0);
        assert_eq!(policy.early_game_face_up, BotPolicy::default().early_game_face_up);
    }
}
