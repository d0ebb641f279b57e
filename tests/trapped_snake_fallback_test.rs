// Integration tests for the bot's move endpoint
//
// Covers the paths where the planner cannot help:
// - trapped snakes pick an in-bounds move instead of defaulting to "up"
// - boards without food fall back to the first open neighbour
// - boards that fail validation still get an answer
// and checks that the debug log records what was chosen.

use snake_planner::bot::Bot;
use snake_planner::config::Config;
use snake_planner::types::{Battlesnake, Board, Coord, Game};
use std::collections::HashMap;
use std::time::Duration;

fn game() -> Game {
    Game {
        id: "test-game".to_string(),
        ruleset: HashMap::new(),
        timeout: 500,
        source: "test".to_string(),
    }
}

fn snake(id: &str, body: &[(i32, i32)]) -> Battlesnake {
    let body: Vec<Coord> = body.iter().map(|&(x, y)| Coord { x, y }).collect();
    Battlesnake {
        id: id.to_string(),
        name: id.to_string(),
        health: 50,
        head: body[0],
        length: body.len() as i32,
        body,
        latency: "0".to_string(),
        shout: None,
    }
}

async fn move_for(bot: &Bot, board: &Board) -> String {
    let you = board.snakes[0].clone();
    let response = bot.get_move(&game(), &0, board, &you).await;
    response["move"].as_str().unwrap().to_string()
}

/// Snake at top wall (y=10), surrounded by bodies.
/// Only "down" stays in-bounds.
#[tokio::test]
async fn test_trapped_at_top_wall_chooses_in_bounds_move() {
    let bot = Bot::new(Config::default_hardcoded());

    let board = Board {
        height: 11,
        width: 11,
        food: vec![],
        snakes: vec![
            snake("our-snake", &[(5, 10), (5, 9), (4, 9), (4, 10)]),
            snake("opponent", &[(6, 10), (6, 9), (6, 8)]),
        ],
        hazards: vec![],
    };

    assert_eq!(move_for(&bot, &board).await, "down");
}

/// Snake on the bottom wall with only the right side open
#[tokio::test]
async fn test_bottom_wall_takes_open_side() {
    let bot = Bot::new(Config::default_hardcoded());

    let board = Board {
        height: 11,
        width: 11,
        food: vec![],
        snakes: vec![snake(
            "our-snake",
            &[(5, 0), (5, 1), (4, 1), (4, 0), (3, 0), (2, 0)],
        )],
        hazards: vec![],
    };

    assert_eq!(move_for(&bot, &board).await, "right");
}

/// Food in open space is reached by the planner, not the fallback
#[tokio::test]
async fn test_open_board_heads_for_food() {
    let bot = Bot::new(Config::default_hardcoded());

    let board = Board {
        height: 5,
        width: 5,
        food: vec![Coord { x: 2, y: 4 }],
        snakes: vec![snake("me", &[(2, 2), (2, 1), (2, 0)])],
        hazards: vec![],
    };

    assert_eq!(move_for(&bot, &board).await, "up");
}

/// A body running off the board is rejected and answered with "up"
#[tokio::test]
async fn test_invalid_board_still_answers() {
    let bot = Bot::new(Config::default_hardcoded());

    let board = Board {
        height: 5,
        width: 5,
        food: vec![Coord { x: 0, y: 0 }],
        snakes: vec![snake("me", &[(2, 2), (2, 5)])],
        hazards: vec![],
    };

    assert_eq!(move_for(&bot, &board).await, "up");
}

/// Dimensions too large for a grid are rejected instead of panicking
#[tokio::test]
async fn test_oversized_board_still_answers() {
    let bot = Bot::new(Config::default_hardcoded());

    let board = Board {
        height: 65536,
        width: 65536,
        food: vec![Coord { x: 3, y: 3 }],
        snakes: vec![snake("me", &[(2, 2), (2, 1)])],
        hazards: vec![],
    };

    assert_eq!(move_for(&bot, &board).await, "up");
}

#[tokio::test]
async fn test_hazards_block_only_when_configured() {
    let board = Board {
        height: 3,
        width: 3,
        food: vec![],
        snakes: vec![snake("me", &[(1, 2), (1, 1)])],
        hazards: vec![Coord { x: 0, y: 2 }],
    };

    // planner head sits in the top row with its neck below it
    let bot = Bot::new(Config::default_hardcoded());
    assert_eq!(move_for(&bot, &board).await, "left");

    let mut config = Config::default_hardcoded();
    config.board.hazards_as_walls = true;
    let bot = Bot::new(config);
    assert_eq!(move_for(&bot, &board).await, "right");
}

#[tokio::test]
async fn test_debug_log_records_move_and_rung() {
    let path = std::env::temp_dir().join(format!(
        "snake_planner_debug_{}.jsonl",
        std::process::id()
    ));
    let mut config = Config::default_hardcoded();
    config.debug.enabled = true;
    config.debug.log_file_path = path.to_string_lossy().into_owned();
    let bot = Bot::new(config);

    let board = Board {
        height: 5,
        width: 5,
        food: vec![Coord { x: 2, y: 4 }],
        snakes: vec![snake("me", &[(2, 2), (2, 1), (2, 0)])],
        hazards: vec![],
    };
    assert_eq!(move_for(&bot, &board).await, "up");

    // the write happens on a spawned task
    let mut contents = String::new();
    for _ in 0..50 {
        contents = std::fs::read_to_string(&path).unwrap_or_default();
        if contents.ends_with('\n') {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    let _ = std::fs::remove_file(&path);

    let line: serde_json::Value = serde_json::from_str(contents.trim()).unwrap();
    assert_eq!(line["turn"], 0);
    assert_eq!(line["chosen_move"], "up");
    assert_eq!(line["rung"], "disjoint");
    assert_eq!(line["you_id"], "me");
    assert_eq!(line["board"]["width"], 5);
}
