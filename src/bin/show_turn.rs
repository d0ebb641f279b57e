// Prints one logged turn with the planner's path drawn over the board
//
// Usage:
//   cargo run --bin show_turn -- <log_file> <turn> [--config <path>]

use std::process;

use snake_planner::config::Config;
use snake_planner::planner::nearest_food;
use snake_planner::replay::ReplayEngine;
use snake_planner::types::Coord;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: show_turn <game_file.jsonl> <turn_number> [--config <path>]");
        process::exit(1);
    }

    let target_turn: i32 = match args[2].parse() {
        Ok(turn) => turn,
        Err(e) => {
            eprintln!("Turn must be a number: {}", e);
            process::exit(1);
        }
    };

    let config = match args.iter().position(|a| a == "--config") {
        Some(idx) if idx + 1 < args.len() => {
            Config::from_file(&args[idx + 1]).unwrap_or_else(|e| {
                eprintln!("Warning: {}, using defaults", e);
                Config::default_hardcoded()
            })
        }
        _ => Config::load_or_default(),
    };
    let engine = ReplayEngine::new(config, false);

    let entries = engine.load_log_file(&args[1]).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        process::exit(1);
    });
    let entry = match entries.iter().find(|e| e.turn == target_turn) {
        Some(entry) => entry,
        None => {
            eprintln!("Turn {} not found in {}", target_turn, args[1]);
            process::exit(1);
        }
    };

    let snapshot = ReplayEngine::our_snake_id(entry)
        .and_then(|id| engine.snapshot_for(&entry.board, &id))
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        });

    println!("═══════════════════════════════════════════════════════════");
    println!("              TURN {} FULL DETAILS", entry.turn);
    println!("═══════════════════════════════════════════════════════════\n");

    let agent = snapshot.agent();
    println!("Our snake: {} (length {})", agent.id, agent.body.len());
    println!("Head: {:?}  Tip: {:?}  Tip stack: {}", agent.head(), agent.tip(), agent.tip_stack());
    println!(
        "Logged move: {} (rung: {})",
        entry.chosen_move,
        entry.rung.as_deref().unwrap_or("?")
    );
    println!();

    println!("Food (grid rows, top = 0):");
    for food in snapshot.food() {
        println!("  {:?} - distance {}", food, agent.head().distance(food));
    }
    println!("Target: {:?}\n", nearest_food(&snapshot));

    let plan = engine.planner().plan_turn(&snapshot);
    let path: Vec<Coord> = match &plan {
        Ok(plan) => {
            println!("Replayed rung: {}", plan.rung);
            plan.path.clone().unwrap_or_default()
        }
        Err(e) => {
            println!("Planner error: {}", e);
            Vec::new()
        }
    };
    match engine.planner().next_move(&snapshot) {
        Ok(decision) => println!("Replayed move: {}\n", decision.direction.as_str()),
        Err(e) => println!("Replayed move: none ({})\n", e),
    }

    // board with the path marked as 'o'
    for (y, row) in snapshot.render().lines().enumerate() {
        let line: String = row
            .chars()
            .enumerate()
            .map(|(x, ch)| {
                let cell = Coord::new(x as i32, y as i32);
                if ch == '.' && path.contains(&cell) {
                    'o'
                } else {
                    ch
                }
            })
            .collect();
        println!("  {}", line);
    }
    println!();
    println!("Path: {:?}", path);
}
