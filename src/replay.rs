// Replay module for analyzing historical game states and debugging decision-making
//
// This module provides functionality to:
// 1. Parse JSONL debug logs
// 2. Replay the planner on historical states
// 3. Compare logged vs replayed moves and the rung that chose them
// 4. Generate detailed analysis reports

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::bot::choose_move;
use crate::config::Config;
use crate::planner::{Planner, Rung};
use crate::snapshot::Snapshot;
use crate::types::{Board, Direction};

/// Represents a single log entry from the debug JSONL file
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogEntry {
    pub turn: i32,
    pub chosen_move: String,
    #[serde(default)]
    pub rung: Option<String>,
    /// Snake that made the move; older logs leave this out and the first
    /// snake on the board is assumed
    #[serde(default)]
    pub you_id: Option<String>,
    pub board: Board,
    #[serde(default)]
    pub timestamp: String,
}

/// Result of replaying a single turn
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub turn: i32,
    pub original_move: Direction,
    pub replayed_move: Direction,
    pub matches: bool,
    pub original_rung: Option<String>,
    pub replayed_rung: Option<Rung>,
    pub computation_time_ms: u128,
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_turns: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
}

/// Replay engine for analyzing debug logs
pub struct ReplayEngine {
    config: Config,
    planner: Planner,
    verbose: bool,
}

impl ReplayEngine {
    /// Creates a new replay engine with the given configuration
    pub fn new(config: Config, verbose: bool) -> Self {
        let planner = Planner::from_config(&config.search);
        ReplayEngine {
            config,
            planner,
            verbose,
        }
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<LogEntry>, String> {
        let file = File::open(log_path.as_ref())
            .map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: LogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Planner used for replays
    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    /// Builds the planner's view of a board for the given snake
    pub fn snapshot_for(&self, board: &Board, our_snake_id: &str) -> Result<Snapshot, String> {
        let our_snake = board
            .snakes
            .iter()
            .find(|s| s.id == our_snake_id)
            .ok_or_else(|| format!("Snake with id '{}' not found in board state", our_snake_id))?;

        Snapshot::from_wire(board, our_snake, self.config.board.hazards_as_walls)
            .map_err(|e| format!("Invalid board: {}", e))
    }

    /// Id of the snake that made the logged move
    pub fn our_snake_id(entry: &LogEntry) -> Result<String, String> {
        match &entry.you_id {
            Some(id) => Ok(id.clone()),
            None => entry
                .board
                .snakes
                .first()
                .map(|s| s.id.clone())
                .ok_or_else(|| "No snakes found in board state".to_string()),
        }
    }

    /// Replays the planner on a single board state
    /// Returns the move that would be chosen, the rung and the time taken
    pub fn replay_turn(
        &self,
        turn: i32,
        board: &Board,
        our_snake_id: &str,
    ) -> Result<(Direction, Option<Rung>, u128), String> {
        let start_time = Instant::now();
        let snapshot = self.snapshot_for(board, our_snake_id)?;

        let (direction, rung) = choose_move(&self.planner, &snapshot, turn);
        Ok((direction, rung, start_time.elapsed().as_millis()))
    }

    /// Replays a single log entry and compares the result
    pub fn replay_entry(&self, entry: &LogEntry) -> Result<ReplayResult, String> {
        if self.verbose {
            info!("Replaying turn {}...", entry.turn);
        }

        let our_snake_id = Self::our_snake_id(entry)?;

        let original_move = Direction::parse(&entry.chosen_move)?;

        let (replayed_move, replayed_rung, computation_time) =
            self.replay_turn(entry.turn, &entry.board, &our_snake_id)?;

        let matches = original_move == replayed_move;

        let result = ReplayResult {
            turn: entry.turn,
            original_move,
            replayed_move,
            matches,
            original_rung: entry.rung.clone(),
            replayed_rung,
            computation_time_ms: computation_time,
        };

        if self.verbose {
            let rung = replayed_rung.map_or("fallback", |r| r.as_str());
            if matches {
                info!(
                    "Turn {}: ✓ MATCH - {} (rung: {}, time: {}ms)",
                    entry.turn,
                    replayed_move.as_str(),
                    rung,
                    computation_time
                );
            } else {
                warn!(
                    "Turn {}: ✗ MISMATCH - Original: {}, Replayed: {} (rung: {}, time: {}ms)",
                    entry.turn,
                    original_move.as_str(),
                    replayed_move.as_str(),
                    rung,
                    computation_time
                );
            }
        }

        Ok(result)
    }

    /// Replays all entries in a log file
    pub fn replay_all(&self, entries: &[LogEntry]) -> Vec<ReplayResult> {
        let mut results = Vec::new();

        for entry in entries {
            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Failed to replay turn {}: {}", entry.turn, e);
                }
            }
        }

        results
    }

    /// Replays specific turns from a log file
    pub fn replay_turns(
        &self,
        entries: &[LogEntry],
        turn_numbers: &[i32],
    ) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::new();

        for turn_num in turn_numbers {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn_num)
                .ok_or_else(|| format!("Turn {} not found in log file", turn_num))?;

            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Failed to replay turn {}: {}", turn_num, e);
                }
            }
        }

        Ok(results)
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_turns = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let mismatches = total_turns - matches;
        let match_rate = if total_turns > 0 {
            (matches as f64 / total_turns as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_turns,
            matches,
            mismatches,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Turns:    {}", stats.total_turns);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("═══════════════════════════════════════════════════════════\n");

        if !results.is_empty() {
            let avg_time: f64 = results.iter().map(|r| r.computation_time_ms as f64).sum::<f64>()
                / results.len() as f64;
            println!("Average Computation Time:   {:.1}ms\n", avg_time);

            println!("Rung usage:");
            for rung in [
                Some(Rung::Disjoint),
                Some(Rung::CutToFood),
                Some(Rung::SpaceFillToFood),
                Some(Rung::SpaceFillToTip),
                Some(Rung::Uncertified),
                None,
            ] {
                let count = results.iter().filter(|r| r.replayed_rung == rung).count();
                if count > 0 {
                    println!(
                        "  {:<20} {}",
                        rung.map_or("fallback", |r| r.as_str()),
                        count
                    );
                }
            }
            println!();
        }

        // Show mismatches in detail
        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches).collect();
        if !mismatches.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in mismatches {
                println!(
                    "Turn {}: {} ({}) → {} ({}) time: {}ms",
                    result.turn,
                    result.original_move.as_str(),
                    result.original_rung.as_deref().unwrap_or("?"),
                    result.replayed_move.as_str(),
                    result.replayed_rung.map_or("fallback", |r| r.as_str()),
                    result.computation_time_ms
                );
            }
            println!();
        }
    }

    /// Validates that specific expected moves were made
    pub fn validate_expected_moves(
        &self,
        entries: &[LogEntry],
        expected_moves: &[(i32, Vec<Direction>)], // (turn, acceptable_moves)
    ) -> Result<(), String> {
        for (turn, acceptable) in expected_moves {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn)
                .ok_or_else(|| format!("Turn {} not found in log", turn))?;

            let actual_move = Direction::parse(&entry.chosen_move)?;

            if !acceptable.contains(&actual_move) {
                return Err(format!(
                    "Turn {}: Expected one of {:?}, but got {}",
                    turn,
                    acceptable.iter().map(|d| d.as_str()).collect::<Vec<_>>(),
                    actual_move.as_str()
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_stats_empty() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let stats = engine.generate_stats(&[]);
        assert_eq!(stats.total_turns, 0);
        assert_eq!(stats.match_rate, 0.0);
    }

    #[test]
    fn test_log_entry_without_optional_fields() {
        let raw = r#"{"turn": 4, "chosen_move": "left", "board": {"height": 3, "width": 3, "food": [], "snakes": []}}"#;
        let entry: LogEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.turn, 4);
        assert_eq!(entry.you_id, None);
        assert_eq!(entry.rung, None);
    }
}
