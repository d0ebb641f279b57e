// Welcome to
// __________         __    __  .__                               __
// \______   \_____ _/  |__/  |_|  |   ____   ______ ____ _____  |  | __ ____
//  |    |  _/\__  \\   __\   __\  | _/ __ \ /  ___//    \\__  \ |  |/ // __ \
//  |    |   \ / __ \|  |  |  | |  |_\  ___/ \___ \|   |  \/ __ \|    <\  ___/
//  |________/(______/__|  |__| |____/\_____>______>___|__(______/__|__\\_____>
//
// The bot turns each request into a snapshot, hands it to the planner on a
// blocking worker and answers with whatever move came back within budget.

use log::{error, info, warn};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::debug_logger::DebugLogger;
use crate::planner::moves::fallback_direction;
use crate::planner::{Planner, Rung};
use crate::snapshot::Snapshot;
use crate::types::{Battlesnake, Board, Direction, Game};

/// Battlesnake Bot with OOP-style API
/// Takes static configuration dependencies and exposes methods corresponding to API endpoints
pub struct Bot {
    config: Config,
    planner: Arc<Planner>,
    debug_logger: DebugLogger,
}

impl Bot {
    /// Creates a new Bot instance with the given configuration
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    pub fn new(config: Config) -> Self {
        let planner = Arc::new(Planner::from_config(&config.search));
        let debug_logger = DebugLogger::open(config.debug.enabled, &config.debug.log_file_path);
        Bot {
            config,
            planner,
            debug_logger,
        }
    }

    /// Returns bot metadata and appearance
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        let appearance = &self.config.appearance;
        json!({
            "apiversion": "1",
            "author": appearance.author,
            "color": appearance.color,
            "head": appearance.head,
            "tail": appearance.tail,
        })
    }

    /// Called when a game starts
    /// Corresponds to POST /start endpoint
    pub fn start(&self, game: &Game, _turn: &i32, board: &Board, _you: &Battlesnake) {
        info!(
            "GAME START {} ({}x{})",
            game.id, board.width, board.height
        );
    }

    /// Called when a game ends
    /// Corresponds to POST /end endpoint
    pub fn end(&self, game: &Game, turn: &i32, _board: &Board, _you: &Battlesnake) {
        info!("GAME OVER {} after {} turns", game.id, turn);
    }

    /// Computes and returns the next move
    /// Corresponds to POST /move endpoint
    ///
    /// Planning runs on tokio's blocking pool and is bounded by the effective
    /// time budget. A rejected board, a planning error or a timeout all fall
    /// back to a safe default move.
    ///
    /// # Returns
    /// * `Value` - JSON response containing the chosen move direction
    pub async fn get_move(&self, _game: &Game, turn: &i32, board: &Board, you: &Battlesnake) -> Value {
        let start_time = Instant::now();

        info!("Turn {}: Computing move", turn);

        let (chosen_move, rung) =
            match Snapshot::from_wire(board, you, self.config.board.hazards_as_walls) {
                Ok(snapshot) => self.plan_within_budget(*turn, snapshot).await,
                Err(e) => {
                    error!("Turn {}: rejecting board: {}", turn, e);
                    (Direction::Up, None)
                }
            };

        info!(
            "Turn {}: Chose {} (rung: {}, time: {}ms)",
            turn,
            chosen_move.as_str(),
            rung.map_or("fallback", |r| r.as_str()),
            start_time.elapsed().as_millis()
        );

        self.debug_logger.log_move(
            *turn,
            board.clone(),
            &you.id,
            chosen_move,
            rung.map(|r| r.as_str()),
        );

        json!({ "move": chosen_move.as_str() })
    }

    async fn plan_within_budget(&self, turn: i32, snapshot: Snapshot) -> (Direction, Option<Rung>) {
        let fallback = fallback_direction(&snapshot);
        let planner = self.planner.clone();
        let budget = Duration::from_millis(self.config.timing.effective_budget_ms());

        let task = tokio::task::spawn_blocking(move || choose_move(&planner, &snapshot, turn));

        match tokio::time::timeout(budget, task).await {
            Ok(Ok(chosen)) => chosen,
            Ok(Err(e)) => {
                error!("Turn {}: planner task failed: {}", turn, e);
                (fallback, None)
            }
            Err(_) => {
                warn!(
                    "Turn {}: planner exceeded {}ms, moving {}",
                    turn,
                    budget.as_millis(),
                    fallback.as_str()
                );
                (fallback, None)
            }
        }
    }
}

/// Plans one turn synchronously. Planning errors fall back to the first open
/// neighbour of the head and report no rung.
pub fn choose_move(planner: &Planner, snapshot: &Snapshot, turn: i32) -> (Direction, Option<Rung>) {
    match planner.next_move(snapshot) {
        Ok(decision) => (decision.direction, Some(decision.rung)),
        Err(e) => {
            let fallback = fallback_direction(snapshot);
            warn!("Turn {}: {}, moving {}", turn, e, fallback.as_str());
            (fallback, None)
        }
    }
}
