//! Rock Runner headless runner
//!
//! Plays a seeded session with a simple autopilot and prints a JSON summary:
//!
//! ```text
//! rock-runner [seconds] [seed] [config.json]
//! ```

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use glam::Vec3;
    use serde::Serialize;

    use rock_runner::config::{ConfigError, GameConfig};
    use rock_runner::hud::{self, Hud};
    use rock_runner::sim::{GameEvent, GamePhase, GameState, TickInput, run_frame};
    use rock_runner::visual::{AssetError, LoadTicket, Renderer, VisualId, VisualKind, VisualParams};

    /// Rendered frame rate the runner pretends to have
    const FRAME_DT: f32 = 1.0 / 60.0;

    /// Renderer stand-in: every load completes on the next present
    #[derive(Default)]
    struct LogRenderer {
        next_id: u32,
        completed: Vec<(LoadTicket, VisualId)>,
        created: u32,
        disposed: u32,
        explosions: u32,
    }

    impl LogRenderer {
        fn issue_id(&mut self) -> VisualId {
            self.next_id += 1;
            VisualId(self.next_id)
        }
    }

    impl Renderer for LogRenderer {
        fn create_visual(&mut self, kind: VisualKind, params: &VisualParams, ticket: LoadTicket) {
            let id = self.issue_id();
            log::debug!("load {kind:?} from {} (ticket {})", params.model, ticket.serial);
            self.created += 1;
            self.completed.push((ticket, id));
        }

        fn set_transform(&mut self, _id: VisualId, _position: Vec3, _rotation: Vec3) {}

        fn set_visible(&mut self, id: VisualId, visible: bool) {
            log::trace!("visual {id:?} visible={visible}");
        }

        fn dispose(&mut self, id: VisualId) {
            log::debug!("dispose {id:?}");
            self.disposed += 1;
        }

        fn spawn_explosion(&mut self, position: Vec3, size: f32) -> Result<VisualId, AssetError> {
            log::debug!("explosion at {position} size {size:.2}");
            self.explosions += 1;
            Ok(self.issue_id())
        }

        fn load_shared(&mut self, kind: VisualKind) {
            log::info!("shared resources loaded for {kind:?}");
        }

        fn unload_shared(&mut self, kind: VisualKind) {
            log::info!("shared resources released for {kind:?}");
        }
    }

    struct LogHud;

    impl Hud for LogHud {
        fn set_health(&mut self, health: u32) {
            log::info!("health {health}");
        }
        fn set_score(&mut self, score: u64) {
            log::debug!("score {score}");
        }
        fn show_game_over(&mut self, score: u64) {
            log::info!("GAME OVER - final score {score}");
        }
        fn show_paused(&mut self) {
            log::info!("paused");
        }
    }

    #[derive(Debug, Default, Serialize)]
    struct Tally {
        spawned: u32,
        destroyed: u32,
        escaped: u32,
        bullets_fired: u32,
        hits_taken: u32,
    }

    impl Tally {
        fn record(&mut self, event: &GameEvent) {
            match event {
                GameEvent::AsteroidSpawned { .. } => self.spawned += 1,
                GameEvent::AsteroidDestroyed { .. } => self.destroyed += 1,
                GameEvent::AsteroidEscaped { .. } => self.escaped += 1,
                GameEvent::BulletFired { .. } => self.bullets_fired += 1,
                GameEvent::PlayerDamaged { .. } => self.hits_taken += 1,
                _ => {}
            }
        }
    }

    #[derive(Debug, Serialize)]
    struct Summary {
        seed: u64,
        seconds: f64,
        ticks: u64,
        phase: GamePhase,
        score: u64,
        health: u32,
        asteroids: Tally,
        visuals_created: u32,
        visuals_disposed: u32,
        explosions: u32,
    }

    /// Chase the nearest asteroid ahead vertically and keep firing
    fn autopilot(state: &GameState) -> TickInput {
        let player = state.player.position;
        let target = state
            .asteroids
            .iter()
            .map(|(_, a)| a)
            .filter(|a| !a.is_destroyed && a.position.x > player.x)
            .min_by(|a, b| a.position.x.total_cmp(&b.position.x));

        let move_y = target
            .map(|a| ((a.position.y - player.y) * 0.5).clamp(-1.0, 1.0))
            .unwrap_or(0.0);
        TickInput {
            move_y,
            fire: true,
            ..Default::default()
        }
    }

    struct Args {
        seconds: f32,
        seed: u64,
        config: Option<String>,
    }

    fn parse_args() -> Result<Args, ConfigError> {
        let mut args = std::env::args().skip(1);
        let seconds = match args.next() {
            Some(s) => s.parse().map_err(|e| ConfigError::InvalidValue {
                key: "seconds",
                reason: format!("{s:?}: {e}"),
            })?,
            None => 30.0,
        };
        let seed = match args.next() {
            Some(s) => s.parse().map_err(|e| ConfigError::InvalidValue {
                key: "seed",
                reason: format!("{s:?}: {e}"),
            })?,
            None => 1,
        };
        Ok(Args {
            seconds,
            seed,
            config: args.next(),
        })
    }

    fn play(args: &Args) -> Result<Summary, ConfigError> {
        let config = match &args.config {
            Some(path) => GameConfig::load_from_file(path)?,
            None => GameConfig::default(),
        };
        let mut state = GameState::new(config, args.seed)?;
        let mut renderer = LogRenderer::default();
        let mut hud = LogHud;
        let mut tally = Tally::default();

        let frames = (args.seconds / FRAME_DT).ceil() as u32;
        for _ in 0..frames {
            let input = autopilot(&state);
            run_frame(&mut state, &input, FRAME_DT);

            state.present(&mut renderer);
            for (ticket, id) in std::mem::take(&mut renderer.completed) {
                state.visual_loaded(ticket, Ok(id));
            }

            let events = state.drain_events();
            events.iter().for_each(|e| tally.record(e));
            hud::dispatch(&events, &mut hud);

            if state.phase == GamePhase::GameOver {
                break;
            }
        }

        Ok(Summary {
            seed: args.seed,
            seconds: state.clock.elapsed(),
            ticks: state.time_ticks,
            phase: state.phase,
            score: state.score(),
            health: state.player.health,
            asteroids: tally,
            visuals_created: renderer.created,
            visuals_disposed: renderer.disposed,
            explosions: renderer.explosions,
        })
    }

    pub fn run() -> Result<(), ConfigError> {
        let args = parse_args()?;
        log::info!("Rock Runner (headless) starting: {}s, seed {}", args.seconds, args.seed);
        let summary = play(&args)?;
        println!("{}", serde_json::to_string_pretty(&summary)?);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = headless::run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library only on wasm; the host drives the simulation
}
