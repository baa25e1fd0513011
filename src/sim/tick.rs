//! Simulation tick
//!
//! One step runs, in order: player update (and firing), bullet flight,
//! asteroid manager (spawn, motion, collisions, despawn), explosion effects,
//! background decor. Nothing advances while paused or after game over.

use glam::Vec3;

use super::state::{GameEvent, GamePhase, GameState, TickContext};

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Horizontal thrust, -1 (left) to 1 (right)
    pub move_x: f32,
    /// Vertical thrust, -1 (down) to 1 (up)
    pub move_y: f32,
    /// Fire held
    pub fire: bool,
    /// Pause toggle (edge)
    pub pause: bool,
    /// Restart request (edge)
    pub restart: bool,
}

/// Handle restart and pause edges. Restart wins over pause.
fn apply_controls(state: &mut GameState, input: &TickInput) {
    if input.restart {
        state.restart();
        return;
    }

    if input.pause {
        match state.phase {
            GamePhase::Running => {
                state.phase = GamePhase::Paused;
                state.clock.stop();
                state.events.push(GameEvent::Paused);
                log::info!("paused at tick {}", state.time_ticks);
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Running;
                state.clock.start();
                state.events.push(GameEvent::Resumed);
                log::info!("resumed");
            }
            GamePhase::GameOver => {}
        }
    }
}

/// Advance every system by `dt`
fn step(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;
    state.clock.record(dt);

    let config = &state.config;
    state.player.update(dt, input, &config.player, &config.field);

    if input.fire && state.player.can_fire() {
        let fired = state.bullets.fire(
            state.player.muzzle(),
            Vec3::X,
            &mut state.visuals,
            &mut state.events,
        );
        if fired.is_some() {
            state.player.consume_fire(config.player.fire_cooldown);
        }
    }
    state.bullets.update(dt, &mut state.visuals);

    let mut ctx = TickContext {
        rng: &mut state.rng,
        events: &mut state.events,
        visuals: &mut state.visuals,
        effects: &mut state.effects,
    };
    state
        .asteroids
        .update(dt, &mut state.player, &mut state.bullets, &state.rules, &mut ctx);

    state.effects.update(dt, &mut state.visuals);
    state.decor.update(dt, &mut state.rng);

    if state.player.is_destroyed {
        let score = state.asteroids.score();
        state.phase = GamePhase::GameOver;
        state.clock.stop();
        state.events.push(GameEvent::GameOver { score });
        log::info!("game over: score {score} after {} ticks", state.time_ticks);
    }
}

/// Advance the game by exactly one step of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    apply_controls(state, input);
    if state.phase == GamePhase::Running {
        step(state, input, dt);
    }
}

/// Advance the game by one rendered frame.
///
/// The clock decides how many steps `frame_dt` is worth; returns the number
/// actually run.
pub fn run_frame(state: &mut GameState, input: &TickInput, frame_dt: f32) -> u32 {
    apply_controls(state, input);

    let plan = state.clock.advance(frame_dt);
    let mut ran = 0;
    for _ in 0..plan.steps {
        if state.phase != GamePhase::Running {
            break;
        }
        step(state, input, plan.dt);
        ran += 1;
    }
    ran
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::movement::MovementPattern;

    fn coarse_config() -> GameConfig {
        let mut config = GameConfig::default();
        config.timing.step = 0.125;
        config.timing.max_frame_dt = 0.25;
        config.asteroids.spawns_per_second = 2.0;
        config
    }

    fn count(state: &GameState, pred: impl Fn(&GameEvent) -> bool) -> usize {
        state.events().iter().filter(|e| pred(e)).count()
    }

    fn drop_asteroid_on_player(state: &mut GameState) {
        let position = state.player.position;
        let mut ctx = TickContext {
            rng: &mut state.rng,
            events: &mut state.events,
            visuals: &mut state.visuals,
            effects: &mut state.effects,
        };
        state
            .asteroids
            .spawn_at(position, 2.0, 0.0, MovementPattern::Straight, &mut ctx)
            .expect("pool has room");
    }

    #[test]
    fn test_run_frame_spawns_on_cadence() {
        let mut state = GameState::new(coarse_config(), 42).expect("valid");
        let idle = TickInput::default();
        let mut steps = 0;
        for _ in 0..8 {
            steps += run_frame(&mut state, &idle, 0.125);
        }
        assert_eq!(steps, 8);
        assert_eq!(count(&state, |e| matches!(e, GameEvent::AsteroidSpawned { .. })), 2);
        assert!((state.clock.elapsed() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_pause_freezes_simulation() {
        let mut state = GameState::new(coarse_config(), 42).expect("valid");
        let idle = TickInput::default();
        run_frame(&mut state, &idle, 0.125);

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        assert_eq!(run_frame(&mut state, &pause, 0.125), 0);
        assert_eq!(state.phase, GamePhase::Paused);
        assert!(!state.clock.is_running());

        let ticks = state.time_ticks;
        let player = state.player.position;
        for _ in 0..10 {
            assert_eq!(run_frame(&mut state, &idle, 0.25), 0);
            tick(&mut state, &idle, 0.125);
        }
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.player.position, player);

        // Resuming does not replay the paused time
        assert_eq!(run_frame(&mut state, &pause, 0.125), 1);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(count(&state, |e| matches!(e, GameEvent::Paused)), 1);
        assert_eq!(count(&state, |e| matches!(e, GameEvent::Resumed)), 1);
    }

    #[test]
    fn test_player_death_ends_game() {
        let mut state = GameState::new(GameConfig::default(), 7).expect("valid");
        state.player.health = 10;
        drop_asteroid_on_player(&mut state);

        let idle = TickInput::default();
        tick(&mut state, &idle, 0.01);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.clock.is_running());
        assert_eq!(state.player.health, 0);
        assert_eq!(count(&state, |e| matches!(e, GameEvent::GameOver { .. })), 1);

        // Terminal: nothing advances, pause is ignored
        let ticks = state.time_ticks;
        tick(&mut state, &idle, 0.01);
        tick(
            &mut state,
            &TickInput {
                pause: true,
                ..Default::default()
            },
            0.01,
        );
        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut state = GameState::new(GameConfig::default(), 7).expect("valid");
        state.player.health = 10;
        drop_asteroid_on_player(&mut state);
        tick(&mut state, &TickInput::default(), 0.01);
        assert_eq!(state.phase, GamePhase::GameOver);

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart, 0.01);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.player.health, 100);
        assert!(!state.player.is_destroyed);
        assert_eq!(state.score(), 0);
        assert_eq!(state.time_ticks, 1);
        assert!(state.events().contains(&GameEvent::Restarted));
    }

    #[test]
    fn test_collision_hit_grants_invulnerability() {
        let mut state = GameState::new(GameConfig::default(), 3).expect("valid");
        drop_asteroid_on_player(&mut state);
        tick(&mut state, &TickInput::default(), 0.01);
        assert_eq!(state.player.health, 80);
        assert!(state.player.is_invulnerable());
        assert_eq!(state.asteroids.active_count(), 0);
        assert_eq!(state.effects.len(), 1);

        // Second rock during the window: destroyed, no damage
        drop_asteroid_on_player(&mut state);
        tick(&mut state, &TickInput::default(), 0.01);
        assert_eq!(state.player.health, 80);
        assert_eq!(state.asteroids.active_count(), 0);
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut state = GameState::new(GameConfig::default(), 1).expect("valid");
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        tick(&mut state, &fire, 0.0625);
        tick(&mut state, &fire, 0.0625);
        assert_eq!(count(&state, |e| matches!(e, GameEvent::BulletFired { .. })), 1);
        assert_eq!(state.bullets.active_count(), 1);

        for _ in 0..4 {
            tick(&mut state, &fire, 0.0625);
        }
        assert_eq!(count(&state, |e| matches!(e, GameEvent::BulletFired { .. })), 2);
    }

    #[test]
    fn test_same_seed_same_run() {
        let script = |i: u32| TickInput {
            move_x: if i % 200 < 100 { 1.0 } else { -1.0 },
            move_y: if i % 90 < 45 { 0.5 } else { -0.5 },
            fire: i % 3 == 0,
            ..Default::default()
        };
        let run = || {
            let mut state = GameState::new(GameConfig::default(), 2024).expect("valid");
            for i in 0..1200 {
                run_frame(&mut state, &script(i), 1.0 / 60.0);
            }
            (state.drain_events(), state.score(), state.time_ticks)
        };
        assert_eq!(run(), run());
    }
}
