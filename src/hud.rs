//! UI collaborator interface
//!
//! The simulation never talks to the HUD directly. Front ends drain the
//! game events each frame and feed them through [`dispatch`].

use crate::sim::GameEvent;

/// Fire-and-forget HUD calls
pub trait Hud {
    fn set_health(&mut self, health: u32);
    fn set_score(&mut self, score: u64);
    fn show_game_over(&mut self, score: u64);
    fn show_paused(&mut self);
    /// Clear the paused / game over overlay
    fn hide_overlay(&mut self) {}
}

/// Forward the HUD-relevant events, in order
pub fn dispatch<H: Hud + ?Sized>(events: &[GameEvent], hud: &mut H) {
    for event in events {
        match event {
            GameEvent::HealthChanged { health } => hud.set_health(*health),
            GameEvent::ScoreChanged { score } => hud.set_score(*score),
            GameEvent::GameOver { score } => hud.show_game_over(*score),
            GameEvent::Paused => hud.show_paused(),
            GameEvent::Resumed | GameEvent::Restarted => hud.hide_overlay(),
            _ => {}
        }
    }
}
