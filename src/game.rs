use std::time::Duration;

use crate::appearance::Appearance;
use crate::clock::FrameClock;
use crate::config::Config;
use crate::engine::Engine;
use crate::error::GameResult;
use crate::flavor::CatalogFlavor;
use crate::log;
use crate::progression::Progression;
use crate::scheduler::Scheduler;
use crate::snake::Direction::{self, *};
use crate::term::TermManager;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlayOutcome {
    PlayAgain,
    Quit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Action {
    Turn(Direction),
    TogglePause,
    Quit,
}

pub struct SnakeGame {
    term: TermManager,
    config: Config,
    base_appearance: Appearance,
    progression: Progression<CatalogFlavor>,
    sessions: u64,
}

impl SnakeGame {
    pub fn new(config: Config) -> GameResult<Self> {
        let term = TermManager::new()?;
        term.check_fits()?;

        let base_appearance = Appearance::from_config(&config.appearance);
        let flavor =
            CatalogFlavor::new(config.seed.unwrap_or_else(rand::random), config.flavor.enabled);
        let progression = Progression::new(flavor, base_appearance);

        Ok(SnakeGame { term, config, base_appearance, progression, sessions: 0 })
    }

    pub fn initialize(&mut self) -> GameResult<()> {
        self.term.setup()
    }

    pub fn restore(&mut self) -> GameResult<()> {
        self.term.restore()
    }

    /// Intro, then sessions until the player quits.
    pub fn run(&mut self) -> GameResult<()> {
        if self.show_intro()? == PlayOutcome::Quit {
            log!("Quit from intro");
            return Ok(());
        }

        while self.play()? == PlayOutcome::PlayAgain {
            log!("Restarting with a fresh session");
        }

        log!("Quit after {} session(s)", self.sessions);
        Ok(())
    }

    pub fn show_intro(&mut self) -> GameResult<PlayOutcome> {
        let lines = &[
            "SERPENT'S JOURNEY",
            "",
            "Arrow keys or WASD to move",
            "Esc or P to pause",
            "CTRL+C to quit",
            "",
            "Press any key to begin",
        ];

        self.term.clear()?;
        self.term.show_message(lines, &self.base_appearance)?;

        if key_action(&self.term.read_key_blocking()?) == Some(Action::Quit) {
            return Ok(PlayOutcome::Quit);
        }
        Ok(PlayOutcome::PlayAgain)
    }

    /// Runs one session to game over (or quit).
    pub fn play(&mut self) -> GameResult<PlayOutcome> {
        self.term.clear()?;

        let seed = self.next_seed();
        let mut engine = Engine::new(self.config.initial_tick_interval_ms, seed);
        self.progression.reset(self.base_appearance);

        let mut clock = FrameClock::new(Duration::from_millis(self.config.frame_interval_ms));
        let mut scheduler = Scheduler::new();
        scheduler.start(&mut clock);

        while let Some(t) = clock.wait_for_frame() {
            for key_ev in self.term.read_key_events_queue()? {
                match key_action(&key_ev) {
                    Some(Action::Quit) => {
                        scheduler.stop(&mut clock);
                        log!("Quit mid-session at score {}", engine.run_state().score);
                        return Ok(PlayOutcome::Quit);
                    }
                    Some(Action::Turn(dir)) => {
                        if engine.request_direction(dir) {
                            log!("Heading {:?}", engine.heading());
                        }
                    }
                    Some(Action::TogglePause) => {
                        let paused = engine.toggle_pause();
                        log!("Paused: {}", paused);
                    }
                    None => {}
                }
            }

            let term = &mut self.term;
            scheduler.on_frame(
                t,
                &mut engine,
                &mut self.progression,
                &mut clock,
                |snap, progression| term.render(snap, progression),
            )?;
        }

        // Idempotent: the scheduler already stopped itself on game over.
        scheduler.stop(&mut clock);
        self.game_over(&engine)
    }

    ///////////////////////////////////////////////////////////////////////////

    fn game_over(&mut self, engine: &Engine) -> GameResult<PlayOutcome> {
        let score = engine.run_state().score;
        let reason = engine.death_reason().map(|r| r.flavor_line()).unwrap_or("");

        self.term.show_message(
            &[
                "GAME OVER",
                reason,
                &*format!("Score: {}", score),
                "",
                "Press any key to play again,",
                "or CTRL+C to quit.",
            ],
            &self.progression.appearance,
        )?;

        // Keys mashed during the crash should not skip the screen.
        self.term.read_key_events_queue()?;

        if key_action(&self.term.read_key_blocking()?) == Some(Action::Quit) {
            return Ok(PlayOutcome::Quit);
        }
        Ok(PlayOutcome::PlayAgain)
    }

    fn next_seed(&mut self) -> u64 {
        self.sessions += 1;
        match self.config.seed {
            Some(seed) => seed.wrapping_add(self.sessions - 1),
            None => rand::random(),
        }
    }
}

fn key_action(ev: &KeyEvent) -> Option<Action> {
    if is_ctrl_c(ev) {
        return Some(Action::Quit);
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(Action::Turn(Up)),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(Action::Turn(Left)),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(Action::Turn(Down)),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(Action::Turn(Right)),
        KeyCode::Esc | KeyCode::Char('p') | KeyCode::Char('P') => Some(Action::TogglePause),
        _ => None,
    }
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_wasd_and_arrows_map_to_directions() {
        assert_eq!(key_action(&key(KeyCode::Char('w'))), Some(Action::Turn(Up)));
        assert_eq!(key_action(&key(KeyCode::Up)), Some(Action::Turn(Up)));
        assert_eq!(key_action(&key(KeyCode::Char('a'))), Some(Action::Turn(Left)));
        assert_eq!(key_action(&key(KeyCode::Left)), Some(Action::Turn(Left)));
        assert_eq!(key_action(&key(KeyCode::Char('S'))), Some(Action::Turn(Down)));
        assert_eq!(key_action(&key(KeyCode::Down)), Some(Action::Turn(Down)));
        assert_eq!(key_action(&key(KeyCode::Char('d'))), Some(Action::Turn(Right)));
        assert_eq!(key_action(&key(KeyCode::Right)), Some(Action::Turn(Right)));
    }

    #[test]
    fn test_pause_and_quit_keys() {
        assert_eq!(key_action(&key(KeyCode::Esc)), Some(Action::TogglePause));
        assert_eq!(key_action(&key(KeyCode::Char('p'))), Some(Action::TogglePause));
        assert_eq!(
            key_action(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
        assert_eq!(key_action(&key(KeyCode::Char('c'))), None);
        assert_eq!(key_action(&key(KeyCode::Enter)), None);
    }
}
