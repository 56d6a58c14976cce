//! Drives level attempts on top of the engine.
//!
//! A `Session` owns the player's `Progress` and one `Game` at a time. It applies
//! the policies that sit outside the rules: input is ignored once an attempt
//! is over, a win pays `VICTORY_BONUS` once per attempt, and only a won level
//! leads on to the next one.
use log::info;

use crate::engine::{Direction, Game, GameStatus, ThrowResult};
use crate::error::{Error, Result};
use crate::level::{builtin_level, LevelConfig};
use crate::progress::{Progress, VICTORY_BONUS};

/// What a throw did and where the attempt stands afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThrowOutcome {
    pub result: ThrowResult,
    pub status: GameStatus,
}

/// One player's run through the levels.
#[derive(Debug)]
pub struct Session {
    progress: Progress,
    game: Game,
    level_number: Option<u32>,
    bonus_awarded: bool,
}

impl Session {
    /// Starts an attempt at the progress' current built-in level.
    pub fn new(progress: Progress) -> Result<Self> {
        let level = progress.levels.current_level();
        let game = start_builtin(level)?;
        Ok(Session {
            progress,
            game,
            level_number: Some(level),
            bonus_awarded: false,
        })
    }

    /// Starts an attempt at a level that is not part of the built-in catalogue.
    pub fn with_custom_level(progress: Progress, config: LevelConfig) -> Result<Self> {
        Ok(Session {
            progress,
            game: Game::new(config)?,
            level_number: None,
            bonus_awarded: false,
        })
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    /// Built-in level being played, or `None` for a custom level.
    pub fn level_number(&self) -> Option<u32> {
        self.level_number
    }

    pub fn status(&self) -> GameStatus {
        self.game.status()
    }

    /// Moves the player. Ignored once the attempt is won or lost.
    pub fn move_player(&mut self, direction: Direction) -> bool {
        if self.status() != GameStatus::InProgress {
            return false;
        }
        self.game.move_player(direction)
    }

    /// Throws the horseshoes in line with the player.
    ///
    /// # Returns
    /// `None` if the attempt was already over, otherwise the throw result and
    /// the new status. The first throw that wins the attempt adds
    /// `VICTORY_BONUS` to the score.
    pub fn throw_horseshoes(&mut self) -> Option<ThrowOutcome> {
        if self.status() != GameStatus::InProgress {
            return None;
        }

        let result = self.game.perform_throw();
        let status = self.game.status();
        if status == GameStatus::Won && !self.bonus_awarded {
            self.bonus_awarded = true;
            self.progress.score.add_score(VICTORY_BONUS);
            info!(
                "Level won, score is now {}",
                self.progress.score.score()
            );
        }

        Some(ThrowOutcome { result, status })
    }

    /// Restarts the current attempt from the level's starting layout.
    pub fn retry(&mut self) {
        self.game.reset_game();
        self.bonus_awarded = false;
    }

    /// Moves on to the next built-in level after a win.
    ///
    /// # Errors
    /// `Error::NotWon` if the current attempt has not been won, and
    /// `Error::NoNextLevel` when playing a custom level.
    ///
    /// # Returns
    /// The number of the level now being played.
    pub fn next_level(&mut self) -> Result<u32> {
        if self.status() != GameStatus::Won {
            return Err(Error::NotWon);
        }
        if self.level_number.is_none() {
            return Err(Error::NoNextLevel);
        }
        let level = self.progress.levels.move_to_next_level();
        self.start(level)?;
        Ok(level)
    }

    /// Starts an attempt at an unlocked built-in level.
    ///
    /// # Errors
    /// `Error::UnknownLevel` or `Error::LevelLocked`.
    pub fn select_level(&mut self, level: u32) -> Result<()> {
        self.progress.levels.select_level(level)?;
        self.start(level)
    }

    /// Ends the session, handing back the progress to be saved.
    pub fn into_progress(self) -> Progress {
        self.progress
    }

    fn start(&mut self, level: u32) -> Result<()> {
        self.game = start_builtin(level)?;
        self.level_number = Some(level);
        self.bonus_awarded = false;
        info!("Starting level {}", level);
        Ok(())
    }
}

fn start_builtin(level: u32) -> Result<Game> {
    let config = builtin_level(level).ok_or(Error::UnknownLevel(level))?;
    Game::new(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Position;

    fn one_throw_level() -> LevelConfig {
        LevelConfig::from_str_array(&["@h.P"]).unwrap()
    }

    fn losing_level() -> LevelConfig {
        // The peg is out of reach, the horseshoe slides off the right edge.
        LevelConfig::from_str_array(&["...P", "@.h."]).unwrap()
    }

    #[test]
    fn test_new_session_starts_current_level() {
        let session = Session::new(Progress::default()).unwrap();
        assert_eq!(session.level_number(), Some(1));
        assert_eq!(session.game().config(), &builtin_level(1).unwrap());
        assert_eq!(session.status(), GameStatus::InProgress);
    }

    #[test]
    fn test_win_awards_bonus_once() {
        let mut session =
            Session::with_custom_level(Progress::default(), one_throw_level()).unwrap();
        let outcome = session.throw_horseshoes().unwrap();
        assert_eq!(outcome.status, GameStatus::Won);
        assert_eq!(outcome.result.new_positions, vec![Position::new(3, 0)]);
        assert_eq!(session.progress().score.score(), VICTORY_BONUS);

        // Further throws are ignored and pay nothing.
        assert!(session.throw_horseshoes().is_none());
        assert_eq!(session.progress().score.score(), VICTORY_BONUS);
    }

    #[test]
    fn test_input_ignored_after_loss() {
        let mut session = Session::with_custom_level(Progress::default(), losing_level()).unwrap();
        let outcome = session.throw_horseshoes().unwrap();
        assert_eq!(outcome.status, GameStatus::Lost);
        assert!(outcome.result.is_out);

        assert!(!session.move_player(Direction::Right));
        assert!(session.throw_horseshoes().is_none());
        assert_eq!(session.progress().score.score(), 0);
    }

    #[test]
    fn test_retry_restores_level() {
        let mut session = Session::with_custom_level(Progress::default(), losing_level()).unwrap();
        session.throw_horseshoes();
        session.retry();
        assert_eq!(session.status(), GameStatus::InProgress);
        assert_eq!(
            session.game().horseshoe_positions(),
            &[Position::new(2, 0)]
        );
        assert!(session.move_player(Direction::Right));
    }

    #[test]
    fn test_next_level_requires_win() {
        let mut session = Session::new(Progress::default()).unwrap();
        assert!(matches!(session.next_level(), Err(Error::NotWon)));
        assert_eq!(session.level_number(), Some(1));
    }

    #[test]
    fn test_custom_level_has_no_next_level() {
        let mut session =
            Session::with_custom_level(Progress::default(), one_throw_level()).unwrap();
        assert_eq!(session.throw_horseshoes().unwrap().status, GameStatus::Won);

        assert!(matches!(session.next_level(), Err(Error::NoNextLevel)));
        assert_eq!(session.level_number(), None);
        assert_eq!(session.status(), GameStatus::Won);
        assert!(!session.progress().levels.is_unlocked(2));
        assert_eq!(session.progress().levels.current_level(), 1);
    }

    #[test]
    fn test_win_level_one_then_advance() {
        let mut session = Session::new(Progress::default()).unwrap();
        // Player (0,1) is already in line with the horseshoe at (2,1).
        let outcome = session.throw_horseshoes().unwrap();
        assert_eq!(outcome.status, GameStatus::Won);

        assert_eq!(session.next_level().unwrap(), 2);
        assert_eq!(session.level_number(), Some(2));
        assert!(session.progress().levels.is_unlocked(2));
        assert_eq!(session.status(), GameStatus::InProgress);
        assert_eq!(session.game().config(), &builtin_level(2).unwrap());
    }

    #[test]
    fn test_select_level_respects_unlocks() {
        let mut session = Session::new(Progress::default()).unwrap();
        assert!(matches!(session.select_level(4), Err(Error::LevelLocked(4))));

        let mut progress = Progress::default();
        progress.levels.unlock_level(4);
        let mut session = Session::new(progress).unwrap();
        session.select_level(4).unwrap();
        assert_eq!(session.level_number(), Some(4));
        assert_eq!(session.game().config(), &builtin_level(4).unwrap());
    }

    #[test]
    fn test_into_progress_keeps_score() {
        let mut session = Session::new(Progress::default()).unwrap();
        session.throw_horseshoes();
        session.next_level().unwrap();
        let progress = session.into_progress();
        assert_eq!(progress.score.score(), VICTORY_BONUS);
        assert_eq!(progress.levels.current_level(), 2);
    }
}
