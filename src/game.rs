use std::collections::HashSet;

use crate::board::Board;
use crate::clock::Clock;
use crate::config::GameConfig;
use crate::error::GameError;
use crate::food;
use crate::input::{InputEvent, InputSource};
use crate::render::{Renderer, BLACK, DARK_GREEN, GRID_GRAY, RED, WHITE, YELLOW};
use crate::snake::{Collision, Direction::Right, MoveResult::*, Snake};
use crate::sound::{SoundEvent, SoundPlayer};
use crate::Coords;

use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info};

const SCORE_FONT_SIZE: u16 = 30;
const MESSAGE_FONT_SIZE: u16 = 50;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Crashed(Collision),
    /// The snake fills the board and no food can be placed.
    Won,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Paused,
    GameOver(Outcome),
    Terminated,
}

/// One game: the board, the snake, the food and the adapters it draws and
/// plays sounds through. Restarting reuses the same session.
pub struct GameSession<R: Renderer, S: SoundPlayer> {
    board: Board,
    snake: Snake,
    food: Coords,
    score: u64,
    state: SessionState,
    show_grid: bool,
    renderer: R,
    sound: S,
    rng: StdRng,
}

impl<R: Renderer, S: SoundPlayer> GameSession<R, S> {
    pub fn new(config: &GameConfig, renderer: R, sound: S) -> Result<Self, GameError> {
        let board = config.board()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let center = board.center();
        let mut session = GameSession {
            board,
            snake: Snake::new(center, Right),
            food: center,
            score: 0,
            state: SessionState::Running,
            show_grid: config.show_grid,
            renderer,
            sound,
            rng,
        };
        session.respawn_food();

        Ok(session)
    }

    /// Drives the session until it terminates and returns the last score.
    pub fn run<I: InputSource>(&mut self, input: &mut I, ticks_per_second: u32) -> Result<u64, GameError> {
        info!(
            width = self.board.width(),
            height = self.board.height(),
            cell_size = self.board.cell_size(),
            ticks_per_second,
            "session started"
        );
        self.sound.play(SoundEvent::Start)?;
        self.draw()?;

        let mut clock = Clock::new(ticks_per_second);
        while self.state != SessionState::Terminated {
            clock.wait();
            let events = input.poll_events()?;
            self.tick(&events)?;
        }

        info!(score = self.score, "session terminated");
        Ok(self.score)
    }

    /// One pass of the loop: react to the drained events, advance the
    /// simulation if running, then draw the frame.
    pub fn tick(&mut self, events: &[InputEvent]) -> Result<(), GameError> {
        if self.state == SessionState::Terminated {
            return Ok(());
        }
        if events.contains(&InputEvent::Quit) {
            info!(score = self.score, "quit requested");
            self.state = SessionState::Terminated;
            return Ok(());
        }

        match self.state {
            SessionState::Running => self.update_running(events)?,
            SessionState::Paused => self.update_paused(events),
            SessionState::GameOver(_) => self.update_game_over(events)?,
            SessionState::Terminated => return Ok(()),
        }

        if self.state != SessionState::Terminated {
            self.draw()?;
        }
        Ok(())
    }

    ///////////////////////////////////////////////////////////////////////////

    fn update_running(&mut self, events: &[InputEvent]) -> Result<(), GameError> {
        let mut turned = false;

        for ev in events {
            match ev {
                InputEvent::TogglePause => {
                    info!("paused");
                    self.state = SessionState::Paused;
                    return Ok(());
                }
                InputEvent::ToggleSound => self.toggle_sound(),
                // At most one accepted turn per tick; reversals are refused by the snake
                InputEvent::Turn(dir) if !turned => turned = self.snake.set_direction(*dir),
                _ => {}
            }
        }
        if turned {
            debug!(heading = ?self.snake.get_direction(), "turned");
        }

        self.step()
    }

    fn update_paused(&mut self, events: &[InputEvent]) {
        for ev in events {
            match ev {
                InputEvent::TogglePause => {
                    info!("resumed");
                    self.state = SessionState::Running;
                    return;
                }
                InputEvent::ToggleSound => self.toggle_sound(),
                _ => {}
            }
        }
    }

    fn update_game_over(&mut self, events: &[InputEvent]) -> Result<(), GameError> {
        for ev in events {
            match ev {
                InputEvent::Restart => return self.restart(),
                InputEvent::ConfirmQuit => {
                    info!(score = self.score, "quit after game over");
                    self.state = SessionState::Terminated;
                    return Ok(());
                }
                InputEvent::ToggleSound => self.toggle_sound(),
                _ => {}
            }
        }
        Ok(())
    }

    fn step(&mut self) -> Result<(), GameError> {
        let new_head = match self.snake.move_step(&self.board) {
            Crashed(collision) => {
                info!(?collision, score = self.score, "game over");
                self.state = SessionState::GameOver(Outcome::Crashed(collision));
                return self.sound.play(SoundEvent::GameOver);
            }
            Moved { new_head } => new_head,
        };

        let mut won = false;
        if new_head == self.food {
            self.score += 1;
            self.snake.grow();
            debug!(score = self.score, length = self.snake.len(), at = ?new_head, "food eaten");
            self.sound.play(SoundEvent::Eat)?;
            won = !self.respawn_food();
        }

        self.snake.settle_tail();

        if won {
            info!(score = self.score, "board filled");
            self.state = SessionState::GameOver(Outcome::Won);
        }
        Ok(())
    }

    fn restart(&mut self) -> Result<(), GameError> {
        info!(previous_score = self.score, "restart");
        self.snake = Snake::new(self.board.center(), Right);
        self.score = 0;
        self.state = SessionState::Running;
        self.respawn_food();
        self.sound.play(SoundEvent::Start)
    }

    /// Moves the food to a free cell. When none is left the food stays put
    /// and `false` is returned.
    fn respawn_food(&mut self) -> bool {
        let occupied: HashSet<Coords> = self.snake.body().iter().copied().collect();
        match food::spawn(&self.board, &occupied, &mut self.rng) {
            Some(cell) => {
                self.food = cell;
                true
            }
            None => false,
        }
    }

    fn toggle_sound(&mut self) {
        let enabled = !self.sound.is_enabled();
        self.sound.set_enabled(enabled);
    }

    fn draw(&mut self) -> Result<(), GameError> {
        self.renderer.clear(BLACK)?;

        match self.state {
            SessionState::GameOver(outcome) => self.draw_game_over(outcome)?,
            _ => self.draw_board()?,
        }

        self.renderer.present()
    }

    fn draw_board(&mut self) -> Result<(), GameError> {
        let cell = self.board.cell_size();

        if self.show_grid {
            for pos in self.board.cells().filter(|(x, y)| (x / cell + y / cell) % 2 == 1) {
                self.renderer.fill_rect(pos, cell, cell, GRID_GRAY)?;
            }
        }

        self.renderer.draw_cube(self.food, cell, RED)?;

        // Tail first so the head ends up on top
        for (i, pos) in self.snake.body().iter().enumerate().rev() {
            let color = if i == 0 { YELLOW } else { DARK_GREEN };
            self.renderer.draw_cube(*pos, cell, color)?;
        }

        self.renderer.draw_text(&format!("Score: {}", self.score), (10, 10), WHITE, SCORE_FONT_SIZE)?;

        if self.state == SessionState::Paused {
            let pos = (self.board.width() / 6, self.board.height() / 3);
            self.renderer.draw_text("PAUSED - press P to resume", pos, WHITE, MESSAGE_FONT_SIZE)?;
        }
        Ok(())
    }

    fn draw_game_over(&mut self, outcome: Outcome) -> Result<(), GameError> {
        let headline = match outcome {
            Outcome::Won => "YOU WIN! Press Q-Quit or C-Play Again",
            Outcome::Crashed(_) => "GAME OVER! Press Q-Quit or C-Play Again",
        };
        let (x, y) = (self.board.width() / 6, self.board.height() / 3);

        self.renderer.draw_text(headline, (x, y), WHITE, MESSAGE_FONT_SIZE)?;
        self.renderer.draw_text(
            &format!("Score: {}", self.score),
            (x, y + MESSAGE_FONT_SIZE as i32),
            WHITE,
            SCORE_FONT_SIZE,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::ConfigError;
    use crate::input::testing::ScriptedInput;
    use crate::render::testing::{DrawCall, RecordingRenderer};
    use crate::snake::Direction::{self, *};
    use crate::sound::testing::RecordingSound;
    use rand::Rng;

    type Session = GameSession<RecordingRenderer, RecordingSound>;

    fn session_with(width: i32, height: i32, seed: u64) -> Session {
        let config = GameConfig { width, height, seed: Some(seed), ..GameConfig::default() };
        GameSession::new(&config, RecordingRenderer::default(), RecordingSound::default()).unwrap()
    }

    fn session() -> Session {
        session_with(800, 600, 42)
    }

    fn body(session: &Session) -> Vec<Coords> {
        session.snake.body().iter().copied().collect()
    }

    fn place(session: &mut Session, segments: Vec<Coords>, direction: Direction, food: Coords) {
        session.snake = Snake::from_segments(segments, direction);
        session.food = food;
    }

    #[test]
    fn starts_at_the_center_heading_right() {
        let session = session();

        assert_eq!(body(&session), vec![(400, 300)]);
        assert_eq!(session.snake.get_direction(), Right);
        assert_eq!(session.state, SessionState::Running);
        assert_eq!(session.score, 0);
        assert_ne!(session.food, (400, 300));
        assert!(session.board.contains(session.food));
    }

    #[test]
    fn invalid_geometry_builds_no_session() {
        let config = GameConfig { cell_size: 30, ..GameConfig::default() };
        let res = GameSession::new(&config, RecordingRenderer::default(), RecordingSound::default());

        assert!(matches!(res, Err(GameError::Config(ConfigError::Misaligned { .. }))));
    }

    #[test]
    fn plain_tick_moves_one_cell() {
        let mut session = session();
        session.food = (0, 0);

        session.tick(&[]).unwrap();

        assert_eq!(body(&session), vec![(420, 300)]);
        assert_eq!(session.state, SessionState::Running);
    }

    #[test]
    fn eating_grows_scores_and_moves_the_food() {
        let mut session = session();
        place(&mut session, vec![(100, 100), (80, 100), (60, 100)], Right, (120, 100));

        session.tick(&[]).unwrap();

        assert_eq!(body(&session), vec![(120, 100), (100, 100), (80, 100), (60, 100)]);
        assert_eq!(session.score, 1);
        assert_eq!(session.snake.pending_growth(), 0);
        assert_ne!(session.food, (120, 100));
        assert!(!session.snake.body().contains(&session.food));
        assert_eq!(session.sound.count(SoundEvent::Eat), 1);
    }

    #[test]
    fn hitting_the_wall_ends_the_game_once() {
        let mut session = session();
        place(&mut session, vec![(0, 100)], Left, (400, 400));

        session.tick(&[]).unwrap();
        session.tick(&[]).unwrap();

        assert_eq!(session.state, SessionState::GameOver(Outcome::Crashed(Collision::Wall)));
        assert_eq!(session.sound.count(SoundEvent::GameOver), 1);
        assert_eq!(body(&session), vec![(0, 100)]);
        assert!(session.renderer.texts()[0].starts_with("GAME OVER!"));
    }

    #[test]
    fn biting_itself_ends_the_game() {
        let mut session = session();
        place(&mut session, vec![(20, 20), (40, 20), (40, 40), (20, 40), (0, 40)], Down, (400, 400));

        session.tick(&[]).unwrap();

        assert_eq!(session.state, SessionState::GameOver(Outcome::Crashed(Collision::Body)));
    }

    #[test]
    fn restart_resets_everything() {
        let mut session = session();
        place(&mut session, vec![(0, 100), (20, 100)], Left, (400, 400));
        session.score = 7;
        session.tick(&[]).unwrap();
        assert!(matches!(session.state, SessionState::GameOver(_)));

        session.tick(&[InputEvent::Restart]).unwrap();

        assert_eq!(session.state, SessionState::Running);
        assert_eq!(body(&session), vec![(400, 300)]);
        assert_eq!(session.score, 0);
        assert_ne!(session.food, (400, 300));
        assert_eq!(session.sound.count(SoundEvent::Start), 1);
    }

    #[test]
    fn game_over_waits_for_a_choice() {
        let mut session = session();
        place(&mut session, vec![(0, 100)], Left, (400, 400));
        session.tick(&[]).unwrap();

        session.tick(&[InputEvent::Turn(Up)]).unwrap();
        assert!(matches!(session.state, SessionState::GameOver(_)));

        session.tick(&[InputEvent::ConfirmQuit]).unwrap();
        assert_eq!(session.state, SessionState::Terminated);
    }

    #[test]
    fn reversal_is_ignored() {
        let mut session = session();
        place(&mut session, vec![(100, 100), (80, 100), (60, 100)], Right, (400, 400));

        session.tick(&[InputEvent::Turn(Left)]).unwrap();

        assert_eq!(session.snake.get_direction(), Right);
        assert_eq!(session.snake.head(), (120, 100));
    }

    #[test]
    fn only_one_turn_per_tick() {
        let mut session = session();
        place(&mut session, vec![(100, 100), (80, 100), (60, 100)], Right, (400, 400));

        session.tick(&[InputEvent::Turn(Up), InputEvent::Turn(Left)]).unwrap();

        assert_eq!(session.snake.get_direction(), Up);
        assert_eq!(session.snake.head(), (100, 80));
    }

    #[test]
    fn quit_terminates_from_any_state() {
        let mut running = session();
        let head = running.snake.head();
        running.tick(&[InputEvent::Turn(Up), InputEvent::Quit]).unwrap();
        assert_eq!(running.state, SessionState::Terminated);
        assert_eq!(running.snake.head(), head);

        let mut paused = session();
        paused.tick(&[InputEvent::TogglePause]).unwrap();
        paused.tick(&[InputEvent::Quit]).unwrap();
        assert_eq!(paused.state, SessionState::Terminated);
    }

    #[test]
    fn confirm_quit_is_ignored_while_running() {
        let mut session = session();
        session.food = (0, 0);

        session.tick(&[InputEvent::ConfirmQuit]).unwrap();

        assert_eq!(session.state, SessionState::Running);
    }

    #[test]
    fn pause_freezes_the_snake() {
        let mut session = session();
        session.food = (0, 0);

        session.tick(&[InputEvent::TogglePause]).unwrap();
        session.tick(&[]).unwrap();
        assert_eq!(session.state, SessionState::Paused);
        assert_eq!(body(&session), vec![(400, 300)]);
        assert!(session.renderer.texts().iter().any(|t| t.starts_with("PAUSED")));

        session.tick(&[InputEvent::TogglePause]).unwrap();
        assert_eq!(session.state, SessionState::Running);
        session.tick(&[]).unwrap();
        assert_eq!(body(&session), vec![(420, 300)]);
    }

    #[test]
    fn sound_can_be_muted() {
        let mut session = session();
        place(&mut session, vec![(100, 100)], Right, (120, 100));

        session.tick(&[InputEvent::ToggleSound]).unwrap();

        assert_eq!(session.score, 1);
        assert!(session.sound.played.is_empty());
        assert!(!session.sound.is_enabled());
    }

    #[test]
    fn filling_the_board_wins() {
        let mut session = session_with(40, 20, 5);
        place(&mut session, vec![(0, 0)], Right, (20, 0));

        session.tick(&[]).unwrap();

        assert_eq!(session.state, SessionState::GameOver(Outcome::Won));
        assert_eq!(session.food, (20, 0));
        assert_eq!(session.score, 1);
        assert_eq!(session.snake.len(), 2);
        assert!(session.renderer.texts()[0].starts_with("YOU WIN!"));
    }

    #[test]
    fn frame_draws_food_then_snake_with_the_head_last() {
        let mut session = session();
        place(&mut session, vec![(100, 100), (80, 100)], Right, (400, 400));

        session.tick(&[]).unwrap();

        let frame = &session.renderer.frame;
        assert_eq!(frame.first(), Some(&DrawCall::Clear(BLACK)));
        assert_eq!(frame.last(), Some(&DrawCall::Present));
        assert_eq!(
            session.renderer.rects(),
            vec![((400, 400), RED), ((100, 100), DARK_GREEN), ((120, 100), YELLOW)]
        );
        assert_eq!(session.renderer.texts(), vec!["Score: 0".to_string()]);
    }

    #[test]
    fn grid_is_drawn_under_everything() {
        let config = GameConfig { width: 80, height: 40, show_grid: true, seed: Some(1), ..GameConfig::default() };
        let mut session =
            GameSession::new(&config, RecordingRenderer::default(), RecordingSound::default()).unwrap();

        session.tick(&[InputEvent::TogglePause]).unwrap();

        let grid: Vec<_> = session.renderer.rects().into_iter().filter(|(_, c)| *c == GRID_GRAY).collect();
        assert_eq!(grid.len(), 4);
        assert_eq!(session.renderer.frame[1], DrawCall::Rect((20, 0), 20, 20, GRID_GRAY));
    }

    #[test]
    fn run_loops_until_quit() {
        let mut session = session();
        session.food = (0, 0);
        let mut input = ScriptedInput::new(vec![vec![], vec![InputEvent::Quit]]);

        let score = session.run(&mut input, 120).unwrap();

        assert_eq!(score, 0);
        assert_eq!(session.state, SessionState::Terminated);
        assert_eq!(session.sound.played, vec![SoundEvent::Start]);
        assert_eq!(body(&session), vec![(420, 300)]);
    }

    #[test]
    fn random_play_keeps_the_invariants() {
        let mut session = session_with(120, 100, 11);
        let mut rng = StdRng::seed_from_u64(99);
        let dirs = [Up, Down, Left, Right];
        let cell = session.board.cell_size();

        for _ in 0..3000 {
            let events = if matches!(session.state, SessionState::GameOver(_)) {
                vec![InputEvent::Restart]
            } else if rng.gen_bool(0.3) {
                vec![InputEvent::Turn(dirs[rng.gen_range(0..4)])]
            } else {
                vec![]
            };

            let was_running = session.state == SessionState::Running;
            let len_before = session.snake.len();
            let heading_before = session.snake.get_direction();
            let score_before = session.score;

            session.tick(&events).unwrap();

            if was_running {
                let ate = session.score == score_before + 1;
                assert_eq!(session.snake.len(), len_before + ate as usize);
                if let [InputEvent::Turn(dir)] = events.as_slice() {
                    if len_before > 1 && *dir == heading_before.opposite() {
                        assert_eq!(session.snake.get_direction(), heading_before);
                    }
                }
            }

            let segments = body(&session);
            for pair in segments.windows(2) {
                let (dx, dy) = ((pair[0].0 - pair[1].0).abs(), (pair[0].1 - pair[1].1).abs());
                assert!((dx == cell && dy == 0) || (dx == 0 && dy == cell), "{:?}", pair);
            }
            assert!(segments.iter().all(|s| session.board.contains(*s)));
            if session.state == SessionState::Running {
                assert!(!segments.contains(&session.food));
            }
        }
    }
}
