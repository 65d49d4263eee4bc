use std::time::Instant;

// Based on code from https://github.com/tuzz/game-loop
// Which is based on the classic article https://gafferongames.com/post/fix_your_timestep/

pub trait Game {
    fn update(&mut self, time: &GameLoopTime) -> anyhow::Result<()>;

    /// Called once per frame after the fixed updates, e.g. to print statistics
    fn frame_finished(&mut self, _time: &GameLoopTime) -> anyhow::Result<()> {
        Ok(())
    }

    /// Polled once per frame, the loop stops after the frame where this returns true
    fn should_exit(&self) -> bool {
        false
    }
}

pub struct GameLoopConfig {
    pub updates_per_s: u32,
    pub max_frame_time_s: f64,
}

impl Default for GameLoopConfig {
    fn default() -> Self {
        GameLoopConfig {
            updates_per_s: 60,
            max_frame_time_s: 0.25,
        }
    }
}

pub struct GameLoop<G: Game> {
    pub game: G,
    pub exit_next_frame: bool,

    previous_instant: Instant,
    accumulated_time_s: f64,
    fixed_time_step_s: f64,
    number_of_updates: u64,
    number_of_frames: u64,
    last_frame_time_s: f64,
    running_time_s: f64,
    max_frame_time_s: f64,
}

impl<G: Game> GameLoop<G> {
    pub fn new(game: G, config: GameLoopConfig) -> Self {
        Self {
            game,
            exit_next_frame: false,

            previous_instant: Instant::now(),
            accumulated_time_s: 0.0,
            fixed_time_step_s: 1.0 / config.updates_per_s.max(1) as f64,
            number_of_updates: 0,
            number_of_frames: 0,
            last_frame_time_s: 0.0,
            running_time_s: 0.0,
            max_frame_time_s: config.max_frame_time_s,
        }
    }

    /// Measures the wall clock time since the previous frame and advances by it
    pub fn next_frame(&mut self) -> anyhow::Result<GameLoopResult> {
        let now = Instant::now();
        let elapsed_s = now.duration_since(self.previous_instant).as_secs_f64();
        self.previous_instant = now;
        self.advance(elapsed_s)
    }

    /// Runs as many fixed updates as fit into `elapsed_s` plus the leftover from
    /// previous frames
    pub fn advance(&mut self, elapsed_s: f64) -> anyhow::Result<GameLoopResult> {
        if self.exit_next_frame {
            return Ok(GameLoopResult::Exit);
        }

        let elapsed_s = elapsed_s.min(self.max_frame_time_s);

        self.last_frame_time_s = elapsed_s;
        self.running_time_s += elapsed_s;
        self.accumulated_time_s += elapsed_s;

        while self.accumulated_time_s >= self.fixed_time_step_s {
            let time = GameLoopTime {
                delta_time_s: self.fixed_time_step_s,
                elapsed_time_s: self.running_time_s,
                update_number: self.number_of_updates,
            };
            self.game.update(&time)?;
            self.accumulated_time_s -= self.fixed_time_step_s;
            self.number_of_updates += 1;
        }

        let time = GameLoopTime {
            delta_time_s: self.last_frame_time_s,
            elapsed_time_s: self.running_time_s,
            update_number: self.number_of_updates,
        };
        self.game.frame_finished(&time)?;
        self.number_of_frames += 1;

        if self.game.should_exit() {
            self.exit();
        }

        Ok(GameLoopResult::Continue)
    }

    pub fn exit(&mut self) {
        self.exit_next_frame = true;
    }

    pub fn fixed_time_step_s(&self) -> f64 {
        self.fixed_time_step_s
    }

    pub fn last_frame_time_s(&self) -> f64 {
        self.last_frame_time_s
    }

    pub fn running_time_s(&self) -> f64 {
        self.running_time_s
    }

    pub fn number_of_updates(&self) -> u64 {
        self.number_of_updates
    }

    pub fn number_of_frames(&self) -> u64 {
        self.number_of_frames
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameLoopResult {
    Continue,
    Exit,
}

#[derive(Debug, Clone, Copy)]
pub struct GameLoopTime {
    pub delta_time_s: f64,
    pub elapsed_time_s: f64,
    pub update_number: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingGame {
        updates: u64,
        frames: u64,
        stop_after_updates: Option<u64>,
    }

    impl Game for CountingGame {
        fn update(&mut self, time: &GameLoopTime) -> anyhow::Result<()> {
            assert_eq!(time.update_number, self.updates);
            self.updates += 1;
            Ok(())
        }

        fn frame_finished(&mut self, _time: &GameLoopTime) -> anyhow::Result<()> {
            self.frames += 1;
            Ok(())
        }

        fn should_exit(&self) -> bool {
            self.stop_after_updates
                .is_some_and(|limit| self.updates >= limit)
        }
    }

    fn config(updates_per_s: u32) -> GameLoopConfig {
        GameLoopConfig {
            updates_per_s,
            max_frame_time_s: 1.0,
        }
    }

    #[test]
    fn test_fixed_steps_accumulate() {
        let mut game_loop = GameLoop::new(CountingGame::default(), config(10));

        // 0.25 s at 10 Hz: two updates now, the leftover carries over
        game_loop.advance(0.25).unwrap();
        assert_eq!(game_loop.game.updates, 2);

        game_loop.advance(0.06).unwrap();
        assert_eq!(game_loop.game.updates, 3);
        assert_eq!(game_loop.game.frames, 2);
        assert_eq!(game_loop.number_of_frames(), 2);
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut game_loop = GameLoop::new(CountingGame::default(), config(4));
        game_loop.advance(100.0).unwrap();
        assert_eq!(game_loop.game.updates, 4);
        assert_eq!(game_loop.last_frame_time_s(), 1.0);
    }

    #[test]
    fn test_exit_is_requested_by_game() {
        let game = CountingGame {
            stop_after_updates: Some(3),
            ..Default::default()
        };
        let mut game_loop = GameLoop::new(game, config(4));

        assert_eq!(game_loop.advance(0.5).unwrap(), GameLoopResult::Continue);
        assert_eq!(game_loop.advance(0.5).unwrap(), GameLoopResult::Continue);
        assert_eq!(game_loop.advance(0.5).unwrap(), GameLoopResult::Exit);
        assert_eq!(game_loop.game.updates, 4);
    }
}
