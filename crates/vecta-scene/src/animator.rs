use serde::{Deserialize, Serialize};
use vecta_core::{AnimationConfig, PlayMode};

/// The scene clock. Moving it never touches the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Animator {
    start: i32,
    end: i32,
    current: i32,
    fps: f64,
    play_mode: PlayMode,
}

impl Animator {
    pub fn new(config: &AnimationConfig) -> Self {
        Self {
            start: config.start_frame,
            end: config.end_frame.max(config.start_frame),
            current: config.start_frame,
            fps: config.fps,
            play_mode: config.play_mode,
        }
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    pub fn current(&self) -> i32 {
        self.current
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn play_mode(&self) -> PlayMode {
        self.play_mode
    }

    pub fn set_start(&mut self, start: i32) {
        self.start = start;
        self.end = self.end.max(start);
    }

    pub fn set_end(&mut self, end: i32) {
        self.end = end;
        self.start = self.start.min(end);
    }

    /// Jump to a frame. Frames outside `[start, end]` are allowed for scrubbing.
    pub fn set_current(&mut self, frame: i32) {
        self.current = frame;
    }

    pub fn set_play_mode(&mut self, mode: PlayMode) {
        self.play_mode = mode;
    }

    /// Step one frame forward. Past the end, `Repeat` wraps to start and `Stop` holds.
    /// Returns the new current frame.
    pub fn advance(&mut self) -> i32 {
        let next = self.current.saturating_add(1);
        self.current = if next > self.end {
            match self.play_mode {
                PlayMode::Repeat => self.start,
                PlayMode::Stop => self.end,
            }
        } else {
            next
        };
        self.current
    }

    /// Time of the current frame in seconds, relative to the start frame.
    pub fn current_seconds(&self) -> f64 {
        (self.current - self.start) as f64 / self.fps
    }
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(&AnimationConfig::default())
    }
}
