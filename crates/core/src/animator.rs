//! Frame-position state machine. Owns nothing but two range numbers, a
//! cursor and a speed sign; the composition only contributes its bounds.

/// How many extra passes to run after the first one; `Times(0)` plays
/// once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Repeat {
    Times(u32),
    Infinite,
}

impl Default for Repeat {
    fn default() -> Self {
        Repeat::Times(0)
    }
}

/// Notifications returned by the operations that fire them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimatorEvent {
    Start { reversed: bool },
    End { reversed: bool },
    Repeat,
    Cancel,
}

pub struct FrameAnimator {
    composition_bounds: Option<(f64, f64)>,
    min_frame: Option<f64>,
    max_frame: Option<f64>,
    frame: f64,
    speed: f64,
    repeat: Repeat,
    repeats_done: u32,
    running: bool,
}

impl Default for FrameAnimator {
    fn default() -> Self {
        FrameAnimator {
            composition_bounds: None,
            min_frame: None,
            max_frame: None,
            frame: 0.0,
            speed: 1.0,
            repeat: Repeat::default(),
            repeats_done: 0,
            running: false,
        }
    }
}

impl FrameAnimator {
    pub fn new() -> Self {
        FrameAnimator::default()
    }

    pub fn min_frame(&self) -> f64 {
        self.min_frame
            .or(self.composition_bounds.map(|(start, _)| start))
            .unwrap_or(0.0)
    }

    pub fn max_frame(&self) -> f64 {
        self.max_frame
            .or(self.composition_bounds.map(|(_, end)| end))
            .unwrap_or(0.0)
    }

    pub fn frame(&self) -> f64 {
        self.frame
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_reversed(&self) -> bool {
        self.speed < 0.0
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    /// Flips direction without touching the frame.
    pub fn reverse_speed(&mut self) {
        self.speed = -self.speed;
    }

    pub fn repeat(&self) -> Repeat {
        self.repeat
    }

    pub fn set_repeat(&mut self, repeat: Repeat) {
        self.repeat = repeat;
    }

    /// Explicit range values survive without a composition; attaching one
    /// later only reclamps them when they fall outside its bounds.
    pub fn set_composition_bounds(&mut self, start: f64, end: f64) {
        self.composition_bounds = Some((start, end));
        if let Some(min) = self.min_frame {
            self.min_frame = Some(min.clamp(start, end));
        }
        if let Some(max) = self.max_frame {
            self.max_frame = Some(max.clamp(start, end));
        }
        self.frame = self.frame.clamp(self.min_frame(), self.max_frame());
    }

    pub fn clear_composition(&mut self) {
        self.composition_bounds = None;
        self.min_frame = Some(0.0);
        self.max_frame = Some(0.0);
    }

    pub fn set_min_frame(&mut self, frame: f64) {
        let frame = self.clamp_to_composition(frame);
        let max = self.max_frame();
        self.min_frame = Some(frame.min(max));
        self.frame = self.frame.max(self.min_frame());
    }

    pub fn set_max_frame(&mut self, frame: f64) {
        let frame = self.clamp_to_composition(frame);
        let min = self.min_frame();
        self.max_frame = Some(frame.max(min));
        self.frame = self.frame.min(self.max_frame());
    }

    pub fn set_min_and_max_frames(&mut self, min: f64, max: f64) {
        let min = self.clamp_to_composition(min);
        let max = self.clamp_to_composition(max).max(min);
        self.min_frame = Some(min);
        self.max_frame = Some(max);
        self.frame = self.frame.clamp(min, max);
    }

    fn clamp_to_composition(&self, frame: f64) -> f64 {
        match self.composition_bounds {
            Some((start, end)) => frame.clamp(start, end),
            None => frame,
        }
    }

    pub fn set_frame(&mut self, frame: f64) {
        self.frame = frame.clamp(self.min_frame(), self.max_frame());
    }

    /// Progress measured against the current direction: 0 at the frame
    /// the animation starts from, 1 at the frame it ends on.
    pub fn animated_fraction(&self) -> f64 {
        let min = self.min_frame();
        let max = self.max_frame();
        if max <= min {
            return 0.0;
        }
        if self.is_reversed() {
            (max - self.frame) / (max - min)
        } else {
            (self.frame - min) / (max - min)
        }
    }

    /// Starts from the beginning of the range for the current direction.
    pub fn play(&mut self) -> AnimatorEvent {
        self.frame = if self.is_reversed() {
            self.max_frame()
        } else {
            self.min_frame()
        };
        self.repeats_done = 0;
        self.running = true;
        AnimatorEvent::Start {
            reversed: self.is_reversed(),
        }
    }

    /// Continues from the current frame. A frame already sitting on the
    /// terminal bound for the direction wraps to the start bound first.
    pub fn resume(&mut self) -> AnimatorEvent {
        if self.is_reversed() && self.frame <= self.min_frame() {
            self.frame = self.max_frame();
        } else if !self.is_reversed() && self.frame >= self.max_frame() {
            self.frame = self.min_frame();
        }
        self.running = true;
        AnimatorEvent::Start {
            reversed: self.is_reversed(),
        }
    }

    pub fn cancel(&mut self) -> Option<AnimatorEvent> {
        if !self.running {
            return None;
        }
        self.running = false;
        Some(AnimatorEvent::Cancel)
    }

    fn may_repeat(&self) -> bool {
        match self.repeat {
            Repeat::Times(count) => self.repeats_done < count,
            Repeat::Infinite => true,
        }
    }

    /// Moves the cursor by `delta * speed` frames. Crossing the active
    /// bound either wraps (repeats remaining) or clamps exactly onto the
    /// bound and stops.
    pub fn advance(&mut self, delta: f64) -> Option<AnimatorEvent> {
        if !self.running {
            return None;
        }
        let min = self.min_frame();
        let max = self.max_frame();
        self.frame += delta * self.speed;
        if self.is_reversed() {
            if self.frame > min {
                return None;
            }
            if self.may_repeat() {
                self.repeats_done += 1;
                self.frame = max - (min - self.frame);
                return Some(AnimatorEvent::Repeat);
            }
            self.frame = min;
        } else {
            if self.frame < max {
                return None;
            }
            if self.may_repeat() {
                self.repeats_done += 1;
                self.frame = min + (self.frame - max);
                return Some(AnimatorEvent::Repeat);
            }
            self.frame = max;
        }
        self.running = false;
        Some(AnimatorEvent::End {
            reversed: self.is_reversed(),
        })
    }
}
