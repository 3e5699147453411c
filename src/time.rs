use std::time::Instant;

/// Frame delay of a 60 fps target, in milliseconds.
pub const DEFAULT_FRAME_DELAY: f32 = 1000.0 / 60.0;

/// Longest frame accepted, in multiples of the frame delay.
const MAX_FRAME_DELAYS: f32 = 6.0;

/// # Time
///
/// Frame clock shared by every timed system. All durations are milliseconds.
///
/// Each [Time::update] samples the wall clock once; the elapsed time is clamped to six frame
/// delays so a long stall (debugger, hidden window) can't make the simulation spiral.
#[derive(Clone, Debug)]
pub struct Time {
    frame_delay: f32,
    time_scale: f32,
    scale_delta: f32,
    delta_ms: f32,
    fps: f32,
    last_sample: Option<Instant>,
    stopped: bool,
}

impl Time {
    /// Returns a clock targeting 60 fps.
    pub fn new() -> Self {
        Self::with_frame_delay(DEFAULT_FRAME_DELAY)
    }

    /// Returns a clock targeting the given frame delay in milliseconds.
    pub fn with_frame_delay(frame_delay: f32) -> Self {
        Self {
            frame_delay,
            time_scale: 1.0,
            scale_delta: 1.0,
            delta_ms: frame_delay,
            fps: 1000.0 / frame_delay,
            last_sample: None,
            stopped: false,
        }
    }

    /// Samples the wall clock. Returns false if the clock is stopped.
    pub fn update(&mut self) -> bool {
        self.update_at(Instant::now())
    }

    /// Samples the clock at the given instant. Returns false if the clock is stopped.
    pub fn update_at(&mut self, now: Instant) -> bool {
        let previous = self.last_sample.replace(now);

        if self.stopped {
            return false;
        }

        let elapsed = match previous {
            Some(previous) => now.saturating_duration_since(previous).as_secs_f32() * 1000.0,
            None => self.frame_delay,
        };

        self.delta_ms = elapsed.min(self.frame_delay * MAX_FRAME_DELAYS);
        if self.delta_ms > 0.0 {
            self.fps = 1000.0 / self.delta_ms;
        }
        self.scale_delta = self.delta_ms / self.frame_delay * self.time_scale;

        true
    }

    /// Stops the clock. Updates return false until [Time::resume] is called.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Resumes the clock. The next update measures from the last sample taken while stopped.
    pub fn resume(&mut self) {
        self.stopped = false;
    }

    /// Returns true if the clock is stopped.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Returns the target frame delay in milliseconds.
    pub fn frame_delay(&self) -> f32 {
        self.frame_delay
    }

    /// Returns the clamped wall-clock time of the last frame in milliseconds.
    pub fn delta_ms(&self) -> f32 {
        self.delta_ms
    }

    /// Returns the frames per second measured on the last frame.
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Returns the last frame length as a multiple of the frame delay, times the time scale.
    pub fn scale_delta(&self) -> f32 {
        self.scale_delta
    }

    /// Returns the frame delay multiplied by the scale delta. This is the `dt` handed to every
    /// update.
    pub fn frame_delay_scaled(&self) -> f32 {
        self.frame_delay * self.scale_delta
    }

    /// Returns the user time scale.
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Sets the user time scale, e.g. `0.5` for slow motion. Negative values are clamped to 0.
    pub fn set_time_scale(&mut self, time_scale: f32) {
        self.time_scale = time_scale.max(0.0);
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
