use crate::api::config::SettleConfig;

/// Decides when the current word has visually resolved.
///
/// Fires at most once per tracker: after the warm-up, the settled ratio must
/// stay above the threshold for more than `stable_frames` frames in a row.
#[derive(Debug, Clone)]
pub struct SettleTracker {
    config: SettleConfig,
    /// Frames observed since the current word was applied.
    word_frames: u64,
    stable_frames: u32,
    fired: bool,
}

impl SettleTracker {
    pub fn new(config: SettleConfig) -> Self {
        Self {
            config,
            word_frames: 0,
            stable_frames: 0,
            fired: false,
        }
    }

    /// A new word is on screen: restart the warm-up.
    pub fn restart_word(&mut self) {
        self.word_frames = 0;
        self.stable_frames = 0;
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Frames observed since the current word was applied.
    pub fn word_frames(&self) -> u64 {
        self.word_frames
    }

    pub fn stable_frames(&self) -> u32 {
        self.stable_frames
    }

    /// Feed one frame's counts. Returns true on the single frame completion fires.
    pub fn observe(&mut self, settled: usize, pool_size: usize) -> bool {
        let frame = self.word_frames;
        self.word_frames += 1;

        if self.fired || pool_size == 0 || frame <= self.config.warmup_frames {
            return false;
        }

        let ratio = settled as f32 / pool_size as f32;
        if ratio > self.config.ratio {
            self.stable_frames += 1;
        } else {
            self.stable_frames = 0;
        }

        if self.stable_frames > self.config.stable_frames {
            self.fired = true;
            return true;
        }
        false
    }
}
