//! Live-tail behavior: follow new lines, pause on stop lines, re-center on tracked lines.
//!
//! Signals are collected while a batch of lines is ingested and acted on once
//! in [`TailController::end_update`], so a burst of lines scrolls at most once.

use crate::viewport::Viewport;

/// Observable state of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailState {
    /// New lines bring the view to the bottom
    Following,
    /// Auto-scroll is off
    Paused,
    /// Re-centering on a tracked line after every batch
    Tracking,
}

/// What happened at the end of a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TailOutcome {
    /// A stop line was centered and following switched off.
    pub stopped: bool,
    /// A tracked line was fully centered and tracking ended.
    pub tracking_finished: bool,
}

impl TailOutcome {
    /// Track rules should be switched off after this batch.
    pub fn disables_track_rules(&self) -> bool {
        self.stopped || self.tracking_finished
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailController {
    following: bool,
    pending_stop: Option<usize>,
    track_target: Option<usize>,
}

impl Default for TailController {
    fn default() -> Self {
        Self::new()
    }
}

impl TailController {
    pub fn new() -> Self {
        Self {
            following: true,
            pending_stop: None,
            track_target: None,
        }
    }

    pub fn state(&self) -> TailState {
        if self.track_target.is_some() {
            TailState::Tracking
        } else if self.following {
            TailState::Following
        } else {
            TailState::Paused
        }
    }

    pub fn is_following(&self) -> bool {
        self.following
    }

    pub fn track_target(&self) -> Option<usize> {
        self.track_target
    }

    /// Record the signals of a line that was just appended at `view_index`.
    pub fn on_line_added(&mut self, view_index: usize, stop: bool, track: bool) {
        if self.following && stop {
            tracing::info!(row = view_index, "stop line scheduled");
            self.pending_stop = Some(view_index);
            return;
        }

        if track {
            tracing::info!(row = view_index, "track line scheduled");
            self.following = false;
            self.track_target = Some(view_index);
        }
    }

    /// Apply the deferred effects of a batch.
    ///
    /// `dirty` is true when the batch appended at least one view row.
    pub fn end_update(&mut self, viewport: &mut Viewport, total: usize, dirty: bool) -> TailOutcome {
        let mut outcome = TailOutcome::default();

        if dirty && self.following {
            viewport.scroll_to_end(total);
        }

        if let Some(row) = self.pending_stop.take() {
            self.following = false;
            self.track_target = None;
            viewport.scroll_to_index(row, true, total);
            outcome.stopped = true;
        }

        if let Some(row) = self.track_target {
            if viewport.scroll_to_index(row, true, total) {
                self.track_target = None;
                outcome.tracking_finished = true;
            }
        }

        outcome
    }

    /// Forget any tracked line. The caller disables the Track rules.
    pub fn stop_tracking(&mut self) {
        self.track_target = None;
    }

    /// Switch auto-scroll off without touching the viewport.
    pub fn pause(&mut self) {
        self.following = false;
    }

    /// Follow again and jump to the last row.
    pub fn resume(&mut self, viewport: &mut Viewport, total: usize) {
        self.following = true;
        viewport.scroll_to_end(total);
    }

    /// The user moved focus: following continues only while focus sits on the last row.
    pub fn on_focus_changed(&mut self, focus: usize, total: usize) {
        self.following = total > 0 && focus == total - 1;
    }

    /// Back to the initial state (view cleared). Pending effects are dropped.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
