//! On-screen unlock toasts.

use achievements::{AchievementHandle, UnlockNotification};

/// Toasts shown at once. Later unlocks wait their turn.
pub const VISIBLE_TOASTS: usize = 3;

/// One toast working its way across the screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub handle: AchievementHandle,
    pub duration: f32,
    pub fade: f32,
    pub elapsed: f32,
    /// Whether the chime played when this toast was raised.
    pub sound: bool,
}

impl Toast {
    /// Opacity at the current age: ramps in over `fade` seconds, holds at
    /// one, and ramps out over the final `fade` seconds.
    pub fn alpha(&self) -> f32 {
        if self.fade <= 0.0 {
            return 1.0;
        }
        if self.elapsed < self.fade {
            (self.elapsed / self.fade).clamp(0.0, 1.0)
        } else if self.elapsed > self.duration - self.fade {
            ((self.duration - self.elapsed) / self.fade).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    pub fn expired(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// FIFO queue of unlock toasts.
///
/// Only the visible toasts age, so a burst of unlocks plays out a few at a
/// time instead of expiring off screen.
#[derive(Debug, Clone, Default)]
pub struct NotificationQueue {
    toasts: Vec<Toast>,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, note: UnlockNotification) {
        self.toasts.push(Toast {
            handle: note.handle,
            duration: note.duration,
            fade: note.fade,
            elapsed: 0.0,
            sound: note.sound,
        });
    }

    pub fn extend(&mut self, notes: impl IntoIterator<Item = UnlockNotification>) {
        for note in notes {
            self.push(note);
        }
    }

    /// Ages the visible toasts and drops the expired ones.
    pub fn tick(&mut self, dt: f32) {
        for toast in self.toasts.iter_mut().take(VISIBLE_TOASTS) {
            toast.elapsed += dt;
        }
        self.toasts.retain(|t| !t.expired());
    }

    /// Toasts currently on screen, oldest first.
    pub fn visible(&self) -> &[Toast] {
        &self.toasts[..self.toasts.len().min(VISIBLE_TOASTS)]
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
