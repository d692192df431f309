//! Shared fixtures for the integration tests: a minimal stand-in for the
//! host's session and player types.

use voxel_achievements::achievements::{GamerId, Player, Session};

/// Host session stub. Carries the day counter and a gameplay stat unlock
/// conditions can read.
pub struct Game {
    pub day: u32,
    pub blocks_mined: u32,
}

impl Game {
    pub fn new() -> Self {
        Self {
            day: 1,
            blocks_mined: 0,
        }
    }
}

impl Session for Game {
    fn days_into_game(&self) -> u32 {
        self.day
    }
}

/// Host player stub wrapping a stable gamer id.
pub struct TestPlayer(pub u64);

impl Player for TestPlayer {
    fn gamer_id(&self) -> GamerId {
        GamerId(self.0)
    }
}
