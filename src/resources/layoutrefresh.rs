//! Layout refresh request.
//!
//! Raised by the border-following state on every corner arrival, after the
//! pet window has been refitted around the sprite. A host with a real window
//! picks it up through [`PetEngine::take_refresh`] and resizes its native
//! window to match.
//!
//! [`PetEngine::take_refresh`]: crate::engine::PetEngine::take_refresh

use bevy_ecs::prelude::Resource;

#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct LayoutRefresh {
    /// A refresh is pending and has not been taken by the host yet.
    pub requested: bool,
    /// Refreshes raised since startup.
    pub count: u64,
}

impl LayoutRefresh {
    pub fn request(&mut self) {
        self.requested = true;
        self.count += 1;
    }

    /// Clear the pending flag, returning whether it was set.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.requested)
    }
}
