//! Solarscape application: window, event loop and tick scheduling.

pub mod game_loop;
pub mod platform;
pub mod window;
