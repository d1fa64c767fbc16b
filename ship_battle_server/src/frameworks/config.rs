use std::env;

// Runtime/server settings (not gameplay tuning, which lives in domain::tuning).

pub fn http_port() -> u16 {
    env::var("GAME_SERVER_PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3001)
}

/// Simulation frames per second for every room.
pub fn tick_rate() -> u32 {
    env::var("GAME_SERVER_FPS")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(DEFAULT_FPS)
        .clamp(1, MAX_FPS)
}

/// Fixed seed for reproducible rooms. Unset means a fresh seed per room.
pub fn game_seed() -> Option<u64> {
    env::var("GAME_SEED").ok().and_then(|v| v.trim().parse().ok())
}

pub const DEFAULT_FPS: u32 = 30;
pub const MAX_FPS: u32 = 120;

pub const INPUT_CHANNEL_CAPACITY: usize = 1024;
pub const FRAME_BROADCAST_CAPACITY: usize = 128;
