//! Panda Pop core crate.
//!
//! Letters rise over a panda scene; tap the W letters ("Nice!") and leave the
//! Z letters alone ("Oops!"). The game logic in [`game`] is plain Rust driven
//! by an explicit clock and is tested natively. The browser front end lives in
//! `web` and is reached through [`start_game`].

use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod game;
pub mod rng;
mod web;

pub use config::GameConfig;
pub use error::ConfigError;
pub use game::{
    GameEvent, GameSession, LetterId, LetterStore, LetterToken, RemovalReason, SoundCue, Symbol,
    TapOutcome, TimingPolicy,
};
pub use web::render::{BubbleGeom, Viewport, bubble_geometry, hit_test};
pub use web::{count_lines, delay_lines, music_glyph, start_label};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    #[cfg(feature = "console_log")]
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Mounts the game with the shipped settings.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    web::mount(GameConfig::default())
}

/// Mounts the game with a JSON [`GameConfig`]; missing fields keep their defaults.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    let config = GameConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    web::mount(config)
}
