/// Initiative Tracker - turn order and wound tracking for tabletop game masters
///
/// Core library providing the combat engine, saved rosters and encounters,
/// and the JSON API served to the operator page and spectator overlay.

pub mod config;
pub mod core;
pub mod server;


pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
