pub mod logging;

// Initiative engine: ordering, status, turn flow
pub mod session;

// Saved players and encounter bundles
pub mod storage;

pub mod tracker;
