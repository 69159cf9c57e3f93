//! Library parts of the configurator CLI: logging setup and selection
//! script replay.

pub mod logging;
pub mod replay;
