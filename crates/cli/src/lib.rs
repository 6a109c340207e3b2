//! MedLedger CLI library
//!
//! The dashboard front end as a command-line tool: an [`AppContext`] wires
//! the consent workflow and the records directory over a JSON platform
//! snapshot, and `commands` holds one function per subcommand.

pub mod commands;
mod context;
mod state;

pub use context::AppContext;
pub use state::PlatformState;
