//! Posture management API model types.

mod collector;
mod credential;
mod profile;
mod scan;
mod scope;

pub use collector::*;
pub use credential::*;
pub use profile::*;
pub use scan::*;
pub use scope::*;
