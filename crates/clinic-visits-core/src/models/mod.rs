//! Domain models for the clinic-visits system.

mod company;
mod criteria;
mod settings;
mod visit;

pub use company::*;
pub use criteria::*;
pub use settings::*;
pub use visit::*;
