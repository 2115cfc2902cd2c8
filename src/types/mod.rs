//! Data types for the grid editor.

mod cell;
mod column;
mod mutation;
mod search;
mod selection;

pub use cell::*;
pub use column::*;
pub use mutation::*;
pub use search::*;
pub use selection::*;
