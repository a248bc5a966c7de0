pub use self::{column::*, grid::*, shape::*};

pub(crate) mod column;
pub(crate) mod grid;
pub(crate) mod shape;
