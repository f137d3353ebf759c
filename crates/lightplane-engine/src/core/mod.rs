pub use self::{entity::*, geometry::*};

pub mod collision;
pub(crate) mod entity;
pub(crate) mod geometry;
