//! Implements the base structures for a finite element simulation

mod boundary;
mod config;
mod constants;
mod history;
mod input;
mod mesh;
mod parameters;
mod sample_meshes;
#[cfg(test)]
mod testing;
pub use crate::base::boundary::*;
pub use crate::base::config::*;
pub use crate::base::constants::*;
pub use crate::base::history::*;
pub use crate::base::input::*;
pub use crate::base::mesh::*;
pub use crate::base::parameters::*;
pub use crate::base::sample_meshes::*;
#[cfg(test)]
pub(crate) use crate::base::testing::*;
