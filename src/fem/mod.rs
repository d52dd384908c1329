//! Implements the finite element method for nonlinear statics

mod control_load_step;
mod control_residual;
mod fem_mesh;
mod fem_state;
mod file_io;
mod linear_system;
mod material_coordinates;
mod solid_submesh;
mod solver_static;
mod sparsity_pattern;
pub use crate::fem::control_load_step::*;
pub use crate::fem::control_residual::*;
pub use crate::fem::fem_mesh::*;
pub use crate::fem::fem_state::*;
pub use crate::fem::file_io::*;
pub use crate::fem::linear_system::*;
pub use crate::fem::material_coordinates::*;
pub use crate::fem::solid_submesh::*;
pub use crate::fem::solver_static::*;
pub use crate::fem::sparsity_pattern::*;
