//! Makes available common structures needed to run a simulation
//!
//! You may write `use solidsim::prelude::*` in your code and obtain
//! access to commonly used functionality.

pub use crate::base::{BasicMesh, BasicSubmesh, BcKind, BoundaryCondition, Config, Dof, History};
pub use crate::base::{NamedRegion, Region, Topology};
pub use crate::base::{ParamPart, ParamSolid, ParamStressStrain, SimulationInput, DEFAULT_OUT_DIR, DEFAULT_TEST_DIR};
pub use crate::fem::{FemMesh, FemState, FileIo, SolverStatic};
pub use crate::material::{InternalVariables, Variable};
