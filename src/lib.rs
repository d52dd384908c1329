//! Solidsim is a nonlinear finite element solver for solid mechanics
//!
//! The crate drives a Newton-Raphson equilibrium iteration over adaptive load steps,
//! assembling sparse tangent stiffness matrices from element contributions and updating
//! the constitutive state at every quadrature point. The available models are linear
//! elasticity, J2 plasticity, Neo-Hooke, and the Gaussian and non-Gaussian affine microspheres.
//!
//! Meshes, shape functions and numerical integration come from [gemlab]; tensors and
//! dense or sparse linear algebra come from the russell crates.

/// Defines a type alias for the error type as a static string
pub type StrError = &'static str;

pub mod base;
pub mod fem;
pub mod material;
pub mod prelude;
