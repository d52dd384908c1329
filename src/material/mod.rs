//! Implements the internal variables store and the constitutive models

mod affine_microsphere;
mod constitutive_model;
mod gaussian_affine_microsphere;
mod hyperelastic;
mod internal_variables;
mod j2_plasticity;
mod linear_elastic;
mod local_state;
mod neo_hooke;
mod unit_sphere;
pub use crate::material::affine_microsphere::*;
pub use crate::material::constitutive_model::*;
pub use crate::material::gaussian_affine_microsphere::*;
pub use crate::material::hyperelastic::*;
pub use crate::material::internal_variables::*;
pub use crate::material::j2_plasticity::*;
pub use crate::material::linear_elastic::*;
pub use crate::material::local_state::*;
pub use crate::material::neo_hooke::*;
pub use crate::material::unit_sphere::*;
