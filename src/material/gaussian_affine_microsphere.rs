use super::{ConstitutiveModelTrait, Decoupled, InternalVariables, UnitSphere, Variable};
use crate::base::ParamSolid;
use crate::StrError;
use russell_lab::Vector;
use russell_tensor::{t2_dot_vec, vec_dyad_vec, Mandel, Tensor2};

/// Implements the affine microsphere model with Gaussian (non-locking) chains
///
/// Each chain has a constant force term, thus the fictitious stress and modulus are
///
/// ```text
/// τ̄ = 3 μ Σ wᵢ tᵢ ⊗ tᵢ,  tᵢ = F̄ rᵢ
/// c̄ = 0
/// ```
///
/// The volumetric response is the same as in [super::AffineMicrosphere].
pub struct GaussianAffineMicrosphere {
    /// Holds the material parameters
    param: ParamSolid,

    /// Holds the volumetric response and the isochoric projection
    decoupled: Decoupled,

    /// Shear modulus
    shear: f64,

    /// Holds the integration directions
    sphere: UnitSphere,
}

impl GaussianAffineMicrosphere {
    /// Allocates a new instance and registers the Kirchhoff stress
    pub fn new(param: &ParamSolid, bulk: f64, shear: f64, variables: &mut InternalVariables) -> Result<Self, StrError> {
        variables.ensure(Variable::KirchhoffStress)?;
        Ok(GaussianAffineMicrosphere {
            param: *param,
            decoupled: Decoupled::new(bulk),
            shear,
            sphere: UnitSphere::new_bazant_oh_21(),
        })
    }
}

impl ConstitutiveModelTrait for GaussianAffineMicrosphere {
    /// Computes the Kirchhoff and Cauchy stresses and the spatial tangent operator
    fn update_internal_variables(&self, variables: &mut InternalVariables, _dt: f64) -> Result<(), StrError> {
        let f = variables.tensor_slot(Variable::DeformationGradient)?;
        let det_f = variables.scalar_slot(Variable::DetF)?;
        let tau = variables.tensor_slot(Variable::KirchhoffStress)?;
        let sigma = variables.tensor_slot(Variable::CauchyStress)?;
        let von_mises = variables.scalar_slot(Variable::VonMisesStress)?;
        let tangent = variables.modulus_slot(Variable::TangentOperator)?;

        variables.par_update(|_, state, _| {
            let jj = state.scalar(det_f);
            let mut ff_bar = Tensor2::new(Mandel::General);
            self.decoupled.unimodular(&mut ff_bar, state.tensor(f), jj);

            // macro stress
            let mut t = Vector::new(3);
            let mut m = Tensor2::new(Mandel::Symmetric);
            let mut tau_bar = Tensor2::new(Mandel::Symmetric);
            for (r, w) in self.sphere.directions.iter().zip(&self.sphere.weights) {
                t2_dot_vec(&mut t, 1.0, &ff_bar, &Vector::from(r));
                vec_dyad_vec(&mut m, 1.0, &t, &t)?;
                tau_bar.update(3.0 * self.shear * w, &m);
            }

            let mut tau_new = Tensor2::new(Mandel::Symmetric);
            self.decoupled
                .assemble(&mut tau_new, state.modulus_mut(tangent), &tau_bar, None, jj);
            state.tensor_mut(sigma).set_tensor(1.0 / jj, &tau_new);
            state.tensor_mut(tau).set_tensor(1.0, &tau_new);
            state.set_scalar(von_mises, tau_new.invariant_q() / jj);
            Ok(())
        })
    }

    fn intrinsic_material(&self) -> &ParamSolid {
        &self.param
    }

    fn is_finite_deformation(&self) -> bool {
        true
    }

    fn is_symmetric(&self) -> bool {
        true
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
