use super::{ConstitutiveModelTrait, Decoupled, InternalVariables, Variable};
use crate::base::ParamSolid;
use crate::StrError;
use russell_tensor::{t2_dot_t2, Mandel, Tensor2};

/// Implements the compressible Neo-Hookean model
///
/// ```text
/// ψ = μ/2 (Ī₁ - 3) + U(J)
/// τ̄ = μ b̄,  b̄ = F̄ F̄ᵀ
/// ```
pub struct NeoHooke {
    /// Holds the material parameters
    param: ParamSolid,

    /// Holds the volumetric response and the isochoric projection
    decoupled: Decoupled,

    /// Shear modulus
    shear: f64,
}

impl NeoHooke {
    /// Allocates a new instance and registers the Kirchhoff stress
    pub fn new(param: &ParamSolid, bulk: f64, shear: f64, variables: &mut InternalVariables) -> Result<Self, StrError> {
        variables.ensure(Variable::KirchhoffStress)?;
        Ok(NeoHooke {
            param: *param,
            decoupled: Decoupled::new(bulk),
            shear,
        })
    }
}

impl ConstitutiveModelTrait for NeoHooke {
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
            let mut ff_bar_t = Tensor2::new(Mandel::General);
            let mut bb_bar = Tensor2::new(Mandel::General);
            self.decoupled.unimodular(&mut ff_bar, state.tensor(f), jj);
            ff_bar.transpose(&mut ff_bar_t);
            t2_dot_t2(&mut bb_bar, &ff_bar, &ff_bar_t);

            // b̄ is symmetric; the skew components of the general representation vanish
            let mut tau_bar = Tensor2::new(Mandel::Symmetric);
            tau_bar.set_mandel_vector(self.shear, &bb_bar.vector().as_data()[..6]);

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
