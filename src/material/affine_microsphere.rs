use super::{ConstitutiveModelTrait, Decoupled, InternalVariables, UnitSphere, Variable};
use crate::base::{ParamSolid, BOLTZMANN_CONSTANT, REFERENCE_TEMPERATURE};
use crate::StrError;
use russell_lab::Vector;
use russell_tensor::{t2_dot_vec, t2_dyad_t2_update, vec_dyad_vec, Mandel, Tensor2, Tensor4};

/// Implements the affine microsphere model of rubber-like materials
///
/// The free energy is split into an isochoric part, obtained by averaging the chain
/// energy over a set of directions on the unit sphere, and a volumetric part:
///
/// ```text
/// ψ = μ Σ wᵢ ψc(λᵢ) + U(J)
/// U(J) = K/4 (J² - 1) - K/2 ln J
/// ```
///
/// The chain force uses the Padé approximation of the inverse Langevin function, giving
/// `n ψc' = (3N - λ²) / (N - λ²)`. The stretch λᵢ = |F̄ rᵢ| follows the unimodular
/// deformation gradient `F̄ = J^(-1/3) F` (affine assumption).
///
/// Optionally, the number of active chains per unit volume decays with a first-order law
/// (ageing), reducing the shear modulus `μ = n k T`.
pub struct AffineMicrosphere {
    /// Holds the material parameters
    param: ParamSolid,

    /// Holds the volumetric response and the isochoric projection
    decoupled: Decoupled,

    /// Number of segments per chain
    segments_per_chain: f64,

    /// Rate of decay of the number of active chains
    chain_decay_rate: f64,

    /// Holds the integration directions
    sphere: UnitSphere,
}

impl AffineMicrosphere {
    /// Allocates a new instance and registers the Kirchhoff stress and the number of active chains
    pub fn new(
        param: &ParamSolid,
        bulk: f64,
        shear: f64,
        segments_per_chain: f64,
        chain_decay_rate: f64,
        variables: &mut InternalVariables,
    ) -> Result<Self, StrError> {
        variables.ensure(Variable::KirchhoffStress)?;
        variables.ensure(Variable::ActiveChains)?;
        variables.fill_scalar(Variable::ActiveChains, shear / (BOLTZMANN_CONSTANT * REFERENCE_TEMPERATURE))?;
        Ok(AffineMicrosphere {
            param: *param,
            decoupled: Decoupled::new(bulk),
            segments_per_chain,
            chain_decay_rate,
            sphere: UnitSphere::new_bazant_oh_21(),
        })
    }

    /// Computes the fictitious Kirchhoff stress τ̄ and its spatial modulus c̄
    fn isochoric(&self, tau_bar: &mut Tensor2, cc_bar: &mut Tensor4, ff_bar: &Tensor2, shear: f64) -> Result<(), StrError> {
        let nn = self.segments_per_chain;
        let mut t = Vector::new(3);
        let mut m = Tensor2::new(Mandel::Symmetric);
        tau_bar.clear();
        cc_bar.matrix_mut().fill(0.0);
        for (r, w) in self.sphere.directions.iter().zip(&self.sphere.weights) {
            t2_dot_vec(&mut t, 1.0, ff_bar, &Vector::from(r));
            let stretch_sq = t[0] * t[0] + t[1] * t[1] + t[2] * t[2];
            if stretch_sq >= nn {
                return Err("chain stretch exceeds the locking stretch");
            }
            vec_dyad_vec(&mut m, 1.0, &t, &t)?;
            let force = shear * w * (3.0 * nn - stretch_sq) / (nn - stretch_sq);
            let stiff = shear * w * 4.0 * nn / ((nn - stretch_sq) * (nn - stretch_sq));
            tau_bar.update(force, &m);
            t2_dyad_t2_update(cc_bar, stiff, &m, &m);
        }
        Ok(())
    }
}

impl ConstitutiveModelTrait for AffineMicrosphere {
    /// Computes the Kirchhoff and Cauchy stresses and the spatial tangent operator
    ///
    /// The stored tangent is the Kirchhoff modulus divided by J, consistent with the
    /// integration over the current configuration.
    fn update_internal_variables(&self, variables: &mut InternalVariables, dt: f64) -> Result<(), StrError> {
        let f = variables.tensor_slot(Variable::DeformationGradient)?;
        let det_f = variables.scalar_slot(Variable::DetF)?;
        let tau = variables.tensor_slot(Variable::KirchhoffStress)?;
        let sigma = variables.tensor_slot(Variable::CauchyStress)?;
        let von_mises = variables.scalar_slot(Variable::VonMisesStress)?;
        let chains = variables.scalar_slot(Variable::ActiveChains)?;
        let tangent = variables.modulus_slot(Variable::TangentOperator)?;
        let n_point_per_element = variables.n_point_per_element();

        variables.par_update(|p, state, committed| {
            // network ageing
            let n_chain = committed.scalar(chains) / (1.0 + self.chain_decay_rate * dt);
            let shear = n_chain * BOLTZMANN_CONSTANT * REFERENCE_TEMPERATURE;
            state.set_scalar(chains, n_chain);

            // isochoric response
            let jj = state.scalar(det_f);
            let mut ff_bar = Tensor2::new(Mandel::General);
            self.decoupled.unimodular(&mut ff_bar, state.tensor(f), jj);
            let mut tau_bar = Tensor2::new(Mandel::Symmetric);
            let mut cc_bar = Tensor4::new(Mandel::Symmetric);
            self.isochoric(&mut tau_bar, &mut cc_bar, &ff_bar, shear).map_err(|e| {
                println!(
                    "ERROR: chain locking at element {} and local quadrature point {}",
                    p / n_point_per_element,
                    p % n_point_per_element
                );
                e
            })?;

            // stresses and tangent
            let mut tau_new = Tensor2::new(Mandel::Symmetric);
            self.decoupled
                .assemble(&mut tau_new, state.modulus_mut(tangent), &tau_bar, Some(&cc_bar), jj);
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

#[cfg(test)]
mod tests {
    use crate::base::{asymmetry, is_positive_definite, set_deformation, ParamSolid, ParamStressStrain};
    use crate::material::{ConstitutiveModel, InternalVariables, Variable};
    use russell_lab::approx_eq;

    #[test]
    fn unit_deformation_gives_zero_stress() {
        let mut vars = InternalVariables::new(1, 2);
        let model = ConstitutiveModel::new(&ParamSolid::sample_affine_microsphere(), &mut vars).unwrap();
        model.actual.update_internal_variables(&mut vars, 1.0).unwrap();
        for sig in vars.tensors(Variable::CauchyStress).unwrap() {
            for value in sig.vector().as_data() {
                approx_eq(*value, 0.0, 1e-12);
            }
        }
        for dd in vars.moduli(Variable::TangentOperator).unwrap() {
            assert!(asymmetry(dd.matrix()) < 1e-12);
            assert!(is_positive_definite(dd.matrix()));
        }
    }

    #[test]
    fn incompressible_uniaxial_stretch_works() {
        let mut vars = InternalVariables::new(1, 1);
        let model = ConstitutiveModel::new(&ParamSolid::sample_affine_microsphere(), &mut vars).unwrap();
        let lambda = 1.1;
        let lateral = 1.0 / f64::sqrt(lambda);
        set_deformation(&mut vars, &[[lambda, 0.0, 0.0], [0.0, lateral, 0.0], [0.0, 0.0, lateral]]);
        model.actual.update_internal_variables(&mut vars, 1.0).unwrap();
        let sig = vars.tensors(Variable::CauchyStress).unwrap()[0].vector().as_data().clone();
        assert!(sig[0] > 0.1);
        approx_eq(sig[1], sig[2], 1e-12);
        approx_eq(sig[3], 0.0, 1e-12);
        approx_eq(sig[4], 0.0, 1e-12);
        approx_eq(sig[5], 0.0, 1e-12);
        let tau = vars.tensors(Variable::KirchhoffStress).unwrap()[0].vector().as_data().clone();
        approx_eq(tau[0], sig[0], 1e-12); // J = 1
        let dd = vars.moduli(Variable::TangentOperator).unwrap()[0].matrix().clone();
        assert!(asymmetry(&dd) < 1e-12);
        assert!(is_positive_definite(&dd));
    }

    #[test]
    fn volumetric_response_works() {
        let mut vars = InternalVariables::new(1, 1);
        let model = ConstitutiveModel::new(&ParamSolid::sample_affine_microsphere(), &mut vars).unwrap();
        let s = 1.01;
        set_deformation(&mut vars, &[[s, 0.0, 0.0], [0.0, s, 0.0], [0.0, 0.0, s]]);
        model.actual.update_internal_variables(&mut vars, 1.0).unwrap();
        // p = K/2 (J - 1/J) since the isochoric part vanishes
        let jj = s * s * s;
        let pressure = 100.0 / 2.0 * (jj - 1.0 / jj);
        let sig = vars.tensors(Variable::CauchyStress).unwrap()[0].vector().as_data().clone();
        for i in 0..3 {
            approx_eq(sig[i], pressure, 1e-10);
        }
        approx_eq(vars.scalars(Variable::VonMisesStress).unwrap()[0], 0.0, 1e-10);
    }

    #[test]
    fn chain_decay_softens_the_response() {
        let param = ParamSolid {
            density: 1.0,
            stress_strain: ParamStressStrain::AffineMicrosphere {
                bulk: 100.0,
                shear: 1.0,
                segments_per_chain: 25.0,
                chain_decay_rate: 1.0,
            },
        };
        let mut vars = InternalVariables::new(1, 1);
        let model = ConstitutiveModel::new(&param, &mut vars).unwrap();
        let n0 = vars.scalars(Variable::ActiveChains).unwrap()[0];
        let lambda = 1.1;
        let lateral = 1.0 / f64::sqrt(lambda);
        set_deformation(&mut vars, &[[lambda, 0.0, 0.0], [0.0, lateral, 0.0], [0.0, 0.0, lateral]]);
        model.actual.update_internal_variables(&mut vars, 0.0).unwrap();
        let sig_fresh = vars.tensors(Variable::CauchyStress).unwrap()[0].vector()[0];
        model.actual.update_internal_variables(&mut vars, 1.0).unwrap();
        let sig_aged = vars.tensors(Variable::CauchyStress).unwrap()[0].vector()[0];
        approx_eq(vars.scalars(Variable::ActiveChains).unwrap()[0], n0 / 2.0, 1e-8 * n0);
        approx_eq(sig_aged, sig_fresh / 2.0, 1e-10);
        // repeated updates within the same increment start from the committed value
        model.actual.update_internal_variables(&mut vars, 1.0).unwrap();
        approx_eq(vars.scalars(Variable::ActiveChains).unwrap()[0], n0 / 2.0, 1e-8 * n0);
    }

    #[test]
    fn locking_stretch_is_captured() {
        let mut vars = InternalVariables::new(1, 1);
        let model = ConstitutiveModel::new(&ParamSolid::sample_affine_microsphere(), &mut vars).unwrap();
        let lambda = 6.0;
        let lateral = 1.0 / f64::sqrt(lambda);
        set_deformation(&mut vars, &[[lambda, 0.0, 0.0], [0.0, lateral, 0.0], [0.0, 0.0, lateral]]);
        assert_eq!(
            model.actual.update_internal_variables(&mut vars, 1.0).err(),
            Some("chain stretch exceeds the locking stretch")
        );
    }
}
