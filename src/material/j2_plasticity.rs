use super::{ConstitutiveModelTrait, InternalVariables, Variable};
use crate::base::ParamSolid;
use crate::StrError;
use russell_tensor::{t2_add, t2_dyad_t2_update, t4_ddot_t2, LinElasticity, Mandel, Tensor2, Tensor4, SQRT_3_BY_2};

/// Holds the maximum number of iterations of the radial return method
const N_MAX_ITERATIONS: usize = 50;

/// Holds the tolerance of the yield function during the radial return
const TOL_YIELD_FUNCTION: f64 = 1e-6;

/// Implements the small-strain J2 (von Mises) plasticity model with linear isotropic hardening
///
/// The yield function is
///
/// ```text
/// f = √(3/2) |dev(σ)| - (σy + H α)
/// ```
///
/// where α is the accumulated (effective) plastic strain. The plastic strain and α are
/// always computed from the values of the last converged (committed) state; thus, repeated
/// global iterations within one load increment do not accumulate plasticity.
pub struct J2Plasticity {
    /// Holds the material parameters
    param: ParamSolid,

    /// Holds the elasticity modulus
    elasticity: LinElasticity,

    /// Holds the symmetric-deviatoric projector
    psd: Tensor4,

    /// Shear modulus
    shear: f64,

    /// Initial yield stress
    yield_stress: f64,

    /// Hardening modulus
    hardening: f64,
}

impl J2Plasticity {
    /// Allocates a new instance and registers the strain and plasticity variables
    pub fn new(
        param: &ParamSolid,
        young: f64,
        poisson: f64,
        yield_stress: f64,
        hardening: f64,
        variables: &mut InternalVariables,
    ) -> Result<Self, StrError> {
        variables.ensure(Variable::LinearisedStrain)?;
        variables.ensure(Variable::LinearisedPlasticStrain)?;
        variables.ensure(Variable::EffectivePlasticStrain)?;
        let elasticity = LinElasticity::new(young, poisson, false, false);
        let (_, shear) = elasticity.get_bulk_shear();
        Ok(J2Plasticity {
            param: *param,
            elasticity,
            psd: Tensor4::constant_pp_symdev(true),
            shear,
            yield_stress,
            hardening,
        })
    }

    /// Returns the current yield stress given the accumulated plastic strain
    pub fn yield_stress(&self, alpha: f64) -> f64 {
        self.yield_stress + self.hardening * alpha
    }
}

impl ConstitutiveModelTrait for J2Plasticity {
    /// Runs the elastic predictor and, if needed, the radial return at every quadrature point
    fn update_internal_variables(&self, variables: &mut InternalVariables, _dt: f64) -> Result<(), StrError> {
        let h = variables.tensor_slot(Variable::DisplacementGradient)?;
        let strain = variables.tensor_slot(Variable::LinearisedStrain)?;
        let plastic_strain = variables.tensor_slot(Variable::LinearisedPlasticStrain)?;
        let alpha = variables.scalar_slot(Variable::EffectivePlasticStrain)?;
        let sigma = variables.tensor_slot(Variable::CauchyStress)?;
        let von_mises = variables.scalar_slot(Variable::VonMisesStress)?;
        let tangent = variables.modulus_slot(Variable::TangentOperator)?;
        let n_point_per_element = variables.n_point_per_element();
        let dd = self.elasticity.get_modulus();
        let gg = self.shear;
        let hh = self.hardening;

        variables.par_update(|p, state, committed| {
            // strain and values from the last converged state
            let mut eps = Tensor2::new(Mandel::Symmetric);
            eps.set_mandel_vector(1.0, &state.tensor(h).vector().as_data()[..6]);
            let eps_p_old = committed.tensor(plastic_strain);
            let alpha_old = committed.scalar(alpha);

            // elastic predictor
            let mut eps_e = Tensor2::new(Mandel::Symmetric);
            t2_add(&mut eps_e, 1.0, &eps, -1.0, eps_p_old);
            let mut sig = Tensor2::new(Mandel::Symmetric);
            t4_ddot_t2(&mut sig, 1.0, dd, &eps_e);
            let vm_trial = sig.invariant_q();
            let mut f = vm_trial - self.yield_stress(alpha_old);

            // elastic update
            state.tensor_mut(strain).set_tensor(1.0, &eps);
            state.tensor_mut(plastic_strain).set_tensor(1.0, eps_p_old);
            if f <= 0.0 {
                state.tensor_mut(sigma).set_tensor(1.0, &sig);
                state.set_scalar(alpha, alpha_old);
                state.set_scalar(von_mises, vm_trial);
                state.modulus_mut(tangent).set_tensor(1.0, dd);
                return Ok(());
            }

            // radial return
            let mut gamma = 0.0;
            let mut it = 0;
            while f64::abs(f) >= TOL_YIELD_FUNCTION {
                if it == N_MAX_ITERATIONS {
                    println!(
                        "ERROR: radial return did not converge at element {} and local quadrature point {}",
                        p / n_point_per_element,
                        p % n_point_per_element
                    );
                    return Err("non-convergence in radial return method");
                }
                gamma += f / (3.0 * gg + hh);
                f = vm_trial - 3.0 * gg * gamma - self.yield_stress(alpha_old + gamma);
                it += 1;
            }

            // plastic corrector along the unit normal to the yield surface
            let mut n = Tensor2::new(Mandel::Symmetric);
            sig.deviator(&mut n);
            let s_norm = n.norm();
            n.vector_mut().as_mut_data().iter_mut().for_each(|v| *v /= s_norm);
            state.tensor_mut(plastic_strain).update(gamma * SQRT_3_BY_2, &n);
            sig.update(-2.0 * gg * gamma * SQRT_3_BY_2, &n);
            state.tensor_mut(sigma).set_tensor(1.0, &sig);
            state.set_scalar(alpha, alpha_old + gamma);
            state.set_scalar(von_mises, vm_trial - 3.0 * gg * gamma);

            // consistent tangent: D - a Psymdev + b n ⊗ n
            let a = 6.0 * gg * gg * gamma / vm_trial;
            let b = 6.0 * gg * gg * (gamma / vm_trial - 1.0 / (3.0 * gg + hh));
            let ddep = state.modulus_mut(tangent);
            ddep.set_tensor(1.0, dd);
            ddep.update(-a, &self.psd);
            t2_dyad_t2_update(ddep, b, &n, &n);
            Ok(())
        })
    }

    fn intrinsic_material(&self) -> &ParamSolid {
        &self.param
    }

    fn is_finite_deformation(&self) -> bool {
        false
    }

    fn is_symmetric(&self) -> bool {
        true
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use crate::base::{asymmetry, is_positive_definite, ParamSolid, ParamStressStrain};
    use crate::material::{ConstitutiveModel, InternalVariables, Variable};
    use russell_lab::approx_eq;

    // E = 200000, ν = 0.3, σy = 200, H = 400
    fn setup() -> (ConstitutiveModel, InternalVariables) {
        let mut vars = InternalVariables::new(1, 2);
        let model = ConstitutiveModel::new(&ParamSolid::sample_j2_plasticity(), &mut vars).unwrap();
        (model, vars)
    }

    fn set_axial_strain(vars: &mut InternalVariables, strain: f64) {
        let h = vars.tensor_slot(Variable::DisplacementGradient).unwrap();
        for p in 0..vars.n_point() {
            vars.state_mut(p)
                .tensor_mut(h)
                .set_matrix(&[[strain, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]])
                .unwrap();
        }
    }

    #[test]
    fn zero_strain_gives_zero_stress() {
        let (model, mut vars) = setup();
        model.actual.update_internal_variables(&mut vars, 1.0).unwrap();
        for sig in vars.tensors(Variable::CauchyStress).unwrap() {
            for value in sig.vector().as_data() {
                assert_eq!(*value, 0.0);
            }
        }
        for dd in vars.moduli(Variable::TangentOperator).unwrap() {
            assert!(asymmetry(dd.matrix()) < 1e-10);
            assert!(is_positive_definite(dd.matrix()));
        }
    }

    #[test]
    fn elastic_loading_keeps_plastic_strain_zero() {
        let (model, mut vars) = setup();
        // uniaxial strain: σvm = 2G ε = 153.8 < 200
        set_axial_strain(&mut vars, 0.001);
        model.actual.update_internal_variables(&mut vars, 1.0).unwrap();
        let gg = 200_000.0 / 2.6;
        for vm in vars.scalars(Variable::VonMisesStress).unwrap() {
            approx_eq(vm, 2.0 * gg * 0.001, 1e-9);
        }
        for alpha in vars.scalars(Variable::EffectivePlasticStrain).unwrap() {
            assert_eq!(alpha, 0.0);
        }
        for dd in vars.moduli(Variable::TangentOperator).unwrap() {
            assert!(is_positive_definite(dd.matrix()));
        }
    }

    #[test]
    fn plastic_loading_satisfies_the_yield_condition() {
        let (model, mut vars) = setup();
        set_axial_strain(&mut vars, 0.005);
        model.actual.update_internal_variables(&mut vars, 1.0).unwrap();
        let alphas = vars.scalars(Variable::EffectivePlasticStrain).unwrap();
        let vms = vars.scalars(Variable::VonMisesStress).unwrap();
        for p in 0..2 {
            assert!(alphas[p] > 0.0);
            approx_eq(vms[p], 200.0 + 400.0 * alphas[p], 1e-6);
            assert!(vms[p] >= 200.0);
        }
        // plastic strain is deviatoric
        let eps_p = vars.tensors(Variable::LinearisedPlasticStrain).unwrap()[0].vector().as_data().clone();
        approx_eq(eps_p[0] + eps_p[1] + eps_p[2], 0.0, 1e-15);
        approx_eq(eps_p[1], eps_p[2], 1e-15);
        for dd in vars.moduli(Variable::TangentOperator).unwrap() {
            assert!(asymmetry(dd.matrix()) < 1e-8);
            assert!(is_positive_definite(dd.matrix()));
        }
    }

    #[test]
    fn repeated_updates_do_not_accumulate_plasticity() {
        let (model, mut vars) = setup();
        set_axial_strain(&mut vars, 0.005);
        model.actual.update_internal_variables(&mut vars, 1.0).unwrap();
        let first = vars.scalars(Variable::EffectivePlasticStrain).unwrap();
        model.actual.update_internal_variables(&mut vars, 1.0).unwrap();
        let second = vars.scalars(Variable::EffectivePlasticStrain).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn hardening_is_monotonic() {
        let (model, mut vars) = setup();
        let mut previous = 0.0;
        for strain in [0.0005, 0.002, 0.004, 0.006, 0.008] {
            set_axial_strain(&mut vars, strain);
            model.actual.update_internal_variables(&mut vars, 1.0).unwrap();
            vars.commit();
            let alpha = vars.scalars(Variable::EffectivePlasticStrain).unwrap()[0];
            assert!(alpha >= previous);
            previous = alpha;
        }
        assert!(previous > 0.0);
    }

    #[test]
    fn unloading_is_elastic() {
        let (model, mut vars) = setup();
        set_axial_strain(&mut vars, 0.005);
        model.actual.update_internal_variables(&mut vars, 1.0).unwrap();
        vars.commit();
        let alpha = vars.scalars(Variable::EffectivePlasticStrain).unwrap()[0];
        set_axial_strain(&mut vars, 0.0049);
        model.actual.update_internal_variables(&mut vars, 1.0).unwrap();
        assert_eq!(vars.scalars(Variable::EffectivePlasticStrain).unwrap()[0], alpha);
        let vm = vars.scalars(Variable::VonMisesStress).unwrap()[0];
        assert!(vm < 200.0 + 400.0 * alpha);
    }

    #[test]
    fn perfect_plasticity_works() {
        let mut vars = InternalVariables::new(1, 1);
        let param = ParamSolid {
            density: 1.0,
            stress_strain: ParamStressStrain::J2Plasticity {
                young: 1000.0,
                poisson: 0.25,
                yield_stress: 1.0,
                hardening: 0.0,
            },
        };
        let model = ConstitutiveModel::new(&param, &mut vars).unwrap();
        set_axial_strain(&mut vars, 0.01);
        model.actual.update_internal_variables(&mut vars, 1.0).unwrap();
        approx_eq(vars.scalars(Variable::VonMisesStress).unwrap()[0], 1.0, 1e-9);
        let dd = vars.moduli(Variable::TangentOperator).unwrap()[0].matrix().clone();
        assert!(asymmetry(&dd) < 1e-10);
    }
    #[test]
    fn large_yield_stress_satisfies_the_yield_condition() {
        // E = 2e11 and σy = 2.5e8 (Pa)
        let mut vars = InternalVariables::new(1, 1);
        let param = ParamSolid {
            density: 7850.0,
            stress_strain: ParamStressStrain::J2Plasticity {
                young: 2e11,
                poisson: 0.3,
                yield_stress: 2.5e8,
                hardening: 1e9,
            },
        };
        let model = ConstitutiveModel::new(&param, &mut vars).unwrap();
        // 2 G ε ≈ 3.1e8 > σy
        set_axial_strain(&mut vars, 0.002);
        model.actual.update_internal_variables(&mut vars, 1.0).unwrap();
        let alpha = vars.scalars(Variable::EffectivePlasticStrain).unwrap()[0];
        let vm = vars.scalars(Variable::VonMisesStress).unwrap()[0];
        assert!(alpha > 0.0);
        assert!(f64::abs(vm - (2.5e8 + 1e9 * alpha)) < 1e-6);
        // the stored stress agrees with the returned von Mises value
        let sig = vars.tensors(Variable::CauchyStress).unwrap()[0].invariant_q();
        approx_eq(sig / vm, 1.0, 1e-12);
    }
}
