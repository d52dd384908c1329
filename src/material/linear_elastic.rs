use super::{ConstitutiveModelTrait, InternalVariables, Variable};
use crate::base::ParamSolid;
use crate::StrError;
use russell_tensor::{LinElasticity, Mandel, Tensor2};

/// Implements the small-strain isotropic linear elastic model
///
/// ```text
/// ε = sym(H)
/// σ = D : ε
/// ```
pub struct LinearElastic {
    /// Holds the material parameters
    param: ParamSolid,

    /// Holds the elasticity modulus
    pub model: LinElasticity,
}

impl LinearElastic {
    /// Allocates a new instance and registers the linearised strain
    pub fn new(
        param: &ParamSolid,
        young: f64,
        poisson: f64,
        variables: &mut InternalVariables,
    ) -> Result<Self, StrError> {
        variables.ensure(Variable::LinearisedStrain)?;
        Ok(LinearElastic {
            param: *param,
            model: LinElasticity::new(young, poisson, false, false),
        })
    }
}

impl ConstitutiveModelTrait for LinearElastic {
    /// Computes the strain, the stress, and the (constant) tangent operator
    fn update_internal_variables(&self, variables: &mut InternalVariables, _dt: f64) -> Result<(), StrError> {
        let h = variables.tensor_slot(Variable::DisplacementGradient)?;
        let strain = variables.tensor_slot(Variable::LinearisedStrain)?;
        let sigma = variables.tensor_slot(Variable::CauchyStress)?;
        let von_mises = variables.scalar_slot(Variable::VonMisesStress)?;
        let tangent = variables.modulus_slot(Variable::TangentOperator)?;
        let modulus = self.model.get_modulus();
        variables.par_update(|_, state, _| {
            // the first six components of a general tensor hold its symmetric part
            let mut eps = Tensor2::new(Mandel::Symmetric);
            eps.set_mandel_vector(1.0, &state.tensor(h).vector().as_data()[..6]);
            let mut sig = Tensor2::new(Mandel::Symmetric);
            self.model.calc_stress(&mut sig, &eps);
            state.set_scalar(von_mises, sig.invariant_q());
            state.tensor_mut(strain).set_tensor(1.0, &eps);
            state.tensor_mut(sigma).set_tensor(1.0, &sig);
            state.modulus_mut(tangent).set_tensor(1.0, modulus);
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
    use super::LinearElastic;
    use crate::base::ParamSolid;
    use crate::material::{ConstitutiveModelTrait, InternalVariables, Variable};
    use russell_lab::approx_eq;

    fn setup(n_point: usize) -> (LinearElastic, InternalVariables) {
        let mut vars = InternalVariables::new(1, n_point);
        for v in [
            Variable::DisplacementGradient,
            Variable::DeformationGradient,
            Variable::DetF,
            Variable::CauchyStress,
            Variable::VonMisesStress,
            Variable::TangentOperator,
        ] {
            vars.add(v).unwrap();
        }
        let param = ParamSolid::sample_linear_elastic();
        let model = LinearElastic::new(&param, 1000.0, 0.25, &mut vars).unwrap();
        (model, vars)
    }

    #[test]
    fn zero_gradient_gives_zero_stress() {
        let (model, mut vars) = setup(2);
        model.update_internal_variables(&mut vars, 1.0).unwrap();
        for sig in vars.tensors(Variable::CauchyStress).unwrap() {
            assert_eq!(sig.vector().as_data(), &[0.0; 6]);
        }
        let dd = vars.moduli(Variable::TangentOperator).unwrap()[0].matrix().clone();
        // λ = E ν / ((1 + ν)(1 - 2ν)) = 400 and 2G = 800
        approx_eq(dd.get(0, 0), 1200.0, 1e-12);
        approx_eq(dd.get(0, 1), 400.0, 1e-12);
        approx_eq(dd.get(3, 3), 800.0, 1e-12);
    }

    #[test]
    fn uniaxial_strain_works() {
        let (model, mut vars) = setup(1);
        let h = vars.tensor_slot(Variable::DisplacementGradient).unwrap();
        vars.state_mut(0)
            .tensor_mut(h)
            .set_matrix(&[[0.001, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 0.0, 0.0]])
            .unwrap();
        model.update_internal_variables(&mut vars, 1.0).unwrap();
        let sig = vars.tensors(Variable::CauchyStress).unwrap()[0].vector().as_data().clone();
        approx_eq(sig[0], 1.2, 1e-12);
        approx_eq(sig[1], 0.4, 1e-12);
        approx_eq(sig[2], 0.4, 1e-12);
        approx_eq(sig[3], 0.0, 1e-15);
        let eps = vars.tensors(Variable::LinearisedStrain).unwrap()[0].vector().as_data().clone();
        approx_eq(eps[0], 0.001, 1e-15);
        approx_eq(vars.scalars(Variable::VonMisesStress).unwrap()[0], 0.8, 1e-12);
    }

    #[test]
    fn rotation_gives_zero_stress() {
        let (model, mut vars) = setup(1);
        let h = vars.tensor_slot(Variable::DisplacementGradient).unwrap();
        vars.state_mut(0)
            .tensor_mut(h)
            .set_matrix(&[[0.0, 0.01, 0.0], [-0.01, 0.0, 0.0], [0.0, 0.0, 0.0]])
            .unwrap();
        model.update_internal_variables(&mut vars, 1.0).unwrap();
        for value in vars.tensors(Variable::CauchyStress).unwrap()[0].vector().as_data() {
            approx_eq(*value, 0.0, 1e-12);
        }
    }
}
