use super::{AffineMicrosphere, GaussianAffineMicrosphere, InternalVariables, J2Plasticity, LinearElastic, NeoHooke, Variable};
use crate::base::{ParamSolid, ParamStressStrain};
use crate::StrError;

/// Specifies the essential functions of constitutive models
pub trait ConstitutiveModelTrait: Send + Sync {
    /// Updates the stress and the tangent operator at all quadrature points
    ///
    /// The kinematic variables (displacement gradient, deformation gradient, and its determinant)
    /// must have been written to the current states before this call.
    ///
    /// # Input
    ///
    /// * `variables` -- the internal variables of the submesh
    /// * `dt` -- the (pseudo) time increment; rate-independent models ignore it
    fn update_internal_variables(&self, variables: &mut InternalVariables, dt: f64) -> Result<(), StrError>;

    /// Returns the intrinsic material data (density and model parameters)
    fn intrinsic_material(&self) -> &ParamSolid;

    /// Indicates that the model is formulated with finite deformations
    fn is_finite_deformation(&self) -> bool;

    /// Indicates that the tangent operator is symmetric
    fn is_symmetric(&self) -> bool;
}

/// Holds the actual constitutive model implementation
pub struct ConstitutiveModel {
    /// Holds the actual model implementation
    pub actual: Box<dyn ConstitutiveModelTrait>,
}

impl ConstitutiveModel {
    /// Allocates a new instance and registers the required internal variables
    ///
    /// The kinematic variables, the Cauchy stress, the von Mises stress, and the tangent
    /// operator are always registered. Each model registers its additional variables.
    pub fn new(param: &ParamSolid, variables: &mut InternalVariables) -> Result<Self, StrError> {
        param.validate()?;
        for variable in [
            Variable::DisplacementGradient,
            Variable::DeformationGradient,
            Variable::DetF,
            Variable::CauchyStress,
            Variable::VonMisesStress,
            Variable::TangentOperator,
        ] {
            variables.ensure(variable)?;
        }
        let actual: Box<dyn ConstitutiveModelTrait> = match param.stress_strain {
            // Linear elastic model
            ParamStressStrain::IsotropicLinearElasticity { young, poisson } => {
                Box::new(LinearElastic::new(param, young, poisson, variables)?)
            }

            // J2 plasticity model
            ParamStressStrain::J2Plasticity {
                young,
                poisson,
                yield_stress,
                hardening,
            } => Box::new(J2Plasticity::new(
                param,
                young,
                poisson,
                yield_stress,
                hardening,
                variables,
            )?),

            // Neo-Hookean model
            ParamStressStrain::NeoHooke { bulk, shear } => Box::new(NeoHooke::new(param, bulk, shear, variables)?),

            // Gaussian affine microsphere model
            ParamStressStrain::GaussianAffineMicrosphere { bulk, shear } => {
                Box::new(GaussianAffineMicrosphere::new(param, bulk, shear, variables)?)
            }

            // Affine microsphere model
            ParamStressStrain::AffineMicrosphere {
                bulk,
                shear,
                segments_per_chain,
                chain_decay_rate,
            } => Box::new(AffineMicrosphere::new(
                param,
                bulk,
                shear,
                segments_per_chain,
                chain_decay_rate,
                variables,
            )?),
        };
        Ok(ConstitutiveModel { actual })
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::ConstitutiveModel;
    use crate::base::ParamSolid;
    use crate::material::{InternalVariables, Variable};

    #[test]
    fn new_works() {
        let mut vars = InternalVariables::new(1, 8);
        let param = ParamSolid::sample_linear_elastic();
        let model = ConstitutiveModel::new(&param, &mut vars).unwrap();
        assert!(!model.actual.is_finite_deformation());
        assert!(model.actual.is_symmetric());
        assert_eq!(model.actual.intrinsic_material().density, param.density);
        assert!(vars.has(Variable::LinearisedStrain));
        assert!(vars.has(Variable::TangentOperator));

        let mut vars = InternalVariables::new(1, 8);
        let model = ConstitutiveModel::new(&ParamSolid::sample_j2_plasticity(), &mut vars).unwrap();
        assert!(!model.actual.is_finite_deformation());
        assert!(vars.has(Variable::LinearisedPlasticStrain));
        assert!(vars.has(Variable::EffectivePlasticStrain));

        let mut vars = InternalVariables::new(1, 8);
        let model = ConstitutiveModel::new(&ParamSolid::sample_affine_microsphere(), &mut vars).unwrap();
        assert!(model.actual.is_finite_deformation());
        assert!(vars.has(Variable::KirchhoffStress));
        assert!(vars.has(Variable::ActiveChains));

        let mut vars = InternalVariables::new(1, 8);
        let model = ConstitutiveModel::new(&ParamSolid::sample_neo_hooke(), &mut vars).unwrap();
        assert!(model.actual.is_finite_deformation());
        assert!(vars.has(Variable::KirchhoffStress));
        assert!(!vars.has(Variable::LinearisedStrain));

        let mut vars = InternalVariables::new(1, 8);
        let model = ConstitutiveModel::new(&ParamSolid::sample_gaussian_affine_microsphere(), &mut vars).unwrap();
        assert!(model.actual.is_finite_deformation());
        assert!(model.actual.is_symmetric());
        assert!(vars.has(Variable::KirchhoffStress));
        assert!(!vars.has(Variable::ActiveChains));
    }

    #[test]
    fn new_captures_errors() {
        let mut vars = InternalVariables::new(1, 8);
        let mut param = ParamSolid::sample_linear_elastic();
        param.density = -1.0;
        assert_eq!(
            ConstitutiveModel::new(&param, &mut vars).err(),
            Some("density must be ≥ 0.0")
        );
    }
}
