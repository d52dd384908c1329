use crate::StrError;
use serde::{Deserialize, Serialize};

/// Holds parameters for stress-strain relations
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub enum ParamStressStrain {
    /// Isotropic linear elasticity (small strain)
    IsotropicLinearElasticity {
        /// Young's modulus
        young: f64,

        /// Poisson's coefficient
        poisson: f64,
    },

    /// J2 (von Mises) plasticity with linear isotropic hardening (small strain)
    J2Plasticity {
        /// Young's modulus
        young: f64,

        /// Poisson's coefficient
        poisson: f64,

        /// Initial yield stress σy
        yield_stress: f64,

        /// Isotropic hardening modulus H such that `σy(εp) = σy + H εp`
        #[serde(default)]
        hardening: f64,
    },

    /// Compressible Neo-Hookean hyperelasticity (finite deformation)
    NeoHooke {
        /// Bulk modulus K of the volumetric free energy
        bulk: f64,

        /// Shear modulus μ
        shear: f64,
    },

    /// Affine microsphere with Gaussian chains (finite deformation)
    GaussianAffineMicrosphere {
        /// Bulk modulus K of the volumetric free energy
        bulk: f64,

        /// Shear modulus μ = n k T of the chain network
        shear: f64,
    },

    /// Affine microsphere hyperelasticity (finite deformation)
    AffineMicrosphere {
        /// Bulk modulus K of the volumetric free energy
        bulk: f64,

        /// Initial shear modulus μ = n k T of the chain network
        shear: f64,

        /// Number of segments per chain N
        segments_per_chain: f64,

        /// Rate of the first-order decay of the number of active chains (ageing)
        #[serde(default)]
        chain_decay_rate: f64,
    },
}

impl ParamStressStrain {
    /// Returns the name of the model
    pub fn name(&self) -> &'static str {
        match self {
            ParamStressStrain::IsotropicLinearElasticity { .. } => "IsotropicLinearElasticity",
            ParamStressStrain::J2Plasticity { .. } => "J2Plasticity",
            ParamStressStrain::NeoHooke { .. } => "NeoHooke",
            ParamStressStrain::GaussianAffineMicrosphere { .. } => "GaussianAffineMicrosphere",
            ParamStressStrain::AffineMicrosphere { .. } => "AffineMicrosphere",
        }
    }

    /// Checks the parameter values
    pub fn validate(&self) -> Result<(), StrError> {
        match *self {
            ParamStressStrain::IsotropicLinearElasticity { young, poisson } => check_elastic(young, poisson),
            ParamStressStrain::J2Plasticity {
                young,
                poisson,
                yield_stress,
                hardening,
            } => {
                check_elastic(young, poisson)?;
                if yield_stress <= 0.0 {
                    return Err("yield stress must be > 0.0");
                }
                if hardening < 0.0 {
                    return Err("hardening modulus must be ≥ 0.0");
                }
                Ok(())
            }
            ParamStressStrain::NeoHooke { bulk, shear }
            | ParamStressStrain::GaussianAffineMicrosphere { bulk, shear } => check_bulk_shear(bulk, shear),
            ParamStressStrain::AffineMicrosphere {
                bulk,
                shear,
                segments_per_chain,
                chain_decay_rate,
            } => {
                check_bulk_shear(bulk, shear)?;
                if segments_per_chain <= 1.0 {
                    return Err("number of segments per chain must be > 1.0");
                }
                if chain_decay_rate < 0.0 {
                    return Err("chain decay rate must be ≥ 0.0");
                }
                Ok(())
            }
        }
    }
}

/// Checks the elastic constants
fn check_elastic(young: f64, poisson: f64) -> Result<(), StrError> {
    if young <= 0.0 {
        return Err("Young's modulus must be > 0.0");
    }
    if poisson <= -1.0 || poisson >= 0.5 {
        return Err("Poisson's coefficient must be in (-1.0, 0.5)");
    }
    Ok(())
}

/// Checks the moduli of the hyperelastic models
fn check_bulk_shear(bulk: f64, shear: f64) -> Result<(), StrError> {
    if bulk <= 0.0 {
        return Err("bulk modulus must be > 0.0");
    }
    if shear <= 0.0 {
        return Err("shear modulus must be > 0.0");
    }
    Ok(())
}

/// Holds parameters for solid materials
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct ParamSolid {
    /// Intrinsic (real) density
    #[serde(default)]
    pub density: f64,

    /// Stress-strain model
    pub stress_strain: ParamStressStrain,
}

impl ParamSolid {
    /// Checks the parameter values
    pub fn validate(&self) -> Result<(), StrError> {
        if self.density < 0.0 {
            return Err("density must be ≥ 0.0");
        }
        self.stress_strain.validate()
    }

    /// Returns sample parameters for linear elasticity (steel in MPa and tonne/mm³)
    pub fn sample_linear_elastic() -> Self {
        ParamSolid {
            density: 7.8e-9,
            stress_strain: ParamStressStrain::IsotropicLinearElasticity {
                young: 200_000.0,
                poisson: 0.3,
            },
        }
    }

    /// Returns sample parameters for J2 plasticity (steel in MPa and tonne/mm³)
    pub fn sample_j2_plasticity() -> Self {
        ParamSolid {
            density: 7.8e-9,
            stress_strain: ParamStressStrain::J2Plasticity {
                young: 200_000.0,
                poisson: 0.3,
                yield_stress: 200.0,
                hardening: 400.0,
            },
        }
    }

    /// Returns sample parameters for the Neo-Hookean model (rubber in MPa)
    pub fn sample_neo_hooke() -> Self {
        ParamSolid {
            density: 1.0e-9,
            stress_strain: ParamStressStrain::NeoHooke {
                bulk: 100.0,
                shear: 1.0,
            },
        }
    }

    /// Returns sample parameters for the Gaussian affine microsphere model (rubber in MPa)
    pub fn sample_gaussian_affine_microsphere() -> Self {
        ParamSolid {
            density: 1.0e-9,
            stress_strain: ParamStressStrain::GaussianAffineMicrosphere {
                bulk: 100.0,
                shear: 1.0,
            },
        }
    }

    /// Returns sample parameters for the affine microsphere model (rubber in MPa)
    pub fn sample_affine_microsphere() -> Self {
        ParamSolid {
            density: 1.0e-9,
            stress_strain: ParamStressStrain::AffineMicrosphere {
                bulk: 100.0,
                shear: 1.0,
                segments_per_chain: 25.0,
                chain_decay_rate: 0.0,
            },
        }
    }
}

/// Holds the material assigned to a named volume submesh
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ParamPart {
    /// Holds the name of the volume submesh
    pub name: String,

    /// Holds the material parameters
    pub material: ParamSolid,
}

/// Holds the parameters of the Newmark-β time integration scheme
#[derive(Clone, Copy, Debug, Deserialize, Serialize)]
pub struct ParamNewmark {
    /// β parameter
    pub beta: f64,

    /// γ parameter (numerical viscosity)
    pub gamma: f64,
}

impl ParamNewmark {
    /// Returns the average-acceleration parameters (β = 1/4, γ = 1/2)
    pub fn average_acceleration() -> Self {
        ParamNewmark { beta: 0.25, gamma: 0.5 }
    }

    /// Evaluates the stability condition `β ≥ γ/2 ≥ 1/4` as two independent inequalities
    pub fn stable(&self) -> bool {
        self.beta >= self.gamma / 2.0 && self.gamma / 2.0 >= 0.25
    }

    /// Evaluates the stability condition as the chained comparison `(β ≥ γ/2) ≥ 1/4`
    ///
    /// The boolean result of the first comparison is promoted to 0 or 1 and then
    /// compared with 1/4; thus, only `β ≥ γ/2` is effectively checked.
    pub fn stable_as_observed(&self) -> bool {
        let first = if self.beta >= self.gamma / 2.0 { 1.0 } else { 0.0 };
        first >= 0.25
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
