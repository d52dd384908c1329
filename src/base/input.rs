use super::{BasicMesh, BoundaryCondition, Config, ParamNewmark, ParamPart};
use crate::StrError;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Holds the nonlinear solver options of an input file
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ParamNonlinear {
    /// Tolerance on the displacement increment norm
    pub displacement_tolerance: Option<f64>,

    /// Tolerance on the residual force norm
    pub residual_tolerance: Option<f64>,

    /// Uses absolute norms in the convergence criterion
    #[serde(default)]
    pub absolute_tolerance: bool,

    /// Maximum number of Newton-Raphson iterations per load step
    pub max_iterations: Option<usize>,

    /// Uses the full matrix storage even if all tangents are symmetric
    #[serde(default)]
    pub ignore_jacobian_symmetry: bool,
}

/// Holds the (pseudo) time controls of an input file
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ParamTime {
    /// Initial time
    pub start: f64,

    /// Final time
    pub end: f64,

    /// Initial increment
    pub step_size: f64,

    /// Minimum increment
    pub min_step_size: Option<f64>,

    /// Maximum increment
    pub max_step_size: Option<f64>,

    /// Disables the adaptive load stepping
    #[serde(default)]
    pub fixed_step_size: bool,
}

/// Holds the output options of an input file
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ParamOutput {
    /// Writes an output file every `every` converged steps (0 disables output)
    #[serde(default)]
    pub every: usize,

    /// Output directory
    pub directory: Option<String>,
}

/// Holds all data of a simulation as read from a JSON input file
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SimulationInput {
    /// Holds the name of the simulation (used as the filename stem of the output files)
    pub name: String,

    /// Holds the mesh
    pub mesh: BasicMesh,

    /// Holds the materials assigned to the volume regions
    pub parts: Vec<ParamPart>,

    /// Holds the boundary conditions
    #[serde(default)]
    pub boundaries: Vec<BoundaryCondition>,

    /// Holds the nonlinear options
    #[serde(default)]
    pub nonlinear: ParamNonlinear,

    /// Holds the time controls
    pub time: ParamTime,

    /// Holds the output options
    #[serde(default)]
    pub output: ParamOutput,

    /// Holds the Newmark-β parameters (for validation only)
    pub newmark: Option<ParamNewmark>,

    /// Holds the number of worker threads (0 means default)
    #[serde(default)]
    pub n_threads: usize,
}

impl SimulationInput {
    /// Parses a JSON string
    pub fn from_str(json: &str) -> Result<Self, StrError> {
        let input: SimulationInput = serde_json::from_str(json).map_err(|_| "cannot parse JSON input")?;
        input.validate()?;
        Ok(input)
    }

    /// Reads a JSON file
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn read_json<P>(full_path: &P) -> Result<Self, StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        let file = File::open(path).map_err(|_| "cannot open input file")?;
        let buffered = BufReader::new(file);
        let input: SimulationInput = serde_json::from_reader(buffered).map_err(|_| "cannot parse JSON input")?;
        input.validate()?;
        Ok(input)
    }

    /// Checks the consistency of the input data
    pub fn validate(&self) -> Result<(), StrError> {
        self.mesh.validate()?;
        if self.parts.is_empty() {
            return Err("input must define at least one part");
        }
        for part in &self.parts {
            part.material.validate()?;
        }
        for bc in &self.boundaries {
            bc.validate()?;
        }
        Ok(())
    }

    /// Returns the solver configuration
    pub fn config(&self) -> Result<Config, StrError> {
        let mut config = Config::new();
        let tol_d = self.nonlinear.displacement_tolerance.unwrap_or(config.tol_displacement);
        let tol_r = self.nonlinear.residual_tolerance.unwrap_or(config.tol_residual);
        config
            .set_tolerances(tol_d, tol_r)?
            .set_absolute_tolerance(self.nonlinear.absolute_tolerance)?
            .set_time(self.time.start, self.time.end, self.time.step_size)?
            .set_adaptive(!self.time.fixed_step_size)?
            .set_ignore_jacobian_symmetry(self.nonlinear.ignore_jacobian_symmetry)?
            .set_output_every(self.output.every)?
            .set_n_threads(self.n_threads)?;
        if let Some(n) = self.nonlinear.max_iterations {
            config.set_n_max_iterations(n)?;
        }
        let dt_min = self.time.min_step_size.unwrap_or(config.dt_min);
        let dt_max = self.time.max_step_size.unwrap_or(config.dt_max);
        config.set_increment_bounds(dt_min, dt_max)?;
        if let Some(newmark) = self.newmark {
            config.set_newmark(newmark.beta, newmark.gamma)?;
        }
        if let Some(message) = config.validate() {
            println!("ERROR: {}", message);
            return Err("input file has invalid solver options");
        }
        Ok(config)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
