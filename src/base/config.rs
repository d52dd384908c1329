use super::ParamNewmark;
use crate::StrError;
use russell_sparse::Genie;
use std::fmt;

/// Holds configuration parameters for the nonlinear static solver
#[derive(Clone, Debug)]
pub struct Config {
    /// Tolerance on the (relative) displacement increment norm
    pub tol_displacement: f64,

    /// Tolerance on the (relative) residual force norm
    pub tol_residual: f64,

    /// Uses absolute norms instead of relative norms in the convergence criterion
    pub absolute_tolerance: bool,

    /// Maximum number of Newton-Raphson iterations per load step
    pub n_max_iterations: usize,

    /// Initial (pseudo) time
    pub t_ini: f64,

    /// Final (pseudo) time
    pub t_fin: f64,

    /// Initial load (time) increment
    pub dt_ini: f64,

    /// Minimum load increment allowed when cutting back the step size
    pub dt_min: f64,

    /// Maximum load increment allowed when growing the step size
    pub dt_max: f64,

    /// Enables the adaptive load stepping (cut back on failure, grow on fast convergence)
    pub adaptive: bool,

    /// Linear solver type
    pub lin_sol_genie: Genie,

    /// Uses the full (non-symmetric) matrix storage even if all tangents are symmetric
    pub ignore_jacobian_symmetry: bool,

    /// Number of worker threads (0 means the default of the thread pool)
    pub n_threads: usize,

    /// Writes an output file every `output_every` converged steps (0 disables periodic output)
    pub output_every: usize,

    /// Parameters of the Newmark-β scheme (validated only)
    pub newmark: Option<ParamNewmark>,

    /// Shows the time-stepping messages
    pub verbose_timesteps: bool,

    /// Shows the Newton-Raphson iteration messages
    pub verbose_iterations: bool,

    /// Shows messages from the linear solver
    pub verbose_lin_sys_solve: bool,
}

impl Config {
    /// Allocates a new instance with default values
    pub fn new() -> Self {
        Config {
            tol_displacement: 1e-3,
            tol_residual: 1e-3,
            absolute_tolerance: false,
            n_max_iterations: 10,
            t_ini: 0.0,
            t_fin: 1.0,
            dt_ini: 1.0,
            dt_min: 1e-6,
            dt_max: 1.0,
            adaptive: true,
            lin_sol_genie: Genie::Umfpack,
            ignore_jacobian_symmetry: false,
            n_threads: 0,
            output_every: 1,
            newmark: None,
            verbose_timesteps: false,
            verbose_iterations: false,
            verbose_lin_sys_solve: false,
        }
    }

    /// Sets the tolerances on the displacement increment and residual norms
    pub fn set_tolerances(&mut self, displacement: f64, residual: f64) -> Result<&mut Self, StrError> {
        if displacement <= 0.0 || residual <= 0.0 {
            return Err("tolerances must be > 0.0");
        }
        self.tol_displacement = displacement;
        self.tol_residual = residual;
        Ok(self)
    }

    /// Sets absolute (instead of relative) norms in the convergence criterion
    pub fn set_absolute_tolerance(&mut self, flag: bool) -> Result<&mut Self, StrError> {
        self.absolute_tolerance = flag;
        Ok(self)
    }

    /// Sets the maximum number of Newton-Raphson iterations
    pub fn set_n_max_iterations(&mut self, value: usize) -> Result<&mut Self, StrError> {
        if value < 1 {
            return Err("the maximum number of iterations must be ≥ 1");
        }
        self.n_max_iterations = value;
        Ok(self)
    }

    /// Sets the (pseudo) time interval and the increments
    ///
    /// The maximum increment is set to the period and the minimum increment to
    /// `1e-6 × dt_ini`; use [Config::set_increment_bounds] to change them.
    pub fn set_time(&mut self, t_ini: f64, t_fin: f64, dt_ini: f64) -> Result<&mut Self, StrError> {
        if t_fin <= t_ini {
            return Err("t_fin must be greater than t_ini");
        }
        if dt_ini <= 0.0 {
            return Err("dt_ini must be > 0.0");
        }
        self.t_ini = t_ini;
        self.t_fin = t_fin;
        self.dt_ini = dt_ini;
        self.dt_min = 1e-6 * dt_ini;
        self.dt_max = t_fin - t_ini;
        Ok(self)
    }

    /// Sets the minimum and maximum load increments
    pub fn set_increment_bounds(&mut self, dt_min: f64, dt_max: f64) -> Result<&mut Self, StrError> {
        if dt_min <= 0.0 || dt_max < dt_min {
            return Err("increment bounds must satisfy 0 < dt_min ≤ dt_max");
        }
        self.dt_min = dt_min;
        self.dt_max = dt_max;
        Ok(self)
    }

    /// Enables or disables the adaptive load stepping
    pub fn set_adaptive(&mut self, flag: bool) -> Result<&mut Self, StrError> {
        self.adaptive = flag;
        Ok(self)
    }

    /// Sets the linear solver
    pub fn set_lin_sol_genie(&mut self, genie: Genie) -> Result<&mut Self, StrError> {
        self.lin_sol_genie = genie;
        Ok(self)
    }

    /// Sets the full matrix storage regardless of the symmetry of the tangents
    pub fn set_ignore_jacobian_symmetry(&mut self, flag: bool) -> Result<&mut Self, StrError> {
        self.ignore_jacobian_symmetry = flag;
        Ok(self)
    }

    /// Sets the number of worker threads (0 means default)
    pub fn set_n_threads(&mut self, value: usize) -> Result<&mut Self, StrError> {
        self.n_threads = value;
        Ok(self)
    }

    /// Sets the output cadence (number of converged steps between files; 0 disables)
    pub fn set_output_every(&mut self, value: usize) -> Result<&mut Self, StrError> {
        self.output_every = value;
        Ok(self)
    }

    /// Sets the parameters of the Newmark-β scheme
    pub fn set_newmark(&mut self, beta: f64, gamma: f64) -> Result<&mut Self, StrError> {
        if beta <= 0.0 || gamma <= 0.0 {
            return Err("Newmark parameters must be > 0.0");
        }
        self.newmark = Some(ParamNewmark { beta, gamma });
        Ok(self)
    }

    /// Sets the verbose flags
    pub fn set_verbose(&mut self, timesteps: bool, iterations: bool, lin_sys_solve: bool) -> Result<&mut Self, StrError> {
        self.verbose_timesteps = timesteps;
        self.verbose_iterations = iterations;
        self.verbose_lin_sys_solve = lin_sys_solve;
        Ok(self)
    }

    /// Validates all data
    ///
    /// Returns a message with the inconsistent data, or returns None if everything is all right.
    pub fn validate(&self) -> Option<String> {
        if self.tol_displacement <= 0.0 {
            return Some(format!("tol_displacement = {:?} is incorrect; it must be > 0.0", self.tol_displacement));
        }
        if self.tol_residual <= 0.0 {
            return Some(format!("tol_residual = {:?} is incorrect; it must be > 0.0", self.tol_residual));
        }
        if self.n_max_iterations < 1 {
            return Some(format!("n_max_iterations = {} is incorrect; it must be ≥ 1", self.n_max_iterations));
        }
        if self.t_fin <= self.t_ini {
            return Some(format!(
                "t_fin = {:?} is incorrect; it must be > t_ini = {:?}",
                self.t_fin, self.t_ini
            ));
        }
        if self.dt_ini <= 0.0 {
            return Some(format!("dt_ini = {:?} is incorrect; it must be > 0.0", self.dt_ini));
        }
        if self.dt_min <= 0.0 || self.dt_min > self.dt_ini {
            return Some(format!(
                "dt_min = {:?} is incorrect; it must satisfy 0 < dt_min ≤ dt_ini = {:?}",
                self.dt_min, self.dt_ini
            ));
        }
        if self.dt_max < self.dt_min {
            return Some(format!(
                "dt_max = {:?} is incorrect; it must be ≥ dt_min = {:?}",
                self.dt_max, self.dt_min
            ));
        }
        if let Some(newmark) = self.newmark {
            if !newmark.stable_as_observed() {
                return Some(format!(
                    "Newmark parameters β = {:?} and γ = {:?} are unstable; β ≥ γ/2 is required",
                    newmark.beta, newmark.gamma
                ));
            }
            if !newmark.stable() {
                println!(
                    "WARNING: Newmark parameters β = {:?} and γ = {:?} do not satisfy γ/2 ≥ 1/4",
                    newmark.beta, newmark.gamma
                );
            }
        }
        None
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Configuration data\n").unwrap();
        write!(f, "==================\n").unwrap();
        write!(f, "tol_displacement = {:?}\n", self.tol_displacement).unwrap();
        write!(f, "tol_residual = {:?}\n", self.tol_residual).unwrap();
        write!(f, "absolute_tolerance = {:?}\n", self.absolute_tolerance).unwrap();
        write!(f, "n_max_iterations = {:?}\n", self.n_max_iterations).unwrap();
        write!(f, "t_ini = {:?}\n", self.t_ini).unwrap();
        write!(f, "t_fin = {:?}\n", self.t_fin).unwrap();
        write!(f, "dt_ini = {:?}\n", self.dt_ini).unwrap();
        write!(f, "dt_min = {:?}\n", self.dt_min).unwrap();
        write!(f, "dt_max = {:?}\n", self.dt_max).unwrap();
        write!(f, "adaptive = {:?}\n", self.adaptive).unwrap();
        write!(f, "lin_sol_genie = {:?}\n", self.lin_sol_genie).unwrap();
        write!(f, "ignore_jacobian_symmetry = {:?}\n", self.ignore_jacobian_symmetry).unwrap();
        write!(f, "n_threads = {:?}\n", self.n_threads).unwrap();
        write!(f, "output_every = {:?}\n", self.output_every).unwrap();
        write!(f, "newmark = {:?}\n", self.newmark).unwrap();
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
