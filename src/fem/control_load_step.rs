use crate::base::Config;
use crate::StrError;

/// Growth factor applied to the increment after a fast convergence
const GROWTH_FACTOR: f64 = 1.5;

/// Reduction factor applied to the increment after a failed step
const CUTBACK_FACTOR: f64 = 0.5;

/// Controls the (pseudo) time increments of the load stepping
///
/// The load factor is the (pseudo) time `t` in `[t_ini, t_fin]`. After a converged
/// step, the increment grows by 1.5 if the Newton-Raphson iterations took at most
/// one third of the allowed maximum (adaptive mode only). After a failed step,
/// the increment is halved and the step is retried from the last converged time.
pub struct AdaptiveLoadStep<'a> {
    /// Holds configuration parameters
    config: &'a Config,

    /// Holds the last converged time
    t: f64,

    /// Holds the current increment (before capping at the end of the interval)
    dt: f64,

    /// Holds the number of converged steps
    n_converged: usize,

    /// Holds the number of failed attempts of the current step
    n_failed: usize,
}

impl<'a> AdaptiveLoadStep<'a> {
    /// Allocates a new instance starting at `t_ini` with `dt_ini` (capped at `dt_max`)
    pub fn new(config: &'a Config) -> Self {
        AdaptiveLoadStep {
            config,
            t: config.t_ini,
            dt: f64::min(config.dt_ini, config.dt_max),
            n_converged: 0,
            n_failed: 0,
        }
    }

    /// Returns the last converged time
    pub fn time(&self) -> f64 {
        self.t
    }

    /// Returns the increment for the next step
    ///
    /// The increment is capped such that the final time is reached exactly.
    pub fn increment(&self) -> f64 {
        let remaining = self.config.t_fin - self.t;
        if self.dt >= remaining - self.tolerance() {
            remaining
        } else {
            self.dt
        }
    }

    /// Returns the time at the end of the next step
    pub fn next_time(&self) -> f64 {
        if self.increment() == self.config.t_fin - self.t {
            self.config.t_fin
        } else {
            self.t + self.dt
        }
    }

    /// Returns true if the final time has been reached
    pub fn is_done(&self) -> bool {
        self.config.t_fin - self.t <= self.tolerance()
    }

    /// Returns the number of converged steps
    pub fn n_converged(&self) -> usize {
        self.n_converged
    }

    /// Returns the number of failed attempts of the current step
    pub fn n_failed(&self) -> usize {
        self.n_failed
    }

    /// Advances the time after a converged step
    ///
    /// # Input
    ///
    /// * `n_iterations` -- the number of iterations needed to converge
    pub fn converged(&mut self, n_iterations: usize) {
        self.t = self.next_time();
        self.n_converged += 1;
        self.n_failed = 0;
        if self.config.adaptive && 3 * n_iterations <= self.config.n_max_iterations {
            self.dt = f64::min(GROWTH_FACTOR * self.dt, self.config.dt_max);
        }
    }

    /// Reduces the increment after a failed step
    ///
    /// # Input
    ///
    /// * `message` -- the reason of the failure
    ///
    /// Returns `message` as the error if the adaptive mode is disabled, or an error if
    /// the reduced increment is smaller than `dt_min`.
    pub fn failed(&mut self, message: StrError) -> Result<(), StrError> {
        if !self.config.adaptive {
            return Err(message);
        }
        let dt = CUTBACK_FACTOR * self.increment();
        if dt < self.config.dt_min {
            return Err("load increment is smaller than the allowed minimum");
        }
        self.dt = dt;
        self.n_failed += 1;
        Ok(())
    }

    /// Returns the tolerance used to compare times
    fn tolerance(&self) -> f64 {
        1e-12 * f64::max(1.0, f64::abs(self.config.t_fin))
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
