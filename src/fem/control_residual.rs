use crate::base::Config;

/// Decides whether the Newton-Raphson iterations have converged
///
/// In relative mode (default), the ratios are:
///
/// ```text
/// displacement_ratio = ‖Δd‖ / ‖d‖
/// residual_ratio     = ‖R‖ / max(‖R₀‖, ‖F_ext‖, ‖F_int‖)
/// ```
///
/// where `R₀` is the residual at the first iteration of the load step. If both force
/// norms vanish, the residual ratio is set to 1.0, thus a step without applied loads
/// and without internal resistance is never reported as converged. If `‖d‖ = 0`,
/// the displacement ratio is the increment norm itself.
///
/// In absolute mode, the ratios are the norms themselves.
pub struct ResidualControl<'a> {
    config: &'a Config,
    initial_residual: f64,
    norm_increment: f64,
    norm_residual: f64,
    displacement_ratio: f64,
    residual_ratio: f64,
}

impl<'a> ResidualControl<'a> {
    /// Allocates a new instance
    pub fn new(config: &'a Config) -> Self {
        ResidualControl {
            config,
            initial_residual: 0.0,
            norm_increment: 0.0,
            norm_residual: 0.0,
            displacement_ratio: 1.0,
            residual_ratio: 1.0,
        }
    }

    /// Sets the residual norm used as the normalization base during the load step
    pub fn set_initial_residual(&mut self, norm: f64) {
        self.initial_residual = norm;
        self.norm_residual = norm;
        self.displacement_ratio = 1.0;
        self.residual_ratio = 1.0;
    }

    /// Updates the convergence ratios
    ///
    /// # Input
    ///
    /// * `displacement_norm` -- norm of the total displacement vector
    /// * `increment_norm` -- norm of the last displacement increment
    /// * `residual_norm` -- norm of the residual vector (without the constrained equations)
    /// * `external_force_norm` -- norm of the external force vector
    /// * `internal_force_norm` -- norm of the internal force vector
    pub fn update(
        &mut self,
        displacement_norm: f64,
        increment_norm: f64,
        residual_norm: f64,
        external_force_norm: f64,
        internal_force_norm: f64,
    ) {
        self.norm_increment = increment_norm;
        self.norm_residual = residual_norm;
        if self.config.absolute_tolerance {
            self.displacement_ratio = increment_norm;
            self.residual_ratio = residual_norm;
            return;
        }
        self.displacement_ratio = if displacement_norm > 0.0 {
            increment_norm / displacement_norm
        } else {
            increment_norm
        };
        let max_force = f64::max(external_force_norm, internal_force_norm);
        self.residual_ratio = if max_force <= f64::EPSILON {
            1.0
        } else {
            residual_norm / f64::max(self.initial_residual, max_force)
        };
    }

    /// Returns true if both ratios satisfy their tolerances
    pub fn is_converged(&self) -> bool {
        self.displacement_ratio <= self.config.tol_displacement && self.residual_ratio <= self.config.tol_residual
    }

    /// Returns the displacement ratio
    pub fn displacement_ratio(&self) -> f64 {
        self.displacement_ratio
    }

    /// Returns the residual ratio
    pub fn residual_ratio(&self) -> f64 {
        self.residual_ratio
    }

    /// Prints the header of the convergence table
    pub fn print_header(&self) {
        if self.config.verbose_timesteps || self.config.verbose_iterations {
            println!("\nSOLIDSIM === LOAD STEPPING AND CONVERGENCE STATISTICS ========================");
            println!("\nLegend:");
            println!("✅ : converged");
            println!("🔹 : converging");
            println!("\"iter\" means iteration\n");
            println!("{}", "─".repeat(79));
            println!(
                "{:8} {:>11} {:>11} {:>5} {:>9} {:>9} {:>9} {:>9}",
                "step", "t", "Δt", "iter", "‖Δd‖", "rel(Δd)", "‖R‖", "rel(R)"
            );
            println!("{}", "─".repeat(79));
        }
    }

    /// Prints the load step information
    pub(crate) fn print_timestep(&self, step: usize, t: f64, dt: f64) {
        if self.config.verbose_timesteps {
            println!("{:>8} {:>11.6e} {:>11.6e}", step + 1, t, dt);
        }
    }

    /// Prints the iteration information
    pub(crate) fn print_iteration(&self, iteration: usize) {
        if self.config.verbose_iterations {
            if iteration == 0 {
                println!(
                    "{:>8} {:>11} {:>11} {:>5} {:>9} {:>9} {:>9.2e} {:>9}",
                    "·", "·", "·", iteration, "·", "·", self.norm_residual, "·"
                );
            } else {
                let icon = if self.is_converged() { "✅" } else { "🔹" };
                println!(
                    "{:>8} {:>11} {:>11} {:>5} {:>9.2e} {:>9.2e} {:>9.2e} {:>9.2e} {}",
                    "·",
                    "·",
                    "·",
                    iteration,
                    self.norm_increment,
                    self.displacement_ratio,
                    self.norm_residual,
                    self.residual_ratio,
                    icon
                );
            }
        }
    }

    /// Prints a message when the load step is cut back
    pub(crate) fn print_retry(&self, message: &str, dt_new: f64) {
        if self.config.verbose_timesteps || self.config.verbose_iterations {
            println!("{:>8} {} ; retrying with Δt = {:.6e}", "⟲", message, dt_new);
        }
    }

    /// Prints the horizontal line at the end of the analysis
    pub(crate) fn print_footer(&self) {
        if self.config.verbose_timesteps || self.config.verbose_iterations {
            println!("{}", "─".repeat(79));
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::ResidualControl;
    use crate::base::Config;
    use russell_lab::approx_eq;

    #[test]
    fn degenerate_forces_give_unit_ratio() {
        let config = Config::new();
        let mut control = ResidualControl::new(&config);
        control.set_initial_residual(0.0);
        control.update(1.0, 0.0, 0.0, 0.0, 0.0);
        assert_eq!(control.residual_ratio(), 1.0);
        assert_eq!(control.displacement_ratio(), 0.0);
        assert!(!control.is_converged());
    }

    #[test]
    fn relative_mode_works() {
        let config = Config::new();
        let mut control = ResidualControl::new(&config);
        assert!(!control.is_converged());

        control.set_initial_residual(10.0);
        control.update(2.0, 0.5, 1.0, 4.0, 3.0);
        approx_eq(control.displacement_ratio(), 0.25, 1e-15);
        approx_eq(control.residual_ratio(), 0.1, 1e-15);
        assert!(!control.is_converged());

        // the forces may exceed the initial residual
        control.update(2.0, 1e-4, 1e-3, 20.0, 5.0);
        approx_eq(control.displacement_ratio(), 5e-5, 1e-15);
        approx_eq(control.residual_ratio(), 5e-5, 1e-15);
        assert!(control.is_converged());

        // zero displacement
        control.update(0.0, 1e-4, 1e-3, 20.0, 5.0);
        approx_eq(control.displacement_ratio(), 1e-4, 1e-15);
        assert!(control.is_converged());

        // new step resets the ratios
        control.set_initial_residual(1.0);
        assert!(!control.is_converged());
    }

    #[test]
    fn absolute_mode_works() {
        let mut config = Config::new();
        config.set_tolerances(1e-6, 1e-8).unwrap().set_absolute_tolerance(true).unwrap();
        let mut control = ResidualControl::new(&config);
        control.set_initial_residual(1e3);
        control.update(1.0, 1e-7, 1e-9, 0.0, 0.0);
        assert_eq!(control.displacement_ratio(), 1e-7);
        assert_eq!(control.residual_ratio(), 1e-9);
        assert!(control.is_converged());
        control.update(1.0, 1e-7, 1e-7, 0.0, 0.0);
        assert!(!control.is_converged());
    }
}
