use super::{AdaptiveLoadStep, FemMesh, FemState, FileIo, LinearSystem, ResidualControl, SparsityPattern};
use crate::base::Config;
use crate::StrError;
use rayon::prelude::*;
use russell_lab::{vec_norm, Matrix, Norm, Vector};

/// Holds the outcome of the equilibrium iterations of one load step
#[derive(Debug, PartialEq)]
enum StepOutcome {
    /// The iterations converged after the given number of linear solutions
    Converged(usize),

    /// The iterations failed with a recoverable error; the step may be retried
    Failed(StrError),
}

/// Implements the nonlinear static solver (Newton-Raphson with adaptive load stepping)
///
/// Each load step applies the prescribed displacements and external forces at the
/// new (pseudo) time and iterates `K Δd = F_ext - F_int` until [ResidualControl]
/// reports convergence. The element matrices and vectors are computed in parallel
/// and added to the global arrays sequentially, in element order.
///
/// Failures of the constitutive update (distorted elements, non-converged return
/// mapping, floating point errors), failures of the linear solver (e.g., a singular
/// stiffness matrix) and exhausted iterations make the step fail. The displacements,
/// the current coordinates and the internal variables are then reverted to the last
/// converged state and [AdaptiveLoadStep] decides whether the step is retried with a
/// smaller increment.
pub struct SolverStatic<'a> {
    /// Holds configuration parameters
    config: &'a Config,

    /// Holds the sparsity pattern (computed once)
    pattern: SparsityPattern,

    /// Holds variables to solve the global linear system
    linear_system: LinearSystem<'a>,
}

impl<'a> SolverStatic<'a> {
    /// Allocates a new instance
    pub fn new(config: &'a Config, fem: &FemMesh) -> Result<Self, StrError> {
        if let Some(message) = config.validate() {
            println!("ERROR: {}", message);
            return Err("cannot allocate simulation because config.validate() failed");
        }
        let pattern = SparsityPattern::new(fem);
        let linear_system = LinearSystem::new(config, &pattern, fem.is_symmetric())?;
        Ok(SolverStatic {
            config,
            pattern,
            linear_system,
        })
    }

    /// Solves the equilibrium problem from `t_ini` to `t_fin`
    ///
    /// The summary file is written even if the simulation fails.
    pub fn solve(&mut self, fem: &mut FemMesh, state: &mut FemState, file_io: &mut FileIo) -> Result<(), StrError> {
        let mut control = ResidualControl::new(self.config);
        control.print_header();
        let result = self.run(fem, state, file_io, &mut control);
        control.print_footer();
        file_io.write_self()?;
        result
    }

    /// Runs the load stepping
    fn run(
        &mut self,
        fem: &mut FemMesh,
        state: &mut FemState,
        file_io: &mut FileIo,
        control: &mut ResidualControl,
    ) -> Result<(), StrError> {
        let mut stepper = AdaptiveLoadStep::new(self.config);
        state.t = stepper.time();
        state.n_step = 0;
        if file_io.is_due(0, false) {
            file_io.write_state(fem, state)?;
        }
        let mut committed = state.displacement.clone();
        while !stepper.is_done() {
            let dt = stepper.increment();
            let t_new = stepper.next_time();
            control.print_timestep(stepper.n_converged(), t_new, dt);
            match self.equilibrium(fem, state, control, t_new, dt)? {
                StepOutcome::Converged(n_iterations) => {
                    fem.save_internal_variables(true);
                    stepper.converged(n_iterations);
                    state.t = stepper.time();
                    state.dt = dt;
                    state.n_step = stepper.n_converged();
                    committed.as_mut_data().copy_from_slice(state.displacement.as_data());
                    if file_io.is_due(state.n_step, stepper.is_done()) {
                        file_io.write_state(fem, state)?;
                    }
                }
                StepOutcome::Failed(message) => {
                    revert(fem, state, &committed)?;
                    stepper.failed(message).map_err(|err| {
                        println!("ERROR: {} at t = {:?}", message, t_new);
                        err
                    })?;
                    control.print_retry(message, stepper.increment());
                }
            }
        }
        Ok(())
    }

    /// Performs the Newton-Raphson iterations of one load step
    fn equilibrium(
        &mut self,
        fem: &mut FemMesh,
        state: &mut FemState,
        control: &mut ResidualControl,
        t: f64,
        dt: f64,
    ) -> Result<StepOutcome, StrError> {
        // trial state with the prescribed displacements at the new time
        fem.apply_displacement_boundaries(&mut state.displacement, t);
        let ff_ext = fem.external_force(t)?;
        let norm_ff_ext = vec_norm(&ff_ext, Norm::Euc);
        if let Err(message) = fem.update_internal_variables(&state.displacement, dt) {
            return Ok(StepOutcome::Failed(message));
        }

        // iterations
        let n_dof = fem.n_dof();
        let mut norm_ddu = 0.0;
        for iteration in 0..=self.config.n_max_iterations {
            // residual
            let ff_int = match self.assemble_internal_force(fem) {
                Ok(ff_int) => ff_int,
                Err(message) => return Ok(StepOutcome::Failed(message)),
            };
            let rr = &mut self.linear_system.rr;
            for i in 0..n_dof {
                rr[i] = if fem.constrained()[i] { 0.0 } else { ff_ext[i] - ff_int[i] };
            }
            let norm_rr = vec_norm(rr, Norm::Euc);
            if !norm_rr.is_finite() {
                return Ok(StepOutcome::Failed("floating point error reported"));
            }

            // check convergence
            if iteration == 0 {
                control.set_initial_residual(norm_rr);
            } else {
                let norm_uu = vec_norm(&state.displacement, Norm::Euc);
                let norm_ff_int = vec_norm(&ff_int, Norm::Euc);
                control.update(norm_uu, norm_ddu, norm_rr, norm_ff_ext, norm_ff_int);
            }
            control.print_iteration(iteration);
            if iteration > 0 && control.is_converged() {
                return Ok(StepOutcome::Converged(iteration));
            }
            if iteration == self.config.n_max_iterations {
                break;
            }

            // tangent and increment
            let values = match self.assemble_stiffness(fem) {
                Ok(values) => values,
                Err(message) => return Ok(StepOutcome::Failed(message)),
            };
            if let Err(message) = self.linear_system.put_stiffness(&self.pattern, &values, fem.constrained()) {
                return Ok(StepOutcome::Failed(message));
            }
            if let Err(message) = self.linear_system.solve(self.config.verbose_lin_sys_solve) {
                return Ok(StepOutcome::Failed(message));
            }
            let ddu = &self.linear_system.ddu;
            for i in 0..n_dof {
                state.displacement[i] += ddu[i];
            }
            norm_ddu = vec_norm(ddu, Norm::Euc);

            // constitutive update
            if let Err(message) = fem.update_internal_variables(&state.displacement, dt) {
                return Ok(StepOutcome::Failed(message));
            }
        }
        Ok(StepOutcome::Failed("Newton-Raphson iterations did not converge"))
    }

    /// Computes the element internal forces in parallel and assembles the global vector
    fn assemble_internal_force(&self, fem: &FemMesh) -> Result<Vector, StrError> {
        let mut ff_int = Vector::new(fem.n_dof());
        for submesh in &fem.submeshes {
            let locals = (0..submesh.n_element())
                .into_par_iter()
                .map(|e| submesh.internal_force(e, &fem.coordinates))
                .collect::<Result<Vec<Vector>, StrError>>()?;
            for (e, local) in locals.iter().enumerate() {
                for (a, dof) in submesh.dof_indices(e).iter().enumerate() {
                    ff_int[*dof] += local[a];
                }
            }
        }
        Ok(ff_int)
    }

    /// Computes the element stiffness matrices in parallel and assembles the values of the global matrix
    ///
    /// Returns the values aligned with the entries of the sparsity pattern.
    fn assemble_stiffness(&self, fem: &FemMesh) -> Result<Vec<f64>, StrError> {
        let mut values = vec![0.0; self.pattern.nnz()];
        for (s, submesh) in fem.submeshes.iter().enumerate() {
            let locals = (0..submesh.n_element())
                .into_par_iter()
                .map(|e| submesh.tangent_stiffness(e, &fem.coordinates))
                .collect::<Result<Vec<Matrix>, StrError>>()?;
            for (e, kk) in locals.iter().enumerate() {
                let slots = self.pattern.element_slots(s, e);
                let (n, _) = kk.dims();
                for i in 0..n {
                    for j in 0..n {
                        values[slots[i * n + j]] += kk.get(i, j);
                    }
                }
            }
        }
        Ok(values)
    }
}

/// Restores the displacements, the current coordinates and the internal variables of the last converged state
fn revert(fem: &mut FemMesh, state: &mut FemState, committed: &Vector) -> Result<(), StrError> {
    state.displacement.as_mut_data().copy_from_slice(committed.as_data());
    fem.coordinates.update(committed)?;
    fem.save_internal_variables(false);
    Ok(())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
