use super::SparsityPattern;
use crate::base::Config;
use crate::StrError;
use russell_lab::Vector;
use russell_sparse::{CooMatrix, LinSolver, Sym};

/// Holds variables to solve the global linear system `K Δd = R`
pub struct LinearSystem<'a> {
    /// Total number of global equations (total number of DOFs)
    pub n_equation: usize,

    /// Holds the supremum of the number of nonzero values (nnz) in the global matrix
    ///
    /// If the matrix is symmetric and the solver requires a triangular storage,
    /// only the lower triangle (including the diagonal) is stored.
    pub nnz_sup: usize,

    /// Holds the storage symmetry of the global matrix
    pub sym: Sym,

    /// Holds the residual vector R = F_ext - F_int (with zero constrained entries)
    pub rr: Vector,

    /// Holds the global stiffness matrix K
    pub kk: CooMatrix,

    /// Holds the linear solver
    pub solver: LinSolver<'a>,

    /// Holds the displacement increment Δd (the solution of the linear system)
    pub ddu: Vector,
}

impl<'a> LinearSystem<'a> {
    /// Allocates a new instance
    ///
    /// # Input
    ///
    /// * `config` -- the configuration holding the linear solver type
    /// * `pattern` -- the sparsity pattern of the global matrix
    /// * `symmetric` -- indicates that all element matrices are symmetric
    ///
    /// The full (non-symmetric) storage is used if `config.ignore_jacobian_symmetry` is true.
    pub fn new(config: &Config, pattern: &SparsityPattern, symmetric: bool) -> Result<Self, StrError> {
        let n_equation = pattern.n_equation();
        let sym = if config.ignore_jacobian_symmetry {
            Sym::No
        } else {
            config.lin_sol_genie.get_sym(symmetric)
        };
        let nnz_sup = if sym.triangular() {
            pattern.entries().iter().filter(|(i, j)| i >= j).count()
        } else {
            pattern.nnz()
        };
        Ok(LinearSystem {
            n_equation,
            nnz_sup,
            sym,
            rr: Vector::new(n_equation),
            kk: CooMatrix::new(n_equation, n_equation, nnz_sup, sym)?,
            solver: LinSolver::new(config.lin_sol_genie)?,
            ddu: Vector::new(n_equation),
        })
    }

    /// Puts the assembled values into the sparse matrix and enforces the essential conditions
    ///
    /// The off-diagonal entries of the constrained rows and columns are skipped; the
    /// diagonal is kept (or set to one if it is zero). Together with zero residuals at the
    /// constrained equations, this yields a zero increment at the constrained DOFs.
    ///
    /// # Input
    ///
    /// * `pattern` -- the sparsity pattern
    /// * `values` -- the assembled values (nnz), aligned with `pattern.entries()`
    /// * `constrained` -- the flags of the constrained equations (n_equation)
    pub fn put_stiffness(&mut self, pattern: &SparsityPattern, values: &[f64], constrained: &[bool]) -> Result<(), StrError> {
        let triangular = self.sym.triangular();
        let coo = &mut self.kk;
        coo.reset();
        for ((i, j), value) in pattern.entries().iter().zip(values) {
            if triangular && i < j {
                continue;
            }
            if i == j {
                let diagonal = if *value == 0.0 { 1.0 } else { *value };
                coo.put(*i, *j, diagonal)?;
            } else if !constrained[*i] && !constrained[*j] {
                coo.put(*i, *j, *value)?;
            }
        }
        Ok(())
    }

    /// Factorizes the matrix and solves the linear system for the increment
    pub fn solve(&mut self, verbose: bool) -> Result<(), StrError> {
        self.solver.actual.factorize(&self.kk, None)?;
        self.solver.actual.solve(&mut self.ddu, &self.rr, verbose)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
