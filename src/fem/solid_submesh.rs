use super::MaterialCoordinates;
use crate::base::{BasicSubmesh, ParamSolid, Topology, NDIM};
use crate::material::{ConstitutiveModel, InternalVariables, Variable, VariableKind};
use crate::StrError;
use gemlab::integ::{self, Gauss};
use gemlab::recovery;
use gemlab::shapes::{GeoKind, Scratchpad};
use russell_lab::{Matrix, Vector};

/// Implements the element-level operations of a solid submesh
///
/// A solid submesh is a group of elements with the same topology and material.
/// It owns the constitutive model and the internal variables of all its quadrature
/// points, indexed by `element * n_point_per_element + local_point`.
///
/// Small-strain models are integrated over the reference configuration, whereas
/// finite-deformation models are integrated over the current configuration, with
/// the addition of the geometric (initial stress) stiffness.
pub struct SolidSubmesh {
    /// Holds the name of the submesh
    name: String,

    /// Holds the nodes of each element
    connectivity: Vec<Vec<usize>>,

    /// Holds an empty scratchpad of the element kind (cloned before each integration)
    pad: Scratchpad,

    /// Holds the integration points
    gauss: Gauss,

    /// Holds the quadrature-to-node extrapolation matrix (nnode × n_point_per_element)
    extrapolation: Matrix,

    /// Holds the constitutive model
    model: ConstitutiveModel,

    /// Holds the internal variables at all quadrature points
    variables: InternalVariables,

    /// Holds the shape function gradients in the reference configuration
    ///
    /// (n_element × n_point_per_element)
    reference: Vec<Matrix>,
}

impl SolidSubmesh {
    /// Allocates a new instance
    ///
    /// # Input
    ///
    /// * `submesh` -- the element group (must have a volume topology)
    /// * `param` -- the material parameters
    /// * `coordinates` -- the nodal coordinates
    pub fn new(submesh: &BasicSubmesh, param: &ParamSolid, coordinates: &MaterialCoordinates) -> Result<Self, StrError> {
        let kind = match submesh.topology() {
            Topology::Volume(kind) => kind,
            _ => return Err("solid submesh requires a volume topology"),
        };
        let pad = Scratchpad::new(NDIM, kind)?;
        let gauss = Gauss::new(kind);
        let n_point_per_element = gauss.npoint();
        let mut variables = InternalVariables::new(submesh.n_element(), n_point_per_element);
        let model = ConstitutiveModel::new(param, &mut variables)?;
        let mut reference = Vec::with_capacity(variables.n_point());
        let mut extrapolation = Matrix::new(0, 0);
        for (e, nodes) in submesh.connectivities().iter().enumerate() {
            let mut work = pad.clone();
            coordinates.set_pad(&mut work, nodes, false);
            for l in 0..n_point_per_element {
                let det_jac = work.calc_gradient(gauss.coords(l))?;
                if det_jac <= 0.0 {
                    println!("ERROR: invalid reference geometry of element {} of submesh {}", e, submesh.name);
                    return Err("element has a non-positive Jacobian determinant in the reference configuration");
                }
                reference.push(work.gradient.clone());
            }
            if e == 0 {
                extrapolation = recovery::get_extrap_matrix(&mut work, &gauss)?;
            }
        }
        Ok(SolidSubmesh {
            name: submesh.name.clone(),
            connectivity: submesh.connectivities().clone(),
            pad,
            gauss,
            extrapolation,
            model,
            variables,
            reference,
        })
    }

    /// Returns the name of the submesh
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the element kind
    pub fn kind(&self) -> GeoKind {
        self.pad.kind
    }

    /// Returns the number of elements
    pub fn n_element(&self) -> usize {
        self.connectivity.len()
    }

    /// Returns the nodes of an element
    pub fn nodes(&self, element: usize) -> &[usize] {
        &self.connectivity[element]
    }

    /// Returns the global DOF numbers of an element
    pub fn dof_indices(&self, element: usize) -> Vec<usize> {
        let mut dofs = Vec::with_capacity(3 * self.connectivity[element].len());
        for node in &self.connectivity[element] {
            for i in 0..3 {
                dofs.push(3 * node + i);
            }
        }
        dofs
    }

    /// Returns the constitutive model
    pub fn model(&self) -> &ConstitutiveModel {
        &self.model
    }

    /// Returns the internal variables
    pub fn variables(&self) -> &InternalVariables {
        &self.variables
    }

    /// Returns the internal variables (mutable)
    pub fn variables_mut(&mut self) -> &mut InternalVariables {
        &mut self.variables
    }

    /// Computes the kinematic variables at all quadrature points and calls the constitutive model
    ///
    /// The displacement gradient is `H = Σ uₘ ⊗ ∇₀Nₘ` and `F = I + H`, computed with the
    /// shape function gradients of the reference configuration. A non-positive `det(F)`
    /// indicates an inverted element and stops the update.
    pub fn update_internal_variables(&mut self, coordinates: &MaterialCoordinates, dt: f64) -> Result<(), StrError> {
        let h = self.variables.tensor_slot(Variable::DisplacementGradient)?;
        let f = self.variables.tensor_slot(Variable::DeformationGradient)?;
        let det_f = self.variables.scalar_slot(Variable::DetF)?;
        let n_point_per_element = self.variables.n_point_per_element();
        let connectivity = &self.connectivity;
        let reference = &self.reference;
        self.variables.par_update(|p, state, _| {
            let (e, l) = (p / n_point_per_element, p % n_point_per_element);
            let gg0 = &reference[p];
            let mut hh = [[0.0; 3]; 3];
            for (m, node) in connectivity[e].iter().enumerate() {
                let u = coordinates.displacement(*node);
                for i in 0..3 {
                    for j in 0..3 {
                        hh[i][j] += u[i] * gg0.get(m, j);
                    }
                }
            }
            let mut ff = hh;
            for i in 0..3 {
                ff[i][i] += 1.0;
            }
            state.tensor_mut(h).set_matrix(&hh)?;
            state.tensor_mut(f).set_matrix(&ff)?;
            let jj = state.tensor(f).determinant();
            if jj <= 0.0 {
                println!(
                    "ERROR: Positive Jacobian assumption violated at element {} and local quadrature point {}",
                    e, l
                );
                return Err("positive Jacobian assumption violated");
            }
            state.set_scalar(det_f, jj);
            Ok(())
        })?;
        self.model.actual.update_internal_variables(&mut self.variables, dt)?;
        self.check_finite()
    }

    /// Checks that the stresses and tangent operators hold finite numbers only
    fn check_finite(&self) -> Result<(), StrError> {
        let sigma = self.variables.tensor_slot(Variable::CauchyStress)?;
        let tangent = self.variables.modulus_slot(Variable::TangentOperator)?;
        for p in 0..self.variables.n_point() {
            let state = self.variables.state(p);
            let finite_stress = state.tensor(sigma).vector().as_data().iter().all(|x| x.is_finite());
            let finite_tangent = state.modulus(tangent).matrix().as_data().iter().all(|x| x.is_finite());
            if !finite_stress || !finite_tangent {
                println!(
                    "ERROR: non-finite values at element {} and local quadrature point {}",
                    p / self.variables.n_point_per_element(),
                    p % self.variables.n_point_per_element()
                );
                return Err("floating point error reported");
            }
        }
        Ok(())
    }

    /// Commits (converged) or reverts (not converged) the internal variables
    pub fn save_internal_variables(&mut self, converged: bool) {
        if converged {
            self.variables.commit();
        } else {
            self.variables.revert();
        }
    }

    /// Returns a scratchpad holding the element coordinates used in the integration
    fn element_pad(&self, element: usize, coordinates: &MaterialCoordinates) -> Scratchpad {
        let mut pad = self.pad.clone();
        let current = self.model.actual.is_finite_deformation();
        coordinates.set_pad(&mut pad, &self.connectivity[element], current);
        pad
    }

    /// Computes the element stiffness matrix
    ///
    /// ```text
    /// Kᵐⁿᵢⱼ = ∫ Bᵐₖ Dᵢₖⱼₗ Bⁿₗ dV  (+ δᵢⱼ ∫ Bᵐ · σ · Bⁿ dv for finite deformations)
    /// ```
    pub fn tangent_stiffness(&self, element: usize, coordinates: &MaterialCoordinates) -> Result<Matrix, StrError> {
        let tangent = self.variables.modulus_slot(Variable::TangentOperator)?;
        let sigma = self.variables.tensor_slot(Variable::CauchyStress)?;
        let nnode = self.connectivity[element].len();
        let mut pad = self.element_pad(element, coordinates);
        let mut kk = Matrix::new(3 * nnode, 3 * nnode);
        let mut args = integ::CommonArgs::new(&mut pad, &self.gauss);
        integ::mat_10_bdb(&mut kk, &mut args, |dd, p, _, _| {
            let state = self.variables.state(self.variables.index(element, p));
            dd.set_tensor(1.0, state.modulus(tangent));
            Ok(())
        })?;
        if self.model.actual.is_finite_deformation() {
            let mut kg = Matrix::new(nnode, nnode);
            integ::mat_03_btb(&mut kg, &mut args, |tt, p, _, _| {
                let state = self.variables.state(self.variables.index(element, p));
                tt.set_tensor(1.0, state.tensor(sigma));
                Ok(())
            })?;
            for m in 0..nnode {
                for n in 0..nnode {
                    for i in 0..3 {
                        kk.add(3 * m + i, 3 * n + i, kg.get(m, n));
                    }
                }
            }
        }
        Ok(kk)
    }

    /// Computes the element internal force vector `fᵐᵢ = ∫ σᵢⱼ Bᵐⱼ dV`
    pub fn internal_force(&self, element: usize, coordinates: &MaterialCoordinates) -> Result<Vector, StrError> {
        let sigma = self.variables.tensor_slot(Variable::CauchyStress)?;
        let mut pad = self.element_pad(element, coordinates);
        let mut ff = Vector::new(3 * self.connectivity[element].len());
        let mut args = integ::CommonArgs::new(&mut pad, &self.gauss);
        integ::vec_04_bt(&mut ff, &mut args, |sig, p, _, _| {
            let state = self.variables.state(self.variables.index(element, p));
            sig.set_tensor(1.0, state.tensor(sigma));
            Ok(())
        })?;
        Ok(ff)
    }

    /// Computes the element consistent mass matrix `Mᵐⁿᵢⱼ = δᵢⱼ ∫ ρ Nᵐ Nⁿ dV₀`
    pub fn consistent_mass(&self, element: usize, coordinates: &MaterialCoordinates) -> Result<Matrix, StrError> {
        let rho = self.model.actual.intrinsic_material().density;
        let nnode = self.connectivity[element].len();
        let mut pad = self.pad.clone();
        coordinates.set_pad(&mut pad, &self.connectivity[element], false);
        let mut mm_scalar = Matrix::new(nnode, nnode);
        let mut args = integ::CommonArgs::new(&mut pad, &self.gauss);
        integ::mat_01_nsn(&mut mm_scalar, &mut args, |_, _, _| Ok(rho))?;
        let mut mm = Matrix::new(3 * nnode, 3 * nnode);
        for m in 0..nnode {
            for n in 0..nnode {
                for i in 0..3 {
                    mm.set(3 * m + i, 3 * n + i, mm_scalar.get(m, n));
                }
            }
        }
        Ok(mm)
    }

    /// Computes the element diagonal (lumped by row-sum) mass matrix
    pub fn diagonal_mass(&self, element: usize, coordinates: &MaterialCoordinates) -> Result<Vector, StrError> {
        let mm = self.consistent_mass(element, coordinates)?;
        let (n, _) = mm.dims();
        let mut diagonal = Vector::new(n);
        for i in 0..n {
            for j in 0..n {
                diagonal[i] += mm.get(i, j);
            }
        }
        Ok(diagonal)
    }

    /// Adds the values extrapolated from the quadrature points to the nodes
    ///
    /// Each element adds its extrapolated values to `sums` and increments `counts`
    /// for each of its nodes; the caller computes the average.
    pub fn add_nodal_values(&self, variable: Variable, sums: &mut [Vec<f64>], counts: &mut [usize]) -> Result<(), StrError> {
        let values: Vec<Vec<f64>> = match variable.kind() {
            VariableKind::Scalar => self.variables.scalars(variable)?.iter().map(|v| vec![*v]).collect(),
            VariableKind::Tensor => self
                .variables
                .tensors(variable)?
                .iter()
                .map(|t| t.vector().as_data().clone())
                .collect(),
            VariableKind::Modulus => return Err("cannot extrapolate a fourth-order tensor to the nodes"),
        };
        let ee = &self.extrapolation;
        let n_component = values.first().map_or(0, |v| v.len());
        for (e, nodes) in self.connectivity.iter().enumerate() {
            for (m, node) in nodes.iter().enumerate() {
                if sums[*node].len() != n_component {
                    sums[*node] = vec![0.0; n_component];
                }
                for c in 0..n_component {
                    let mut value = 0.0;
                    for l in 0..self.variables.n_point_per_element() {
                        value += ee.get(m, l) * values[self.variables.index(e, l)][c];
                    }
                    sums[*node][c] += value;
                }
                counts[*node] += 1;
            }
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
