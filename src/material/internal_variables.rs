use super::{LocalState, ModulusSlot, ScalarSlot, TensorSlot};
use crate::StrError;
use rayon::prelude::*;
use russell_tensor::{Mandel, Tensor2, Tensor4};
use std::collections::HashMap;

/// Defines the kind of an internal variable
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VariableKind {
    /// Second-order tensor
    Tensor,

    /// Scalar
    Scalar,

    /// Fourth-order tensor
    Modulus,
}

/// Defines the internal variables available at the quadrature points
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variable {
    /// Displacement gradient H = ∂u/∂X (general tensor)
    DisplacementGradient,

    /// Deformation gradient F = I + H (general tensor)
    DeformationGradient,

    /// Cauchy (true) stress σ
    CauchyStress,

    /// Kirchhoff stress τ = J σ
    KirchhoffStress,

    /// Linearised (small) strain ε = sym(H)
    LinearisedStrain,

    /// Linearised plastic strain εp
    LinearisedPlasticStrain,

    /// Determinant of the deformation gradient J = det(F)
    DetF,

    /// von Mises stress σd
    VonMisesStress,

    /// Accumulated (effective) plastic strain
    EffectivePlasticStrain,

    /// Number of active chains per unit volume
    ActiveChains,

    /// Tangent operator (consistent material tangent in Mandel notation)
    TangentOperator,
}

impl Variable {
    /// Holds all variables
    pub const ALL: [Variable; 11] = [
        Variable::DisplacementGradient,
        Variable::DeformationGradient,
        Variable::CauchyStress,
        Variable::KirchhoffStress,
        Variable::LinearisedStrain,
        Variable::LinearisedPlasticStrain,
        Variable::DetF,
        Variable::VonMisesStress,
        Variable::EffectivePlasticStrain,
        Variable::ActiveChains,
        Variable::TangentOperator,
    ];

    /// Returns the name of the variable
    pub fn name(&self) -> &'static str {
        match self {
            Variable::DisplacementGradient => "DisplacementGradient",
            Variable::DeformationGradient => "DeformationGradient",
            Variable::CauchyStress => "CauchyStress",
            Variable::KirchhoffStress => "KirchhoffStress",
            Variable::LinearisedStrain => "LinearisedStrain",
            Variable::LinearisedPlasticStrain => "LinearisedPlasticStrain",
            Variable::DetF => "DetF",
            Variable::VonMisesStress => "VonMisesStress",
            Variable::EffectivePlasticStrain => "EffectivePlasticStrain",
            Variable::ActiveChains => "ActiveChains",
            Variable::TangentOperator => "TangentOperator",
        }
    }

    /// Returns the variable with the given name
    pub fn from_name(name: &str) -> Result<Self, StrError> {
        Variable::ALL
            .iter()
            .find(|v| v.name() == name)
            .copied()
            .ok_or("unknown internal variable name")
    }

    /// Returns the kind of the variable
    pub fn kind(&self) -> VariableKind {
        match self {
            Variable::DisplacementGradient
            | Variable::DeformationGradient
            | Variable::CauchyStress
            | Variable::KirchhoffStress
            | Variable::LinearisedStrain
            | Variable::LinearisedPlasticStrain => VariableKind::Tensor,
            Variable::DetF | Variable::VonMisesStress | Variable::EffectivePlasticStrain | Variable::ActiveChains => {
                VariableKind::Scalar
            }
            Variable::TangentOperator => VariableKind::Modulus,
        }
    }

    /// Returns the Mandel representation of a second-order tensor variable
    pub fn mandel(&self) -> Mandel {
        match self {
            Variable::DisplacementGradient | Variable::DeformationGradient => Mandel::General,
            _ => Mandel::Symmetric,
        }
    }
}

/// Holds the internal variables of all quadrature points of a submesh
///
/// Each quadrature point, indexed by `element × n_point_per_element + local_point`,
/// holds a current (trial) state and a committed (last converged) state. The number of
/// points is fixed at construction; variables may only be added, never removed.
pub struct InternalVariables {
    /// Holds the number of elements
    n_element: usize,

    /// Holds the number of quadrature points per element
    n_point_per_element: usize,

    /// Maps each registered variable to its position within its kind
    slots: HashMap<Variable, usize>,

    /// Holds the current (trial) states
    current: Vec<LocalState>,

    /// Holds the committed (converged) states
    committed: Vec<LocalState>,
}

impl InternalVariables {
    /// Allocates a new instance without registered variables
    pub fn new(n_element: usize, n_point_per_element: usize) -> Self {
        let n_point = n_element * n_point_per_element;
        InternalVariables {
            n_element,
            n_point_per_element,
            slots: HashMap::new(),
            current: vec![LocalState::new(); n_point],
            committed: vec![LocalState::new(); n_point],
        }
    }

    /// Returns the total number of quadrature points
    pub fn n_point(&self) -> usize {
        self.current.len()
    }

    /// Returns the number of elements
    pub fn n_element(&self) -> usize {
        self.n_element
    }

    /// Returns the number of quadrature points per element
    pub fn n_point_per_element(&self) -> usize {
        self.n_point_per_element
    }

    /// Returns the global index of a quadrature point
    #[inline]
    pub fn index(&self, element: usize, local_point: usize) -> usize {
        element * self.n_point_per_element + local_point
    }

    /// Registers a new variable in the current and committed states
    ///
    /// The deformation gradient is initialized to the identity and the determinant
    /// of the deformation gradient to one; all other values are initialized to zero.
    pub fn add(&mut self, variable: Variable) -> Result<(), StrError> {
        if self.slots.contains_key(&variable) {
            return Err("internal variable is already registered");
        }
        let kind = variable.kind();
        let position = self.slots.keys().filter(|v| v.kind() == kind).count();
        match kind {
            VariableKind::Tensor => {
                let tensor = if variable == Variable::DeformationGradient {
                    Tensor2::identity(variable.mandel())
                } else {
                    Tensor2::new(variable.mandel())
                };
                for state in self.current.iter_mut().chain(self.committed.iter_mut()) {
                    state.tensors.push(tensor.clone());
                }
            }
            VariableKind::Scalar => {
                let value = if variable == Variable::DetF { 1.0 } else { 0.0 };
                for state in self.current.iter_mut().chain(self.committed.iter_mut()) {
                    state.scalars.push(value);
                }
            }
            VariableKind::Modulus => {
                for state in self.current.iter_mut().chain(self.committed.iter_mut()) {
                    state.moduli.push(Tensor4::new(Mandel::Symmetric));
                }
            }
        }
        self.slots.insert(variable, position);
        Ok(())
    }

    /// Registers a new variable given its name
    pub fn add_by_name(&mut self, name: &str) -> Result<(), StrError> {
        self.add(Variable::from_name(name)?)
    }

    /// Registers a variable unless it is already registered
    pub fn ensure(&mut self, variable: Variable) -> Result<(), StrError> {
        if self.has(variable) {
            return Ok(());
        }
        self.add(variable)
    }

    /// Indicates whether a variable is registered or not
    pub fn has(&self, variable: Variable) -> bool {
        self.slots.contains_key(&variable)
    }

    /// Returns the sorted list of registered variables
    pub fn registered(&self) -> Vec<Variable> {
        let mut list: Vec<_> = self.slots.keys().copied().collect();
        list.sort();
        list
    }

    /// Returns the position of a registered variable after checking its kind
    fn position(&self, variable: Variable, kind: VariableKind) -> Result<usize, StrError> {
        let position = *self.slots.get(&variable).ok_or("internal variable is not registered")?;
        if variable.kind() != kind {
            return Err("internal variable has a different kind");
        }
        Ok(position)
    }

    /// Returns the slot of a second-order tensor variable
    pub fn tensor_slot(&self, variable: Variable) -> Result<TensorSlot, StrError> {
        Ok(TensorSlot(self.position(variable, VariableKind::Tensor)?))
    }

    /// Returns the slot of a scalar variable
    pub fn scalar_slot(&self, variable: Variable) -> Result<ScalarSlot, StrError> {
        Ok(ScalarSlot(self.position(variable, VariableKind::Scalar)?))
    }

    /// Returns the slot of a fourth-order tensor variable
    pub fn modulus_slot(&self, variable: Variable) -> Result<ModulusSlot, StrError> {
        Ok(ModulusSlot(self.position(variable, VariableKind::Modulus)?))
    }

    /// Returns the current values of a second-order tensor at all quadrature points
    pub fn tensors(&self, variable: Variable) -> Result<Vec<&Tensor2>, StrError> {
        let slot = self.tensor_slot(variable)?;
        Ok(self.current.iter().map(|s| s.tensor(slot)).collect())
    }

    /// Returns mutable views to the current values of a second-order tensor at all quadrature points
    pub fn tensors_mut(&mut self, variable: Variable) -> Result<Vec<&mut Tensor2>, StrError> {
        let slot = self.tensor_slot(variable)?;
        Ok(self.current.iter_mut().map(|s| s.tensor_mut(slot)).collect())
    }

    /// Returns the current values of a scalar at all quadrature points
    pub fn scalars(&self, variable: Variable) -> Result<Vec<f64>, StrError> {
        let slot = self.scalar_slot(variable)?;
        Ok(self.current.iter().map(|s| s.scalar(slot)).collect())
    }

    /// Returns mutable views to the current values of a scalar at all quadrature points
    pub fn scalars_mut(&mut self, variable: Variable) -> Result<Vec<&mut f64>, StrError> {
        let slot = self.scalar_slot(variable)?;
        Ok(self.current.iter_mut().map(|s| &mut s.scalars[slot.0]).collect())
    }

    /// Returns the committed values of a scalar at all quadrature points
    pub fn committed_scalars(&self, variable: Variable) -> Result<Vec<f64>, StrError> {
        let slot = self.scalar_slot(variable)?;
        Ok(self.committed.iter().map(|s| s.scalar(slot)).collect())
    }

    /// Returns the current values of a fourth-order tensor at all quadrature points
    pub fn moduli(&self, variable: Variable) -> Result<Vec<&Tensor4>, StrError> {
        let slot = self.modulus_slot(variable)?;
        Ok(self.current.iter().map(|s| s.modulus(slot)).collect())
    }

    /// Sets a scalar variable to the same value in the current and committed states
    pub fn fill_scalar(&mut self, variable: Variable, value: f64) -> Result<(), StrError> {
        let slot = self.scalar_slot(variable)?;
        for state in self.current.iter_mut().chain(self.committed.iter_mut()) {
            state.set_scalar(slot, value);
        }
        Ok(())
    }

    /// Returns the current state of a quadrature point
    pub fn state(&self, point: usize) -> &LocalState {
        &self.current[point]
    }

    /// Returns the mutable current state of a quadrature point
    pub fn state_mut(&mut self, point: usize) -> &mut LocalState {
        &mut self.current[point]
    }

    /// Returns the committed state of a quadrature point
    pub fn committed_state(&self, point: usize) -> &LocalState {
        &self.committed[point]
    }

    /// Updates all current states in parallel
    ///
    /// Calls `f(point, current, committed)` for every quadrature point. The first
    /// error stops the update and is returned.
    pub fn par_update<F>(&mut self, f: F) -> Result<(), StrError>
    where
        F: Fn(usize, &mut LocalState, &LocalState) -> Result<(), StrError> + Sync + Send,
    {
        self.current
            .par_iter_mut()
            .zip(self.committed.par_iter())
            .enumerate()
            .try_for_each(|(p, (current, committed))| f(p, current, committed))
    }

    /// Copies all current values to the committed states
    pub fn commit(&mut self) {
        self.committed
            .par_iter_mut()
            .zip(self.current.par_iter())
            .for_each(|(committed, current)| committed.mirror(current));
    }

    /// Copies all committed values back to the current states
    pub fn revert(&mut self) {
        self.current
            .par_iter_mut()
            .zip(self.committed.par_iter())
            .for_each(|(current, committed)| current.mirror(committed));
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{InternalVariables, Variable, VariableKind};
    use crate::StrError;
    use russell_tensor::Mandel;

    #[test]
    fn variable_works() {
        for v in Variable::ALL {
            assert_eq!(Variable::from_name(v.name()), Ok(v));
        }
        assert_eq!(Variable::from_name("Stress").err(), Some("unknown internal variable name"));
        assert_eq!(Variable::DetF.kind(), VariableKind::Scalar);
        assert_eq!(Variable::TangentOperator.kind(), VariableKind::Modulus);
        assert_eq!(Variable::CauchyStress.kind(), VariableKind::Tensor);
        assert_eq!(Variable::DeformationGradient.mandel(), Mandel::General);
        assert_eq!(Variable::CauchyStress.mandel(), Mandel::Symmetric);
    }

    #[test]
    fn add_and_has_work() -> Result<(), StrError> {
        let mut vars = InternalVariables::new(2, 4);
        assert_eq!(vars.n_point(), 8);
        assert_eq!(vars.n_element(), 2);
        assert_eq!(vars.index(1, 2), 6);
        assert!(!vars.has(Variable::CauchyStress));
        vars.add(Variable::CauchyStress)?;
        vars.add(Variable::DeformationGradient)?;
        vars.add_by_name("DetF")?;
        vars.add(Variable::TangentOperator)?;
        vars.ensure(Variable::DetF)?;
        assert!(vars.has(Variable::CauchyStress));
        assert_eq!(
            vars.add(Variable::CauchyStress).err(),
            Some("internal variable is already registered")
        );
        assert_eq!(
            vars.add_by_name("Unknown").err(),
            Some("unknown internal variable name")
        );
        assert_eq!(
            vars.registered(),
            &[
                Variable::DeformationGradient,
                Variable::CauchyStress,
                Variable::DetF,
                Variable::TangentOperator
            ]
        );

        // all fields have the same length
        assert_eq!(vars.tensors(Variable::CauchyStress)?.len(), 8);
        assert_eq!(vars.scalars(Variable::DetF)?.len(), 8);
        assert_eq!(vars.moduli(Variable::TangentOperator)?.len(), 8);

        // initial values
        assert_eq!(vars.scalars(Variable::DetF)?, vec![1.0; 8]);
        for ff in vars.tensors(Variable::DeformationGradient)? {
            assert_eq!(ff.vector().as_data(), &[1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        }

        // errors
        assert_eq!(
            vars.scalars(Variable::VonMisesStress).err(),
            Some("internal variable is not registered")
        );
        assert_eq!(
            vars.tensor_slot(Variable::DetF).err(),
            Some("internal variable has a different kind")
        );
        Ok(())
    }

    #[test]
    fn commit_and_revert_work() -> Result<(), StrError> {
        let mut vars = InternalVariables::new(3, 2);
        vars.add(Variable::CauchyStress)?;
        vars.add(Variable::VonMisesStress)?;
        vars.add(Variable::TangentOperator)?;

        // mutate and commit
        for (p, sigma) in vars.tensors_mut(Variable::CauchyStress)?.into_iter().enumerate() {
            sigma.vector_mut()[0] = p as f64;
        }
        for value in vars.scalars_mut(Variable::VonMisesStress)? {
            *value = 5.0;
        }
        vars.commit();
        assert_eq!(vars.committed_scalars(Variable::VonMisesStress)?, vec![5.0; 6]);

        // mutate and revert
        for sigma in vars.tensors_mut(Variable::CauchyStress)? {
            sigma.vector_mut()[0] = -100.0;
        }
        let slot = vars.modulus_slot(Variable::TangentOperator)?;
        vars.state_mut(3).modulus_mut(slot).matrix_mut().set(0, 0, 123.0);
        vars.fill_scalar(Variable::VonMisesStress, 0.0)?;
        vars.scalars_mut(Variable::VonMisesStress)?.into_iter().for_each(|v| *v = 7.0);
        vars.revert();

        for (p, sigma) in vars.tensors(Variable::CauchyStress)?.iter().enumerate() {
            assert_eq!(sigma.vector()[0], p as f64);
        }
        // fill_scalar also overwrote the committed values
        assert_eq!(vars.scalars(Variable::VonMisesStress)?, vec![0.0; 6]);
        assert_eq!(vars.state(3).modulus(slot).matrix().get(0, 0), 0.0);
        Ok(())
    }

    #[test]
    fn par_update_works() -> Result<(), StrError> {
        let mut vars = InternalVariables::new(4, 8);
        vars.add(Variable::EffectivePlasticStrain)?;
        let slot = vars.scalar_slot(Variable::EffectivePlasticStrain)?;
        vars.par_update(|p, current, committed| {
            current.set_scalar(slot, committed.scalar(slot) + p as f64);
            Ok(())
        })?;
        let values = vars.scalars(Variable::EffectivePlasticStrain)?;
        for p in 0..32 {
            assert_eq!(values[p], p as f64);
        }
        let res = vars.par_update(|p, _, _| if p == 17 { Err("failed") } else { Ok(()) });
        assert_eq!(res.err(), Some("failed"));
        assert_eq!(vars.committed_state(0).scalar(slot), 0.0);
        Ok(())
    }
}
