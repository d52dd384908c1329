use russell_tensor::{Tensor2, Tensor4};

/// Identifies the position of a second-order tensor in a [LocalState]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TensorSlot(pub(crate) usize);

/// Identifies the position of a scalar in a [LocalState]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScalarSlot(pub(crate) usize);

/// Identifies the position of a fourth-order tensor in a [LocalState]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModulusSlot(pub(crate) usize);

/// Holds the internal variables of one quadrature point
///
/// The positions of each variable are given by the slots handed out by
/// [crate::material::InternalVariables].
#[derive(Clone, Debug)]
pub struct LocalState {
    /// Holds the second-order tensors (Mandel notation)
    pub tensors: Vec<Tensor2>,

    /// Holds the scalars
    pub scalars: Vec<f64>,

    /// Holds the fourth-order tensors (6 × 6 Mandel matrices)
    pub moduli: Vec<Tensor4>,
}

impl LocalState {
    /// Allocates a new empty instance
    pub fn new() -> Self {
        LocalState {
            tensors: Vec::new(),
            scalars: Vec::new(),
            moduli: Vec::new(),
        }
    }

    /// Returns a second-order tensor
    #[inline]
    pub fn tensor(&self, slot: TensorSlot) -> &Tensor2 {
        &self.tensors[slot.0]
    }

    /// Returns a mutable second-order tensor
    #[inline]
    pub fn tensor_mut(&mut self, slot: TensorSlot) -> &mut Tensor2 {
        &mut self.tensors[slot.0]
    }

    /// Returns a scalar
    #[inline]
    pub fn scalar(&self, slot: ScalarSlot) -> f64 {
        self.scalars[slot.0]
    }

    /// Sets a scalar
    #[inline]
    pub fn set_scalar(&mut self, slot: ScalarSlot, value: f64) {
        self.scalars[slot.0] = value;
    }

    /// Returns a fourth-order tensor
    #[inline]
    pub fn modulus(&self, slot: ModulusSlot) -> &Tensor4 {
        &self.moduli[slot.0]
    }

    /// Returns a mutable fourth-order tensor
    #[inline]
    pub fn modulus_mut(&mut self, slot: ModulusSlot) -> &mut Tensor4 {
        &mut self.moduli[slot.0]
    }

    /// Copies all values from another state with the same layout (without reallocating)
    pub fn mirror(&mut self, other: &LocalState) {
        for (dst, src) in self.tensors.iter_mut().zip(other.tensors.iter()) {
            dst.set_tensor(1.0, src);
        }
        self.scalars.copy_from_slice(&other.scalars);
        for (dst, src) in self.moduli.iter_mut().zip(other.moduli.iter()) {
            dst.set_tensor(1.0, src);
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
