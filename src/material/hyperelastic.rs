use russell_tensor::{t2_dyad_t2_update, t4_ddot_t4, Mandel, Tensor2, Tensor4};

/// Holds the constant tensors of the decoupled (isochoric-volumetric) hyperelastic models
///
/// The volumetric free energy is
///
/// ```text
/// U(J) = K/4 (J² - 1) - K/2 ln J
/// ```
///
/// and the isochoric response is given by the fictitious Kirchhoff stress τ̄ and its
/// spatial modulus c̄, both computed from the unimodular deformation gradient `F̄ = J^(-1/3) F`.
pub struct Decoupled {
    /// Bulk modulus
    bulk: f64,

    /// Second-order identity I
    ii: Tensor2,

    /// Symmetric-deviatoric projector P
    psd: Tensor4,

    /// Symmetric fourth-order identity
    pp_sym: Tensor4,

    /// I ⊗ I
    jj: Tensor4,
}

impl Decoupled {
    /// Allocates a new instance
    pub fn new(bulk: f64) -> Self {
        Decoupled {
            bulk,
            ii: Tensor2::identity(Mandel::Symmetric),
            psd: Tensor4::constant_pp_symdev(true),
            pp_sym: Tensor4::constant_pp_sym(true),
            jj: Tensor4::constant_jj(true),
        }
    }

    /// Calculates the unimodular deformation gradient F̄ = J^(-1/3) F
    pub fn unimodular(&self, ff_bar: &mut Tensor2, ff: &Tensor2, det_f: f64) {
        ff_bar.set_tensor(f64::powf(det_f, -1.0 / 3.0), ff);
    }

    /// Returns the pressure J U'(J) and the volumetric stiffness J² U''(J)
    pub fn volumetric(&self, det_f: f64) -> (f64, f64) {
        let kk = self.bulk;
        let pressure = det_f * kk / 2.0 * (det_f - 1.0 / det_f);
        let kappa = det_f * det_f * kk / 2.0 * (1.0 + 1.0 / (det_f * det_f));
        (pressure, kappa)
    }

    /// Assembles the Kirchhoff stress and the spatial tangent operator
    ///
    /// ```text
    /// τ = p I + dev(τ̄)
    /// c_iso = P:c̄:P + ⅔ tr(τ̄) P - ⅔ (dev(τ̄) ⊗ I + I ⊗ dev(τ̄))
    /// c_vol = (κ + p) I ⊗ I - 2 p 𝕀sym
    /// cc = (c_iso + c_vol) / J
    /// ```
    ///
    /// A `None` fictitious modulus means c̄ = 0 (Gaussian chains).
    pub fn assemble(&self, tau: &mut Tensor2, cc: &mut Tensor4, tau_bar: &Tensor2, cc_bar: Option<&Tensor4>, det_f: f64) {
        let (pressure, kappa) = self.volumetric(det_f);

        // stress
        tau_bar.deviator(tau);
        let dev = tau.clone();
        tau.update(pressure, &self.ii);

        // isochoric tangent
        match cc_bar {
            Some(cc_bar) => {
                let mut cp = Tensor4::new(Mandel::Symmetric);
                t4_ddot_t4(&mut cp, 1.0, cc_bar, &self.psd);
                t4_ddot_t4(cc, 1.0, &self.psd, &cp);
            }
            None => cc.matrix_mut().fill(0.0),
        }
        cc.update(2.0 / 3.0 * tau_bar.trace(), &self.psd);
        t2_dyad_t2_update(cc, -2.0 / 3.0, &dev, &self.ii);
        t2_dyad_t2_update(cc, -2.0 / 3.0, &self.ii, &dev);

        // volumetric tangent
        cc.update(kappa + pressure, &self.jj);
        cc.update(-2.0 * pressure, &self.pp_sym);
        cc.matrix_mut().as_mut_data().iter_mut().for_each(|v| *v /= det_f);
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
