use super::FemMesh;
use crate::base::Config;
use crate::material::Variable;
use crate::StrError;
use russell_lab::Vector;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Holds the state of a simulation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FemState {
    /// (Pseudo) time
    pub t: f64,

    /// Load increment used to reach `t`
    pub dt: f64,

    /// Holds the number of converged load steps
    pub n_step: usize,

    /// Displacements {d}
    ///
    /// (n_equation)
    pub displacement: Vector,

    /// Cauchy stress averaged at the nodes (Mandel components)
    ///
    /// (n_node); empty unless filled by [FemState::calculate_nodal_values]
    #[serde(default)]
    pub nodal_stress: Vec<Vec<f64>>,

    /// von Mises stress averaged at the nodes
    ///
    /// (n_node); empty unless filled by [FemState::calculate_nodal_values]
    #[serde(default)]
    pub nodal_von_mises: Vec<f64>,
}

impl FemState {
    /// Allocates a new instance at `t_ini` with zero displacements
    pub fn new(fem: &FemMesh, config: &Config) -> Self {
        FemState {
            t: config.t_ini,
            dt: config.dt_ini,
            n_step: 0,
            displacement: Vector::new(fem.n_dof()),
            nodal_stress: Vec::new(),
            nodal_von_mises: Vec::new(),
        }
    }

    /// Extrapolates the Cauchy and von Mises stresses to the nodes
    pub fn calculate_nodal_values(&mut self, fem: &FemMesh) -> Result<(), StrError> {
        self.nodal_stress = fem.nodal_averaged(Variable::CauchyStress)?;
        self.nodal_von_mises = fem
            .nodal_averaged(Variable::VonMisesStress)?
            .iter()
            .map(|values| if values.is_empty() { 0.0 } else { values[0] })
            .collect();
        Ok(())
    }

    /// Reads a JSON file containing the state data
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn read_json<P>(full_path: &P) -> Result<Self, StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        let file = File::open(path).map_err(|_| "cannot open file")?;
        let buffered = BufReader::new(file);
        let state = serde_json::from_reader(buffered).map_err(|_| "cannot parse JSON file")?;
        Ok(state)
    }

    /// Writes a JSON file with the state data
    ///
    /// # Input
    ///
    /// * `full_path` -- may be a String, &str, or Path
    pub fn write_json<P>(&self, full_path: &P) -> Result<(), StrError>
    where
        P: AsRef<OsStr> + ?Sized,
    {
        let path = Path::new(full_path).to_path_buf();
        if let Some(p) = path.parent() {
            fs::create_dir_all(p).map_err(|_| "cannot create directory")?;
        }
        let mut file = File::create(&path).map_err(|_| "cannot create file")?;
        serde_json::to_writer(&mut file, &self).map_err(|_| "cannot write file")?;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::FemState;
    use crate::base::{Config, ParamPart, ParamSolid, SampleMeshes, DEFAULT_TEST_DIR};
    use crate::fem::FemMesh;

    fn fem() -> FemMesh {
        let mesh = SampleMeshes::one_hex8();
        let parts = [ParamPart {
            name: "bulk".to_string(),
            material: ParamSolid::sample_linear_elastic(),
        }];
        FemMesh::new(&mesh, &parts, &[]).unwrap()
    }

    #[test]
    fn new_works() {
        let fem = fem();
        let mut config = Config::new();
        config.set_time(0.5, 2.0, 0.25).unwrap();
        let state = FemState::new(&fem, &config);
        assert_eq!(state.t, 0.5);
        assert_eq!(state.dt, 0.25);
        assert_eq!(state.n_step, 0);
        assert_eq!(state.displacement.dim(), 24);
    }

    #[test]
    fn nodal_values_work() {
        let mut fem = fem();
        let config = Config::new();
        let mut state = FemState::new(&fem, &config);
        fem.update_internal_variables(&state.displacement, 1.0).unwrap();
        state.calculate_nodal_values(&fem).unwrap();
        assert_eq!(state.nodal_stress.len(), 8);
        assert_eq!(state.nodal_stress[0].len(), 6);
        assert_eq!(state.nodal_von_mises, &[0.0; 8]);
    }

    #[test]
    fn read_and_write_work() {
        let fem = fem();
        let config = Config::new();
        let mut state = FemState::new(&fem, &config);
        state.t = 0.75;
        state.displacement[3] = 1.5;
        let path = format!("{}/test_fem_state.json", DEFAULT_TEST_DIR);
        state.write_json(&path).unwrap();
        let read = FemState::read_json(&path).unwrap();
        assert_eq!(read.t, 0.75);
        assert_eq!(read.displacement.as_data(), state.displacement.as_data());
        assert_eq!(FemState::read_json("/tmp/not_found.json").err(), Some("cannot open file"));
    }
}
