use crate::base::DEFAULT_OUT_DIR;
use crate::fem::{FemMesh, FemState};
use crate::StrError;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

/// Assists in generating output files
///
/// Each output file is a JSON snapshot of [FemState] (step, time, displacements, and
/// the nodal-averaged Cauchy and von Mises stresses). The summary file holds the
/// indices and times of all snapshots.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FileIo {
    /// Holds a flag to enable/disable the file generation
    enabled: bool,

    /// Defines the output directory
    output_dir: String,

    /// Defines the filename stem
    filename_stem: String,

    /// Writes a snapshot every `every` converged steps
    every: usize,

    /// Holds the count of files written
    output_count: usize,

    /// Holds the indices of the output files
    pub indices: Vec<usize>,

    /// Holds the load steps corresponding to each output file
    pub steps: Vec<usize>,

    /// Holds the (pseudo) times corresponding to each output file
    pub times: Vec<f64>,
}

impl FileIo {
    /// Allocates a new instance with deactivated generation of files
    pub fn new() -> Self {
        FileIo {
            enabled: false,
            output_dir: String::new(),
            filename_stem: String::new(),
            every: 0,
            output_count: 0,
            indices: Vec::new(),
            steps: Vec::new(),
            times: Vec::new(),
        }
    }

    /// Allocates a new instance with enabled generation of files
    ///
    /// # Input
    ///
    /// * `filename_stem` -- the last part of the filename without extension, e.g., "my_simulation"
    /// * `output_directory` -- the directory to save the output files.
    ///   None means that the default directory will be used; see [DEFAULT_OUT_DIR]
    /// * `every` -- writes a snapshot every `every` converged steps (must be ≥ 1)
    pub fn new_enabled(filename_stem: &str, output_directory: Option<&str>, every: usize) -> Result<Self, StrError> {
        if every < 1 {
            return Err("the output cadence must be ≥ 1");
        }
        let out_dir = match output_directory {
            Some(d) => d,
            None => DEFAULT_OUT_DIR,
        };
        fs::create_dir_all(out_dir).map_err(|_| "cannot create output directory")?;
        Ok(FileIo {
            enabled: true,
            output_dir: out_dir.to_string(),
            filename_stem: filename_stem.to_string(),
            every,
            output_count: 0,
            indices: Vec::new(),
            steps: Vec::new(),
            times: Vec::new(),
        })
    }

    /// Returns true if the generation of files is enabled
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Generates the filename path for the summary file
    pub fn path_summary(&self) -> String {
        if self.enabled {
            format!("{}/{}-summary.json", self.output_dir, self.filename_stem)
        } else {
            "".to_string()
        }
    }

    /// Generates the filename path for the state files
    pub fn path_state(&self, index: usize) -> String {
        if self.enabled {
            format!("{}/{}-{:0>20}.json", self.output_dir, self.filename_stem, index)
        } else {
            "".to_string()
        }
    }

    /// Reads a JSON file containing this struct
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
        let summary = serde_json::from_reader(buffered).map_err(|_| "cannot parse JSON file")?;
        Ok(summary)
    }

    /// Writes a JSON file with this struct
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

    /// Returns true if a snapshot is due after the given number of converged steps
    ///
    /// The initial state (zero steps) and the last step are always written.
    pub(crate) fn is_due(&self, n_step: usize, last: bool) -> bool {
        self.enabled && (n_step == 0 || last || n_step % self.every == 0)
    }

    /// Writes the current FEM state to a file
    ///
    /// **Note:** No output is generated if the file generation is disabled.
    pub(crate) fn write_state(&mut self, fem: &FemMesh, state: &mut FemState) -> Result<(), StrError> {
        if self.enabled {
            state.calculate_nodal_values(fem)?;
            let path = self.path_state(self.output_count);
            state.write_json(&path)?;
            self.indices.push(self.output_count);
            self.steps.push(state.n_step);
            self.times.push(state.t);
            self.output_count += 1;
        }
        Ok(())
    }

    /// Writes this struct to a file
    pub(crate) fn write_self(&self) -> Result<(), StrError> {
        if self.enabled {
            let path = self.path_summary();
            self.write_json(&path)?;
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
