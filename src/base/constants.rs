/// Defines the directory where the simulation result files are saved
pub const DEFAULT_OUT_DIR: &str = "/tmp/solidsim/results";

/// Defines an auxiliary directory where the test result files are saved
pub const DEFAULT_TEST_DIR: &str = "/tmp/solidsim/test";

/// Holds the space dimension (solids are always three-dimensional)
pub const NDIM: usize = 3;

/// Boltzmann constant in J/K
pub const BOLTZMANN_CONSTANT: f64 = 1.38064852e-23;

/// Reference (room) temperature in K used by the chain network models
pub const REFERENCE_TEMPERATURE: f64 = 298.0;
