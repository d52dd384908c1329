use solidsim::base::SimulationInput;
use solidsim::fem::{FemMesh, FemState, FileIo, SolverStatic};
use solidsim::StrError;
use structopt::StructOpt;

/// Command line options
#[derive(StructOpt, Debug)]
#[structopt(
    name = "solidsim",
    about = "Runs a nonlinear static finite element simulation of solids"
)]
struct Options {
    /// Input file (JSON)
    input: String,

    /// Output directory (overrides the directory given in the input file)
    #[structopt(short, long)]
    out_dir: Option<String>,

    /// Shows the load stepping and convergence statistics
    #[structopt(short, long)]
    verbose: bool,
}

fn main() -> Result<(), StrError> {
    // parse options
    let options = Options::from_args();

    // load data
    let input = SimulationInput::read_json(&options.input)?;
    let mut config = input.config()?;
    config.set_verbose(options.verbose, options.verbose, false)?;

    // worker threads
    if config.n_threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.n_threads)
            .build_global()
            .map_err(|_| "cannot initialize the thread pool")?;
    }

    // allocate the simulation
    let mut fem = FemMesh::new(&input.mesh, &input.parts, &input.boundaries)?;
    let mut state = FemState::new(&fem, &config);
    let out_dir = options.out_dir.as_deref().or(input.output.directory.as_deref());
    let mut file_io = if config.output_every > 0 {
        FileIo::new_enabled(&input.name, out_dir, config.output_every)?
    } else {
        FileIo::new()
    };

    // run
    let mut solver = SolverStatic::new(&config, &fem)?;
    solver.solve(&mut fem, &mut state, &mut file_io)?;

    // message
    if file_io.enabled() {
        let path = file_io.path_summary();
        let thin_line = format!("{:─^1$}", "", path.len());
        println!("\n\n{}", thin_line);
        println!("Simulation finished at t = {:?}; the summary file is:", state.t);
        println!("{}", path);
        println!("{}\n\n", thin_line);
    } else {
        println!("Simulation finished at t = {:?} after {} load steps", state.t, state.n_step);
    }
    Ok(())
}
