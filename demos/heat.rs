use clap::Parser;
use log::{error, info, LevelFilter};
use simple_logger::SimpleLogger;

use distgrid::message::Communicator;
use distgrid::simulation::{Configuration, HotSpotInitializer, ProgressLogger, Simulation, SnapshotWriter};
use distgrid::solvers::HeatSolver;
use distgrid::{Error, Shape2D};

#[derive(Debug, Parser)]
#[clap(version = "0.1", about = "Explicit heat diffusion on a block-decomposed 2D grid")]
struct Opts {
    #[clap(short = 'n', long, default_value = "1000")]
    nb_iter: usize,

    #[clap(long, default_value = "128")]
    ny: usize,

    #[clap(long, default_value = "128")]
    nx: usize,

    #[clap(long, default_value = "2")]
    py: usize,

    #[clap(long, default_value = "2")]
    px: usize,

    #[clap(long, default_value = "1e-5")]
    delta_t: f64,

    #[clap(long, default_value = "0.0078125")]
    delta_space: f64,

    #[clap(short = 'k', long, default_value = "1.0")]
    diffusivity: f64,

    #[clap(long, default_value = "100")]
    progress_interval: usize,

    #[clap(long)]
    output_prefix: Option<String>,

    #[clap(long, default_value = "100")]
    output_interval: usize,

    #[clap(long, default_value = "info")]
    log_level: LevelFilter,
}

fn run<C: Communicator>(comm: C, opts: &Opts) -> Result<(), Error> {
    let config = Configuration::new(
        opts.nb_iter,
        Shape2D::new(opts.ny, opts.nx),
        Shape2D::new(opts.py, opts.px),
        opts.delta_t,
        [opts.delta_space, opts.delta_space]);

    let solver = HeatSolver::new(opts.delta_t, opts.diffusivity);
    let initial = HotSpotInitializer::new(0.0, 1.0, 0.25);
    let mut sim = Simulation::new(comm, config, Box::new(solver), &initial)?;

    sim.add_observer(Box::new(ProgressLogger::new(opts.progress_interval)));

    if let Some(prefix) = &opts.output_prefix {
        sim.add_observer(Box::new(SnapshotWriter::new(prefix, opts.output_interval)));
    }
    sim.run()
}

#[cfg(not(feature = "mpi"))]
fn main() {
    let opts = Opts::parse();
    SimpleLogger::new().with_level(opts.log_level).init().unwrap();
    info!("{:?}", opts);

    let size = opts.py * opts.px;
    let results = distgrid::message::spawn_group(size, |comm| run(comm, &opts));
    let mut failed = false;

    for (rank, result) in results.into_iter().enumerate() {
        if let Err(e) = result {
            error!("rank {}: {}", rank, e);
            failed = true;
        }
    }
    if failed {
        std::process::exit(1);
    }
}

#[cfg(feature = "mpi")]
fn main() {
    use distgrid::message::MpiCommunicator;

    let opts = Opts::parse();
    SimpleLogger::new().with_level(opts.log_level).init().unwrap();

    let universe = match mpi::initialize() {
        Some(universe) => universe,
        None => {
            error!("MPI was already initialized");
            std::process::exit(1);
        }
    };
    let comm = MpiCommunicator::world(&universe);
    let abort = MpiCommunicator::world(&universe);

    if comm.rank() == 0 {
        info!("{:?}", opts);
    }
    if let Err(e) = run(comm, &opts) {
        error!("rank {}: {}", abort.rank(), e);
        abort.abort(1);
    }
}
