use docopt::Docopt;
use error_chain::bail;
use log::{info, LevelFilter};
use prim_mazes::{
    cells::{CompassPrimary, Coordinate},
    descriptions,
    grid::Maze,
    options::MazeOptionsBuilder,
    pathing,
};
use rand::{rngs::StdRng, SeedableRng};
use serde_derive::Deserialize;
use simplelog::{Config, WriteLogger};
use std::{
    fs::File,
    io::{self, BufReader, BufWriter},
};

const USAGE: &str = "Prim mazes

Generates a perfect maze with randomized Prim's algorithm, or loads one from a JSON maze file,
and prints the route from the start cell to the goal and out through the exit, one row,col
step per line.

Usage:
    mazes_driver -h | --help
    mazes_driver [options]

Options:
    -h --help              Show this screen.
    --grid-size=<n>        The grid size is n * n.
    --rows=<r>             The number of rows in a generated maze [default: 20].
    --cols=<c>             The number of columns in a generated maze [default: 20].
    --start-row=<r>        Row of the route start [default: 0].
    --start-col=<c>        Column of the route start [default: 0].
    --goal-row=<r>         Row of the route goal, the last row if not given.
    --goal-col=<c>         Column of the route goal, the last column if not given.
    --exit=<dir>           Wall of the goal opened as the exit: north, east, south or west [default: east].
    --seed=<n>             Seed the random number generator for a reproducible maze.
    --maze-file=<path>     Load a JSON maze description instead of generating a maze.
    --save-maze=<path>     Write the maze as a JSON description.
    --json                 Print the route as a JSON array of {row, col} steps.
    --show-dead-ends       Also print the dead ends the route search visited.
    -v --verbose           Log the carving and search progress.
    -q --quiet             Only log warnings and errors.
";

/// Generated mazes smaller than this in either dimension are hardly mazes.
const MIN_DIMENSION: usize = 5;

#[derive(Debug, Deserialize)]
struct DriverArgs {
    flag_grid_size: Option<usize>,
    flag_rows: usize,
    flag_cols: usize,
    flag_start_row: isize,
    flag_start_col: isize,
    flag_goal_row: Option<isize>,
    flag_goal_col: Option<isize>,
    flag_exit: String,
    flag_seed: Option<u64>,
    flag_maze_file: Option<String>,
    flag_save_maze: Option<String>,
    flag_json: bool,
    flag_show_dead_ends: bool,
    flag_verbose: bool,
    flag_quiet: bool,
}

mod errors {
    use error_chain::*;
    error_chain! {

        links {
            Maze(::prim_mazes::errors::Error, ::prim_mazes::errors::ErrorKind);
        }

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
            Json(::serde_json::Error);
            Logger(::log::SetLoggerError);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    let args: DriverArgs = Docopt::new(USAGE)
        .and_then(|d| d.deserialize())
        .unwrap_or_else(|e| e.exit());

    init_logging(&args)?;

    let maze = match args.flag_maze_file {
        Some(ref path) => load_maze_file(path)?,
        None => generate_maze(&args)?,
    };

    if let Some(ref path) = args.flag_save_maze {
        let file = File::create(path)
            .chain_err(|| format!("Failed to create maze file {}", path))?;
        descriptions::save_maze(&maze, BufWriter::new(file))
            .chain_err(|| format!("Failed to write maze to {}", path))?;
        info!("Saved maze to {}", path);
    }

    let route = pathing::find_route(&maze)?;

    if args.flag_json {
        println!("{}", serde_json::to_string(route.steps())?);
    } else {
        for step in route.steps() {
            println!("{},{}", step.row, step.col);
        }
    }

    if args.flag_show_dead_ends {
        for dead_end in route.dead_ends() {
            println!("dead-end {},{}", dead_end.row, dead_end.col);
        }
    }

    Ok(())
}

fn init_logging(args: &DriverArgs) -> Result<()> {
    let level = if args.flag_verbose {
        LevelFilter::Debug
    } else if args.flag_quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    // The route goes to stdout, so keep the log out of its way.
    WriteLogger::init(level, Config::default(), io::stderr())?;
    Ok(())
}

fn load_maze_file(path: &str) -> Result<Maze> {
    let file = File::open(path).chain_err(|| format!("Failed to open maze file {}", path))?;
    let maze = descriptions::load_maze(BufReader::new(file))
        .chain_err(|| format!("Failed to load maze file {}", path))?;
    info!("Loaded a {}x{} maze from {}", maze.rows().0, maze.columns().0, path);
    Ok(maze)
}

fn generate_maze(args: &DriverArgs) -> Result<Maze> {
    let (rows, columns) = if let Some(square_grid_size) = args.flag_grid_size {
        (square_grid_size, square_grid_size)
    } else {
        (args.flag_rows, args.flag_cols)
    };
    if rows < MIN_DIMENSION || columns < MIN_DIMENSION {
        bail!("A maze needs at least {} rows and {} columns, asked for {}x{}",
              MIN_DIMENSION,
              MIN_DIMENSION,
              rows,
              columns);
    }

    let exit_direction: CompassPrimary = args.flag_exit.parse()?;
    let goal = Coordinate::new(args.flag_goal_row.unwrap_or(rows as isize - 1),
                               args.flag_goal_col.unwrap_or(columns as isize - 1));

    let options = MazeOptionsBuilder::new()
        .rows(rows)
        .columns(columns)
        .start(Some(Coordinate::new(args.flag_start_row, args.flag_start_col)))
        .goal(Some(goal))
        .exit_direction(exit_direction)
        .build();

    let maze = match args.flag_seed {
        Some(seed) => options.generate_with_rng(&mut StdRng::seed_from_u64(seed))?,
        None => options.generate()?,
    };
    info!("Generated a {}x{} maze", rows, columns);
    Ok(maze)
}
