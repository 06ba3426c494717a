//! Optistrip CLI - optimal triangle strips from the command line.
//!
//! Usage: optistrip <COMMAND> [OPTIONS] <INPUT>
//!
//! Run `optistrip --help` for available commands. Set `RUST_LOG=debug` to see
//! model sizes and solver sessions.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};

use optistrip::algo::strips::{create_triangle_strips_with_progress, StripOptions, StripStats};
use optistrip::algo::Progress;
use optistrip::io;
use optistrip::mesh::DualGraph;
use optistrip::milp::MicrolpSolver;

#[derive(Parser)]
#[command(name = "optistrip")]
#[command(author, version, about = "Optimal triangle strip CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh and dual graph information
    Info {
        /// Input mesh file (obj, ply, stl)
        input: PathBuf,
    },

    /// Compute optimal triangle strips
    Strip {
        /// Input mesh file (obj, ply, stl)
        input: PathBuf,

        /// Write a strip visualization OBJ
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Anti-cycle slack (must exceed the solver tolerance)
        #[arg(long, default_value = "1e-4")]
        slack: f64,

        /// Solver values above this count as a join
        #[arg(long, default_value = "0.5")]
        threshold: f64,

        /// Validate the strips before reporting them (default in debug builds)
        #[arg(long, conflicts_with = "no_verify")]
        verify: bool,

        /// Skip strip validation
        #[arg(long)]
        no_verify: bool,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => {
            cmd_info(&input)?;
        }
        Commands::Strip {
            input,
            output,
            slack,
            threshold,
            verify,
            no_verify,
        } => {
            let options = strip_options(slack, threshold, verify, no_verify);
            cmd_strip(&input, output.as_deref(), &options)?;
        }
    }
    Ok(())
}

/// Build strip options; validation keeps the build default unless a flag
/// overrides it.
fn strip_options(slack: f64, threshold: f64, verify: bool, no_verify: bool) -> StripOptions {
    let options = StripOptions::default()
        .with_cycle_slack(slack)
        .with_selection_threshold(threshold);
    if verify || no_verify {
        options.with_verify(verify)
    } else {
        options
    }
}

/// Create a progress reporter that shows the current stage on the terminal.
fn create_progress() -> Progress {
    Progress::new(|current, total, message| {
        if total == 0 {
            return;
        }

        let bar_width = 20;
        let filled = (current.min(total) * bar_width) / total;
        let bar = "=".repeat(filled);
        let space = " ".repeat(bar_width - filled);

        // Pad to clear a longer previous message.
        eprint!("\r[{}{}] {}/{} {:<32}", bar, space, current, total, message);
        let _ = std::io::stderr().flush();

        if current >= total {
            eprintln!();
        }
    })
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = io::load(input)?;
    let graph = DualGraph::build(&mesh.indices)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Triangles: {}", graph.num_triangles());
    println!("Edges: {}", graph.num_edges());
    println!("Dual edges: {}", graph.num_dual_edges());
    println!("Boundary edges: {}", graph.num_boundary_edges());

    let mut degrees = [0usize; 4];
    for t in graph.triangle_ids() {
        degrees[graph.dual_degree(t)] += 1;
    }
    println!("Isolated triangles: {}", degrees[0]);
    println!("Anti-fork constraints: {}", degrees[3]);

    if graph.num_boundary_edges() == 0 {
        println!("Topology: Closed (no boundary)");
    } else {
        println!("Topology: Open ({} boundary edges)", graph.num_boundary_edges());
    }

    println!(
        "Model: {} binary + {} flow variables",
        graph.num_dual_edges(),
        graph.num_dual_edges() * 2
    );
    Ok(())
}

fn cmd_strip(
    input: &Path,
    output: Option<&Path>,
    options: &StripOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = io::load(input)?;
    println!("Loaded: {} vertices, {} triangles", mesh.num_vertices(), mesh.num_triangles());

    let progress = create_progress();
    let start = Instant::now();
    let strips =
        create_triangle_strips_with_progress(&mesh.indices, MicrolpSolver::new(), options, &progress)?;
    let elapsed = start.elapsed();
    let stats = StripStats::from_strips(&strips);

    println!("Strips: {} ({:.2?})", stats.strips, elapsed);
    println!("Verified: {}", if options.verify { "yes" } else { "no" });
    println!("Joins: {}", stats.joins);
    println!("Longest strip: {}", stats.longest);
    println!("Single triangles: {}", stats.singletons);
    println!("Mean length: {:.2}", stats.mean_length());

    if let Some(output) = output {
        io::obj::save_strips(&mesh, &strips, output)?;
        println!("Saved: {}", output.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed_options(args: &[&str]) -> StripOptions {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::Strip {
                slack,
                threshold,
                verify,
                no_verify,
                ..
            } => strip_options(slack, threshold, verify, no_verify),
            Commands::Info { .. } => panic!("expected the strip command"),
        }
    }

    #[test]
    fn test_verify_defaults_to_build_profile() {
        let options = parsed_options(&["optistrip", "strip", "mesh.obj"]);
        assert_eq!(options.verify, cfg!(debug_assertions));
        assert_eq!(options.cycle_slack, 1e-4);
        assert_eq!(options.selection_threshold, 0.5);
    }

    #[test]
    fn test_verify_flags_override() {
        assert!(parsed_options(&["optistrip", "strip", "--verify", "mesh.obj"]).verify);
        assert!(!parsed_options(&["optistrip", "strip", "--no-verify", "mesh.obj"]).verify);
        assert!(Cli::try_parse_from(["optistrip", "strip", "--verify", "--no-verify", "mesh.obj"]).is_err());
    }
}
