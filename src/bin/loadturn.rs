//! Control-file sidecar inspector.
//!
//! Loads a player's checksum control file (`control.dat` / `contrlN.dat`)
//! from a turn directory and reports how many slots carry a nonzero
//! checksum. Bit-exact parsing of the main turn files (`shipX.dat`,
//! `pdataX.dat`, ...) is an external game-specification concern this
//! toolkit does not define.

use clap::Parser;
use colored::Colorize;
use starturn::control::{ControlFile, filename_for_owner};
use std::path::PathBuf;

#[derive(Parser)]
#[command(about = "Inspect a player's control.dat / contrlN.dat sidecar")]
struct Args {
    /// Directory containing the turn's files.
    dir: PathBuf,

    /// Player number (0 for `control.dat`, -1 for no control file).
    owner: i32,
}

fn nonzero(slots: &[u32]) -> usize {
    slots.iter().filter(|&&v| v != 0).count()
}

fn main() {
    starturn::logging::init();
    let args = Args::parse();

    let Some(name) = filename_for_owner(args.owner) else {
        println!("{}", "owner -1 has no control file".yellow());
        return;
    };

    let file = match ControlFile::load(&args.dir, args.owner) {
        Ok(f) => f,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };

    println!("{} ({})", name.bold(), args.dir.join(&name).display());
    println!("  ships:    {:>4} / {}", nonzero(&file.ships), file.ships.len());
    println!("  planets:  {:>4} / {}", nonzero(&file.planets), file.planets.len());
    println!("  bases:    {:>4} / {}", nonzero(&file.bases), file.bases.len());
    println!("  ships999: {:>4} / {}", nonzero(&file.ships_999), file.ships_999.len());
}
