//! Friendly-code list tool.
//!
//! Loads a master friendly-code list (and optional extension blocklist),
//! then either classifies the codes given on the command line or emits
//! freshly generated random codes.

use clap::Parser;
use colored::Colorize;
use starturn::fcode::{FriendlyCodeList, HostVersion};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser)]
#[command(about = "Classify or generate VGA Planets friendly codes")]
struct Args {
    /// Master list file (`code,flags,description` per line).
    #[arg(long)]
    list: PathBuf,

    /// Extension prefix-blocklist file.
    #[arg(long)]
    extra: Option<PathBuf>,

    /// Host ruleset: host, nuhost, superhost, phost:MAJOR.MINOR.PATCH, unknown.
    #[arg(long, default_value = "host")]
    host: String,

    /// Codes to classify. When empty, `--count` random codes are generated
    /// instead.
    codes: Vec<String>,

    /// How many random codes to generate when no codes are given.
    #[arg(long, default_value_t = 10)]
    count: u32,
}

fn parse_host(s: &str) -> HostVersion {
    match s.to_ascii_lowercase().as_str() {
        "nuhost" => HostVersion::NuHost,
        "superhost" => HostVersion::SuperHost,
        "unknown" => HostVersion::Unknown,
        s if s.starts_with("phost:") => {
            let parts: Vec<u8> = s[6..].split('.').filter_map(|p| p.parse().ok()).collect();
            match parts.as_slice() {
                [major, minor, patch] => HostVersion::PHost(*major, *minor, *patch),
                _ => HostVersion::PHost(4, 1, 0),
            }
        }
        _ => HostVersion::Host(3, 22),
    }
}

fn main() {
    starturn::logging::init();
    let args = Args::parse();
    let host = parse_host(&args.host);

    let mut list = FriendlyCodeList::new();
    match File::open(&args.list) {
        Ok(f) => list.load(BufReader::new(f)),
        Err(e) => {
            log::error!("{}: {e}", args.list.display());
            std::process::exit(1);
        }
    }
    if let Some(path) = &args.extra {
        match File::open(path) {
            Ok(f) => list.load_extra_codes(BufReader::new(f)),
            Err(e) => log::warn!("{}: {e}", path.display()),
        }
    }
    log::info!("loaded {} master codes", list.len());

    if args.codes.is_empty() {
        let mut rng = rand::rng();
        for _ in 0..args.count {
            let code = list.generate_random_code(&mut rng, host);
            println!("{}", code.green());
        }
        return;
    }

    for code in &args.codes {
        let numeric = FriendlyCodeList::is_numeric(code, host);
        let special = list.is_special(code, false);
        let tag = if special {
            "special".yellow()
        } else if numeric {
            "numeric".cyan()
        } else {
            "ordinary".normal()
        };
        println!("{code:>3}  {tag}");
    }
}
