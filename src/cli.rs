use crate::config::load_config;
use crate::render::{render_svg, write_output_svg};
use crate::route_dump::{write_route_dump, RouteDump};
use crate::scene::{parse_scene, route_scene};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "ortho-router", version, about = "Orthogonal edge router for box scenes")]
pub struct Args {
    /// Scene file (.json / .json5) or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Output file. Defaults to stdout if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (router settings and themeVariables)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Json,
}

pub fn run() -> Result<()> {
    init_logging();
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    let input = read_input(args.input.as_deref())?;
    let scene = parse_scene(&input)?;
    let routed = route_scene(&scene, &config.router)?;
    let blocked = routed.edges.iter().filter(|(_, e)| !e.collision_free).count();
    if blocked > 0 {
        tracing::warn!(edges = blocked, "some edges have no collision-free route");
    }

    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_svg(&scene, &routed, &config.theme, &config.render);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Json => match args.output.as_deref() {
            Some(path) => write_route_dump(path, &scene, &routed)?,
            None => {
                let dump = RouteDump::from_routes(&scene, &routed);
                println!("{}", serde_json::to_string_pretty(&dump)?);
            }
        },
    }
    Ok(())
}

/// Routes `tracing` events (via their `log` records) to stderr, filtered by `RUST_LOG`.
fn init_logging() {
    // A logger may already be installed when embedded.
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).try_init();
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        if path != Path::new("-") {
            return Ok(std::fs::read_to_string(path)?);
        }
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}
