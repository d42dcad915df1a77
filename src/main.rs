use std::process::ExitCode;

use brushwork::scene::{to_ascii, REFERENCE_PALETTE};
use brushwork::{Pool, PoolConfig, Scene};
use log::{error, info};

const DEFAULT_SIZE: i32 = 64;

struct Args {
    size: i32,
    config: Option<String>,
    scene: Option<String>,
}

/// Parse command line arguments
fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args {
        size: DEFAULT_SIZE,
        config: None,
        scene: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--size" | "-s" => {
                if i + 1 < args.len() {
                    if let Ok(n) = args[i + 1].parse::<i32>() {
                        parsed.size = n;
                    }
                    i += 1;
                }
            },
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    parsed.config = Some(args[i + 1].clone());
                    i += 1;
                }
            },
            "--scene" => {
                if i + 1 < args.len() {
                    parsed.scene = Some(args[i + 1].clone());
                    i += 1;
                }
            },
            "--help" => {
                println!("Usage: brushwork [OPTIONS]");
                println!();
                println!("Renders a stroke scene and prints it as ASCII art.");
                println!();
                println!("Options:");
                println!(
                    "  --size N, -s N        Canvas width and height (default: {})",
                    DEFAULT_SIZE
                );
                println!("  --config PATH, -c PATH  Pool configuration (JSON)");
                println!("  --scene PATH          Scene to render (JSON, default: built-in reference)");
                println!("  --help                Show this help message");
                println!();
                println!("Set RUST_LOG=debug to watch pool traffic.");
                std::process::exit(0);
            },
            other => eprintln!("ignoring unknown argument '{}'", other),
        }
        i += 1;
    }

    parsed
}

fn run(args: &Args) -> brushwork::Result<()> {
    let config = match &args.config {
        Some(path) => PoolConfig::load(path)?,
        None => PoolConfig::default(),
    };
    let scene = match &args.scene {
        Some(path) => Scene::load(path)?,
        None => Scene::reference(),
    };

    let mut pool = Pool::with_config(config)?;
    let canvas = scene.rasterize(&mut pool, args.size, args.size)?;
    print!("{}", to_ascii(&canvas, &REFERENCE_PALETTE, '?'));

    let stats = pool.stats();
    info!(
        "rendered '{}' at {}x{}: {} buffers allocated, {} reused, {} sprites vended",
        scene.name,
        args.size,
        args.size,
        stats.buffers_allocated,
        stats.buffers_reused,
        stats.sprites_vended
    );
    pool.free_sprite(canvas)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = parse_args();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("brushwork: {}", e);
            ExitCode::FAILURE
        },
    }
}
