//! Texanim CLI - Load a resource pack's texture animations and play them.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use texanim::{
    animation::{AnimationLibrary, DirectorySource, GroupPlayback},
    schema::PlayerConfig,
};

/// Optional configuration file inside the pack directory.
const CONFIG_FILE: &str = "texanim.json";

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "--example" {
        print_example_config();
        return;
    }

    if args.len() < 2 {
        eprintln!("Usage: {} <pack_dir> [ticks]", args[0]);
        eprintln!();
        eprintln!("Load and play the texture animations of an unpacked resource pack.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  pack_dir  Directory containing assets/<namespace>/...");
        eprintln!("  ticks     Number of live ticks to run (default: 100)");
        eprintln!();
        eprintln!("An optional {} in pack_dir overrides the defaults.", CONFIG_FILE);
        eprintln!("Print the default configuration with --example.");
        std::process::exit(1);
    }

    let pack_dir = PathBuf::from(&args[1]);
    let ticks: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);

    // Load configuration
    let config_path = pack_dir.join(CONFIG_FILE);
    let config: PlayerConfig = if config_path.exists() {
        let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
            eprintln!("Error reading config file: {}", e);
            std::process::exit(1);
        });
        serde_json::from_str(&config_str).unwrap_or_else(|e| {
            eprintln!("Error parsing config: {}", e);
            std::process::exit(1);
        })
    } else {
        PlayerConfig::default()
    };

    println!("Texture Animations");
    println!("==================");
    println!("Pack: {}", pack_dir.display());
    println!("Mode: {:?}", config.mode);
    match config.max_baked_frames {
        Some(max) => println!("Baked frame ceiling: {}", max),
        None => println!("Baked frame ceiling: none"),
    }
    println!();

    let start = Instant::now();
    let source = DirectorySource::new(&pack_dir);
    let mut library = AnimationLibrary::load(&source, &config).unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    });
    println!(
        "Loaded {} targets in {:.2}s",
        library.len(),
        start.elapsed().as_secs_f32()
    );

    for (target, playback) in library.groups() {
        match playback {
            GroupPlayback::Live(texture) => println!(
                "  {}: live, {} animations, {} tick cycle",
                target,
                texture.group().animations().len(),
                texture.group().cycle_length()
            ),
            GroupPlayback::Baked(baked) => println!(
                "  {}: baked, {} ticks, {} distinct frames, {} bytes",
                target,
                baked.len(),
                baked.distinct_frames().len(),
                baked.byte_len()
            ),
            GroupPlayback::Failed => println!("  {}: failed, showing original", target),
        }
    }
    println!();

    // Run live ticks
    let start = Instant::now();
    let mut redraws = 0;
    let mut uploads = 0;
    for _ in 0..ticks {
        redraws += library.tick();
        uploads += library.take_uploads().len();
    }
    let elapsed = start.elapsed();

    println!("Ran {} ticks", ticks);
    println!("  Redraws: {}", redraws);
    println!("  Uploads: {}", uploads);
    println!(
        "Time: {:.3}s ({:.1} ticks/s)",
        elapsed.as_secs_f32(),
        ticks as f32 / elapsed.as_secs_f32().max(f32::EPSILON)
    );
}

fn print_example_config() {
    let config = PlayerConfig::default();

    println!("Example configuration ({}):", CONFIG_FILE);
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
}
