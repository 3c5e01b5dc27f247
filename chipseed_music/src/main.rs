// chipseed generator CLI.
//
// Generates one composition and prints a summary, or the full composition as
// JSON with --json. Style overrides can be loaded from a JSON file keyed by
// style id.
//
// Usage:
//   cargo run -p chipseed_music -- [--seed SEED] [--style STYLE] [--variant ID]
//     [--bars N] [--intro RATIO] [--no-bass] [--no-harmony] [--no-drums]
//     [--overrides FILE] [--json] [--list-styles]
//
// Styles: classic_8bit, lofi, battle, suspense, calm, rock, dance, workshop
//
// Logging goes to stderr through tracing; set RUST_LOG=chipseed_music=debug
// to see the drawn scale, progression and bar plan.

use chipseed_music::catalog::{style_meta, style_variants};
use chipseed_music::compose::{GenerationRequest, Seed, generate};
use chipseed_music::event::{Composition, DrumKind};
use chipseed_music::style::{Style, StyleOverrides};
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    if has_flag(&args, "--list-styles") {
        return list_styles();
    }

    let seed = parse_flag::<String>(&args, "--seed")
        .map(|s| match s.parse::<i64>() {
            Ok(n) => Seed::Number(n),
            Err(_) => Seed::Text(s),
        })
        .unwrap_or_default();
    let style = parse_flag::<String>(&args, "--style")
        .map(|s| Style::from_id_or_default(&s))
        .unwrap_or_default();

    let mut request = GenerationRequest::new(seed, style);
    request.variant = parse_flag(&args, "--variant");
    request.bars = parse_flag(&args, "--bars").unwrap_or(request.bars);
    request.intro_ratio = parse_flag(&args, "--intro").unwrap_or(0.0);
    request.layers.bass = !has_flag(&args, "--no-bass");
    request.layers.harmony = !has_flag(&args, "--no-harmony");
    request.layers.drums = !has_flag(&args, "--no-drums");
    let json = has_flag(&args, "--json");

    let overrides = match parse_flag::<String>(&args, "--overrides") {
        Some(path) => match StyleOverrides::load(Path::new(&path)) {
            Ok(o) => o,
            Err(e) => {
                eprintln!("Failed to load overrides from {path}: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => StyleOverrides::new(),
    };

    if !json {
        println!("=== chipseed ===");
        println!("Seed: {}", request.seed);
        println!("Style: {} ({} BPM)", style, style_meta(style).default_bpm);
        println!("Bars: {} (intro ratio {})", request.bars, request.intro_ratio);
        if !overrides.is_empty() {
            println!("Overrides loaded from file.");
        }
        println!();
        println!("[1/2] Generating...");
    }

    let composition = match generate(&request, &overrides) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Generation failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    if json {
        match serde_json::to_string_pretty(&composition) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("Failed to serialize composition: {e}");
                return ExitCode::FAILURE;
            }
        }
        return ExitCode::SUCCESS;
    }

    println!("[2/2] Summary");
    print_summary(&composition);
    ExitCode::SUCCESS
}

fn print_summary(c: &Composition) {
    let info = &c.structure;
    println!("  Name: {}", c.name);
    println!(
        "  Scale: {} {} / progression {:?} / variant {}",
        pitch_name(info.scale_root),
        info.scale_mode,
        info.progression,
        info.variant
    );
    println!(
        "  Bars: {} ({} intro + {} main), {:.1}s at {} BPM",
        info.total_bars,
        info.intro_bars,
        info.main_bars,
        c.total_seconds(),
        c.tempo_bpm
    );
    if !info.quiet_bars.is_empty() {
        println!("  Quiet bars: {:?}", info.quiet_bars);
    }
    for track in c.note_tracks() {
        println!(
            "  {:<8} {:>4} notes, volume {:.2}",
            track.name,
            track.events.len(),
            track.volume
        );
    }
    if let Some(drums) = &c.drums {
        let count = |kind: DrumKind| drums.events.iter().filter(|e| e.kind == kind).count();
        println!(
            "  {:<8} {:>4} hits (kick {}, snare {}, hihat {}, crash {}), volume {:.2}",
            drums.name,
            drums.events.len(),
            count(DrumKind::Kick),
            count(DrumKind::Snare),
            count(DrumKind::Hihat),
            count(DrumKind::Crash),
            drums.volume
        );
    }
}

fn list_styles() -> ExitCode {
    for style in Style::ALL {
        let meta = style_meta(style);
        println!("{} ({} BPM, {})", style, meta.default_bpm, meta.mood);
        println!("  {}", meta.description);
        for variant in style_variants(style) {
            println!("  - {}: {}", variant.id, variant.name);
        }
    }
    ExitCode::SUCCESS
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

fn pitch_name(pitch: u8) -> &'static str {
    match pitch % 12 {
        0 => "C",
        1 => "C#",
        2 => "D",
        3 => "Eb",
        4 => "E",
        5 => "F",
        6 => "F#",
        7 => "G",
        8 => "Ab",
        9 => "A",
        10 => "Bb",
        _ => "B",
    }
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn parse_flag<T: std::str::FromStr>(args: &[String], flag: &str) -> Option<T> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}
