//! Example: Compare two feature records
//!
//! Usage:
//!   cargo run --example compare_files -- [--json] <features_a.json> <features_b.json>

use stratum_compare::compare_feature_files;
use stratum_compare::io::result_to_json;
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::init();

    let mut json = false;
    let mut paths: Vec<String> = Vec::new();
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--json" => json = true,
            "--help" | "-h" => {
                eprintln!("Usage: compare_files [--json] <features_a.json> <features_b.json>");
                return Ok(());
            }
            _ => paths.push(arg),
        }
    }

    if paths.len() != 2 {
        eprintln!("ERROR: Provide exactly two feature files. Use --help for usage.");
        std::process::exit(2);
    }

    let result = compare_feature_files(&paths[0], &paths[1])?;

    if json {
        println!("{}", result_to_json(&result)?);
        return Ok(());
    }

    println!("Comparison Results:");
    println!(
        "  Overall: {:.2}% ({})",
        result.display_percentage(),
        result.similarity_level
    );
    println!(
        "  MFCC:   dtw={:.4} cosine={:.4} euclidean={:.4} score={:.4}",
        result.timbral.dtw_distance,
        result.timbral.cosine_similarity,
        result.timbral.euclidean_distance,
        result.timbral_score
    );
    println!(
        "  Chroma: dtw={:.4} cosine={:.4} euclidean={:.4} score={:.4}",
        result.harmonic.dtw_distance,
        result.harmonic.cosine_similarity,
        result.harmonic.euclidean_distance,
        result.harmonic_score
    );
    for (label, info) in [("A", &result.audio1_info), ("B", &result.audio2_info)] {
        println!(
            "  {}: {} {:.2}s @ {} Hz, tempo {:.1} BPM ({} beats)",
            label,
            info.filename.as_deref().unwrap_or("<unnamed>"),
            info.duration_seconds,
            info.sample_rate,
            info.tempo_bpm,
            info.beat_count
        );
    }

    Ok(())
}
