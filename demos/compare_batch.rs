//! Example: Rank many feature records against one target in parallel
//!
//! Usage:
//!   cargo run --release --example compare_batch -- [--jobs N] [--top K] [--json] <target.json> <candidate1.json> ...
//!
//! Notes:
//! - Parallelism is across candidates. Each comparison is single-threaded.
//! - Default workers: (available CPU threads - 1), keeping one core free for the system.

use stratum_compare::io::load_feature_set;
use stratum_compare::{rank_candidates, ComparisonConfig, RankOptions};
use std::env;
use std::time::Instant;

fn default_jobs() -> usize {
    let n = std::thread::available_parallelism().map(|v| v.get()).unwrap_or(1);
    std::cmp::max(1, n.saturating_sub(1))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();

    let mut json = false;
    let mut jobs: Option<usize> = None;
    let mut top: Option<usize> = None;
    let mut paths: Vec<String> = Vec::new();

    while !args.is_empty() {
        let a = args.remove(0);
        match a.as_str() {
            "--json" => json = true,
            "--jobs" | "--top" => {
                let v = args
                    .first()
                    .ok_or_else(|| format!("{} requires a value", a))?
                    .parse::<usize>()?;
                args.remove(0);
                if a == "--jobs" {
                    jobs = Some(std::cmp::max(1, v));
                } else {
                    top = Some(v);
                }
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: compare_batch [--jobs N] [--top K] [--json] <target.json> <candidate.json> ...\n\
                     \n\
                     --jobs N   Parallel workers (default: CPU-1)\n\
                     --top K    Only print the K most similar candidates\n\
                     --json     Emit one JSON object per line (JSONL)\n"
                );
                return Ok(());
            }
            _ => paths.push(a),
        }
    }

    if paths.len() < 2 {
        eprintln!("ERROR: Provide a target and at least one candidate. Use --help for usage.");
        std::process::exit(2);
    }

    let jobs = jobs.unwrap_or_else(default_jobs);
    let target_path = paths.remove(0);
    eprintln!("Batch: {} candidates, jobs={}", paths.len(), jobs);

    let t0 = Instant::now();
    let target = load_feature_set(&target_path)?;
    let candidates = paths
        .iter()
        .map(load_feature_set)
        .collect::<Result<Vec<_>, _>>()?;

    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;
    let options = RankOptions {
        max_results: top,
        ..RankOptions::default()
    };
    let config = ComparisonConfig::default();
    let ranked = pool.install(|| rank_candidates(&target, &candidates, &config, &options))?;

    for (rank, m) in ranked.iter().enumerate() {
        let path = &paths[m.index];
        if json {
            println!(
                "{{\"file\":{},\"rank\":{},\"overall_similarity\":{:.4},\"similarity_level\":{}}}",
                serde_json::to_string(path)?,
                rank + 1,
                m.result.overall_similarity,
                serde_json::to_string(&m.result.similarity_level)?
            );
        } else {
            println!(
                "[{}/{}] {}: {:.2}% ({}) mfcc_dtw={:.4} chroma_dtw={:.4}",
                rank + 1,
                ranked.len(),
                path,
                m.result.display_percentage(),
                m.result.similarity_level,
                m.result.timbral.dtw_distance,
                m.result.harmonic.dtw_distance
            );
        }
    }

    eprintln!("Done: {} ranked, wall={:.0}ms", ranked.len(), t0.elapsed().as_secs_f64() * 1000.0);
    Ok(())
}
