use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, ValueEnum};
use serde::Serialize;

use e2e_tests::random_corpus;
use tagger_graph::{ComponentLabeler, GraphBuilder, GraphPruner, Percentile, TopicScorer};

const DEFAULT_ITERATIONS: usize = 3;
const DEFAULT_SEED: u64 = 42;

#[derive(Parser, Debug)]
#[command(name = "build_bench", about = "Graph tagger pipeline benchmark harness")]
struct Args {
    #[arg(long, value_enum, default_value = "small")]
    tier: DatasetTier,
    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    iterations: usize,
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    #[arg(long, default_value_t = 97.5)]
    percentile: f64,
    #[arg(long)]
    out_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, Serialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
enum DatasetTier {
    Small,
    Medium,
    Large,
}

impl DatasetTier {
    /// (chunks, vocabulary, max topics per chunk)
    fn shape(&self) -> (usize, usize, usize) {
        match self {
            DatasetTier::Small => (500, 200, 5),
            DatasetTier::Medium => (2_000, 600, 8),
            DatasetTier::Large => (8_000, 1_500, 10),
        }
    }
}

#[derive(Debug, Serialize)]
struct StepMetrics {
    p50_ms: f64,
    p90_ms: f64,
    p99_ms: f64,
}

#[derive(Debug, Serialize)]
struct BenchmarkOutput {
    tier: DatasetTier,
    iterations: usize,
    chunks: usize,
    edges: usize,
    retained_edges: usize,
    components: usize,
    steps: BTreeMap<String, StepMetrics>,
}

fn main() -> Result<(), String> {
    let args = Args::parse();
    let percentile = Percentile::new(args.percentile).map_err(|e| e.to_string())?;
    let (chunk_count, vocabulary, max_topics) = args.tier.shape();

    let mut durations: HashMap<String, Vec<f64>> = HashMap::new();
    let mut shape = (0, 0, 0);

    for iteration in 0..args.iterations {
        let corpus = random_corpus(
            args.seed + iteration as u64,
            chunk_count,
            vocabulary,
            max_topics,
        );

        let start = Instant::now();
        let scores = TopicScorer::new()
            .compute(&corpus)
            .map_err(|e| e.to_string())?;
        record(&mut durations, "score", start);

        let start = Instant::now();
        let sequential = GraphBuilder::sequential()
            .build(corpus.clone(), &scores)
            .map_err(|e| e.to_string())?;
        record(&mut durations, "build.sequential", start);

        let start = Instant::now();
        let graph = GraphBuilder::new()
            .build(corpus, &scores)
            .map_err(|e| e.to_string())?;
        record(&mut durations, "build.parallel", start);

        if graph.edge_count() != sequential.edge_count() {
            return Err(format!(
                "parallel build produced {} edges, sequential {}",
                graph.edge_count(),
                sequential.edge_count()
            ));
        }

        let start = Instant::now();
        let pruned = GraphPruner::new(percentile)
            .prune(&graph)
            .map_err(|e| e.to_string())?;
        record(&mut durations, "prune", start);

        let start = Instant::now();
        let components = ComponentLabeler::new().label(&pruned.graph);
        record(&mut durations, "label", start);

        shape = (
            graph.edge_count(),
            pruned.graph.edge_count(),
            components.component_count(),
        );
    }

    let steps = durations
        .into_iter()
        .map(|(step, mut values)| {
            values.sort_by(f64::total_cmp);
            let metrics = StepMetrics {
                p50_ms: percentile_of(&values, 50.0),
                p90_ms: percentile_of(&values, 90.0),
                p99_ms: percentile_of(&values, 99.0),
            };
            (step, metrics)
        })
        .collect();

    let output = BenchmarkOutput {
        tier: args.tier,
        iterations: args.iterations,
        chunks: chunk_count,
        edges: shape.0,
        retained_edges: shape.1,
        components: shape.2,
        steps,
    };

    let json = serde_json::to_string_pretty(&output).map_err(|e| e.to_string())?;
    let table = render_table(&output);

    if let Some(out_dir) = &args.out_dir {
        fs::create_dir_all(out_dir).map_err(|e| format!("Failed to create out dir: {e}"))?;
        fs::write(out_dir.join("latest.json"), &json).map_err(|e| e.to_string())?;
        fs::write(out_dir.join("latest.txt"), &table).map_err(|e| e.to_string())?;
    }

    println!("{}", table);
    println!("\n{}", json);
    Ok(())
}

fn record(durations: &mut HashMap<String, Vec<f64>>, step: &str, start: Instant) {
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    durations
        .entry(step.to_string())
        .or_default()
        .push(elapsed_ms);
}

fn percentile_of(values: &[f64], p: f64) -> f64 {
    tagger_graph::percentile(values, p).unwrap_or(0.0)
}

fn render_table(output: &BenchmarkOutput) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "Benchmark Results (tier={:?}, iterations={}, chunks={}, edges={}, retained={}, components={})",
        output.tier,
        output.iterations,
        output.chunks,
        output.edges,
        output.retained_edges,
        output.components
    ));
    lines.push("step\tp50_ms\tp90_ms\tp99_ms".to_string());
    for (step, metrics) in &output.steps {
        lines.push(format!(
            "{}\t{:.2}\t{:.2}\t{:.2}",
            step, metrics.p50_ms, metrics.p90_ms, metrics.p99_ms
        ));
    }
    lines.join("\n")
}
