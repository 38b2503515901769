use clap::Parser;
use statpower_core::{
    EvaluateConfig, ParameterGrid, PowerSurface, TTestEvaluator, evaluate_grid, power_summary,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "statpower")]
#[command(about = "Empirical power simulation for two-sample designs")]
struct Args {
    /// Per-group sample sizes to evaluate (comma separated)
    #[arg(long, value_delimiter = ',', default_value = "10,20,50,100")]
    sample_sizes: Vec<usize>,

    /// Effect sizes as the difference in group means, in SD units
    #[arg(long, value_delimiter = ',', default_value = "0.2,0.5,0.8")]
    effect_sizes: Vec<f64>,

    /// Simulated trials per combination
    #[arg(short, long, default_value_t = 2_000)]
    iterations: usize,

    /// Worker threads (1 = sequential)
    #[arg(short, long, default_value_t = 1)]
    workers: usize,

    /// Significance threshold
    #[arg(long, default_value_t = 0.05)]
    alpha: f64,

    /// Base RNG seed; reruns with the same seed reproduce the same table
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Assume equal group variances (pooled test instead of Welch)
    #[arg(long)]
    equal_variance: bool,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

fn init_logging(level: &str) {
    let default_filter = format!("statpower={level},statpower_core=warn");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(&args.log_level);

    let grid = ParameterGrid::new(args.sample_sizes, args.effect_sizes)?;
    let evaluator = TTestEvaluator {
        base_seed: args.seed,
        equal_variance: args.equal_variance,
    };
    let config = EvaluateConfig {
        iterations: args.iterations,
        workers: args.workers,
    };

    tracing::info!(
        combinations = grid.total_combinations(),
        trials = grid.total_trials(config.iterations),
        workers = config.workers,
        "starting power study"
    );

    let started = std::time::Instant::now();
    let results = evaluate_grid(&grid, &evaluator, &config)?;
    tracing::info!(
        rows = results.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "evaluation finished"
    );

    let surface = power_summary(&grid, &results, "p_value", args.alpha)?;
    print_table(&surface, args.alpha);

    Ok(())
}

fn print_table(surface: &PowerSurface, alpha: f64) {
    println!("Empirical power (p < {alpha})");
    print!("{:>8}", "n");
    for effect in surface.effect_sizes() {
        print!("{:>10}", format!("d={effect}"));
    }
    println!();

    for (i, n) in surface.sample_sizes().iter().enumerate() {
        print!("{n:>8}");
        for j in 0..surface.effect_sizes().len() {
            let cell = surface.cell(i, j).expect("cell within surface bounds");
            print!("{:>10.3}", cell.power);
        }
        println!();
    }
}
