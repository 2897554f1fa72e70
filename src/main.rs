//! Train and score the tweet sentiment classifier on a labeled CSV corpus.

use std::path::PathBuf;

use tweetsent::config::{self, PipelineConfig};
use tweetsent::dataset::Label;
use tweetsent::dataset::corpus::load_csv;
use tweetsent::logging;
use tweetsent::pipeline::{self, RunSummary};

fn main() {
    if let Err(err) = logging::init(logging::DEFAULT_FILTER) {
        eprintln!("Logging disabled: {err}");
    }
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let options = parse_args(std::env::args().skip(1).collect())?;
    let config = match &options.config {
        Some(path) => config::load_from(path),
        None => config::load_or_default(),
    }
    .map_err(|err| err.to_string())?;
    let config = options.apply(config);

    let documents = load_csv(&options.data, &config.corpus).map_err(|err| err.to_string())?;
    let outcome = pipeline::run(&documents, &config).map_err(|err| err.to_string())?;
    let summary = outcome.summary();

    if options.json {
        let json = serde_json::to_string_pretty(&summary).map_err(|err| err.to_string())?;
        println!("{json}");
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &RunSummary) {
    let eval = &summary.evaluation;
    println!("F1 Score: {}", eval.f1);
    println!("Accuracy Score: {}", eval.accuracy);
    println!();
    println!(
        "documents={} vocabulary={} train={} test={} iterations={} converged={}",
        summary.documents,
        summary.vocabulary_size,
        summary.train_rows,
        summary.test_rows,
        summary.iterations,
        summary.converged
    );
    for label in Label::ALL {
        if let Some(stats) = eval.per_class.get(label.index()) {
            println!(
                "class {} {:<10}  precision={:.3}  recall={:.3}  f1={:.3}  support={}",
                label.value(),
                label.name(),
                stats.precision,
                stats.recall,
                stats.f1,
                stats.support
            );
        }
    }
    println!("confusion (rows=truth, cols=predicted):");
    for truth in Label::ALL {
        let row: Vec<String> = Label::ALL
            .iter()
            .map(|predicted| format!("{:>7}", eval.confusion.get(truth.index(), predicted.index())))
            .collect();
        println!("  {} {}", truth.value(), row.join(""));
    }
}

#[derive(Debug, Default)]
struct CliOptions {
    data: PathBuf,
    config: Option<PathBuf>,
    min_df: Option<usize>,
    max_df: Option<f64>,
    test_size: Option<f64>,
    seed: Option<u64>,
    max_iter: Option<usize>,
    c: Option<f64>,
    json: bool,
}

impl CliOptions {
    /// Flags take precedence over file values.
    fn apply(&self, mut config: PipelineConfig) -> PipelineConfig {
        if let Some(min_df) = self.min_df {
            config.vectorizer.min_df = min_df;
        }
        if let Some(max_df) = self.max_df {
            config.vectorizer.max_df = max_df;
        }
        if let Some(test_size) = self.test_size {
            config.split.test_fraction = test_size;
        }
        if let Some(seed) = self.seed {
            config.split.seed = seed;
        }
        if let Some(max_iter) = self.max_iter {
            config.training.max_iter = max_iter;
        }
        if let Some(c) = self.c {
            config.training.c = c;
        }
        config.normalized()
    }
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut data: Option<PathBuf> = None;
    let mut options = CliOptions::default();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => return Err(help_text()),
            "--data" => data = Some(PathBuf::from(next_value(&args, &mut idx, "--data")?)),
            "--config" => {
                options.config = Some(PathBuf::from(next_value(&args, &mut idx, "--config")?));
            }
            "--min-df" => options.min_df = Some(parse_value(&args, &mut idx, "--min-df")?),
            "--max-df" => options.max_df = Some(parse_value(&args, &mut idx, "--max-df")?),
            "--test-size" => options.test_size = Some(parse_value(&args, &mut idx, "--test-size")?),
            "--seed" => options.seed = Some(parse_value(&args, &mut idx, "--seed")?),
            "--max-iter" => options.max_iter = Some(parse_value(&args, &mut idx, "--max-iter")?),
            "--c" => options.c = Some(parse_value(&args, &mut idx, "--c")?),
            "--json" => options.json = true,
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }
    options.data = data.ok_or_else(help_text)?;
    Ok(options)
}

fn next_value(args: &[String], idx: &mut usize, name: &str) -> Result<String, String> {
    let value = args
        .get(*idx + 1)
        .ok_or_else(|| format!("{name} requires a value"))?;
    *idx += 1;
    Ok(value.clone())
}

fn parse_value<T: std::str::FromStr>(
    args: &[String],
    idx: &mut usize,
    name: &str,
) -> Result<T, String> {
    let value = next_value(args, idx, name)?;
    value
        .parse::<T>()
        .map_err(|_| format!("Invalid {name} value: {value}"))
}

fn help_text() -> String {
    [
        "tweetsent",
        "",
        "Trains a bag-of-words logistic regression on a labeled tweet CSV and reports",
        "F1 and accuracy on a held-out split.",
        "",
        "Usage:",
        "  tweetsent --data <csv> [options]",
        "",
        "Options:",
        "  --data <csv>        Corpus with `label` and `tweet` columns (required).",
        "  --config <toml>     Settings file (default: config.toml in the app directory).",
        "  --min-df <n>        Minimum document frequency of a vocabulary term (default: 1000).",
        "  --max-df <f>        Maximum document share of a vocabulary term (default: 0.9).",
        "  --test-size <f>     Held-out fraction (default: 0.25).",
        "  --seed <n>          Split seed (default: 42).",
        "  --max-iter <n>      Gradient step cap (default: 1000).",
        "  --c <f>             Inverse regularization strength (default: 1.0).",
        "  --json              Print the run summary as JSON.",
    ]
    .join("\n")
}
