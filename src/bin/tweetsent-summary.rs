//! Print the most frequent stemmed terms and hashtags of a corpus, per label.

use std::path::PathBuf;

use tweetsent::config;
use tweetsent::dataset::corpus::load_csv;
use tweetsent::logging;
use tweetsent::pipeline::prepare_corpus;
use tweetsent::report::{CorpusSummary, TermCount, summarize};

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
    let top_n = options.top.unwrap_or(config.report.top_n);

    let documents = load_csv(&options.data, &config.corpus).map_err(|err| err.to_string())?;
    let prepared = prepare_corpus(&documents);
    let summary = summarize(&documents, &prepared, top_n);

    if options.json {
        let json = serde_json::to_string_pretty(&summary).map_err(|err| err.to_string())?;
        println!("{json}");
    } else {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &CorpusSummary) {
    for section in summary.sections() {
        println!("== {} ({} documents)", section.scope.title(), section.documents);
        print_counts("top terms", &section.top_terms);
        print_counts("top hashtags", &section.top_hashtags);
        println!();
    }
}

fn print_counts(title: &str, counts: &[TermCount]) {
    println!("  {title}:");
    if counts.is_empty() {
        println!("    (none)");
    }
    for entry in counts {
        println!("    {:<24} {}", entry.term, entry.count);
    }
}

struct CliOptions {
    data: PathBuf,
    config: Option<PathBuf>,
    top: Option<usize>,
    json: bool,
}

fn parse_args(args: Vec<String>) -> Result<CliOptions, String> {
    let mut data: Option<PathBuf> = None;
    let mut config: Option<PathBuf> = None;
    let mut top: Option<usize> = None;
    let mut json = false;
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => return Err(help_text()),
            "--data" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--data requires a value".to_string())?;
                data = Some(PathBuf::from(value));
            }
            "--config" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--config requires a value".to_string())?;
                config = Some(PathBuf::from(value));
            }
            "--top" => {
                idx += 1;
                let value = args.get(idx).ok_or_else(|| "--top requires a value".to_string())?;
                let parsed = value
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid --top value: {value}"))?;
                top = Some(parsed.max(1));
            }
            "--json" => json = true,
            unknown => return Err(format!("Unknown argument: {unknown}\n\n{}", help_text())),
        }
        idx += 1;
    }
    let data = data.ok_or_else(help_text)?;
    Ok(CliOptions {
        data,
        config,
        top,
        json,
    })
}

fn help_text() -> String {
    [
        "tweetsent-summary",
        "",
        "Lists the most frequent stemmed terms and hashtags for all tweets and for each label.",
        "",
        "Usage:",
        "  tweetsent-summary --data <csv> [--config <toml>] [--top <n>] [--json]",
    ]
    .join("\n")
}
