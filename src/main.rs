//! carmine CLI - Command-line interface
//!
//! Commands:
//!   mine     - Mine class association rules from a CSV file
//!   validate - Check a miner config file
//!   schema   - Print JSON schemas for output types

use carmine::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return ExitCode::from(1);
    }

    let result = match args[1].as_str() {
        "mine" => cmd_mine(&args[2..]),
        "validate" => cmd_validate(&args[2..]),
        "schema" => cmd_schema(&args[2..]),
        "version" | "--version" | "-v" => {
            println!("carmine {}", VERSION);
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        cmd => {
            eprintln!("Unknown command: {}", cmd);
            print_usage();
            Err("Unknown command".into())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

fn print_usage() {
    println!(
        r#"
carmine - Class association rule miner

USAGE:
    carmine <COMMAND> [OPTIONS]

COMMANDS:
    mine <data.csv>           Mine class association rules from a CSV file
    validate <config>         Validate a config file (YAML or JSON)
    schema [name]             Print JSON schema for an output type
    version                   Print version
    help                      Show this help

OPTIONS (mine):
    --config <file>           Load a MinerConfig (YAML or JSON)
    --rules <n>               Target number of rules (default: unbounded)
    --min-confidence <x>      Minimum confidence in [0,1] (default: 0.5)
    --delta <x>               Support decrement per cycle (default: 0.05)
    --lower <x>               Minimum support floor (default: 0.01)
    --upper <x>               Minimum support ceiling (default: 1.0)
    --class <first|last|n>    Class column (default: last)
    --itemsets                Include per-level itemset detail in the report
    --remove-missing          Drop all-missing columns before mining
    --json                    JSON output instead of the text report
    --output <file>           Output file (default: stdout)

EXAMPLES:
    carmine mine weather.csv --rules 10 --min-confidence 0.9
    carmine mine data.csv --config miner.yaml --json
    carmine validate miner.yaml
    carmine schema report
"#
    );
}

fn cmd_mine(args: &[String]) -> Result<()> {
    if args.is_empty() {
        return Err("Usage: carmine mine <data.csv> [OPTIONS]".into());
    }

    let data_path = PathBuf::from(&args[0]);
    let mut config = match parse_value_arg(args, &["--config", "-c"]) {
        Some(path) => MinerConfig::load_from_path(Path::new(path))?,
        None => MinerConfig::default(),
    };
    apply_overrides(&mut config, args)?;

    let json_output = args.contains(&"--json".to_string());
    let output = parse_output_arg(args);

    let dataset = read_csv(&data_path)?;
    let outcome = mine(&dataset, &config)?;
    let report = MiningReport::from_outcome(&outcome, &config);

    let rendered = if json_output {
        serde_json::to_string_pretty(&report)?
    } else {
        report.to_report()
    };
    write_output(&output, &rendered)?;
    Ok(())
}

fn cmd_validate(args: &[String]) -> Result<()> {
    if args.is_empty() {
        return Err("Usage: carmine validate <config.yaml|config.json>".into());
    }

    let config = MinerConfig::load_from_path(Path::new(&args[0]))?;
    config.validate()?;

    println!("Config OK");
    println!("{}", config.to_yaml()?.trim_end());
    Ok(())
}

fn cmd_schema(args: &[String]) -> Result<()> {
    let schema_name = args.first().map(|s| s.as_str()).unwrap_or("list");

    match schema_name {
        "list" => {
            println!("Available schemas: config, report, outcome");
            Ok(())
        }
        "config" => print_schema::<MinerConfig>(),
        "report" => print_schema::<MiningReport>(),
        "outcome" => print_schema::<MiningOutcome>(),
        _ => Err(format!("Unknown schema: {}", schema_name).into()),
    }
}

fn print_schema<T: schemars::JsonSchema>() -> Result<()> {
    let schema = schemars::schema_for!(T);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

/// Minimal CSV reader: comma split, no quoting, `?` marks a missing
/// cell. The first row is the header; the relation name is the file
/// stem.
fn read_csv(path: &Path) -> Result<Dataset> {
    let content = fs::read_to_string(path)?;
    let relation = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("data");

    let mut lines = content.lines().filter(|line| !line.trim().is_empty());
    let header = lines
        .next()
        .ok_or_else(|| Error::Dataset(format!("{}: no header row", path.display())))?;

    let mut dataset = Dataset::new(relation);
    for name in header.split(',') {
        dataset.add_column(name.trim());
    }
    for line in lines {
        let values: Vec<&str> = line.split(',').map(str::trim).collect();
        dataset.push(&values)?;
    }
    Ok(dataset)
}

fn apply_overrides(config: &mut MinerConfig, args: &[String]) -> Result<()> {
    if let Some(value) = parse_value_arg(args, &["--rules", "-n"]) {
        let count: usize = value
            .parse()
            .map_err(|_| Error::Config(format!("invalid rule count: {}", value)))?;
        config.num_rules = Some(count);
    }
    if let Some(value) = parse_value_arg(args, &["--min-confidence", "-m"]) {
        config.min_metric = parse_fraction(value, "minimum confidence")?;
    }
    if let Some(value) = parse_value_arg(args, &["--delta", "-d"]) {
        config.delta = parse_fraction(value, "delta")?;
    }
    if let Some(value) = parse_value_arg(args, &["--lower"]) {
        config.lower_bound_min_support = parse_fraction(value, "lower bound")?;
    }
    if let Some(value) = parse_value_arg(args, &["--upper"]) {
        config.upper_bound_min_support = parse_fraction(value, "upper bound")?;
    }
    if let Some(value) = parse_value_arg(args, &["--class"]) {
        config.class_column = parse_class_arg(value)?;
    }
    if args.contains(&"--itemsets".to_string()) {
        config.output_item_sets = true;
    }
    if args.contains(&"--remove-missing".to_string()) {
        config.remove_missing_columns = true;
    }
    Ok(())
}

fn parse_fraction(value: &str, what: &str) -> Result<f64> {
    value
        .parse()
        .map_err(|_| Error::Config(format!("invalid {}: {}", what, value)))
}

fn parse_class_arg(value: &str) -> Result<ClassColumn> {
    match value.to_lowercase().as_str() {
        "first" => Ok(ClassColumn::First),
        "last" => Ok(ClassColumn::Last),
        other => other.parse::<usize>().map(ClassColumn::Index).map_err(|_| {
            Error::Config(format!(
                "invalid class column: {} (expected first, last, or an index)",
                value
            ))
        }),
    }
}

fn parse_value_arg<'a>(args: &'a [String], names: &[&str]) -> Option<&'a str> {
    for (i, arg) in args.iter().enumerate() {
        if names.contains(&arg.as_str()) {
            if let Some(value) = args.get(i + 1) {
                return Some(value.as_str());
            }
        }
    }
    None
}

fn parse_output_arg(args: &[String]) -> Option<PathBuf> {
    for (i, arg) in args.iter().enumerate() {
        if arg == "--output" || arg == "-o" {
            if let Some(path) = args.get(i + 1) {
                return Some(PathBuf::from(path));
            }
        }
    }
    None
}

fn write_output(path: &Option<PathBuf>, content: &str) -> Result<()> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("Written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
