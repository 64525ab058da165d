use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use serde_json::json;
use slices_tokenizer::serialization::load_record;
use slices_tokenizer::{
    pre_tokenize, IngestConfig, SlicesTokenizer, TokenId, Trainer, TrainerConfig,
};

const DEFAULT_OUTPUT: &str = "slices_tokenizer.json";

#[derive(Parser, Debug)]
#[command(author, version, about = "SLICES tokenizer toolkit", long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Decrease verbosity (-q, -qq)
    #[arg(short = 'q', long, global = true, action = ArgAction::Count)]
    quiet: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Train a vocabulary from newline-delimited SLICES corpora
    Train(TrainArgs),
    /// Encode SLICES strings with a trained tokenizer
    Encode(EncodeArgs),
    /// Decode token ids back into a SLICES string
    Decode(DecodeArgs),
    /// Show how strings are segmented, without a vocabulary
    PreTokenize(PreTokenizeArgs),
    /// Inspect tokenizer metadata and vocabulary statistics
    Info(InfoArgs),
}

#[derive(Args, Debug)]
struct TrainArgs {
    /// Files or directories to ingest
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output path for the tokenizer JSON
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Maximum vocabulary size, special tokens included
    #[arg(long, value_name = "SIZE")]
    vocab_size: Option<usize>,

    /// Placeholder emitted for unknown ids
    #[arg(long, value_name = "TOKEN")]
    unk_token: Option<String>,

    /// Disable progress logging and spinner
    #[arg(long)]
    no_progress: bool,

    /// Disable recursive directory traversal
    #[arg(long)]
    no_recursive: bool,

    /// Follow symlinks during traversal
    #[arg(long)]
    follow_symlinks: bool,
}

#[derive(Args, Debug)]
struct EncodeArgs {
    /// Tokenizer JSON to load
    #[arg(short = 'm', long, value_name = "PATH")]
    tokenizer: PathBuf,

    /// File with one SLICES string per line
    #[arg(long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Strings to encode when --input is omitted
    #[arg(value_name = "TEXT", required_unless_present = "input")]
    texts: Vec<String>,

    /// Emit JSON lines instead of human-readable output
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Tokenizer JSON to load
    #[arg(short = 'm', long, value_name = "PATH")]
    tokenizer: PathBuf,

    /// Path to whitespace separated token ids
    #[arg(long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Token ids to decode when --input is omitted
    #[arg(value_name = "ID", required_unless_present = "input")]
    tokens: Vec<TokenId>,

    /// Output file for the decoded string (defaults to stdout)
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct PreTokenizeArgs {
    /// Strings to segment
    #[arg(value_name = "TEXT", required = true)]
    texts: Vec<String>,

    /// Emit JSON lines with spans
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct InfoArgs {
    /// Tokenizer JSON to inspect
    #[arg(short = 'm', long, value_name = "PATH")]
    tokenizer: PathBuf,

    /// Emit machine-readable JSON summary
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Train(args) => run_train(args),
        Commands::Encode(args) => run_encode(args),
        Commands::Decode(args) => run_decode(args),
        Commands::PreTokenize(args) => run_pre_tokenize(args),
        Commands::Info(args) => run_info(args),
    }
}

fn init_logging(verbose: u8, quiet: u8) {
    use log::LevelFilter;

    let level = if quiet > 0 {
        match quiet {
            1 => LevelFilter::Warn,
            _ => LevelFilter::Error,
        }
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    builder.format_timestamp_millis();
    builder.filter_level(level);
    let _ = builder.try_init();
}

fn load_tokenizer(path: &Path) -> Result<SlicesTokenizer> {
    SlicesTokenizer::from_file(path)
        .with_context(|| format!("failed to load tokenizer from {}", path.display()))
}

fn run_train(args: TrainArgs) -> Result<()> {
    let mut cfg = TrainerConfig::builder().show_progress(!args.no_progress);
    if let Some(vocab_size) = args.vocab_size {
        cfg = cfg.vocab_size(vocab_size);
    }
    if let Some(unk_token) = args.unk_token {
        cfg = cfg.unk_token(unk_token);
    }
    let trainer_cfg = cfg.build()?;

    let ingest_cfg = IngestConfig::builder()
        .recursive(!args.no_recursive)
        .follow_symlinks(args.follow_symlinks)
        .build();

    let spinner = if args.no_progress {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner} counting tokens... {elapsed}")
            .context("invalid spinner template")?
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(80));
        Some(pb)
    };

    let trainer = Trainer::new(trainer_cfg.clone());
    let start = Instant::now();
    let artifacts = trainer
        .train_from_paths(&args.inputs, &ingest_cfg)
        .with_context(|| "failed to train from corpus")?;
    if let Some(pb) = spinner {
        pb.finish_with_message("training complete");
    }
    let elapsed = start.elapsed();
    info!(
        "training complete: sequences={} distinct={} duration={elapsed:.2?}",
        artifacts.metrics.sequences, artifacts.metrics.distinct_tokens
    );
    print!("{artifacts}");

    let tokenizer = SlicesTokenizer::from_artifacts(artifacts, trainer_cfg);
    tokenizer
        .save(&args.output)
        .with_context(|| format!("failed to save tokenizer to {}", args.output.display()))?;
    println!("wrote tokenizer to {}", args.output.display());

    Ok(())
}

fn read_lines(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(contents
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

fn run_encode(args: EncodeArgs) -> Result<()> {
    let tokenizer = load_tokenizer(&args.tokenizer)?;
    let texts = match &args.input {
        Some(path) => read_lines(path)?,
        None => args.texts,
    };

    for text in &texts {
        let encoding = tokenizer.encode(text);
        if args.json {
            let record = json!({
                "text": text,
                "tokens": encoding.tokens,
                "ids": encoding.ids,
                "spans": encoding.spans,
            });
            println!("{}", serde_json::to_string(&record)?);
        } else {
            println!("{text}");
            println!("  tokens ({}): {}", encoding.len(), encoding.tokens.join(" "));
            println!("  ids: {}", join_ids(&encoding.ids));
        }
    }

    Ok(())
}

fn run_decode(args: DecodeArgs) -> Result<()> {
    let tokenizer = load_tokenizer(&args.tokenizer)?;

    let tokens = if let Some(input_path) = &args.input {
        let contents = fs::read_to_string(input_path)
            .with_context(|| format!("failed to read {}", input_path.display()))?;
        parse_token_list(&contents)?
    } else {
        args.tokens
    };

    let text = tokenizer.decode(&tokens);

    if let Some(path) = &args.output {
        let mut file =
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
        writeln!(file, "{text}").with_context(|| format!("failed to write {}", path.display()))?;
        println!("wrote {} tokens to {}", tokens.len(), path.display());
    } else {
        writeln!(io::stdout(), "{text}")?;
    }

    Ok(())
}

fn run_pre_tokenize(args: PreTokenizeArgs) -> Result<()> {
    for text in &args.texts {
        let spans = pre_tokenize(text);
        if args.json {
            let record = json!({ "text": text, "spans": spans });
            println!("{}", serde_json::to_string(&record)?);
        } else {
            let rendered = spans
                .iter()
                .map(|span| format!("{}@{}..{}", span.token, span.start, span.end))
                .collect::<Vec<_>>();
            println!("{}", rendered.join(" "));
        }
    }
    Ok(())
}

fn run_info(args: InfoArgs) -> Result<()> {
    let record = load_record(&args.tokenizer)
        .with_context(|| format!("failed to read {}", args.tokenizer.display()))?;
    let model_type = record.model_type.clone();
    let tokenizer = SlicesTokenizer::from_record(record)
        .with_context(|| format!("failed to load tokenizer from {}", args.tokenizer.display()))?;
    let config = tokenizer.config();
    let stats = tokenizer.stats();

    if args.json {
        let summary = json!({
            "path": args.tokenizer.display().to_string(),
            "model_type": model_type,
            "vocab_size": tokenizer.vocab_size(),
            "capacity": config.vocab_size,
            "unk_token": config.unk_token,
            "special_tokens": stats.special,
            "elements": stats.elements,
            "numbers": stats.numbers,
            "bond_descriptors": stats.bond_descriptors,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Model type   : {model_type}");
        println!("Vocab size   : {}", tokenizer.vocab_size());
        println!("Capacity     : {}", config.vocab_size);
        println!("Unk token    : {}", config.unk_token);
        print!("{stats}");
    }

    Ok(())
}

fn join_ids(ids: &[TokenId]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_token_list(text: &str) -> Result<Vec<TokenId>> {
    text.split_whitespace()
        .map(|part| {
            part.parse::<TokenId>()
                .map_err(|err| anyhow!("invalid token id `{part}`: {err}"))
        })
        .collect()
}
