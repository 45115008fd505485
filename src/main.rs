use clap::{ArgAction, Parser, Subcommand};
use eyre::{bail, Result, WrapErr};
use itertools::Itertools;
use lexorank::{LexoRank, Settings};
use log::debug;
use std::cmp::Ordering;
use std::io::{self, BufRead, Write};

/// Generate lexicographically sortable ranks
#[derive(Parser, Debug)]
#[command(name = "lxr", author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (can be repeated)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate ranks and print their canonical form
    Parse {
        #[arg(required = true)]
        ranks: Vec<String>,
    },
    /// Print the rank following a rank
    Inc { rank: String },
    /// Print a rank preceding a rank
    Dec { rank: String },
    /// Print a rank between two ranks
    Between {
        /// Rank the new rank must sort after
        #[arg(short, long)]
        before: Option<String>,
        /// Rank the new rank must sort before
        #[arg(short, long)]
        after: Option<String>,
    },
    /// Print several increasing ranks between two ranks
    Seq {
        #[arg(short, long)]
        before: Option<String>,
        #[arg(short, long)]
        after: Option<String>,
        /// Number of ranks to generate
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },
    /// Compare two ranks of the same bucket
    Compare { first: String, second: String },
    /// Sort ranks read from standard input, one per line
    Sort,
    /// Rotate buckets
    #[command(subcommand)]
    Bucket(BucketCommand),
}

#[derive(Subcommand, Debug)]
enum BucketCommand {
    /// Print the bucket following a bucket
    Next { bucket: String },
    /// Print the bucket preceding a bucket
    Prev { bucket: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    Settings::set_global(Settings::from_config().wrap_err("failed to load settings")?);
    let settings = Settings::get_global();
    debug!("using {:?}", settings);

    let stdout = io::stdout();
    run(cli.command, &settings, io::stdin().lock(), &mut stdout.lock())
}

fn parse_opt(settings: &Settings, rank: Option<&String>) -> Result<Option<LexoRank>> {
    Ok(rank.map(|r| settings.parse_rank(r)).transpose()?)
}

fn run(
    command: Commands,
    settings: &Settings,
    input: impl BufRead,
    out: &mut impl Write,
) -> Result<()> {
    match command {
        Commands::Parse { ranks } => {
            for rank in ranks {
                let rank = settings
                    .parse_rank(&rank)
                    .wrap_err_with(|| format!("failed to parse '{rank}'"))?;
                writeln!(out, "{rank}")?;
            }
        }
        Commands::Inc { rank } => {
            let rank = settings.parse_rank(&rank)?.increment();
            settings.check_length(&rank);
            writeln!(out, "{rank}")?;
        }
        Commands::Dec { rank } => {
            let rank = settings.parse_rank(&rank)?.decrement()?;
            settings.check_length(&rank);
            writeln!(out, "{rank}")?;
        }
        Commands::Between { before, after } => {
            let before = parse_opt(settings, before.as_ref())?;
            let after = parse_opt(settings, after.as_ref())?;
            let rank = LexoRank::between(before.as_ref(), after.as_ref())?;
            settings.check_length(&rank);
            writeln!(out, "{rank}")?;
        }
        Commands::Seq {
            before,
            after,
            count,
        } => {
            let before = parse_opt(settings, before.as_ref())?;
            let after = parse_opt(settings, after.as_ref())?;
            let ranks = LexoRank::spread(before.as_ref(), after.as_ref(), count)?;
            if let Some(last) = ranks.last() {
                settings.check_length(last);
                writeln!(out, "{}", ranks.iter().join("\n"))?;
            }
        }
        Commands::Compare { first, second } => {
            let first = settings.parse_rank(&first)?;
            let second = settings.parse_rank(&second)?;
            if first.bucket() != second.bucket() {
                bail!("cannot compare ranks from different buckets: {first} and {second}");
            }
            let sign = match first.cmp(&second) {
                Ordering::Less => "<",
                Ordering::Equal => "=",
                Ordering::Greater => ">",
            };
            writeln!(out, "{sign}")?;
        }
        Commands::Sort => {
            let mut ranks = vec![];
            for (lineno, line) in input.lines().enumerate() {
                let line = line?;
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                ranks.push(
                    settings
                        .parse_rank(line)
                        .wrap_err_with(|| format!("line {}", lineno + 1))?,
                );
            }
            ranks.sort();
            for rank in ranks {
                writeln!(out, "{rank}")?;
            }
        }
        Commands::Bucket(BucketCommand::Next { bucket }) => {
            writeln!(out, "{}", lexorank::next_bucket(&bucket)?)?;
        }
        Commands::Bucket(BucketCommand::Prev { bucket }) => {
            writeln!(out, "{}", lexorank::prev_bucket(&bucket)?)?;
        }
    }

    Ok(())
}
