use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "gifsquare",
    version,
    about = "Convert every .gif in a directory into a square animated .png"
)]
struct Cli {
    /// Directory containing .gif files to convert.
    #[arg(long = "in")]
    in_dir: PathBuf,

    /// Directory where the square .png files are written.
    #[arg(long = "out")]
    out_dir: PathBuf,

    /// Maximum side of the output; larger animations are resized down to it.
    #[arg(long = "max", default_value_t = gifsquare::DEFAULT_MAX_DIM)]
    max_dim: u32,

    /// Deflate effort for the output files.
    #[arg(long, value_enum, default_value_t = CompressionChoice::Best)]
    compression: CompressionChoice,

    /// Log every converted file.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CompressionChoice {
    None,
    Fast,
    Default,
    Best,
}

impl From<CompressionChoice> for gifsquare::CompressionLevel {
    fn from(choice: CompressionChoice) -> Self {
        match choice {
            CompressionChoice::None => Self::None,
            CompressionChoice::Fast => Self::Fast,
            CompressionChoice::Default => Self::Default,
            CompressionChoice::Best => Self::Best,
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => err.exit(),
        Err(err) => {
            // Usage errors (including missing --in/--out) exit with status 1.
            let _ = err.print();
            return ExitCode::from(1);
        }
    };

    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let opts = gifsquare::ConvertOpts {
        max_dim: cli.max_dim,
        compression: cli.compression.into(),
    };
    if opts.max_dim == 0 {
        anyhow::bail!("--max must be greater than zero");
    }

    let stats = gifsquare::convert_dir(&cli.in_dir, &cli.out_dir, &opts).with_context(|| {
        format!(
            "convert '{}' into '{}'",
            cli.in_dir.display(),
            cli.out_dir.display()
        )
    })?;

    eprintln!(
        "wrote {} file(s) ({} frames) to {}",
        stats.written.len(),
        stats.frames_total,
        cli.out_dir.display()
    );
    Ok(())
}
