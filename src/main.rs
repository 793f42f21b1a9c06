use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use cartfile_manifest::ManifestSyntax;
use cartfile_manifest::config::Config;
use cartfile_manifest::file_types::{ManifestKind, ParsedManifest};
use cartfile_manifest::parsers::{DeclarationFile, LockFile, ManifestFormat, load};
use cartfile_manifest::project::{load_declarations, present_manifests};
use cartfile_manifest::reports::{OutputFormat, check_consistency, render_report};

#[derive(Parser)]
#[command(name = "cartfile")]
#[command(about = "Parse, validate and format Cartfile manifests", long_about = None)]
#[command(version)]
struct Cli {
    /// Project directory containing the manifests
    #[arg(short, long, global = true, default_value = ".")]
    project: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse every manifest in the project and exit with code 1 on errors
    Check,
    /// Rewrite manifests in canonical form (sorted entries, comments are removed)
    Fmt {
        /// Only report files that are not canonical; exit with code 1 if any
        #[arg(long)]
        check: bool,
    },
    /// Print the contents of a manifest
    Show {
        /// Path to the manifest file
        #[arg(short, long)]
        file: PathBuf,

        /// Output format: json, markdown, or summary
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Profile manifest parsing (for use with cargo-flamegraph)
    ProfileParse {
        /// Path to the manifest file to parse
        #[arg(short, long)]
        file: PathBuf,

        /// Number of iterations (for meaningful profiling)
        #[arg(short, long, default_value = "1000")]
        iterations: usize,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = Config::load(&cli.project);

    // Initialize tracing
    let default_filter = config.log_level.as_deref().unwrap_or("info");
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let syntax = config.syntax();
    match cli.command {
        Commands::Check => run_check(&cli.project, &syntax).await,
        Commands::Fmt { check } => run_fmt(&cli.project, &syntax, check).await,
        Commands::Show { file, output } => {
            let format = match output {
                Some(output) => OutputFormat::from_str_loose(&output),
                None => config.output.format(),
            };
            match run_show(&file, &syntax, format).await {
                Ok(report) => {
                    println!("{}", report);
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error: {:#}", e);
                    ExitCode::FAILURE
                }
            }
        }
        Commands::ProfileParse { file, iterations } => {
            run_profile_parse(file, &syntax, iterations).await
        }
    }
}

fn detect_kind(path: &Path) -> anyhow::Result<ManifestKind> {
    ManifestKind::detect(path)
        .with_context(|| format!("Unsupported manifest file: {}", path.display()))
}

async fn run_check(project: &Path, syntax: &ManifestSyntax) -> ExitCode {
    let paths = present_manifests(project);
    if paths.is_empty() {
        eprintln!("No manifests found in {}", project.display());
        return ExitCode::FAILURE;
    }

    let mut failed = false;
    for path in &paths {
        let result = match detect_kind(path) {
            Ok(kind) => kind.load(path, syntax).await.map_err(anyhow::Error::from),
            Err(e) => Err(e),
        };
        match result {
            Ok(parsed) => println!("[OK] {} ({} entries)", path.display(), parsed.entry_count()),
            Err(e) => {
                failed = true;
                eprintln!("[ERROR] {}: {:#}", path.display(), e);
            }
        }
    }

    // Per-file checks passed; look for dependencies declared in both files
    if !failed && project.join(DeclarationFile::RELATIVE_PATH).is_file() {
        if let Err(e) = load_declarations(project, syntax) {
            failed = true;
            eprintln!("[ERROR] {}", e);
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

async fn run_fmt(project: &Path, syntax: &ManifestSyntax, check: bool) -> ExitCode {
    let mut failed = false;
    for path in present_manifests(project) {
        match format_file(&path, syntax, check).await {
            Ok(true) if check => {
                failed = true;
                println!("Would reformat {}", path.display());
            }
            Ok(true) => println!("Reformatted {}", path.display()),
            Ok(false) => tracing::debug!("{} is already canonical", path.display()),
            Err(e) => {
                failed = true;
                eprintln!("[ERROR] {}: {:#}", path.display(), e);
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Render `path` canonically, returning whether it differed from the file.
///
/// The file is only written when `check` is false.
async fn format_file(path: &Path, syntax: &ManifestSyntax, check: bool) -> anyhow::Result<bool> {
    let kind = detect_kind(path)?;
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Error reading {}", path.display()))?;
    let rendered = kind.parse(&content, path, syntax)?.render();
    if rendered == content {
        return Ok(false);
    }

    if !check {
        tokio::fs::write(path, &rendered)
            .await
            .with_context(|| format!("Error writing {}", path.display()))?;
    }
    Ok(true)
}

async fn run_show(path: &Path, syntax: &ManifestSyntax, format: OutputFormat) -> anyhow::Result<String> {
    let kind = detect_kind(path)?;
    let parsed = kind.load(path, syntax).await?;
    let mut report = parsed.report(&path.display().to_string());

    // Compare declarations against the lock file next to them, if any
    if let ParsedManifest::Declaration(declarations) = &parsed
        && let Some(dir) = path.parent()
        && dir.join(LockFile::RELATIVE_PATH).is_file()
    {
        let lock: LockFile = load(dir, syntax)?;
        report = report.with_consistency(check_consistency(declarations, &lock));
    }

    Ok(render_report(&report, format)?)
}

async fn run_profile_parse(file: PathBuf, syntax: &ManifestSyntax, iterations: usize) -> ExitCode {
    let kind = match detect_kind(&file) {
        Ok(kind) => kind,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let content = match tokio::fs::read_to_string(&file).await {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading file: {}", e);
            return ExitCode::FAILURE;
        }
    };

    eprintln!("Profiling parse operations for: {}", file.display());
    eprintln!("Iterations: {}", iterations);
    eprintln!("File size: {} bytes", content.len());

    let start = Instant::now();

    for _ in 0..iterations {
        if let Err(e) = std::hint::black_box(kind.parse(&content, &file, syntax)) {
            eprintln!("Parse failed: {}", e);
            return ExitCode::FAILURE;
        }
    }

    let elapsed = start.elapsed();
    eprintln!("\nProfiling complete!");
    eprintln!("Total time: {:?}", elapsed);
    eprintln!(
        "Average per iteration: {:?}",
        average_duration(elapsed, iterations)
    );

    ExitCode::SUCCESS
}

/// `total` divided by `iterations`, saturating at `u32::MAX` iterations.
fn average_duration(total: Duration, iterations: usize) -> Duration {
    total / u32::try_from(iterations).unwrap_or(u32::MAX).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_fmt_help_mentions_comment_removal() {
        let command = Cli::command();
        let fmt = command.find_subcommand("fmt").unwrap();
        let about = fmt.get_about().map(ToString::to_string).unwrap_or_default();
        assert!(about.contains("comments are removed"), "{about}");
    }

    #[test]
    fn test_average_duration() {
        assert_eq!(average_duration(Duration::from_secs(10), 4), Duration::from_millis(2500));
        assert_eq!(average_duration(Duration::from_secs(3), 0), Duration::from_secs(3));
    }

    #[test]
    fn test_average_duration_with_huge_iteration_count() {
        let total = Duration::from_secs(u64::from(u32::MAX));
        assert_eq!(average_duration(total, usize::MAX), Duration::from_secs(1));
    }
}
