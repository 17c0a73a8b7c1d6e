use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use framespan::{
    Expected, ResolveMode, SceneRange, SequencePattern, fill, plan, reconcile_entries,
    reconcile_interior, resolve, scan,
};

#[derive(Parser, Debug)]
#[command(name = "framespan", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a frame-range expression into the exact frame list.
    Resolve(ResolveArgs),
    /// List expected frames that have no file on disk.
    Missing(MissingArgs),
    /// Fill sequence gaps with copies of the nearest existing frame.
    Fill(FillArgs),
}

#[derive(Parser, Debug)]
struct ResolveArgs {
    /// Expression, e.g. "1-10 ^3-5" or "1-2x0.1".
    expression: String,

    /// Apply exclusions in positional-filtering order instead of one
    /// global subtraction.
    #[arg(long)]
    filter: bool,

    /// Print compact range text ("1-3, 7") instead of one value per entry.
    #[arg(long)]
    compact: bool,

    /// Print a JSON array instead of plain text.
    #[arg(long)]
    json: bool,

    /// Separator between frames in plain output.
    #[arg(long, default_value = " ")]
    sep: String,
}

#[derive(Parser, Debug)]
struct MissingArgs {
    /// Sequence template path with '#' placeholders, e.g. out/render_####.png.
    #[arg(long)]
    pattern: PathBuf,

    /// Expected frames as an expression.
    #[arg(long, conflicts_with = "range")]
    expected: Option<String>,

    /// Expected frames as a scene range: start end.
    #[arg(long, num_args = 2, value_names = ["START", "END"])]
    range: Option<Vec<i64>>,

    /// Print a JSON report instead of plain text.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct FillArgs {
    /// Sequence template path with '#' placeholders, e.g. out/render_####.png.
    #[arg(long)]
    pattern: PathBuf,

    /// Expected frames as an expression. Without --expected or --range,
    /// only interior gaps of the present span are filled.
    #[arg(long, conflicts_with = "range")]
    expected: Option<String>,

    /// Expected frames as a scene range: start end.
    #[arg(long, num_args = 2, value_names = ["START", "END"])]
    range: Option<Vec<i64>>,

    /// Print the planned copies without touching the filesystem.
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Resolve(args) => cmd_resolve(args),
        Command::Missing(args) => cmd_missing(args),
        Command::Fill(args) => cmd_fill(args),
    }
}

fn cmd_resolve(args: ResolveArgs) -> anyhow::Result<()> {
    let mode = if args.filter {
        ResolveMode::PositionalFilter
    } else {
        ResolveMode::GlobalExclude
    };
    let set = resolve(&args.expression, mode)
        .with_context(|| format!("resolve '{}'", args.expression))?;

    if args.json {
        println!("{}", serde_json::to_string(&set)?);
    } else if args.compact {
        println!("{}", set.compact());
    } else {
        println!("{}", set.join(&args.sep));
    }
    Ok(())
}

/// Template directory plus the pattern parsed from its filename.
fn split_template(template: &Path) -> anyhow::Result<(PathBuf, SequencePattern)> {
    let pattern = SequencePattern::from_template(template)?;
    let dir = template
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    Ok((dir, pattern))
}

fn expected_frames(
    expected: Option<&str>,
    range: Option<&[i64]>,
) -> anyhow::Result<Option<Expected>> {
    if let Some(expr) = expected {
        let set = resolve(expr, ResolveMode::GlobalExclude)
            .with_context(|| format!("resolve expected frames '{expr}'"))?;
        return Ok(Some(Expected::Set(set)));
    }
    if let Some([start, end]) = range {
        return Ok(Some(Expected::Scene(SceneRange::new(*start, *end, 1)?)));
    }
    Ok(None)
}

fn cmd_missing(args: MissingArgs) -> anyhow::Result<()> {
    let (dir, pattern) = split_template(&args.pattern)?;
    let entries = scan(&dir, &pattern)?;
    let result = match expected_frames(args.expected.as_deref(), args.range.as_deref())? {
        Some(expected) => reconcile_entries(&entries, expected),
        None => reconcile_interior(&entries),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }
    if result.missing.is_empty() {
        eprintln!("no missing frames ({} present)", result.present.len());
    } else {
        println!("{}", result.missing.compact());
        eprintln!(
            "{} missing of {} expected",
            result.missing.len(),
            result.expected.len()
        );
    }
    Ok(())
}

fn cmd_fill(args: FillArgs) -> anyhow::Result<()> {
    let (dir, pattern) = split_template(&args.pattern)?;
    let entries = scan(&dir, &pattern)?;
    let result = match expected_frames(args.expected.as_deref(), args.range.as_deref())? {
        Some(expected) => reconcile_entries(&entries, expected),
        None => reconcile_interior(&entries),
    };

    if args.dry_run {
        let (actions, failures) = plan(&dir, &pattern, &result, &entries);
        for action in &actions {
            println!(
                "{} -> {}",
                action.source_path.display(),
                action.target_path.display()
            );
        }
        for failure in &failures {
            eprintln!("frame {}: {}", failure.frame, failure.error);
        }
        eprintln!("{} copies planned", actions.len());
        return Ok(());
    }

    let report = fill(&dir, &pattern, &result, &entries, || false);
    for failure in &report.failed {
        eprintln!("frame {}: {}", failure.frame, failure.error);
    }
    eprintln!(
        "copied {}, skipped {}, failed {}",
        report.copied.len(),
        report.skipped.len(),
        report.failed.len()
    );
    if !report.failed.is_empty() {
        anyhow::bail!("{} frame(s) could not be filled", report.failed.len());
    }
    Ok(())
}
