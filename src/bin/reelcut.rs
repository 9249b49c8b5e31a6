use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

use reelcut::{
    AssetKind, AssetOrigin, CostCategory, EngineOpts, ExportRequest, FileBackup, Provenance,
    SpeedTier, TimelineAsset, TimelineProject, TransitionSpec, calculate_project_cost,
    recover_from,
};

#[derive(Parser, Debug)]
#[command(name = "reelcut", version, about = "Inspect and check timeline projects")]
struct Cli {
    /// Log engine activity to stderr.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check every timeline invariant.
    Validate(InArgs),
    /// List lanes and assets.
    Inspect(InArgs),
    /// Credit cost by category.
    Cost(InArgs),
    /// Write a small example project.
    Sample(SampleArgs),
    /// Print the export job body for a project.
    ExportRequest(ExportArgs),
    /// Read a local backup left by an earlier session.
    Recover(RecoverArgs),
}

#[derive(Parser, Debug)]
struct InArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Print JSON instead of text.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Parser, Debug)]
struct SampleArgs {
    /// Output project JSON.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input project JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// `standard` or `express`.
    #[arg(long, default_value = "standard")]
    tier: String,
}

#[derive(Parser, Debug)]
struct RecoverArgs {
    /// Backup directory.
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Engine config; its `sync.backup_dir` is used when `--dir` is absent.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    project_id: String,

    /// Write the recovered project here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.cmd {
        Command::Validate(args) => cmd_validate(args),
        Command::Inspect(args) => cmd_inspect(args),
        Command::Cost(args) => cmd_cost(args),
        Command::Sample(args) => cmd_sample(args),
        Command::ExportRequest(args) => cmd_export_request(args),
        Command::Recover(args) => cmd_recover(args),
    }
}

fn init_logging(verbose: u8) {
    if verbose == 0 {
        return;
    }
    let level = match verbose {
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load(path: &Path) -> anyhow::Result<TimelineProject> {
    TimelineProject::from_path(path).with_context(|| format!("read project '{}'", path.display()))
}

fn cmd_validate(args: InArgs) -> anyhow::Result<()> {
    let project = load(&args.in_path)?;
    project
        .validate()
        .with_context(|| format!("invalid project '{}'", args.in_path.display()))?;
    if args.json {
        let summary = serde_json::json!({
            "valid": true,
            "assets": project.assets.len(),
            "duration": project.duration(),
        });
        println!("{summary}");
    } else {
        println!(
            "ok: {} assets, {:.3}s",
            project.assets.len(),
            project.duration()
        );
    }
    Ok(())
}

fn cmd_inspect(args: InArgs) -> anyhow::Result<()> {
    let project = load(&args.in_path)?;
    if args.json {
        let lanes: Vec<_> = project
            .tracks
            .lanes()
            .into_iter()
            .map(|lane| {
                let ids: Vec<_> = project
                    .lane_assets(lane)
                    .into_iter()
                    .map(|a| a.id.as_str())
                    .collect();
                serde_json::json!({ "lane": lane, "assets": ids })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&lanes)?);
        return Ok(());
    }

    println!(
        "{} ({}) {}x{} {} @ {:.3} fps, {:.3}s",
        project.name,
        project.id,
        project.resolution.width,
        project.resolution.height,
        project.aspect_ratio,
        project.frame_rate.as_f64(),
        project.duration()
    );
    for lane in project.tracks.lanes() {
        println!("{:?} {}", lane.kind, lane.index);
        for asset in project.lane_assets(lane) {
            println!(
                "  {:>9.3} .. {:>9.3}  {:<6} {}",
                asset.start_time,
                asset.end_time(),
                format!("{:?}", asset.kind).to_lowercase(),
                asset.name
            );
        }
    }
    Ok(())
}

fn cmd_cost(args: InArgs) -> anyhow::Result<()> {
    let project = load(&args.in_path)?;
    let cost = calculate_project_cost(&project.assets);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&cost)?);
        return Ok(());
    }
    for category in CostCategory::ALL {
        println!("{:<12} {:>10.3}", format!("{category:?}"), cost.get(category));
    }
    println!("{:<12} {:>10.3}", "Total", cost.total);
    Ok(())
}

fn cmd_sample(args: SampleArgs) -> anyhow::Result<()> {
    let project = sample_project();
    project.validate()?;
    if let Some(parent) = args.out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, serde_json::to_string_pretty(&project)?)
        .with_context(|| format!("write project '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_export_request(args: ExportArgs) -> anyhow::Result<()> {
    let tier = SpeedTier::parse(&args.tier)
        .with_context(|| format!("unknown speed tier '{}'", args.tier))?;
    let project = load(&args.in_path)?;
    let request = ExportRequest::from_project(&project, tier)?;
    println!("{}", serde_json::to_string_pretty(&request)?);
    Ok(())
}

fn cmd_recover(args: RecoverArgs) -> anyhow::Result<()> {
    let dir = match (args.dir, args.config) {
        (Some(dir), _) => dir,
        (None, Some(config)) => EngineOpts::from_path(&config)
            .with_context(|| format!("read config '{}'", config.display()))?
            .sync
            .backup_dir
            .context("config has no sync.backup_dir")?,
        (None, None) => anyhow::bail!("pass --dir or --config"),
    };
    let store = FileBackup::new(&dir);
    let Some(project) = recover_from(&store, &args.project_id)? else {
        anyhow::bail!(
            "no backup for '{}' in '{}'",
            args.project_id,
            dir.display()
        );
    };
    let json = serde_json::to_string_pretty(&project)?;
    match args.out {
        Some(out) => {
            std::fs::write(&out, json)
                .with_context(|| format!("write project '{}'", out.display()))?;
            eprintln!("wrote {}", out.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn sample_project() -> TimelineProject {
    let mut project = TimelineProject::new("sample", "Sample cut");
    let generated = |credits: f64| Provenance {
        origin: AssetOrigin::Generated,
        provider: Some("sample".to_string()),
        credits_used: credits,
        ..Provenance::default()
    };
    project.assets = vec![
        TimelineAsset::new("intro", AssetKind::Video, "Intro", 0, 0.0, 4.0)
            .with_source("https://cdn.example/intro.mp4", Some(6.0))
            .with_provenance(generated(20.0)),
        TimelineAsset {
            transition: Some(TransitionSpec::new("fade", 0.5, Default::default())),
            ..TimelineAsset::new("city", AssetKind::Video, "City", 0, 4.0, 5.0)
                .with_source("https://cdn.example/city.mp4", Some(5.0))
        },
        TimelineAsset::new("poster", AssetKind::Image, "Poster", 1, 1.0, 3.0)
            .with_source("https://cdn.example/poster.png", None)
            .with_provenance(generated(2.0)),
        TimelineAsset::new("score", AssetKind::Music, "Score", 0, 0.0, 9.0)
            .with_source("https://cdn.example/score.mp3", Some(120.0)),
    ];
    project
}
