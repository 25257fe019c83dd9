mod terminal;

use clap::{Parser, Subcommand};
use conflict_jump_core::config::Settings;
use conflict_jump_core::logging::init_logging;
use conflict_jump_core::{scan_workspace, spawn_service, Document, FsWorkspace, StatusText};
use conflict_markers::{ConflictDetector, ConflictIndex, MarkerSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use terminal::{watch_files, TerminalHost, TerminalStatus};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(
    name = "conflict-jump",
    about = "Navigate between merge conflicts and follow their resolution"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to .conflict-jump data directory
    #[arg(long, default_value = ".conflict-jump")]
    data_dir: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Run interactive setup wizard
    Setup,
    /// Show the current configuration
    Status,
    /// Scan a directory for conflicted files
    Scan {
        /// Workspace root
        #[arg(default_value = ".")]
        root: PathBuf,
    },
    /// List the conflicts in one file
    List { file: PathBuf },
    /// Print the next conflict after a line
    Next {
        file: PathBuf,
        /// 1-based cursor line; omit to start before the first line
        #[arg(long)]
        line: Option<usize>,
    },
    /// Print the previous conflict before a line
    Prev {
        file: PathBuf,
        /// 1-based cursor line; omit to start after the last line
        #[arg(long)]
        line: Option<usize>,
    },
    /// Watch a directory and navigate as conflicts get resolved
    Watch {
        /// Workspace root
        #[arg(default_value = ".")]
        root: PathBuf,
    },
}

fn settings_path(cli: &Cli) -> PathBuf {
    cli.data_dir.join("settings.json")
}

fn load_detector(cli: &Cli) -> anyhow::Result<(Settings, ConflictDetector)> {
    let settings = Settings::load_or_default(&settings_path(cli))?;
    let detector = ConflictDetector::new(settings.conflict_markers.clone())?;
    Ok((settings, detector))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Setup => cmd_setup(&cli).await,
        Commands::Status => cmd_status(&cli).await,
        Commands::Scan { root } => cmd_scan(&cli, root).await,
        Commands::List { file } => cmd_list(&cli, file).await,
        Commands::Next { file, line } => cmd_step(&cli, file, *line, Direction::Next).await,
        Commands::Prev { file, line } => cmd_step(&cli, file, *line, Direction::Previous).await,
        Commands::Watch { root } => cmd_watch(&cli, root).await,
    }
}

async fn cmd_setup(cli: &Cli) -> anyhow::Result<()> {
    let current = Settings::load_or_default(&settings_path(cli))?;

    println!();
    println!("conflict-jump - Setup Wizard");
    println!("============================");
    println!();

    let auto_jump_enabled = dialoguer::Confirm::new()
        .with_prompt("Jump to the next conflict automatically after resolving one?")
        .default(current.auto_jump_enabled)
        .interact()?;

    let auto_jump_delay: u64 = dialoguer::Input::new()
        .with_prompt("Auto-jump delay (ms)")
        .default(current.auto_jump_delay)
        .interact_text()?;

    let auto_open_next_file = dialoguer::Confirm::new()
        .with_prompt("Open the next conflicted file when a file is fully resolved?")
        .default(current.auto_open_next_file)
        .interact()?;

    let show_status_bar = dialoguer::Confirm::new()
        .with_prompt("Show the conflict count status line?")
        .default(current.show_status_bar)
        .interact()?;

    println!();
    let custom_markers = dialoguer::Confirm::new()
        .with_prompt("Use custom conflict markers?")
        .default(current.conflict_markers != MarkerSet::default())
        .interact()?;

    let conflict_markers = if custom_markers {
        let start: String = dialoguer::Input::new()
            .with_prompt("Start marker")
            .default(current.conflict_markers.start.clone())
            .interact_text()?;
        let middle: String = dialoguer::Input::new()
            .with_prompt("Middle marker")
            .default(current.conflict_markers.middle.clone())
            .interact_text()?;
        let end: String = dialoguer::Input::new()
            .with_prompt("End marker")
            .default(current.conflict_markers.end.clone())
            .interact_text()?;
        MarkerSet::new(start, middle, end)?
    } else {
        MarkerSet::default()
    };

    let settings = Settings {
        conflict_markers,
        auto_jump_enabled,
        auto_open_next_file,
        auto_jump_delay,
        show_status_bar,
        ..current
    };
    settings.save(&settings_path(cli))?;

    println!();
    println!("Configuration saved to {}", settings_path(cli).display());
    println!();
    println!("Start with: conflict-jump watch");
    println!();

    Ok(())
}

async fn cmd_status(cli: &Cli) -> anyhow::Result<()> {
    println!("conflict-jump Status");
    println!("====================");
    println!();

    let path = settings_path(cli);
    if !path.exists() {
        println!("Configuration: Not found (using defaults)");
        println!("  Run 'conflict-jump setup' to configure");
        println!();
    }

    match Settings::load_or_default(&path) {
        Ok(settings) => {
            let m = &settings.conflict_markers;
            println!("  Markers: {} / {} / {}", m.start, m.middle, m.end);
            println!(
                "  Auto-jump: {} ({} ms)",
                on_off(settings.auto_jump_enabled),
                settings.auto_jump_delay
            );
            println!("  Auto-open next file: {}", on_off(settings.auto_open_next_file));
            println!("  Status line: {}", on_off(settings.show_status_bar));
            println!("  Debounce: {} ms", settings.debounce_delay);
            println!("  Exclude: {:?}", settings.exclude);
            println!();
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
        Err(e) => {
            println!("Configuration: Invalid");
            println!("  {e}");
        }
    }

    Ok(())
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

async fn cmd_scan(cli: &Cli, root: &Path) -> anyhow::Result<()> {
    let (settings, detector) = load_detector(cli)?;
    let workspace = FsWorkspace::new(root);
    let report = scan_workspace(&workspace, &detector, &settings.exclude).await?;

    if report.files.is_empty() {
        println!("No conflicted files found in workspace");
    } else {
        for (i, (path, count)) in report.files.iter().enumerate() {
            let rel = path.strip_prefix(root).unwrap_or(path);
            println!("{}. {} ({})", i + 1, rel.display(), count);
        }
    }
    println!();
    println!(
        "{} ({} files scanned, {} skipped)",
        StatusText::for_total(report.total_conflicts()).text,
        report.scanned,
        report.skipped
    );

    Ok(())
}

async fn read_index(detector: &ConflictDetector, file: &Path) -> anyhow::Result<ConflictIndex> {
    let document = Document::read(file).await?;
    Ok(detector.detect(&document))
}

async fn cmd_list(cli: &Cli, file: &Path) -> anyhow::Result<()> {
    let (_, detector) = load_detector(cli)?;
    let index = read_index(&detector, file).await?;

    if index.is_empty() {
        println!("No conflicts in {}", file.display());
        return Ok(());
    }
    for (i, block) in index.blocks().iter().enumerate() {
        println!(
            "conflict {} of {}: lines {}/{}/{}",
            i + 1,
            index.count(),
            block.start_line + 1,
            block.middle_line + 1,
            block.end_line + 1
        );
    }
    Ok(())
}

#[derive(Clone, Copy)]
enum Direction {
    Next,
    Previous,
}

async fn cmd_step(
    cli: &Cli,
    file: &Path,
    line: Option<usize>,
    direction: Direction,
) -> anyhow::Result<()> {
    let (_, detector) = load_detector(cli)?;
    let index = read_index(&detector, file).await?;

    let target = match (direction, line) {
        (Direction::Next, Some(line)) => index.find_next(line as i64 - 1),
        (Direction::Next, None) => index.find_next(-1),
        (Direction::Previous, Some(line)) => index.find_previous(line as i64 - 1),
        (Direction::Previous, None) => index.blocks().last(),
    };

    match target {
        Some(block) => println!(
            "{}:{} (conflict {} of {})",
            file.display(),
            block.start_line + 1,
            index.index_of(block.start_line),
            index.count()
        ),
        None => println!("No conflicts in {}", file.display()),
    }
    Ok(())
}

async fn cmd_watch(cli: &Cli, root: &Path) -> anyhow::Result<()> {
    let settings = Settings::load_or_default(&settings_path(cli))?;
    let guard = init_logging(&cli.data_dir.join("logs"))?;

    tracing::info!(root = %root.display(), "Starting conflict-jump watch...");

    let (shutdown_tx, _) = tokio::sync::broadcast::channel::<()>(1);
    let workspace = FsWorkspace::new(root);
    let host = TerminalHost::new(root);
    let exclude = settings.exclude.clone();

    let (handle, service) = spawn_service(
        settings,
        host.clone(),
        Box::new(TerminalStatus::default()),
        Arc::new(workspace.clone()),
        shutdown_tx.subscribe(),
    )?;

    // Spawn file watcher
    {
        let handle = handle.clone();
        let mut shutdown = shutdown_tx.subscribe();
        tokio::spawn(async move {
            tokio::select! {
                result = watch_files(workspace, exclude, host, handle) => {
                    if let Err(e) = result {
                        tracing::error!(error = %e, "File watcher stopped");
                    }
                }
                _ = shutdown.recv() => {}
            }
        });
    }

    println!("Watching {}. Press Ctrl+C to stop.", root.display());
    println!("Commands: n(ext) p(rev) o(pen next file) s(tatus) r(escan) q(uit)");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let sent = match line.trim() {
                    "n" | "next" => handle.jump_to_next_conflict().await,
                    "p" | "prev" => handle.jump_to_previous_conflict().await,
                    "o" | "open" => handle.open_next_conflicted_file().await,
                    "s" | "status" => handle.show_conflict_status().await,
                    "r" | "rescan" => handle.scan_workspace().await,
                    "q" | "quit" => break,
                    "" => Ok(()),
                    other => {
                        println!("Unknown command: {other}");
                        Ok(())
                    }
                };
                sent?;
            }
        }
    }

    tracing::info!("Shutting down...");
    let _ = shutdown_tx.send(());
    let _ = service.await;
    tracing::info!("conflict-jump stopped");

    // The blocking stdin reader would hold up runtime shutdown until the next line.
    drop(guard);
    std::process::exit(0);
}
