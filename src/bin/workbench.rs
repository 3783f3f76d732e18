use std::{
    io::{BufRead, Write},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{ArgAction, Parser, Subcommand};

use workbench::{
    Catalog, Document as _, MemoryHost, Posted, Scan, Startup, TraitChoice, TraitStore, TraitType,
    Workbench, WorkbenchConfig,
};

#[derive(Parser, Debug)]
#[command(name = "workbench", version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run an interactive session driven by JSON-lines events on stdin.
    Session(SessionArgs),
    /// Compose a fixed selection into an SVG/HTML fragment or a PNG preview.
    Compose(ComposeArgs),
}

#[derive(Parser, Debug)]
struct SessionArgs {
    /// Input document JSON.
    #[arg(long)]
    doc: PathBuf,

    /// JSON file backing client storage (saved orders).
    #[arg(long)]
    storage: Option<PathBuf>,

    /// Workbench config JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for randomization (overrides the config).
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Input document JSON.
    #[arg(long)]
    doc: PathBuf,

    /// Trait to select, as `<type>=<name>`. Repeatable.
    #[arg(long = "select", value_name = "TYPE=NAME")]
    selections: Vec<String>,

    /// Comma-separated layer order; defaults to discovery order.
    #[arg(long)]
    order: Option<String>,

    /// Output path. `.png` writes a raster preview, anything else the composite markup.
    #[arg(long)]
    out: PathBuf,

    /// Preview width in pixels (PNG only).
    #[arg(long, default_value_t = 512)]
    width: u32,

    /// Preview height in pixels (PNG only).
    #[arg(long, default_value_t = 512)]
    height: u32,
}

/// One line of session input.
#[derive(serde::Deserialize, Debug)]
#[serde(tag = "event", rename_all = "lowercase")]
enum Event {
    /// A panel message, e.g. `{"event":"message","message":{"type":"randomize"}}`.
    Message { message: workbench::Message },
    /// The canvas selection changed to `ids`.
    Selection { ids: Vec<String> },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    match cli.cmd {
        Command::Session(args) => cmd_session(args),
        Command::Compose(args) => cmd_compose(args),
    }
}

fn cmd_session(args: SessionArgs) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => WorkbenchConfig::from_json_file(path)?,
        None => WorkbenchConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let mut host = MemoryHost::from_document_file(&args.doc)?;
    if let Some(path) = &args.storage {
        host = host.with_storage_file(path)?;
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let mut wb = match pollster::block_on(Workbench::start(host, config))? {
        Startup::Running(wb) => wb,
        Startup::NoTraits(mut host) | Startup::Unsupported(mut host) => {
            emit(&mut out, host.drain_posted())?;
            return Ok(());
        }
    };
    emit(&mut out, wb.host_mut().drain_posted())?;

    for line in std::io::stdin().lock().lines() {
        let line = line.context("read stdin")?;
        if line.trim().is_empty() {
            continue;
        }

        let event: Event = match serde_json::from_str(&line) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("skipping malformed event: {e}");
                continue;
            }
        };

        let result = match event {
            Event::Message { message } => pollster::block_on(wb.handle_message(message)),
            Event::Selection { ids } => {
                let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
                wb.host_mut().select(&ids);
                pollster::block_on(wb.handle_selection_change())
            }
        };
        if let Err(e) = result {
            tracing::error!("event failed: {e}");
        }

        emit(&mut out, wb.host_mut().drain_posted())?;
        if wb.is_closed() {
            break;
        }
    }

    Ok(())
}

fn emit(out: &mut impl Write, posted: Vec<Posted>) -> anyhow::Result<()> {
    for p in posted {
        let value = match p {
            Posted::ShowUi(opts) => serde_json::json!({
                "type": "show-ui",
                "title": opts.title,
                "width": opts.width,
                "height": opts.height,
                "theme_colors": opts.theme_colors,
            }),
            Posted::Update(update) => serde_json::to_value(&update)?,
            Posted::Notify(n) => serde_json::json!({
                "type": "notify",
                "message": n.message,
                "error": n.error,
                "timeout_ms": n.timeout_ms,
            }),
            Posted::Close => serde_json::json!({ "type": "close" }),
        };
        serde_json::to_writer(&mut *out, &value)?;
        writeln!(out)?;
    }
    out.flush().context("flush stdout")?;
    Ok(())
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let host = MemoryHost::from_document_file(&args.doc)?;
    let Scan::Found { catalog, order } = Catalog::scan(&host.children()) else {
        anyhow::bail!(
            "'{}' has no frames named trait#<trait type>#<trait name>",
            args.doc.display()
        );
    };

    let mut store = TraitStore::new(catalog, order, None);
    if let Some(order) = &args.order {
        let types = workbench::Order::parse_saved(order).as_slice().to_vec();
        store.set_order(types);
    }

    for selection in &args.selections {
        let (ty, name) = selection
            .split_once('=')
            .with_context(|| format!("selection '{selection}' must look like <type>=<name>"))?;
        let ty = TraitType::new(ty);
        let choice = store
            .catalog()
            .traits(&ty)
            .and_then(|traits| {
                traits
                    .iter()
                    .find(|(candidate, _)| candidate.as_str() == name)
                    .map(|(candidate, id)| TraitChoice::resolve(candidate, id.clone()))
            })
            .with_context(|| format!("no trait '{name}' under '{ty}'"))?;
        if !store.choose(&ty, choice) {
            anyhow::bail!("layer '{ty}' is not part of the order");
        }
    }

    let composite = pollster::block_on(workbench::render(&host, store.order(), store.selection()))?;

    ensure_parent_dir(&args.out)?;
    if has_extension(&args.out, "png") {
        let img = workbench::rasterize(&composite, args.width, args.height)?;
        img.save_with_format(&args.out, image::ImageFormat::Png)
            .with_context(|| format!("write png '{}'", args.out.display()))?;
    } else {
        std::fs::write(&args.out, &composite.markup)
            .with_context(|| format!("write markup '{}'", args.out.display()))?;
    }

    for (ty, label) in &composite.labels {
        eprintln!("  {ty}: {label}");
    }
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}
