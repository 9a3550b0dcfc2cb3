use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use rand::SeedableRng as _;
use rand::rngs::StdRng;

use memegen::library::store::{RandomMemeRecord, SavedMeme, VersionContent};
use memegen::{
    ExportFormat, ExportOpts, FontBook, LibraryOpts, MemeDoc, MemeLibrary, Placement,
    QUICK_TEMPLATES, RenderMode, RenderRequest, RenderResult, TextBlock,
};

#[derive(Parser, Debug)]
#[command(name = "memegen", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a meme document to PNG or JPEG.
    Render(RenderArgs),
    /// Assemble and render a random meme from the library's recent images.
    Random(RandomArgs),
    /// Print library statistics.
    Stats(StatsArgs),
    /// List the quick caption templates.
    Templates,
}

#[derive(Parser, Debug)]
struct FontArgs {
    /// Only use the bundled fallback face instead of the system fonts.
    #[arg(long)]
    builtin_fonts: bool,

    /// Extra directory of font files to register.
    #[arg(long)]
    fonts_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input meme document JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output path; `.png`, `.jpg` or `.jpeg`. Defaults to a timestamped PNG.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Scale captions to the canvas like an on-screen preview.
    #[arg(long)]
    preview: bool,

    /// JPEG quality (1-100).
    #[arg(long, default_value_t = ExportOpts::default().jpeg_quality)]
    quality: u8,

    /// Library file to record the export in.
    #[arg(long)]
    library: Option<PathBuf>,

    /// Library version this render was edited from.
    #[arg(long, requires = "library")]
    parent: Option<u64>,

    #[command(flatten)]
    fonts: FontArgs,
}

#[derive(Parser, Debug)]
struct RandomArgs {
    /// Library file holding the recent images.
    #[arg(long)]
    library: PathBuf,

    /// Output path. Defaults to a timestamped PNG.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Seed for every random choice.
    #[arg(long)]
    seed: Option<u64>,

    #[command(flatten)]
    fonts: FontArgs,
}

#[derive(Parser, Debug)]
struct StatsArgs {
    /// Library file.
    #[arg(long)]
    library: PathBuf,

    /// Also write per-meme counters as CSV.
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Number of versions and edits to list.
    #[arg(long, default_value_t = 5)]
    limit: usize,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Random(args) => cmd_random(args),
        Command::Stats(args) => cmd_stats(args),
        Command::Templates => {
            for template in QUICK_TEMPLATES {
                println!("{template}");
            }
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn make_fonts(args: &FontArgs) -> anyhow::Result<FontBook> {
    let mut book = if args.builtin_fonts {
        FontBook::builtin()?
    } else {
        FontBook::with_system_fonts()?
    };
    if let Some(dir) = &args.fonts_dir {
        book.load_fonts_dir(dir);
    }
    Ok(book)
}

fn out_path(out: Option<PathBuf>) -> PathBuf {
    out.unwrap_or_else(|| {
        PathBuf::from(memegen::default_file_name(
            &chrono::Local::now(),
            ExportFormat::Png,
        ))
    })
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut doc = MemeDoc::from_path(&args.in_path)?;
    if args.preview {
        doc.mode = RenderMode::Preview;
    }
    let source = doc.image.clone();
    let filter = doc.filter.name();
    let request = doc.load_request()?;

    let fonts = make_fonts(&args.fonts)?;
    let result = memegen::render(&request, &fonts)?;

    let out = out_path(args.out);
    let opts = ExportOpts {
        jpeg_quality: args.quality,
    };
    memegen::save_image(&result.image, &out, &opts)?;

    if let Some(library) = &args.library {
        let export = Export {
            request: &request,
            result: &result,
            source: &source,
            out: &out,
            filter,
        };
        record_export(library, export, args.parent, None)?;
    }
    println!("{} {}", result.meme_id, out.display());
    Ok(())
}

fn cmd_random(args: RandomArgs) -> anyhow::Result<()> {
    let library = MemeLibrary::load_or_default(&args.library)?;
    let history: Vec<PathBuf> = library.recent_images.iter().cloned().collect();
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let meme = memegen::random_meme(&history, &mut rng)?;
    let base = memegen::load_image(&meme.image)?;
    let mut request = RenderRequest::new(base)
        .with_filter(meme.filter)
        .with_seed(args.seed.unwrap_or_default());
    for block in &meme.blocks {
        request = request.with_block(block.clone());
    }

    let fonts = make_fonts(&args.fonts)?;
    let result = memegen::render(&request, &fonts)?;
    let out = out_path(args.out);
    memegen::save_image(&result.image, &out, &ExportOpts::default())?;

    let record = RandomMemeRecord {
        image: meme.image.clone(),
        top_text: meme.top_text().to_string(),
        bottom_text: meme.bottom_text().to_string(),
        filter: meme.filter.name().to_string(),
        generated_at: chrono::Utc::now(),
    };
    let export = Export {
        request: &request,
        result: &result,
        source: &meme.image,
        out: &out,
        filter: meme.filter.name(),
    };
    record_export(&args.library, export, None, Some(record))?;
    println!("{} {}", result.meme_id, out.display());
    Ok(())
}

struct Export<'a> {
    request: &'a RenderRequest,
    result: &'a RenderResult,
    source: &'a Path,
    out: &'a Path,
    filter: &'a str,
}

/// Captions of one band joined line by line.
fn band_text(blocks: &[TextBlock], placement: Placement) -> String {
    blocks
        .iter()
        .filter(|b| b.placement == placement && !b.is_blank())
        .map(|b| b.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

fn record_export(
    library_path: &Path,
    export: Export<'_>,
    parent: Option<u64>,
    random: Option<RandomMemeRecord>,
) -> anyhow::Result<()> {
    let Export {
        request,
        result,
        source,
        out,
        filter,
    } = export;
    let opts = LibraryOpts::default();
    let mut library = MemeLibrary::load_or_default(library_path)?;
    library.add_recent_image(source, &opts);
    for TextBlock {
        placement, style, ..
    } in &request.blocks
    {
        library.remember_style(*placement, style.clone());
    }
    let action = if random.is_some() { "random" } else { "render" };
    if let Some(record) = random {
        library.add_random_meme(record, &opts);
    }
    let top_text = band_text(&request.blocks, Placement::Top);
    let bottom_text = band_text(&request.blocks, Placement::Bottom);

    let content = VersionContent {
        image: source.to_path_buf(),
        top_text: top_text.clone(),
        bottom_text: bottom_text.clone(),
        style: request
            .blocks
            .first()
            .map(|b| b.style.clone())
            .unwrap_or_default(),
        filter: filter.to_string(),
    };
    let version = library.record_version(content, parent, &opts)?;
    library.log_edit(version, action, Some(out.display().to_string()), &opts)?;

    library.record_saved(SavedMeme {
        id: result.meme_id,
        path: out.to_path_buf(),
        source: source.to_path_buf(),
        top_text,
        bottom_text,
        filter: filter.to_string(),
        created_at: chrono::Utc::now(),
    });
    library
        .save(library_path)
        .with_context(|| format!("update library '{}'", library_path.display()))?;
    Ok(())
}

fn cmd_stats(args: StatsArgs) -> anyhow::Result<()> {
    let library = MemeLibrary::load_or_default(&args.library)?;
    let stats = library.stats();
    println!("memes created:   {}", stats.memes_created);
    println!("saved memes:     {}", stats.saved_memes);
    println!("recent images:   {}", stats.recent_images);
    println!("versions:        {}", stats.versions);
    println!("views:           {}", stats.total_views);
    println!("downloads:       {}", stats.total_downloads);
    println!("likes:           {}", stats.total_likes);
    println!("phrases:         {}", memegen::MEME_PHRASES.len());
    println!("templates:       {}", QUICK_TEMPLATES.len());
    for path in &library.recent_images {
        println!("recent: {}", path.display());
    }
    for v in library.versions(args.limit) {
        let parent = v.parent.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string());
        println!(
            "version {} (parent {parent}): {} | {}",
            v.id, v.content.top_text, v.content.bottom_text
        );
    }
    for e in library.edits(args.limit) {
        println!(
            "edit {} {}: {}",
            e.version,
            e.action,
            e.details.as_deref().unwrap_or("")
        );
    }
    for r in library.random_history(args.limit) {
        println!("random: {} [{}]", r.image.display(), r.filter);
    }

    if let Some(csv) = &args.csv {
        std::fs::write(csv, library.usage_csv())
            .with_context(|| format!("write '{}'", csv.display()))?;
    }
    Ok(())
}
