use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;

use chromapie::api;
use chromapie::models::{AnalysisView, ColorEntryView, ExclusionsRequest};
use chromapie::server;

#[derive(Parser)]
#[command(name = "chromapie")]
#[command(about = "Chromapie - dominant color analysis with interactive pie charts")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Analyze an image file and print its dominant colors
    Analyze {
        /// Input image (PNG or JPEG)
        #[arg(short, long)]
        input: PathBuf,

        /// Write the pie chart PNG to this path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of target clusters (default from config.yaml)
        #[arg(short, long)]
        clusters: Option<usize>,

        /// Color numbers to exclude, comma separated (e.g. "1,3")
        #[arg(short, long, default_value = "")]
        exclude: String,
    },
    /// Extract embedded assets to filesystem for customization
    Init {
        /// Extract HTML and chart templates
        #[arg(long)]
        templates: bool,

        /// Extract config.yaml
        #[arg(long)]
        config: bool,

        /// Extract all assets
        #[arg(long)]
        all: bool,

        /// Overwrite existing files
        #[arg(long, short)]
        force: bool,

        /// List embedded assets without extracting
        #[arg(long)]
        list: bool,
    },
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Chromapie API",
        description = "Dominant color analysis with interactive pie charts",
        version = "0.1.0",
        license(name = "MIT")
    ),
    paths(
        api::create_analysis,
        api::get_analysis,
        api::put_exclusions,
        api::get_chart,
    ),
    components(schemas(
        AnalysisView,
        ColorEntryView,
        ExclusionsRequest,
        api::ErrorResponse,
    )),
    tags(
        (name = "Analyses", description = "Image uploads, color breakdowns and exclusions")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Analyze {
            input,
            output,
            clusters,
            exclude,
        }) => run_analyze_command(&input, output.as_deref(), clusters, &exclude),
        Some(Commands::Init {
            templates,
            config,
            all,
            force,
            list,
        }) => run_init_command(templates, config, all, force, list),
        Some(Commands::Serve) => run_server().await,
        None => {
            run_status_command();
            Ok(())
        }
    }
}

/// Analyze an image file offline (no server needed)
fn run_analyze_command(
    input: &Path,
    output: Option<&Path>,
    clusters: Option<usize>,
    exclude: &str,
) -> anyhow::Result<()> {
    use chromapie::assets::AssetLoader;
    use chromapie::models::AppConfig;
    use chromapie::rendering::{ChartRenderer, PieChart, SvgChartRenderer, SvgRasterizer};
    use chromapie::services::{decode_pixels, ImageKind, TemplateService};
    use dominant_colors::{recalculate, ColorExtractor, ExclusionSet, KmeansExtractor};

    // Minimal logging for CLI
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chromapie=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let loader = AssetLoader::from_env();
    let config = AppConfig::load_from_assets(&loader);
    let k = clusters.unwrap_or(config.analysis.cluster_count);
    let exclusions = ExclusionSet::parse(exclude)?;

    let bytes = std::fs::read(input)?;
    let file_name = input.file_name().and_then(|n| n.to_str());
    let kind = ImageKind::detect(file_name, &bytes)?;
    let decoded = decode_pixels(&bytes, kind, config.analysis.max_dimension)?;

    let extractor = KmeansExtractor::new(config.analysis.extract_options());
    let result = extractor.extract(&decoded.pixels, k)?;
    let breakdown = recalculate(&result, &exclusions);
    let chart = PieChart::from_breakdown(&breakdown);

    println!(
        "{} ({}x{}, {} pixels analyzed, {} colors)",
        input.display(),
        decoded.width,
        decoded.height,
        result.total_pixels(),
        result.len()
    );
    println!("{}\n", chart.title);

    if breakdown.is_empty() {
        println!("  All colors are excluded.");
    } else {
        println!("  {:>3}  {:<8}  {:<15}  {:>6}", "#", "HEX", "RGB", "Share");
        for entry in breakdown.entries() {
            let c = entry.cluster.color;
            println!(
                "  {:>3}  {:<8}  {:<15}  {:>5.1}%",
                entry.cluster.id,
                entry.cluster.hex(),
                format!("({}, {}, {})", c.r, c.g, c.b),
                entry.display_percentage()
            );
        }
    }

    if let Some(output) = output {
        let templates = Arc::new(TemplateService::new(&loader)?);
        let renderer =
            SvgChartRenderer::new(templates, Arc::new(SvgRasterizer::new()), config.chart);
        let png = renderer.render(&chart)?;
        std::fs::write(output, &png)?;
        println!("\nWrote {} ({} bytes)", output.display(), png.len());
    }

    Ok(())
}

/// Extract embedded assets to filesystem
fn run_init_command(
    templates: bool,
    config: bool,
    all: bool,
    force: bool,
    list: bool,
) -> anyhow::Result<()> {
    use chromapie::assets::{AssetCategory, AssetLoader};

    if list {
        println!("Embedded assets:\n");
        println!("Templates:");
        for f in AssetLoader::list_embedded(AssetCategory::Templates) {
            println!("  {f}");
        }
        println!("\nConfig:");
        for f in AssetLoader::list_embedded(AssetCategory::Config) {
            println!("  {f}");
        }
        return Ok(());
    }

    // Determine which categories to extract
    let mut categories = Vec::new();
    if all || templates {
        categories.push(AssetCategory::Templates);
    }
    if all || config {
        categories.push(AssetCategory::Config);
    }

    if categories.is_empty() {
        eprintln!("No categories specified. Use --all, --templates, or --config");
        eprintln!("\nRun 'chromapie init --list' to see embedded assets.");
        std::process::exit(1);
    }

    let report = AssetLoader::from_env().init(&categories, force)?;

    if !report.written.is_empty() {
        println!("Extracted {} files:", report.written.len());
        for f in &report.written {
            println!("  + {f}");
        }
    }
    if !report.skipped.is_empty() {
        println!(
            "\nSkipped {} existing files (use --force to overwrite):",
            report.skipped.len()
        );
        for f in &report.skipped {
            println!("  - {f}");
        }
    }

    if report.written.is_empty() && report.skipped.is_empty() {
        println!("No files to extract.");
    }

    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    use chromapie::assets::{AssetCategory, AssetLoader};

    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let bind_addr = std::env::var("BIND_ADDR").ok();
    let config_file = std::env::var("CONFIG_FILE").ok();
    let templates_dir = std::env::var("TEMPLATES_DIR").ok();
    let upload_dir = std::env::var("UPLOAD_DIR").ok();

    println!("Chromapie v{VERSION}");
    println!("Dominant color analysis with interactive pie charts\n");

    println!("Environment Variables:");
    println!(
        "  BIND_ADDR     = {}",
        bind_addr.as_deref().unwrap_or("0.0.0.0:3000 (default)")
    );
    println!(
        "  CONFIG_FILE   = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  TEMPLATES_DIR = {}",
        templates_dir.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  UPLOAD_DIR    = {}",
        upload_dir.as_deref().unwrap_or("(not set)")
    );

    println!("\nAsset Sources:");

    let config_source = match config_file {
        Some(ref path) if Path::new(path).exists() => path.to_string(),
        Some(_) => "embedded (file not found)".to_string(),
        None => "embedded".to_string(),
    };
    println!("  Config:    {config_source}");

    let loader = AssetLoader::from_env();
    let embedded_count = AssetLoader::list_embedded(AssetCategory::Templates).len();
    match templates_dir {
        Some(ref path) if Path::new(path).exists() => println!(
            "  Templates: {path} ({} files, {embedded_count} embedded)",
            loader.list_templates().len()
        ),
        _ => println!("  Templates: embedded ({embedded_count} files)"),
    }

    println!("\nCommands:");
    println!("  chromapie serve     Start the HTTP server");
    println!("  chromapie analyze   Analyze an image file from the command line");
    println!("  chromapie init      Extract embedded assets");
    println!("\nRun 'chromapie --help' for more details.");
}

/// Run the HTTP server
async fn run_server() -> anyhow::Result<()> {
    use axum::{routing::get, Json};
    use chromapie::assets::AssetLoader;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chromapie=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let asset_loader = Arc::new(AssetLoader::from_env());

    tracing::info!(
        templates = %asset_loader.templates_dir().map(|p| p.display().to_string()).unwrap_or_else(|| "embedded".to_string()),
        config = %asset_loader.config_file().map(|p| p.display().to_string()).unwrap_or_else(|| "embedded".to_string()),
        "Asset sources configured"
    );

    // Seed if configured paths are empty
    match asset_loader.seed_if_configured() {
        Ok(report) if !report.is_empty() => {
            tracing::info!(
                templates = report.templates_seeded.len(),
                config = report.config_seeded,
                "Seeded empty locations with embedded assets"
            );
        }
        Err(e) => {
            tracing::warn!(%e, "Failed to seed assets");
        }
        _ => {}
    }

    let state = server::create_app_state(asset_loader)?;

    if let Some(every) = server::retention_sweep_interval(state.pipeline.retention()) {
        state.pipeline.clone().spawn_retention_sweep(every);
        tracing::info!(
            retention_secs = state.pipeline.retention().as_secs(),
            sweep_secs = every.as_secs(),
            "Retention sweep started"
        );
    }

    // Shared routes plus the OpenAPI document (production only)
    let openapi = ApiDoc::openapi();
    let app = server::build_router(state).route(
        "/api-docs/openapi.json",
        get(move || {
            let doc = openapi.clone();
            async move { Json(doc) }
        }),
    );

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "Chromapie server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
