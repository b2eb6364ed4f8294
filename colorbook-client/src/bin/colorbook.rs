use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colorbook::{apply, identify, ColorPalette, ProgressRecord, StoreError, SvgImage};
use colorbook_client::{resolve_api_url, ApiClient};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Parser, Debug)]
#[command(
    name = "colorbook",
    version,
    about = "Admin and inspection CLI for the colorbook backend"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend base URL (falls back to COLORBOOK_API_URL, then localhost)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage coloring pages
    Images {
        #[command(subcommand)]
        action: ImagesCmd,
    },
    /// Manage color palettes
    Palettes {
        #[command(subcommand)]
        action: PalettesCmd,
    },
    /// Inspect or wipe a user's saved progress
    Progress {
        #[command(subcommand)]
        action: ProgressCmd,
    },
    /// Render a user's colored image to an SVG file
    Render {
        /// User id (identity provider subject)
        #[arg(long)]
        user: String,

        /// Image id or name
        #[arg(long)]
        image: String,

        /// Output file
        #[arg(short, long)]
        out: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum ImagesCmd {
    /// List all coloring pages
    List,
    /// Upload an SVG file as a new coloring page
    Upload {
        /// Path to the .svg file
        #[arg(long)]
        file: PathBuf,

        /// Display name (defaults to the file stem)
        #[arg(long)]
        name: Option<String>,
    },
    /// Delete a coloring page
    Delete {
        #[arg(long)]
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum PalettesCmd {
    /// List all palettes
    List,
    /// Create a palette from a comma-separated color list
    Create {
        #[arg(long)]
        name: String,

        /// e.g. "#ff6b6b,#4ecdc4,#45b7d1"
        #[arg(long)]
        colors: String,
    },
    /// Delete a palette
    Delete {
        #[arg(long)]
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum ProgressCmd {
    /// Print a user's record for one image as JSON
    Show {
        #[arg(long)]
        user: String,

        #[arg(long)]
        image: String,
    },
    /// Delete every stored record for (user, image)
    Clear {
        #[arg(long)]
        user: String,

        #[arg(long)]
        image: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let api = ApiClient::new(resolve_api_url(cli.api_url.as_deref()));
    match cli.command {
        Commands::Images { action } => cmd_images(&api, action),
        Commands::Palettes { action } => cmd_palettes(&api, action),
        Commands::Progress { action } => cmd_progress(&api, action),
        Commands::Render { user, image, out } => cmd_render(&api, &user, &image, &out),
    }
}

fn cmd_images(api: &ApiClient, action: ImagesCmd) -> Result<()> {
    match action {
        ImagesCmd::List => {
            for image in api.images()? {
                println!("{}\t{}\t{} bytes", image.id, image.name, image.svg_content.len());
            }
        }
        ImagesCmd::Upload { file, name } => {
            let svg_content = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            // Reject files the engine could not identify later; the raw
            // markup is uploaded, identification happens at render time.
            identify(&svg_content)
                .with_context(|| format!("{} is not a well-formed SVG", file.display()))?;
            let name = name.unwrap_or_else(|| file_stem(&file));
            let image = SvgImage {
                id: fresh_id(),
                name,
                svg_content,
            };
            api.upload_image(&image)?;
            println!("uploaded {} as {}", file.display(), image.id);
        }
        ImagesCmd::Delete { id } => {
            api.delete_image(&id)?;
            println!("deleted image {id}");
        }
    }
    Ok(())
}

fn cmd_palettes(api: &ApiClient, action: PalettesCmd) -> Result<()> {
    match action {
        PalettesCmd::List => {
            for palette in api.palettes()? {
                println!("{}\t{}\t{}", palette.id, palette.name, palette.colors.join(","));
            }
        }
        PalettesCmd::Create { name, colors } => {
            let colors = colors.split(',').map(|c| c.trim().to_string());
            let palette = ColorPalette::curate(fresh_id(), name, colors);
            if palette.colors.is_empty() {
                bail!("no usable colors (plain white and duplicates are dropped)");
            }
            api.create_palette(&palette)?;
            println!("created palette {} with {} colors", palette.id, palette.colors.len());
        }
        PalettesCmd::Delete { id } => {
            api.delete_palette(&id)?;
            println!("deleted palette {id}");
        }
    }
    Ok(())
}

fn cmd_progress(api: &ApiClient, action: ProgressCmd) -> Result<()> {
    match action {
        ProgressCmd::Show { user, image } => {
            let record = match api.progress_for(&user, &image) {
                Ok(record) => record,
                Err(StoreError::NotFound) => ProgressRecord::empty(&user, &image),
                Err(err) => return Err(err.into()),
            };
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        ProgressCmd::Clear { user, image } => {
            let records = api.list_progress(&user, Some(&image))?;
            let mut removed = 0usize;
            for record in records {
                if let Some(id) = record.id.as_deref() {
                    api.delete_progress(id)?;
                    removed += 1;
                }
            }
            println!("removed {removed} record(s)");
        }
    }
    Ok(())
}

fn cmd_render(api: &ApiClient, user: &str, image: &str, out: &Path) -> Result<()> {
    let images = api.images()?;
    let page = images
        .iter()
        .find(|i| i.id == image || i.name == image)
        .with_context(|| format!("no image with id or name '{image}'"))?;
    let layers = match api.progress_for(user, &page.id) {
        Ok(record) => record.layers,
        Err(StoreError::NotFound) => Default::default(),
        Err(err) => return Err(err.into()),
    };
    log::info!("rendering {} with {} filled region(s)", page.id, layers.len());
    let rendered = apply(&identify(&page.svg_content)?, &layers)?;
    std::fs::write(out, rendered).with_context(|| format!("writing {}", out.display()))?;
    println!("wrote {}", out.display());
    Ok(())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "untitled".to_string())
}

/// Millisecond timestamp, the backend's expected client-generated id shape.
fn fresh_id() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
