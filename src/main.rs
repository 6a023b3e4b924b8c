use clap::{Parser, Subcommand};
use portfolio_assets::{blogs, config, gallery, image_list, optimize, output};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "portfolio-assets")]
#[command(about = "Image conversion and index tools for a portfolio site")]
#[command(long_about = "\
Image conversion and index tools for a portfolio site

Expected layout (all paths configurable in portfolio.toml):

  .
  ├── portfolio.toml               # Optional; stock defaults apply without it
  ├── blog/                        # blogs: every .html/.htm page
  ├── blogs.json                   #   → title, excerpt and url per page
  ├── images/                      # images: every image file, not recursive
  ├── images.json                  #   → sorted list of file names
  └── assets/
      ├── img/                     # optimize: every png/jpg/jpeg, recursively
      │   ├── hero.jpg             #   → hero.webp
      │   └── gallery/
      │       ├── digital-art/     # gallery: one folder per album
      │       ├── concept-sketches/
      │       ├── 3d-renders/
      │       └── photography/
      └── data/
          └── images.json          # gallery: rewritten in place, must exist

The gallery manifest keeps hand-edited titles, descriptions and covers;
image lists are always recomputed from the album folders.

Run 'portfolio-assets gen-config' to generate a documented portfolio.toml.")]
#[command(version)]
struct Cli {
    /// Project root; relative paths in the config resolve against it
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Config file, relative to the root
    #[arg(long, default_value = config::CONFIG_FILENAME, global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert PNG/JPEG images to WebP (or AVIF), skipping up-to-date outputs
    Optimize,
    /// Rebuild the gallery manifest from the album folders
    Gallery,
    /// Index the blog pages into blogs.json
    Blogs,
    /// List the files of the images directory into images.json
    Images,
    /// Print a stock portfolio.toml with all options documented
    GenConfig,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Optimize => {
            let config = load(&cli)?;
            let opts = &config.optimize;
            optimize::check_codecs(opts.format)?;
            optimize::check_source_dir(&opts.source_dir)?;
            println!(
                "==> Converting {} to {} (quality {})",
                opts.source_dir.display(),
                opts.format,
                opts.quality
            );
            let report = optimize::optimize(opts, |index, outcome| {
                output::print_file_outcome(index, outcome, &cli.root)
            })?;
            output::print_optimize_summary(&report);
        }
        Command::Gallery => {
            let config = load(&cli)?;
            match gallery::rebuild(&config.gallery) {
                Ok(report) => output::print_gallery_output(&report, &cli.root),
                // Reported, but not a failed run: nothing was touched.
                Err(e @ gallery::GalleryError::ManifestNotFound(_)) => eprintln!("Error: {e}"),
                Err(e) => return Err(e.into()),
            }
        }
        Command::Blogs => {
            let config = load(&cli)?;
            let report = blogs::build_index(&config.blogs)?;
            output::print_blogs_output(&report, &cli.root);
        }
        Command::Images => {
            let config = load(&cli)?;
            let report = image_list::build_list(&config.images)?;
            output::print_image_list_output(&report, &cli.root);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load the config file under the root and resolve its paths against the root.
fn load(cli: &Cli) -> Result<config::AssetsConfig, config::ConfigError> {
    let path = cli.root.join(&cli.config);
    Ok(config::load_config(&path)?.rooted_at(&cli.root))
}
