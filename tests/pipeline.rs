//! End-to-end runs of both tools on a throwaway site checkout.
//!
//! Library-level tests drive `optimize` and `gallery::rebuild` with real
//! images; CLI tests run the built binary and check exit status and output.
//!
//! Run with: cargo test --test pipeline

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use portfolio_assets::config::{self, AssetsConfig};
use portfolio_assets::gallery::{self, AlbumEntry, GalleryError};
use portfolio_assets::optimize::{self, FileOutcome, OptimizeError};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

fn write_photo(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    RgbImage::from_fn(64, 48, |x, y| Rgb([(x * 4) as u8, (y * 5) as u8, 77]))
        .save(path)
        .unwrap();
}

fn write_logo(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    RgbaImage::from_fn(32, 32, |x, _| {
        Rgba([10, 180, 90, if x < 16 { 0 } else { 255 }])
    })
    .save(path)
    .unwrap();
}

fn backdate(path: &Path) {
    let file = fs::File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() - Duration::from_secs(3600))
        .unwrap();
}

fn site() -> (TempDir, AssetsConfig) {
    let dir = TempDir::new().unwrap();
    let config = AssetsConfig::default().rooted_at(dir.path());
    (dir, config)
}

fn run_cli(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_portfolio-assets"))
        .arg("--root")
        .arg(root)
        .args(args)
        .output()
        .unwrap()
}

fn stdout(out: &Output) -> String {
    String::from_utf8_lossy(&out.stdout).into_owned()
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

// =========================================================================
// Library
// =========================================================================

#[test]
fn optimize_then_rerun() {
    let (_dir, config) = site();
    let hero = config.optimize.source_dir.join("hero.jpg");
    let logo = config.optimize.source_dir.join("brand/logo.png");
    write_photo(&hero);
    write_logo(&logo);
    backdate(&hero);
    backdate(&logo);

    let first = optimize::optimize(&config.optimize, |_, _| {}).unwrap();
    assert_eq!(first.converted(), 2);

    let hero_webp = image::open(hero.with_extension("webp")).unwrap();
    assert!(!hero_webp.color().has_alpha());
    let logo_webp = image::open(logo.with_extension("webp")).unwrap();
    assert!(logo_webp.color().has_alpha());

    let second = optimize::optimize(&config.optimize, |_, _| {}).unwrap();
    assert_eq!(second.converted(), 0);
    assert_eq!(second.skipped(), 2);
    assert!(
        second
            .outcomes
            .iter()
            .all(|o| matches!(o, FileOutcome::Skipped { .. }))
    );
}

#[test]
fn optimize_missing_root() {
    let (_dir, config) = site();
    let result = optimize::optimize(&config.optimize, |_, _| {});
    assert!(matches!(result, Err(OptimizeError::SourceNotFound(_))));
}

#[test]
fn gallery_rebuild_round() {
    let (_dir, config) = site();
    let manifest = &config.gallery.manifest;
    fs::create_dir_all(manifest.parent().unwrap()).unwrap();
    fs::write(
        manifest,
        r#"[{"id": "photography", "title": "Film", "description": "35mm.", "cover": "x.jpg"}]"#,
    )
    .unwrap();
    let album: PathBuf = config.gallery.gallery_dir.join("digital-art");
    fs::create_dir_all(&album).unwrap();
    fs::write(album.join("b.png"), b"").unwrap();
    fs::write(album.join("a.jpg"), b"").unwrap();

    gallery::rebuild(&config.gallery).unwrap();
    let written: Vec<AlbumEntry> =
        serde_json::from_str(&fs::read_to_string(manifest).unwrap()).unwrap();

    assert_eq!(written.len(), 4);
    assert_eq!(written[0].id, "digital-art");
    assert_eq!(written[0].cover, "assets/img/gallery/digital-art/a.jpg");
    assert_eq!(
        written[0].images,
        vec![
            "assets/img/gallery/digital-art/a.jpg",
            "assets/img/gallery/digital-art/b.png"
        ]
    );
    assert_eq!(written[3].title, "Film");
    assert_eq!(written[3].cover, "x.jpg");
}

#[test]
fn gallery_missing_manifest() {
    let (dir, config) = site();
    let result = gallery::rebuild(&config.gallery);
    assert!(matches!(result, Err(GalleryError::ManifestNotFound(_))));
    assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
}

// =========================================================================
// CLI
// =========================================================================

#[test]
fn cli_optimize_reports_progress_and_summary() {
    let dir = TempDir::new().unwrap();
    let hero = dir.path().join("assets/img/hero.jpg");
    write_photo(&hero);
    backdate(&hero);

    let out = run_cli(dir.path(), &["optimize"]);
    assert!(out.status.success());
    let text = stdout(&out);
    assert!(text.contains("001 hero.jpg \u{2192} hero.webp"));
    assert!(text.contains("Done: 1 converted, 0 skipped, 0 failed"));
    assert!(hero.with_extension("webp").exists());
}

#[test]
fn cli_optimize_missing_root_fails() {
    let dir = TempDir::new().unwrap();
    let out = run_cli(dir.path(), &["optimize"]);
    assert!(!out.status.success());
    let err = stderr(&out);
    assert!(err.starts_with("Error: Source directory not found: "));
    assert!(!err.contains("SourceNotFound"));
}

#[test]
fn cli_optimize_missing_root_prints_no_banner() {
    let dir = TempDir::new().unwrap();
    let out = run_cli(dir.path(), &["optimize"]);
    assert!(!stdout(&out).contains("==> Converting"));
}

#[test]
fn cli_gallery_missing_manifest_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let out = run_cli(dir.path(), &["gallery"]);
    assert!(out.status.success());
    assert!(stderr(&out).starts_with("Error: Manifest not found: "));
    assert!(stdout(&out).is_empty());
    assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
}

#[test]
fn cli_gallery_updates_manifest() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("assets/data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("images.json"), "[]").unwrap();

    let out = run_cli(dir.path(), &["gallery"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("(4 albums)"));
    assert!(dir.path().join("assets/img/gallery/photography").is_dir());
}

#[test]
fn cli_respects_config_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("portfolio.toml"),
        "[gallery]\nmanifest = \"gallery.json\"\n\n[[gallery.albums]]\nid = \"inks\"\nname = \"Inks\"\n",
    )
    .unwrap();
    fs::write(dir.path().join("gallery.json"), "[]").unwrap();

    let out = run_cli(dir.path(), &["gallery"]);
    assert!(out.status.success());
    let written: Vec<AlbumEntry> =
        serde_json::from_str(&fs::read_to_string(dir.path().join("gallery.json")).unwrap())
            .unwrap();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].description, "Collection of inks.");
}

#[test]
fn cli_invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("portfolio.toml"), "[optimize]\nquality = 400\n").unwrap();
    let out = run_cli(dir.path(), &["optimize"]);
    assert!(!out.status.success());
}

#[test]
fn cli_gen_config_round_trips() {
    let dir = TempDir::new().unwrap();
    let out = run_cli(dir.path(), &["gen-config"]);
    assert!(out.status.success());
    let generated = stdout(&out);
    assert_eq!(generated, config::stock_config_toml());

    let parsed: AssetsConfig = toml::from_str(&generated).unwrap();
    assert_eq!(parsed, AssetsConfig::default());
}

#[test]
fn cli_blogs_writes_index() {
    let dir = TempDir::new().unwrap();
    let blog = dir.path().join("blog");
    fs::create_dir_all(&blog).unwrap();
    fs::write(
        blog.join("kiln.html"),
        r#"<h1 class="page-title">Firing the Kiln</h1><section><p>Cone 6.</p></section>"#,
    )
    .unwrap();

    let out = run_cli(dir.path(), &["blogs"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("Generated blogs.json with 1 post"));

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("blogs.json")).unwrap()).unwrap();
    assert_eq!(
        written,
        serde_json::json!([
            {"url": "blog/kiln.html", "title": "Firing the Kiln", "excerpt": "Cone 6."}
        ])
    );
}

#[test]
fn cli_blogs_missing_dir_fails() {
    let dir = TempDir::new().unwrap();
    let out = run_cli(dir.path(), &["blogs"]);
    assert!(!out.status.success());
    assert!(stderr(&out).starts_with("Error: Failed to read blog directory"));
    assert!(!dir.path().join("blogs.json").exists());
}

#[test]
fn cli_images_writes_list() {
    let dir = TempDir::new().unwrap();
    let images = dir.path().join("images");
    fs::create_dir_all(&images).unwrap();
    fs::write(images.join("b.svg"), b"").unwrap();
    fs::write(images.join("a.png"), b"").unwrap();
    fs::write(images.join("readme.txt"), b"").unwrap();

    let out = run_cli(dir.path(), &["images"]);
    assert!(out.status.success());
    assert!(stdout(&out).contains("Generated images.json with 2 files"));
    let names: Vec<String> =
        serde_json::from_str(&fs::read_to_string(dir.path().join("images.json")).unwrap()).unwrap();
    assert_eq!(names, vec!["a.png", "b.svg"]);
}
