use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use globset::{Glob, GlobSet, GlobSetBuilder};
use handlebars::Handlebars;
use responsive_sprite_core::{
    InputImage, OutputFormat, SpriteConfig, SpriteOutput, build_stylesheet, generate, pack_layout,
    transparent_png, transparent_png_data_uri,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use walkdir::WalkDir;

/// Fewest images worth turning into a sprite.
const MIN_IMAGES: usize = 2;

#[derive(Parser, Debug)]
#[command(
    name = "responsive-sprite",
    about = "Combine images into a responsive CSS sprite",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show progress bars (disable with --no-progress or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the sprite image, stylesheet and markup
    Generate(GenerateArgs),
    /// Layout-only export (reads image headers only): JSON layout + stylesheet
    Layout(GenerateArgs),
    /// Print a transparent placeholder PNG of the given size as a data URI
    Placeholder(PlaceholderArgs),
}

#[derive(Parser, Debug, Clone)]
struct GenerateArgs {
    // Input/Output
    /// Input file or directory
    #[arg(help_heading = "Input/Output")]
    input: PathBuf,
    /// Output directory
    #[arg(short, long, default_value = "out", help_heading = "Input/Output")]
    out_dir: PathBuf,
    /// Base name of the written files (name.png/.css/.html)
    #[arg(short, long, default_value = "sprite", help_heading = "Input/Output")]
    name: String,
    /// YAML config file path (keys present in the file override CLI options)
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
    /// Include patterns (glob). If set, only files matching any pattern are considered
    #[arg(long, help_heading = "Input/Output")]
    include: Vec<String>,
    /// Exclude patterns (glob). Files matching any pattern will be ignored
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,

    // Sprite
    /// Output image format: png | jpeg | gif
    #[arg(long, value_parser = ["png", "jpeg", "jpg", "gif"], default_value = "png", help_heading = "Sprite")]
    format: String,
    /// JPEG quality (0..=100), only used for jpeg output
    #[arg(long, default_value_t = 75, help_heading = "Sprite")]
    jpeg_quality: u8,
    /// Pixels between images
    #[arg(long, default_value_t = 0, help_heading = "Sprite")]
    padding: u32,
    /// Align images to 16px and fill the gaps with edge pixels (reduces JPEG artifacts)
    #[arg(long, default_value_t = false, help_heading = "Sprite")]
    reduce_artifacts: bool,
    /// Decode inputs in parallel (requires core feature `parallel`)
    #[arg(long, default_value_t = false, help_heading = "Sprite")]
    parallel: bool,

    // Stylesheet
    /// Prefix for generated class names
    #[arg(long, default_value = "", help_heading = "Stylesheet")]
    css_prefix: String,
    /// Sprite URL used in the stylesheet (default: the written image file name)
    #[arg(long, help_heading = "Stylesheet")]
    css_url: Option<String>,
    /// Embed the sprite into the stylesheet as a data URI
    #[arg(long, default_value_t = false, help_heading = "Stylesheet")]
    embed: bool,

    // Export
    /// Also write name.preview.html showing the sprite, CSS and markup
    #[arg(long, default_value_t = false, help_heading = "Export")]
    preview: bool,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Dry run: build everything but do not write files
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

#[derive(Parser, Debug, Clone)]
struct PlaceholderArgs {
    width: u32,
    height: u32,
    /// Write the PNG file here instead of printing a data URI
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Generate(args) => run_generate(args, cli.progress && !cli.quiet),
        Commands::Layout(args) => run_layout(args),
        Commands::Placeholder(args) => run_placeholder(args),
    }
}

fn build_config(cli: &GenerateArgs) -> anyhow::Result<SpriteConfig> {
    let output_format: OutputFormat = cli
        .format
        .parse()
        .map_err(|_| anyhow::anyhow!("unknown output format: {}", cli.format))?;
    let base = SpriteConfig {
        output_format,
        jpeg_quality: cli.jpeg_quality,
        css_prefix: cli.css_prefix.clone(),
        padding: cli.padding,
        reduce_artifacts: cli.reduce_artifacts,
        css_url: cli.css_url.clone(),
        parallel: cli.parallel,
    };
    let mut cfg = if let Some(path) = &cli.config {
        let file = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let y: YamlConfig = serde_yaml::from_str(&file)?;
        y.into_sprite_config(base)?
    } else {
        base
    };
    if cfg.css_url.is_none() {
        cfg.css_url = Some(image_file_name(&cli.name, cfg.output_format));
    }
    cfg.validate()?;
    Ok(cfg)
}

fn run_generate(cli: &GenerateArgs, show_progress: bool) -> anyhow::Result<()> {
    let cfg = build_config(cli)?;
    if cli.print_config {
        print_config(&cfg, &cli.print_config_format)?;
        return Ok(());
    }

    let paths = gather_paths(&cli.input, &cli.include, &cli.exclude)?;
    let inputs = load_inputs_with_progress(&paths, show_progress)?;
    info!(count = inputs.len(), "loaded input images");
    if inputs.len() < MIN_IMAGES {
        anyhow::bail!(
            "Please select at least {} image files (found {})",
            MIN_IMAGES,
            inputs.len()
        );
    }

    let mut out = generate(inputs, cfg).context("There was an error creating your sprite")?;
    let markup = out.markup();
    let stylesheet = if cli.embed {
        out.stylesheet_with_url(&out.data_uri())
    } else {
        out.stylesheet.clone()
    };
    info!(
        width = out.layout.width,
        height = out.layout.height,
        images = out.layout.images.len(),
        placeholders = out.placeholders.len(),
        bytes = out.image.len(),
        "sprite built"
    );

    if cli.dry_run {
        println!(
            "sprite={}x{} images={} bytes={}",
            out.layout.width,
            out.layout.height,
            out.layout.images.len(),
            out.image.len()
        );
        return Ok(());
    }

    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("create out_dir {}", cli.out_dir.display()))?;

    let image_path = cli.out_dir.join(image_file_name(&cli.name, out.format));
    fs::write(&image_path, &out.image)
        .with_context(|| format!("write {}", image_path.display()))?;
    info!(?image_path, "sprite written");

    let css_path = cli.out_dir.join(format!("{}.css", cli.name));
    fs::write(&css_path, &stylesheet).with_context(|| format!("write {}", css_path.display()))?;
    info!(?css_path, "stylesheet written");

    let html_path = cli.out_dir.join(format!("{}.html", cli.name));
    fs::write(&html_path, &markup).with_context(|| format!("write {}", html_path.display()))?;
    info!(?html_path, "markup written");

    if cli.preview {
        let rendered = render_preview(&cli.name, &out, &stylesheet, &markup)?;
        let preview_path = cli.out_dir.join(format!("{}.preview.html", cli.name));
        fs::write(&preview_path, rendered)
            .with_context(|| format!("write {}", preview_path.display()))?;
        info!(?preview_path, "preview written");
    }
    Ok(())
}

fn run_layout(cli: &GenerateArgs) -> anyhow::Result<()> {
    let cfg = build_config(cli)?;
    if cli.print_config {
        print_config(&cfg, &cli.print_config_format)?;
        return Ok(());
    }

    let paths = gather_paths(&cli.input, &cli.include, &cli.exclude)?;
    let items = read_dimensions(&paths)?;
    if items.len() < MIN_IMAGES {
        anyhow::bail!(
            "Please select at least {} image files (found {})",
            MIN_IMAGES,
            items.len()
        );
    }

    let layout = pack_layout(items, &cfg)?;
    let json = serde_json::to_string_pretty(&responsive_sprite_core::to_json(&layout))?;
    let stylesheet = build_stylesheet(&layout, &cfg.resolved_css_url());
    if cli.dry_run {
        println!("{}", json);
        return Ok(());
    }

    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("create out_dir {}", cli.out_dir.display()))?;
    let json_path = cli.out_dir.join(format!("{}.json", cli.name));
    fs::write(&json_path, json).with_context(|| format!("write {}", json_path.display()))?;
    let css_path = cli.out_dir.join(format!("{}.css", cli.name));
    fs::write(&css_path, stylesheet).with_context(|| format!("write {}", css_path.display()))?;
    info!(?json_path, ?css_path, images = layout.images.len(), "layout written");
    Ok(())
}

fn run_placeholder(args: &PlaceholderArgs) -> anyhow::Result<()> {
    if args.width == 0 || args.height == 0 {
        anyhow::bail!("placeholder dimensions must be positive");
    }
    match &args.output {
        Some(path) => {
            fs::write(path, transparent_png(args.width, args.height))
                .with_context(|| format!("write {}", path.display()))?;
            info!(?path, "placeholder written");
        }
        None => println!("{}", transparent_png_data_uri(args.width, args.height)),
    }
    Ok(())
}

fn print_config(cfg: &SpriteConfig, format: &str) -> anyhow::Result<()> {
    match format {
        "yaml" => println!("{}", serde_yaml::to_string(cfg)?),
        _ => println!("{}", serde_json::to_string_pretty(cfg)?),
    }
    Ok(())
}

fn image_file_name(name: &str, format: OutputFormat) -> String {
    format!("{}.{}", name, format.extension())
}

fn display_name(p: &Path) -> String {
    p.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| p.to_string_lossy().into_owned())
}

fn gather_paths(
    path: &Path,
    include: &[String],
    exclude: &[String],
) -> anyhow::Result<Vec<PathBuf>> {
    let inc_set = glob_set(include)?;
    let exc_set = glob_set(exclude)?;
    let mut list: Vec<PathBuf> = Vec::new();
    if path.is_file() {
        if !should_skip(path, inc_set.as_ref(), exc_set.as_ref()) && is_image(path) {
            list.push(path.to_path_buf());
        }
    } else {
        for entry in WalkDir::new(path)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let p = entry.path();
            if p.is_file() && !should_skip(p, inc_set.as_ref(), exc_set.as_ref()) && is_image(p) {
                list.push(p.to_path_buf());
            }
        }
    }
    Ok(list)
}

/// `None` when no patterns were given, so an empty include list matches all.
fn glob_set(patterns: &[String]) -> anyhow::Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }
    let mut b = GlobSetBuilder::new();
    for pat in patterns {
        b.add(Glob::new(pat).with_context(|| format!("bad glob pattern {pat}"))?);
    }
    Ok(Some(b.build()?))
}

fn should_skip(
    p: &Path,
    include: Option<&GlobSet>,
    exclude: Option<&GlobSet>,
) -> bool {
    let s = p.to_string_lossy().replace('\\', "/");
    exclude.is_some_and(|ex| ex.is_match(&s)) || include.is_some_and(|inc| !inc.is_match(&s))
}

/// Header-only read of every input. Any unreadable file fails the whole run.
fn read_dimensions(paths: &[PathBuf]) -> anyhow::Result<Vec<(String, u32, u32)>> {
    paths
        .iter()
        .map(|p| {
            let (w, h) = image::image_dimensions(p).map_err(|e| {
                error!(?p, error = %e, "unreadable image");
                anyhow::Error::new(e).context(format!("read image header {}", p.display()))
            })?;
            Ok((display_name(p), w, h))
        })
        .collect()
}

fn is_image(p: &Path) -> bool {
    matches!(
        p.extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_ascii_lowercase()),
        Some(ext) if matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "gif")
    )
}

fn load_inputs_with_progress(paths: &[PathBuf], progress: bool) -> anyhow::Result<Vec<InputImage>> {
    use indicatif::{ProgressBar, ProgressStyle};
    let bar = if progress {
        let b = ProgressBar::new(paths.len() as u64);
        b.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} reading {pos}/{len} [{elapsed_precise}] {wide_msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Some(b)
    } else {
        None
    };
    let mut list = Vec::with_capacity(paths.len());
    for p in paths {
        let name = display_name(p);
        if let Some(b) = &bar {
            b.set_message(name.clone());
        }
        let bytes = fs::read(p).with_context(|| format!("read image {}", p.display()))?;
        list.push(InputImage::new(name, bytes));
        if let Some(b) = &bar {
            b.inc(1);
        }
    }
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    Ok(list)
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}

#[derive(Serialize)]
struct PreviewContext<'a> {
    title: &'a str,
    count: usize,
    width: u32,
    height: u32,
    format: &'static str,
    bytes: usize,
    embedded_css: String,
    stylesheet: &'a str,
    markup: &'a str,
}

fn render_preview(
    name: &str,
    out: &SpriteOutput,
    stylesheet: &str,
    markup: &str,
) -> anyhow::Result<String> {
    let ctx = PreviewContext {
        title: name,
        count: out.layout.images.len(),
        width: out.layout.width,
        height: out.layout.height,
        format: out.format.name(),
        bytes: out.image.len(),
        embedded_css: out.stylesheet_with_url(&out.data_uri()),
        stylesheet,
        markup,
    };
    let mut reg = Handlebars::new();
    reg.set_strict_mode(true);
    reg.register_template_string("preview", include_str!("templates/preview.hbs"))?;
    Ok(reg.render("preview", &ctx)?)
}

#[derive(Debug, Deserialize, Default)]
struct YamlConfig {
    output_format: Option<String>,
    jpeg_quality: Option<u8>,
    css_prefix: Option<String>,
    padding: Option<u32>,
    reduce_artifacts: Option<bool>,
    css_url: Option<String>,
    parallel: Option<bool>,
}

impl YamlConfig {
    fn into_sprite_config(self, mut cfg: SpriteConfig) -> anyhow::Result<SpriteConfig> {
        if let Some(v) = self.output_format {
            cfg.output_format = v
                .parse()
                .map_err(|_| anyhow::anyhow!("unknown output format in config: {}", v))?;
        }
        if let Some(v) = self.jpeg_quality {
            cfg.jpeg_quality = v;
        }
        if let Some(v) = self.css_prefix {
            cfg.css_prefix = v;
        }
        if let Some(v) = self.padding {
            cfg.padding = v;
        }
        if let Some(v) = self.reduce_artifacts {
            cfg.reduce_artifacts = v;
        }
        if let Some(v) = self.css_url {
            cfg.css_url = Some(v);
        }
        if let Some(v) = self.parallel {
            cfg.parallel = v;
        }
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yaml_overrides_only_present_keys() {
        let y: YamlConfig =
            serde_yaml::from_str("output_format: jpg\npadding: 4\n").expect("yaml");
        let cfg = y
            .into_sprite_config(SpriteConfig::builder().css_prefix("x-").build())
            .expect("config");
        assert_eq!(cfg.output_format, OutputFormat::Jpeg);
        assert_eq!(cfg.padding, 4);
        assert_eq!(cfg.css_prefix, "x-");
        assert_eq!(cfg.jpeg_quality, 75);
    }

    #[test]
    fn yaml_rejects_unknown_format() {
        let y: YamlConfig = serde_yaml::from_str("output_format: bmp\n").expect("yaml");
        assert!(y.into_sprite_config(SpriteConfig::default()).is_err());
    }

    #[test]
    fn only_supported_extensions_are_images() {
        assert!(is_image(Path::new("a/b/Icon.PNG")));
        assert!(is_image(Path::new("photo.jpeg")));
        assert!(!is_image(Path::new("readme.md")));
        assert!(!is_image(Path::new("pic.bmp")));
    }

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("responsive-sprite-{tag}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("mkdir");
        dir
    }

    #[test]
    fn unreadable_header_fails_layout_input() {
        let dir = scratch_dir("headers");
        image::RgbaImage::new(3, 2).save(dir.join("a.png")).expect("save");
        fs::write(dir.join("broken.png"), b"not a png").expect("write");

        let paths = gather_paths(&dir, &[], &[]).expect("scan");
        assert_eq!(paths.len(), 2);
        let err = read_dimensions(&paths).unwrap_err();
        assert!(format!("{err:#}").contains("broken.png"));

        let ok = read_dimensions(&paths[..1]).expect("dimensions");
        assert_eq!(ok, [("a.png".to_string(), 3, 2)]);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn include_and_exclude_globs() {
        let inc = glob_set(&["**/icons/*".to_string()]).expect("glob");
        let exc = glob_set(&["**/*-old.png".to_string()]).expect("glob");
        assert!(glob_set(&[]).expect("glob").is_none());
        assert!(!should_skip(Path::new("a/icons/x.png"), inc.as_ref(), exc.as_ref()));
        assert!(should_skip(Path::new("a/icons/x-old.png"), inc.as_ref(), exc.as_ref()));
        assert!(should_skip(Path::new("a/other/x.png"), inc.as_ref(), exc.as_ref()));
        assert!(!should_skip(Path::new("any.png"), None, None));
    }

    #[test]
    fn written_file_names() {
        assert_eq!(image_file_name("sprite", OutputFormat::Jpeg), "sprite.jpg");
        assert_eq!(display_name(Path::new("dir/My Icon.png")), "My Icon.png");
    }
}
