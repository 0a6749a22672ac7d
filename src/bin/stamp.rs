use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "stamp", version)]
struct Cli {
    /// Log at debug level.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the edit, result and effect views of a design as PNGs.
    Preview(PreviewArgs),
}

#[derive(Parser, Debug)]
struct PreviewArgs {
    /// Editor config JSON. Asset paths resolve against its directory.
    #[arg(long)]
    config: PathBuf,

    /// Image to add as a layer; repeat for more layers, bottom first.
    #[arg(long = "layer")]
    layers: Vec<PathBuf>,

    /// Directory receiving edit.png, result.png and effect.png.
    #[arg(long)]
    out_dir: PathBuf,

    /// Edit surface size.
    #[arg(long, value_parser = parse_size, default_value = "800x600")]
    edit_size: (u16, u16),

    /// Result and effect surface size.
    #[arg(long, value_parser = parse_size, default_value = "600x600")]
    effect_size: (u16, u16),

    /// Edit camera zoom.
    #[arg(long, default_value_t = 1.0)]
    zoom: f64,
}

fn parse_size(s: &str) -> Result<(u16, u16), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WxH, got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<u16>()
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| format!("invalid dimension '{v}' in '{s}'"))
    };
    Ok((parse(w)?, parse(h)?))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Preview(args) => cmd_preview(args),
    }
}

fn cmd_preview(args: PreviewArgs) -> anyhow::Result<()> {
    anyhow::ensure!(
        args.zoom.is_finite() && args.zoom > 0.0,
        "--zoom must be finite and > 0"
    );
    let config = stamp::EditorConfig::from_path(&args.config)?;
    let assets_root = args.config.parent().unwrap_or_else(|| Path::new("."));
    let loader = stamp::AssetLoader::new(assets_root);

    let (ew, eh) = args.edit_size;
    let (fw, fh) = args.effect_size;
    let mut editor = stamp::Editor::new(
        config,
        stamp::EditorSurfaces {
            edit: Box::new(stamp::CpuSurface::new(ew, eh)),
            result: Box::new(stamp::CpuSurface::new(fw, fh)),
            effect: Box::new(stamp::CpuSurface::new(fw, fh)),
        },
        Box::new(stamp::NullController::default()),
    )?;
    editor.mount(&loader).context("mount editor")?;

    let layer_loader = stamp::AssetLoader::new(".");
    for path in &args.layers {
        let image = stamp::ImageResource::pending(path.to_string_lossy());
        layer_loader
            .load(&image)
            .with_context(|| format!("load layer '{}'", path.display()))?;
        let layer = editor.create_layer(image)?;
        editor.add_layer(layer)?;
    }

    let scene = editor.scene();
    if let Some(data) = editor.graph_mut().scene_data_mut(scene) {
        data.camera.zoom = args.zoom;
    }
    editor.render()?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    for (name, scene) in [
        ("edit.png", editor.scene()),
        ("result.png", editor.result_scene()),
        ("effect.png", editor.effect_scene()),
    ] {
        let frame = editor
            .graph()
            .scene_data(scene)
            .and_then(|d| d.canvas_image().bitmap())
            .with_context(|| format!("no frame rendered for {name}"))?;
        let out = args.out_dir.join(name);
        image::save_buffer_with_format(
            &out,
            &frame.to_straight_rgba8(),
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", out.display()))?;
        eprintln!("wrote {}", out.display());
    }
    Ok(())
}
