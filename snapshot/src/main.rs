use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, bail};
use clap::{Parser, Subcommand};
use scene_core::{build_scene_svg, encode_rgba_to_png_bytes};
use triangle_core::timeline::total_ms;
use triangle_core::{
    BASE_SLIDER, Geometry, HEIGHT_SLIDER, ManualTimers, Sequencer, ViewState, derive,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "snapshot", version, about = "Render the triangle-area fold offline")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the derived geometry as JSON.
    Geometry(ParamArgs),
    /// Render one instant of the animation to SVG or PNG.
    Frame(FrameArgs),
    /// Render the whole animation as numbered PNGs.
    Frames(FramesArgs),
}

#[derive(Parser, Debug)]
struct ParamArgs {
    /// Triangle base, 2..=10.
    #[arg(long, default_value_t = BASE_SLIDER.default)]
    base: f64,

    /// Triangle height, 2..=8.
    #[arg(long, default_value_t = HEIGHT_SLIDER.default)]
    height: f64,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    params: ParamArgs,

    /// Milliseconds after play; negative renders the idle scene.
    #[arg(long, default_value_t = f64::from(total_ms()), allow_negative_numbers = true)]
    at_ms: f64,

    /// Output path (.svg or .png).
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    #[command(flatten)]
    params: ParamArgs,

    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Directory receiving frame_0000.png, frame_0001.png, ...
    #[arg(long)]
    out_dir: PathBuf,
}

impl ParamArgs {
    fn geometry(&self) -> anyhow::Result<Geometry> {
        if !BASE_SLIDER.contains(self.base) {
            bail!(
                "base {} outside {}..={}",
                self.base,
                BASE_SLIDER.min,
                BASE_SLIDER.max
            );
        }
        if !HEIGHT_SLIDER.contains(self.height) {
            bail!(
                "height {} outside {}..={}",
                self.height,
                HEIGHT_SLIDER.min,
                HEIGHT_SLIDER.max
            );
        }
        Ok(derive(self.base, self.height))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum OutputKind {
    Svg,
    Png,
}

fn output_kind(path: &Path) -> anyhow::Result<OutputKind> {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("svg") => Ok(OutputKind::Svg),
        Some("png") => Ok(OutputKind::Png),
        _ => bail!("unsupported output {}; use .svg or .png", path.display()),
    }
}

/// Play once on a manual clock and stop at each requested instant.
/// Instants must be ascending.
fn views_at(instants: &[f64]) -> Vec<ViewState> {
    let mut seq = Sequencer::new();
    let mut timers = ManualTimers::new();
    seq.play(&mut timers);
    instants
        .iter()
        .map(|&t| {
            if t < 0.0 {
                return ViewState::hidden();
            }
            timers.advance_to(t, &mut seq);
            seq.view().clone()
        })
        .collect()
}

/// Parse options with the system fonts loaded. Font discovery scans the
/// disk, so build this once per command.
fn render_options() -> usvg::Options<'static> {
    let mut opt = usvg::Options::default();
    let mut fontdb = usvg::fontdb::Database::new();
    fontdb.load_system_fonts();
    if fontdb.len() == 0 {
        tracing::warn!("no system fonts found; labels will not render");
    }
    opt.fontdb = std::sync::Arc::new(fontdb);
    opt
}

fn render_png(
    svg: &str,
    w_px: u32,
    h_px: u32,
    opt: &usvg::Options<'_>,
) -> anyhow::Result<Vec<u8>> {
    let tree = usvg::Tree::from_str(svg, opt).context("parse scene SVG")?;
    let mut pixmap = tiny_skia::Pixmap::new(w_px, h_px).context("pixmap alloc failed")?;
    let mut pm = pixmap.as_mut();
    resvg::render(&tree, tiny_skia::Transform::identity(), &mut pm);
    let bytes = encode_rgba_to_png_bytes(pixmap.width(), pixmap.height(), pixmap.data())
        .context("encode PNG")?;
    Ok(bytes)
}

fn cmd_geometry(args: ParamArgs) -> anyhow::Result<()> {
    let g = args.geometry()?;
    println!("{}", serde_json::to_string_pretty(&g)?);
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let g = args.params.geometry()?;
    let kind = output_kind(&args.out)?;
    let view = views_at(&[args.at_ms]).remove(0);
    let (svg, w, h) = build_scene_svg(&g, &view);
    let bytes = match kind {
        OutputKind::Svg => svg.into_bytes(),
        OutputKind::Png => render_png(&svg, w, h, &render_options())?,
    };
    fs::write(&args.out, bytes).with_context(|| format!("write {}", args.out.display()))?;
    tracing::info!(
        out = %args.out.display(),
        at_ms = args.at_ms,
        area = %triangle_core::format_area(g.area),
        "wrote frame"
    );
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    if args.fps == 0 {
        bail!("fps must be positive");
    }
    let g = args.params.geometry()?;
    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create {}", args.out_dir.display()))?;
    let step = 1000.0 / f64::from(args.fps);
    let count = (f64::from(total_ms()) / step).ceil() as usize + 1;
    let instants: Vec<f64> = (0..count).map(|i| i as f64 * step).collect();
    let opt = render_options();
    for (i, view) in views_at(&instants).iter().enumerate() {
        let (svg, w, h) = build_scene_svg(&g, view);
        let path = args.out_dir.join(format!("frame_{:04}.png", i));
        fs::write(&path, render_png(&svg, w, h, &opt)?)
            .with_context(|| format!("write {}", path.display()))?;
        tracing::debug!(frame = i, at_ms = instants[i], "rendered");
    }
    tracing::info!(frames = count, dir = %args.out_dir.display(), "wrote frames");
    Ok(())
}

/// `RUST_LOG` directives when set and valid, `info` otherwise.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Geometry(args) => cmd_geometry(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Frames(args) => cmd_frames(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_params_are_rejected() {
        let ok = ParamArgs {
            base: 7.0,
            height: 4.0,
        };
        assert_eq!(ok.geometry().unwrap().area, 14.0);
        let bad = ParamArgs {
            base: 11.0,
            height: 4.0,
        };
        assert!(bad.geometry().is_err());
        let bad = ParamArgs {
            base: 7.0,
            height: 1.8,
        };
        assert!(bad.geometry().is_err());
    }

    #[test]
    fn log_filter_follows_rust_log() {
        use tracing::level_filters::LevelFilter;
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::INFO));
        assert_eq!(
            log_filter(Some("debug")).max_level_hint(),
            Some(LevelFilter::DEBUG)
        );
        assert_eq!(
            log_filter(Some("error")).max_level_hint(),
            Some(LevelFilter::ERROR)
        );
    }

    #[test]
    fn one_options_value_renders_many_frames() {
        let opt = render_options();
        let g = derive(7.0, 4.0);
        for t in [0.0, 1850.0] {
            let (svg, w, h) = build_scene_svg(&g, &ViewState::at(t));
            let png = render_png(&svg, w, h, &opt).unwrap();
            assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        }
    }

    #[test]
    fn output_kind_from_extension() {
        assert_eq!(output_kind(Path::new("a.svg")).unwrap(), OutputKind::Svg);
        assert_eq!(output_kind(Path::new("a.PNG")).unwrap(), OutputKind::Png);
        assert!(output_kind(Path::new("a.jpg")).is_err());
        assert!(output_kind(Path::new("noext")).is_err());
    }

    #[test]
    fn clock_driven_views_match_pure_timeline() {
        let instants = [-5.0, 0.0, 400.0, 1100.0, 1850.0];
        let views = views_at(&instants);
        assert!(views[0].all_hidden());
        for (t, v) in instants.iter().zip(&views).skip(1) {
            assert_eq!(v, &ViewState::at(*t), "t={t}");
        }
        assert!(views[4].all_shown());
    }

    #[test]
    fn cli_parses_frame_command() {
        let cli = Cli::try_parse_from([
            "snapshot", "frame", "--base", "5", "--height", "3", "--at-ms", "900", "--out", "x.svg",
        ])
        .unwrap();
        match cli.cmd {
            Command::Frame(a) => {
                assert_eq!(a.params.base, 5.0);
                assert_eq!(a.at_ms, 900.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
