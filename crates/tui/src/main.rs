mod renderer;

use std::path::PathBuf;

use allocpad_core::pad::PAD_HEIGHT;
use allocpad_core::recording::RecordingSurface;
use allocpad_core::{PadElements, PadEvent, Surface, TraceView};
use anyhow::{Context, Result, bail};

const SVG_LAYOUT_WIDTH: f64 = 1200.0;

struct Args {
    trace: PathBuf,
    svg: Option<PathBuf>,
    dark: bool,
}

fn parse_args() -> Result<Args> {
    let mut trace = None;
    let mut svg = None;
    let mut dark = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--svg" => {
                let out = args.next().context("--svg needs an output path")?;
                svg = Some(PathBuf::from(out));
            }
            "--dark" => dark = true,
            _ if trace.is_none() => trace = Some(PathBuf::from(arg)),
            other => bail!("unexpected argument: {other}"),
        }
    }

    let Some(trace) = trace else {
        bail!("Usage: allocpad <trace.json|trace.txt> [--svg out.svg] [--dark]");
    };
    Ok(Args { trace, svg, dark })
}

fn main() -> Result<()> {
    env_logger::init();

    let args = parse_args()?;
    let data = std::fs::read(&args.trace)
        .with_context(|| format!("reading {}", args.trace.display()))?;
    let store = allocpad_core::parsers::parse_auto(&data)?;
    log::info!("loaded {} samples from {}", store.len(), args.trace.display());

    match args.svg {
        Some(out) => {
            let elements = PadElements::new(
                RecordingSurface::new(SVG_LAYOUT_WIDTH, PAD_HEIGHT, SVG_LAYOUT_WIDTH),
                String::new(),
                String::new(),
            );
            let mut view = TraceView::new(elements, store);
            view.start();
            view.handle(PadEvent::DataReady);

            let surface = &view.elements().pad;
            let svg = allocpad_core::svg::render_svg(
                surface.visible(),
                surface.pixel_width(),
                surface.pixel_height(),
                args.dark,
            );
            std::fs::write(&out, svg).with_context(|| format!("writing {}", out.display()))?;
            log::info!(
                "wrote {} (max {})",
                out.display(),
                view.elements().positive_max
            );
        }
        None => renderer::render_tui(store)?,
    }
    Ok(())
}
