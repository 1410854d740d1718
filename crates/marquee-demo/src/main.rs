#![forbid(unsafe_code)]

//! Marquee demo binary entry point.

use std::error::Error;
use std::io::{self, BufWriter, Write};
use std::time::Duration;

use marquee::{BootEvent, InputEvent, Stage, StageConfig, StageSimulator, ViewOutput};
use marquee_demo::cli;
use marquee_demo::scene::{self, Script, TracingRenderer};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

fn main() {
    let opts = cli::Opts::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(io::stderr).init();

    if let Err(e) = run(&opts) {
        eprintln!("marquee-demo: {e}");
        std::process::exit(1);
    }
}

fn run(opts: &cli::Opts) -> Result<(), Box<dyn Error>> {
    let mut config = match &opts.config {
        Some(path) => StageConfig::load(path)?,
        None => StageConfig::default(),
    };
    config.apply_env()?;

    let mut stage = Stage::new(&config)?
        .with_route(&opts.route)
        .with_renderer(TracingRenderer::new(u64::from(opts.fps)));
    scene::install(stage.binder_mut()).map_err(marquee::Error::from)?;
    if let Some(name) = &opts.login {
        stage.login(name);
    }
    stage.handle(InputEvent::Resize {
        viewport_height: scene::VIEWPORT_HEIGHT,
        document_height: scene::DOCUMENT_HEIGHT,
    });

    let interval = Duration::from_secs_f64(1.0 / f64::from(opts.fps));
    let mut sim = StageSimulator::with_interval(stage, interval);
    let script = Script;
    let mut mounted_at: Option<usize> = None;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    info!(frames = opts.frames, fps = opts.fps, route = %opts.route, "demo starting");
    for frame in 0..opts.frames {
        if let Some(start) = mounted_at {
            for event in script.events_at(frame - start) {
                sim.send(event);
            }
        }
        let snapshot = sim.step();
        if mounted_at.is_none() && snapshot.scroll.is_some() {
            mounted_at = Some(frame + 1);
        }
        if snapshot.events.contains(&BootEvent::Revealed) {
            info!(frame, "content revealed");
        }
        if opts.json {
            serde_json::to_writer(&mut out, snapshot)?;
            writeln!(out)?;
        }
    }
    out.flush()?;

    let redirects = sim.stage().guard().redirect_count();
    match sim.last_snapshot() {
        Some(last) => {
            if last.view == ViewOutput::Withheld {
                warn!("run ended before the boot sequence completed");
            }
            info!(
                frames = sim.frame_count(),
                route = %last.route,
                redirects,
                smoothed = last.scroll.map_or(0.0, |s| s.smoothed_offset),
                "demo finished"
            );
        }
        None => info!("no frames requested"),
    }
    Ok(())
}
