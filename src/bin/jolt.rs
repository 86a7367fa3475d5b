use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use jolt::vello_cpu::{
    kurbo::{Circle, Shape as _, Stroke},
    peniko::Color,
};

const BACKGROUND: [u8; 4] = [18, 20, 28, 255];

#[derive(Parser, Debug)]
#[command(name = "jolt", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one frame of a ring that expands in, then shrinks out.
    Pulse(PulseArgs),
    /// Render a ball bouncing across the canvas, one PNG per tick.
    Bounce(BounceArgs),
}

#[derive(Parser, Debug)]
struct SceneArgs {
    /// Engine config JSON (size, base layer options).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Canvas width; overrides the config.
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height; overrides the config.
    #[arg(long)]
    height: Option<u32>,

    /// Simulated tick spacing in milliseconds.
    #[arg(long, default_value_t = 16.0)]
    step_ms: f64,
}

#[derive(Parser, Debug)]
struct PulseArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Engine time of the captured frame.
    #[arg(long, default_value_t = 300.0)]
    at_ms: f64,

    /// Easing curve name, e.g. `easeOutBounce`.
    #[arg(long, default_value = "easeOutQuad")]
    easing: String,

    /// Duration of each transition in milliseconds.
    #[arg(long, default_value_t = 750.0)]
    duration: f64,
}

#[derive(Parser, Debug)]
struct BounceArgs {
    #[command(flatten)]
    scene: SceneArgs,

    /// Output directory for `frame_NNNN.png` files.
    #[arg(long)]
    out_dir: PathBuf,

    /// Number of ticks to render.
    #[arg(long, default_value_t = 30)]
    frames: u64,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Pulse(args) => cmd_pulse(args),
        Command::Bounce(args) => cmd_bounce(args),
    }
}

fn make_engine(args: &SceneArgs) -> anyhow::Result<jolt::Engine> {
    let mut config = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("read config '{}'", path.display()))?;
            jolt::EngineConfig::from_json(&json)
                .with_context(|| format!("parse config '{}'", path.display()))?
        }
        None => jolt::EngineConfig::default(),
    };
    if let Some(w) = args.width {
        config.width = w;
    }
    if let Some(h) = args.height {
        config.height = h;
    }
    config.autostart = false;
    // Redraw the whole scene every tick.
    config.base.autoclear = true;

    let viewport = jolt::Canvas::new(config.width, config.height);
    let host = jolt::ManualHost::new(viewport).with_step(args.step_ms);
    Ok(jolt::Engine::new(Box::new(host), config)?)
}

fn cmd_pulse(args: PulseArgs) -> anyhow::Result<()> {
    let mut engine = make_engine(&args.scene)?;
    let opts = jolt::TransitionOpts {
        duration: args.duration,
        easing: args.easing.parse()?,
    };

    let (w, h) = (f64::from(engine.width()), f64::from(engine.height()));
    let radius = w.min(h) * 0.3;
    engine.create_layer("ring", jolt::LayerOpts::default())?;
    engine.draw_onto(Some("ring"), |ctx| {
        let ring = Circle::new((w / 2.0, h / 2.0), radius).to_path(0.1);
        ctx.set_paint(Color::from_rgba8(120, 200, 255, 255));
        ctx.set_stroke(Stroke::new(radius * 0.15));
        ctx.stroke_path(&ring);
    })?;

    engine.start_transition(
        "ring",
        jolt::TransitionKind::ExpandIn,
        opts,
        Some(Box::new(move |e: &mut jolt::Engine| {
            e.start_transition("ring", jolt::TransitionKind::ShrinkOut, opts, None)?;
            Ok(())
        })),
    )?;

    engine.start()?;
    engine.run_while(|e| e.now() < args.at_ms);

    write_png(&engine, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_bounce(args: BounceArgs) -> anyhow::Result<()> {
    let mut engine = make_engine(&args.scene)?;
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let (w, h) = (f64::from(engine.width()), f64::from(engine.height()));
    let radius = w.min(h) * 0.08;
    engine.create_layer(
        "ball",
        jolt::LayerOpts {
            autoclear: true,
            ..jolt::LayerOpts::default()
        },
    )?;

    let out_dir = args.out_dir.clone();
    engine.on_frame(move |e| {
        let t = e.now() / 1000.0;
        let x = radius + (w - 2.0 * radius) * (0.5 + 0.5 * (t * 2.0).sin());
        let y = h - radius - (h - 2.0 * radius) * (t * 5.0).sin().abs();
        e.draw_onto(Some("ball"), |ctx| {
            let ball = Circle::new((x, y), radius).to_path(0.1);
            ctx.set_paint(Color::from_rgba8(255, 170, 60, 255));
            ctx.fill_path(&ball);
        })?;
        // The ball was drawn after this tick's composite; push it through now.
        e.load("ball")?;
        write_png(e, &out_dir.join(format!("frame_{:04}.png", e.tick_count())))
    });

    engine.start()?;
    engine.run_while(|e| e.tick_count() < args.frames);

    eprintln!("wrote {} frames to {}", engine.tick_count(), args.out_dir.display());
    Ok(())
}

fn write_png(engine: &jolt::Engine, path: &Path) -> anyhow::Result<()> {
    let frame = engine.snapshot()?;
    let data = flatten(&frame.data, BACKGROUND);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        path,
        &data,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

/// Premultiplied source-over onto an opaque background.
fn flatten(premul: &[u8], bg: [u8; 4]) -> Vec<u8> {
    let mut out = Vec::with_capacity(premul.len());
    for px in premul.chunks_exact(4) {
        let inv = 255 - u16::from(px[3]);
        for c in 0..3 {
            let v = u16::from(px[c]) + (u16::from(bg[c]) * inv + 127) / 255;
            out.push(v.min(255) as u8);
        }
        out.push(255);
    }
    out
}
