mod systems;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use helm_engine::logging::{init_logging, LoggingConfig};
use helm_engine::{AppControl, DisplayMode, EngineCtx, Runtime, SessionBuilder, Settings};

#[derive(Parser)]
#[command(name = "helm-studio")]
#[command(about = "Runs a headless helm session with a demo app", long_about = None)]
#[command(version)]
struct Cli {
    /// Frames to run before the demo app exits
    #[arg(long, default_value_t = 120)]
    frames: u64,

    /// Preferred display mode
    #[arg(long, value_enum, default_value_t = Display::Flatscreen)]
    display: Display,

    /// Fail instead of falling back to flatscreen
    #[arg(long)]
    no_fallback: bool,

    /// Log filter, e.g. "debug" or "helm_engine::systems=trace"
    #[arg(long)]
    log: Option<String>,

    #[arg(long, default_value = "helm-studio")]
    app_name: String,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Display {
    Flatscreen,
    MixedReality,
}

impl From<Display> for DisplayMode {
    fn from(display: Display) -> Self {
        match display {
            Display::Flatscreen => DisplayMode::Flatscreen,
            Display::MixedReality => DisplayMode::MixedReality,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(match cli.log {
        Some(filter) => LoggingConfig::with_filter(filter),
        None => LoggingConfig::default(),
    });

    let settings = Settings {
        app_name: cli.app_name,
        display_preference: cli.display.into(),
        display_fallback: !cli.no_fallback,
        ..Settings::default()
    };

    let builder = SessionBuilder::new()
        .settings(settings)
        .collaborators(systems::collaborators());

    let frames = cli.frames;
    Runtime::run(builder, move |ctx: &mut EngineCtx| {
        let frame = ctx.frame().frame_index + 1;
        if frame % 60 == 0 {
            log::info!(
                "frame {frame}: t={:.3}s dt={:.2}ms on {:?}",
                ctx.time(),
                ctx.elapsed() * 1000.0,
                ctx.active_display()
            );
        }

        if frame >= frames {
            AppControl::Exit
        } else {
            AppControl::Continue
        }
    })
}
