//! GrowBox host simulator — main entry point.
//!
//! Drives the enclosure controller against a scenario model at full
//! speed, with the same port wiring the deployed build uses:
//!
//! ```text
//! ┌──────────────────────────────────────────────────┐
//! │               Adapters (outer ring)              │
//! │                                                  │
//! │   SimHarness              LogEventSink           │
//! │   (InputPort+OutputPort)  (EventSink)            │
//! │                                                  │
//! │  ─────────── Port Trait Boundary ───────────     │
//! │                                                  │
//! │  ┌────────────────────────────────────────────┐  │
//! │  │       EnclosureService (pure logic)        │  │
//! │  │  Filter · Policy · Arbiter · Serial TX     │  │
//! │  └────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────┘
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;

use growbox::adapters::log_sink::LogEventSink;
use growbox::adapters::sim::{Scenario, SimHarness};
use growbox::app::events::ControllerEvent;
use growbox::app::ports::EventSink;
use growbox::app::service::EnclosureService;
use growbox::config::SystemConfig;
use growbox::profile::CropProfile;

#[derive(Parser)]
#[command(name = "growbox-sim", version, about = "Enclosure controller simulator")]
struct Cli {
    /// Crop profile: radish | basil | peashoots | sunflower
    #[arg(long, default_value = "radish")]
    profile: String,

    /// Scenario: calm | noisy | drought | coldsnap
    #[arg(long, default_value = "calm")]
    scenario: String,

    /// Control ticks to simulate
    #[arg(long, default_value_t = 2_000_000)]
    ticks: u64,

    /// Sensor qualification window in ticks (default from config)
    #[arg(long)]
    window: Option<u32>,

    /// Serial bit period in ticks (default from config)
    #[arg(long)]
    bit_period: Option<u32>,

    /// Engage the operator override at this tick
    #[arg(long)]
    override_at: Option<u64>,

    /// Hold the override for this many ticks
    #[arg(long, default_value_t = 100_000)]
    override_for: u64,

    /// Seed for the scenario noise model
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    // ── 1. Configuration, with CLI overrides ──────────────────
    let mut config = SystemConfig::default();
    if let Some(window) = cli.window {
        config.qualify_window_ticks = window;
    }
    if let Some(period) = cli.bit_period {
        config.ticks_per_bit = period;
    }

    let profile = CropProfile::from_str_lossy(&cli.profile);
    let scenario = Scenario::from_str_lossy(&cli.scenario);

    info!(
        "growbox-sim v{} | profile={} scenario={} ticks={} seed={}",
        env!("CARGO_PKG_VERSION"),
        profile,
        scenario,
        cli.ticks,
        cli.seed
    );

    // ── 2. Construct the core and adapters ────────────────────
    let mut service = EnclosureService::new(config)?;
    let mut hw = SimHarness::new(scenario, profile, cli.seed);
    if let Some(at) = cli.override_at {
        hw.set_override_window(at, at.saturating_add(cli.override_for));
    }
    let mut sink = LogEventSink::new();

    // ── 3. Run ────────────────────────────────────────────────
    service.start(&mut sink);
    for _ in 0..cli.ticks {
        service.tick(&mut hw, &mut sink);
    }

    // ── 4. Closing report ─────────────────────────────────────
    sink.emit(&ControllerEvent::Snapshot(service.build_snapshot()));
    info!(
        "run complete: {} serial start bits observed, final word A = 0b{:08b}",
        hw.line_falls, hw.last_output.word_a
    );
    println!("{}", serde_json::to_string_pretty(service.metrics())?);

    Ok(())
}
