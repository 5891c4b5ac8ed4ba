//! Run the effects controller headless against a virtual clock and print
//! population counts over time.
//!
//! Usage: `simulate [WIDTH HEIGHT [SECONDS [SEED]]]`

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use background_effects::core::headless::{run_for, ManualTimers, MemorySurface};
    use background_effects::core::{rng, Controller, Event, ParticleKind, Viewport};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let num = |i: usize, default: f64| -> anyhow::Result<f64> {
        match args.get(i) {
            Some(s) => s
                .parse::<f64>()
                .map_err(|e| anyhow::anyhow!("argument {} ({:?}): {}", i + 1, s, e)),
            None => Ok(default),
        }
    };
    let viewport = Viewport::new(num(0, 1920.0)?, num(1, 1080.0)?);
    let seconds = num(2, 120.0)?.max(0.0) as u64;
    let seed = num(3, 42.0)? as u64;

    let mut ctl = Controller::new(
        MemorySurface::new(),
        ManualTimers::new(),
        rng::seeded(seed),
        viewport,
    );
    ctl.handle(Event::Start {
        viewport,
        hidden: false,
    });
    if !ctl.is_initialized() {
        anyhow::bail!("controller failed to start");
    }

    println!("t_sec  fireflies  sparkles");
    for t in (0..=seconds).step_by(5) {
        if t > 0 {
            run_for(&mut ctl, 5_000);
        }
        let s = ctl.surface();
        println!(
            "{:>5}  {:>9}  {:>8}",
            t,
            s.particles(ParticleKind::Firefly).len(),
            s.particles(ParticleKind::Sparkle).len()
        );
    }
    ctl.handle(Event::Shutdown);
    log::info!("[simulate] pending timers after shutdown: {}", ctl.timers().pending_count());
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}
