//! CGM Widget - terminal entry point
//!
//! Thin presentation adapter over the core: polls Dexcom Share in the
//! background and prints each refreshed reading. Graphical shells replace
//! this file only; the classifier and poll loop are shared.

use anyhow::{bail, Context};
use cgm_widget_lib::classify::classify;
use cgm_widget_lib::core::{Config, DisplayUnit, Severity};
use cgm_widget_lib::poll::Poller;
use cgm_widget_lib::source::DexcomSource;
use chrono::Local;
use std::time::Duration;

/// Widget text colors per severity
fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Low => "#FF4444",
        Severity::Normal => "#44FF44",
        Severity::High => "#FF8800",
        Severity::Unknown => "#888888",
    }
}

fn other_unit(unit: DisplayUnit) -> DisplayUnit {
    match unit {
        DisplayUnit::MgDl => DisplayUnit::MmolL,
        DisplayUnit::MmolL => DisplayUnit::MgDl,
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting CGM Widget v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load().context("failed to load configuration")?;
    if !config.has_credentials() {
        bail!(
            "No Dexcom Share credentials configured. Fill in [account] in {}",
            Config::config_path()?.display()
        );
    }

    let source = DexcomSource::new(&config.account).context("failed to build Share client")?;
    let unit = config.display.unit;
    let interval = Duration::from_secs(config.display.update_interval_secs);

    let (events_tx, events_rx) = crossbeam_channel::unbounded();
    let poller = Poller::start(Box::new(source), interval, events_tx);

    println!("CGM Widget running, updates every {}s. Ctrl+C to quit.", interval.as_secs());

    // Drain refresh events on this thread, the terminal's "UI context"
    for _event in events_rx.iter() {
        let state = poller.state();
        let primary = classify(state.last_sample.as_ref(), unit);
        let alternate = classify(state.last_sample.as_ref(), other_unit(unit));

        let updated = state
            .last_update
            .map(|t| t.with_timezone(&Local).format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "never".to_string());

        if let Some(sample) = &state.last_sample {
            println!(
                "Glucose: {} ({}) - {} [{}] updated {}",
                primary.display_text,
                alternate.display_text,
                sample.trend.description(),
                severity_color(primary.severity),
                updated
            );
        } else {
            println!("{} [{}]", primary.display_text, severity_color(primary.severity));
        }
    }

    Ok(())
}
