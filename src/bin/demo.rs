//! CGM Widget - Demo CLI
//!
//! Runs the poll loop against scripted glucose scenarios, no Dexcom account
//! required. Shows classification in both units and that shutdown completes
//! within the one-second tick bound.

use cgm_widget_lib::classify::classify;
use cgm_widget_lib::core::{DisplayUnit, Severity};
use cgm_widget_lib::poll::Poller;
use cgm_widget_lib::source::MockSource;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Low => "LOW",
        Severity::Normal => "ok",
        Severity::High => "HIGH",
        Severity::Unknown => "?",
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("==============================================");
    println!("   CGM Widget - Demo (scripted data)");
    println!("==============================================\n");

    println!("[1/3] Building scripted reading source...");
    let source = MockSource::with_default_scenarios();
    let fetches = source.fetch_counter();
    println!("      Scenarios: low, normal, rising, high, very high\n");

    println!("[2/3] Starting poll loop (2s interval)...\n");
    let (events_tx, events_rx) = crossbeam_channel::unbounded();
    let poller = Poller::start(Box::new(source), Duration::from_secs(2), events_tx);

    println!("----------------------------------------------");
    println!("  mg/dL           |  mmol/L          |  level");
    println!("----------------------------------------------");

    for _ in 0..5 {
        let event = events_rx.recv_timeout(Duration::from_secs(5));
        if event.is_err() {
            eprintln!("Timed out waiting for a refresh event");
            break;
        }

        let state = poller.state();
        let mg_dl = classify(state.last_sample.as_ref(), DisplayUnit::MgDl);
        let mmol_l = classify(state.last_sample.as_ref(), DisplayUnit::MmolL);

        println!(
            "  {:<15} |  {:<15} |  {}",
            mg_dl.display_text,
            mmol_l.display_text,
            severity_label(mg_dl.severity)
        );
    }

    println!("----------------------------------------------\n");

    println!("[3/3] Stopping poll loop...");
    let stop_requested = Instant::now();
    poller.stop();

    while poller.is_running() && stop_requested.elapsed() < Duration::from_secs(3) {
        std::thread::sleep(Duration::from_millis(20));
    }

    if poller.is_running() {
        println!("      Poll loop did not stop in time");
    } else {
        println!("      Stopped after {}ms", stop_requested.elapsed().as_millis());
    }
    println!("      Total fetches: {}\n", fetches.load(Ordering::SeqCst));

    println!("==============================================");
    println!("   Demo complete");
    println!("==============================================");
}
