//! Watch a softener and print sensor changes as they happen
//!
//! Run: cargo run -p bwt-perla-monitor --example watch_softener -- <host> <code>

use bwt_monitor::logging::{init_logging, LoggingMode};
use bwt_monitor::{validate_connection, MonitorConfig, MonitorEvent, MonitorTask};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(LoggingMode::Development)?;

    let mut args = std::env::args().skip(1);
    let usage = "usage: watch_softener <host> <code>";
    let host = args.next().expect(usage);
    let code = args.next().expect(usage);

    let config = MonitorConfig::new(host, code);

    let probe = config.clone();
    let info = tokio::task::spawn_blocking(move || validate_connection(&probe)).await??;
    println!(
        "connected to {} {} at {} (firmware {})",
        info.manufacturer, info.model, info.host, info.firmware_version
    );

    let (task, mut events) = MonitorTask::connect(config)?;

    while let Some(event) = events.recv().await {
        match event {
            MonitorEvent::ReadingUpdated {
                current_flow_l_h,
                next_interval,
            } => {
                println!("reading: {} l/h, next poll in {:?}", current_flow_l_h, next_interval);
            }
            MonitorEvent::SensorChanged { key, value, .. } => match value {
                Some(value) => println!("  {} -> {}", key, value),
                None => println!("  {} -> (no value)", key),
            },
            MonitorEvent::PollFailed {
                consecutive_errors,
                error,
            } => {
                eprintln!("poll failed ({} in a row): {}", consecutive_errors, error);
            }
            MonitorEvent::AuthenticationFailed => {
                eprintln!("device rejected the login code");
                break;
            }
            MonitorEvent::Stopped => break,
        }
    }

    task.shutdown().await?;
    Ok(())
}
