//! Frameless on-screen pixel ruler

use std::process::ExitCode;

use clap::Parser;
use ruler_core::MIN_DIMENSION;
use ruler_overlay::{OverlayConfig, RulerOverlay, get_all_monitors};

mod logging;

#[derive(Parser, Debug)]
#[command(version, about = "Frameless on-screen pixel ruler")]
struct Cli {
    /// Initial X position, relative to the chosen monitor
    #[arg(long, default_value_t = 100, allow_negative_numbers = true)]
    x: i32,

    /// Initial Y position, relative to the chosen monitor
    #[arg(long, default_value_t = 100, allow_negative_numbers = true)]
    y: i32,

    /// Initial width in pixels (at least 30)
    #[arg(long, default_value_t = 401)]
    width: u32,

    /// Initial height in pixels (at least 30)
    #[arg(long, default_value_t = 401)]
    height: u32,

    /// Monitor the position is relative to (see --list-monitors)
    #[arg(long, value_name = "ID")]
    monitor: Option<String>,

    /// Start with the secondary lines shown
    #[arg(long)]
    range: bool,

    /// Print connected monitors and exit
    #[arg(long)]
    list_monitors: bool,
}

impl Cli {
    fn overlay_config(&self) -> OverlayConfig {
        let min = MIN_DIMENSION as u32;
        OverlayConfig {
            x: self.x,
            y: self.y,
            width: self.width.max(min),
            height: self.height.max(min),
            target_monitor_id: self.monitor.clone(),
            ..OverlayConfig::default()
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _log_guard = logging::init();

    if cli.list_monitors {
        for monitor in get_all_monitors() {
            println!(
                "{}\t{}x{}+{}+{}{}",
                monitor.id,
                monitor.width,
                monitor.height,
                monitor.x,
                monitor.y,
                if monitor.is_primary { "\tprimary" } else { "" }
            );
        }
        return ExitCode::SUCCESS;
    }

    let config = cli.overlay_config();
    tracing::info!(?config, range = cli.range, "Starting ruler");

    match RulerOverlay::new(config, cli.range) {
        Ok(mut ruler) => {
            ruler.run();
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to open ruler window");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["screen-ruler"]);
        let config = cli.overlay_config();
        assert_eq!((config.x, config.y), (100, 100));
        assert_eq!((config.width, config.height), (401, 401));
        assert!(config.target_monitor_id.is_none());
        assert!(!cli.range);
    }

    #[test]
    fn test_size_is_floored() {
        let cli = Cli::parse_from(["screen-ruler", "--width", "5", "--height", "31"]);
        let config = cli.overlay_config();
        assert_eq!((config.width, config.height), (30, 31));
    }

    #[test]
    fn test_monitor_and_negative_position() {
        let cli = Cli::parse_from([
            "screen-ruler",
            "--x=-20",
            "--y",
            "-5",
            "--monitor",
            "HDMI-1",
            "--range",
        ]);
        let config = cli.overlay_config();
        assert_eq!((config.x, config.y), (-20, -5));
        assert_eq!(config.target_monitor_id.as_deref(), Some("HDMI-1"));
        assert!(cli.range);
    }
}
