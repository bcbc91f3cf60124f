mod demo;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use tether_bridge::host::BridgeConfig;
use tether_bridge::logging::{LoggingConfig, init_logging};
use tether_bridge::surface::HandshakeMode;
use tether_bridge::window::{Runtime, RuntimeConfig};

use demo::{DemoEngine, LogViewport};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = config_from_env()?;
    log::info!(
        "starting: handshake {:?}, {:?} per frame",
        config.bridge.handshake,
        config.bridge.frame_interval
    );

    Runtime::run(config, DemoEngine::new, LogViewport::default())
}

/// Reads `TETHER_HANDSHAKE`, `TETHER_FPS` and `TETHER_ASSETS`.
fn config_from_env() -> Result<RuntimeConfig> {
    let mut bridge = BridgeConfig::default();

    if let Ok(mode) = std::env::var("TETHER_HANDSHAKE") {
        bridge = bridge.with_handshake(parse_handshake(&mode)?);
    }

    if let Ok(fps) = std::env::var("TETHER_FPS") {
        bridge = bridge.with_fps(parse_fps(&fps)?);
    }

    Ok(RuntimeConfig {
        title: "Tether demo".to_string(),
        bridge,
        assets_dir: std::env::var_os("TETHER_ASSETS").map(PathBuf::from),
        ..RuntimeConfig::default()
    })
}

fn parse_fps(s: &str) -> Result<u32> {
    s.trim()
        .parse::<u32>()
        .with_context(|| format!("TETHER_FPS={s:?} is not a frame rate"))
}

fn parse_handshake(s: &str) -> Result<HandshakeMode> {
    Ok(match s.trim().to_ascii_lowercase().as_str() {
        "self-sized" | "none" => HandshakeMode::SelfSized,
        "sized" => HandshakeMode::Sized,
        "assets" | "sized-with-assets" => HandshakeMode::SizedWithAssets,
        other => bail!("unknown TETHER_HANDSHAKE {other:?} (expected self-sized, sized or assets)"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_handshake_modes() {
        assert_eq!(parse_handshake("self-sized").unwrap(), HandshakeMode::SelfSized);
        assert_eq!(parse_handshake(" Sized ").unwrap(), HandshakeMode::Sized);
        assert_eq!(parse_handshake("assets").unwrap(), HandshakeMode::SizedWithAssets);
        assert!(parse_handshake("triple").is_err());
    }

    #[test]
    fn fps_errors_name_the_variable() {
        assert_eq!(parse_fps(" 120 ").unwrap(), 120);

        let err = parse_fps("fast").unwrap_err();
        assert!(format!("{err:#}").starts_with("TETHER_FPS=\"fast\""));
    }
}
