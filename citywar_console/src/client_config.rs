use std::path::Path;
use std::time::Duration;

use anyhow::{Context, anyhow};
use citywar::player::Player;
use citywar::sync::SyncOptions;
use serde::Deserialize;
use url::Url;


// Contents of the optional YAML config file. Everything may be omitted; command line arguments
// take precedence.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub server_address: Option<String>,
    pub player: Option<String>,
    #[serde(with = "humantime_serde")]
    pub request_timeout: Option<Duration>,
    pub refresh_attempts: Option<u32>,
    #[serde(with = "humantime_serde")]
    pub retry_delay: Option<Duration>,
}

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub server_address: Url,
    pub player: Player,
    pub request_timeout: Duration,
    pub refresh_attempts: u32,
    pub retry_delay: Duration,
}

impl ConfigFile {
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read config file {}", path.display()))?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("Cannot parse config file {}", path.display()))
    }
}

impl ClientConfig {
    pub fn resolve(
        file: ConfigFile, server_address: Option<&str>, player: Option<&str>,
    ) -> anyhow::Result<Self> {
        let defaults = SyncOptions::default();
        let server_address = server_address
            .map(str::to_owned)
            .or(file.server_address)
            .ok_or_else(|| anyhow!("Server address is not specified"))?;
        let player = player
            .map(str::to_owned)
            .or(file.player)
            .ok_or_else(|| anyhow!("Player is not specified"))?;
        Ok(ClientConfig {
            server_address: parse_server_address(&server_address)?,
            player: parse_player(&player)?,
            request_timeout: file.request_timeout.unwrap_or(defaults.request_timeout),
            refresh_attempts: file.refresh_attempts.unwrap_or(defaults.refresh_attempts).max(1),
            retry_delay: file.retry_delay.unwrap_or(defaults.retry_delay),
        })
    }

    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            request_timeout: self.request_timeout,
            refresh_attempts: self.refresh_attempts,
            retry_delay: self.retry_delay,
        }
    }
}

// Accepts both full URLs and bare "host:port".
pub fn parse_server_address(address: &str) -> anyhow::Result<Url> {
    let address = address.trim();
    let full = if address.contains("://") { address.to_owned() } else { format!("http://{address}") };
    Url::parse(&full).with_context(|| format!("Invalid server address: {address}"))
}

pub fn parse_player(player: &str) -> anyhow::Result<Player> {
    Player::from_id(player.trim())
        .ok_or_else(|| anyhow!("Unknown player \"{player}\", expected \"white\" or \"black\""))
}


#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn file_with_overrides() {
        let file: ConfigFile = serde_yaml::from_str(
            "server_address: example.org:8000\nplayer: black\nrequest_timeout: 2s 500ms\n",
        )
        .unwrap();
        let config = ClientConfig::resolve(file, None, Some("White")).unwrap();
        assert_eq!(config.server_address.as_str(), "http://example.org:8000/");
        assert_eq!(config.player, Player::White);
        assert_eq!(config.request_timeout, Duration::from_millis(2500));
        assert_eq!(config.refresh_attempts, 3);
        assert_eq!(config.retry_delay, Duration::from_millis(500));
    }

    #[test]
    fn missing_values() {
        assert!(ClientConfig::resolve(ConfigFile::default(), None, Some("white")).is_err());
        assert!(ClientConfig::resolve(ConfigFile::default(), Some("localhost"), None).is_err());
        assert!(ClientConfig::resolve(ConfigFile::default(), Some("localhost"), Some("red")).is_err());
        assert!(serde_yaml::from_str::<ConfigFile>("port: 8000").is_err());
    }
}
