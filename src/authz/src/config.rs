//! Server configuration loading and validation

use crate::engine::PrivilegeEngine;
use anyhow::{Context, Result};
use privileges_core::types::{OneOrMany, RawPrivilege};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use tracing::info;

/// Complete server configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub logging: LoggingSection,

    /// Grants applied at startup
    #[serde(default)]
    pub seed: Vec<SeedGrant>,

    /// Roles registered (and assigned) at startup
    #[serde(default)]
    pub seed_roles: Vec<SeedRole>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSection {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingSection {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeedGrant {
    pub user_id: String,
    pub name: OneOrMany<String>,
    pub component: Option<String>,
    pub group: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeedRole {
    pub name: String,
    pub group: Option<String>,
    #[serde(default)]
    pub privileges: Vec<RawPrivilege>,
    /// Users the role is assigned to
    #[serde(default)]
    pub members: Vec<String>,
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_log_level() -> String { "info".to_string() }

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl ServerConfig {
    /// Load configuration from TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())
            .context("Failed to read configuration file")?;

        let config: ServerConfig = toml::from_str(&contents)
            .context("Failed to parse configuration file")?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be non-zero");
        }

        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            anyhow::bail!(
                "Log level must be one of {}, got '{}'",
                LOG_LEVELS.join(", "),
                self.logging.level
            );
        }

        for seed in &self.seed {
            if seed.user_id.trim().is_empty() {
                anyhow::bail!("Seed grants need a non-empty user_id");
            }
            if seed.name.is_empty() {
                anyhow::bail!("Seed grant for '{}' has no privilege names", seed.user_id);
            }
        }

        for role in &self.seed_roles {
            if role.name.trim().is_empty() {
                anyhow::bail!("Seed roles need a non-empty name");
            }
        }

        Ok(())
    }

    /// Address the HTTP server binds to
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.server.host, self.server.port))
    }

    /// Register seed roles and apply seed grants, in file order
    pub async fn apply_seed(&self, engine: &PrivilegeEngine) -> Result<()> {
        for role in &self.seed_roles {
            let templates = match role.privileges.len() {
                0 => None,
                _ => Some(OneOrMany::Many(role.privileges.clone())),
            };

            engine
                .register_role(&role.name, role.group.as_deref(), templates)
                .await
                .with_context(|| format!("Failed to register seed role '{}'", role.name))?;

            for member in &role.members {
                engine
                    .assign_role(member, role.name.clone(), role.group.as_deref())
                    .await
                    .with_context(|| format!("Failed to assign role '{}' to '{}'", role.name, member))?;
            }
        }

        for seed in &self.seed {
            engine
                .grant(
                    &seed.user_id,
                    seed.name.clone(),
                    seed.component.as_deref(),
                    seed.group.as_deref(),
                    seed.role.as_deref(),
                )
                .await
                .with_context(|| format!("Failed to apply seed grant for '{}'", seed.user_id))?;
        }

        info!(
            roles = self.seed_roles.len(),
            grants = self.seed.len(),
            "Applied seed data"
        );
        Ok(())
    }
}
