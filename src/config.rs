//! Configuration for woodshed
//!
//! CLI arguments and environment variable handling using clap.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use uuid::Uuid;

/// Woodshed - guitar practice tracker backend
///
/// Serves markdown lesson content and tracks per-lesson checklist
/// progress, practice streaks, and achievement badges.
#[derive(Parser, Debug, Clone)]
#[command(name = "woodshed")]
#[command(about = "Guitar practice tracker backend")]
pub struct Args {
    /// Unique node identifier for this instance
    #[arg(long, env = "NODE_ID", default_value_t = Uuid::new_v4())]
    pub node_id: Uuid,

    /// Address to listen on
    #[arg(long, env = "LISTEN", default_value = "0.0.0.0:5000")]
    pub listen: SocketAddr,

    /// MongoDB connection URI
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017")]
    pub mongodb_uri: String,

    /// MongoDB database name
    #[arg(long, env = "MONGODB_DB", default_value = "woodshed")]
    pub mongodb_db: String,

    /// Root directory of markdown lesson content
    ///
    /// Each lesson category lives in its own subdirectory
    /// (technique/, theory/, ghost/, dinner/).
    #[arg(long, env = "CONTENT_ROOT", default_value = "./content")]
    pub content_root: PathBuf,

    /// Enable development mode (MongoDB optional, content-only browsing)
    #[arg(long, env = "DEV_MODE", default_value = "false")]
    pub dev_mode: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.mongodb_db.is_empty() {
            return Err("MONGODB_DB must not be empty".to_string());
        }
        if self.content_root.as_os_str().is_empty() {
            return Err("CONTENT_ROOT must not be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> Args {
        Args::parse_from(["woodshed"])
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(args().validate().is_ok());
    }

    #[test]
    fn test_empty_db_name_rejected() {
        let mut a = args();
        a.mongodb_db = String::new();
        assert!(a.validate().is_err());
    }
}
