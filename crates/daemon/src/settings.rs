//! Daemon settings read from `WALKIN_*` environment variables

use anyhow::{Context, Result};
use std::str::FromStr;
use walkin_api_rpc::RpcServerConfig;
use walkin_core::application::{EmergencyJoinPolicy, QueueServiceConfig};
use walkin_core::domain::{
    QueueConfig, DEFAULT_EMERGENCY_PENALTY_MINUTES, DEFAULT_PER_PERSON_MINUTES,
};

const DEFAULT_DB_PATH: &str = "~/.walkin/queue.db";
const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9630;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct DaemonSettings {
    pub db_path: String,
    pub rpc: RpcServerConfig,
    pub service: QueueServiceConfig,
    pub log_format: LogFormat,
}

impl DaemonSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup("WALKIN_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        let db_path = shellexpand::tilde(&db_path).into_owned();

        let rpc = RpcServerConfig {
            host: lookup("WALKIN_RPC_HOST").unwrap_or_else(|| DEFAULT_RPC_HOST.to_string()),
            port: parse_var(&lookup, "WALKIN_RPC_PORT", DEFAULT_RPC_PORT)?,
        };

        let mut queue_defaults = QueueConfig::new("");
        queue_defaults.per_person_minutes =
            parse_var(&lookup, "WALKIN_PER_PERSON_MINUTES", DEFAULT_PER_PERSON_MINUTES)?;
        queue_defaults.emergency_penalty_minutes = parse_var(
            &lookup,
            "WALKIN_EMERGENCY_PENALTY_MINUTES",
            DEFAULT_EMERGENCY_PENALTY_MINUTES,
        )?;

        let emergency_join_policy =
            if parse_var(&lookup, "WALKIN_REJECT_JOINS_DURING_EMERGENCY", false)? {
                EmergencyJoinPolicy::Reject
            } else {
                EmergencyJoinPolicy::Allow
            };

        let log_format = match lookup("WALKIN_LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            db_path,
            rpc,
            service: QueueServiceConfig {
                queue_defaults,
                emergency_join_policy,
            },
            log_format,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<DaemonSettings> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        DaemonSettings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let s = settings(&[]).unwrap();
        assert!(s.db_path.ends_with(".walkin/queue.db"));
        assert!(!s.db_path.starts_with('~'));
        assert_eq!(s.rpc.host, "127.0.0.1");
        assert_eq!(s.rpc.port, 9630);
        assert_eq!(s.service.queue_defaults.per_person_minutes, 5);
        assert_eq!(s.service.queue_defaults.emergency_penalty_minutes, 20);
        assert_eq!(s.service.emergency_join_policy, EmergencyJoinPolicy::Allow);
        assert_eq!(s.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_overrides() {
        let s = settings(&[
            ("WALKIN_DB_PATH", "/tmp/q.db"),
            ("WALKIN_RPC_PORT", "7000"),
            ("WALKIN_PER_PERSON_MINUTES", "3"),
            ("WALKIN_EMERGENCY_PENALTY_MINUTES", "45"),
            ("WALKIN_REJECT_JOINS_DURING_EMERGENCY", "true"),
            ("WALKIN_LOG_FORMAT", "json"),
        ])
        .unwrap();
        assert_eq!(s.db_path, "/tmp/q.db");
        assert_eq!(s.rpc.port, 7000);
        assert_eq!(s.service.queue_defaults.per_person_minutes, 3);
        assert_eq!(s.service.queue_defaults.emergency_penalty_minutes, 45);
        assert_eq!(s.service.emergency_join_policy, EmergencyJoinPolicy::Reject);
        assert_eq!(s.log_format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_number_is_reported() {
        let err = settings(&[("WALKIN_RPC_PORT", "lots")]).unwrap_err();
        assert!(err.to_string().contains("WALKIN_RPC_PORT"));
    }
}
