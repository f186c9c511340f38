use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use error_stack::{Report, ResultExt};
use kernel::KernelError;

static BIND_ADDRESS: &str = "BIND_ADDRESS";
static DATABASE_BACKEND: &str = "DATABASE_BACKEND";
static PAGINATION_ITEMS_PER_PAGE: &str = "PAGINATION_ITEMS_PER_PAGE";
static PAGINATION_MAXIMUM_ITEMS_PER_PAGE: &str = "PAGINATION_MAXIMUM_ITEMS_PER_PAGE";
static LOG_DIRECTORY: &str = "LOG_DIRECTORY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Postgres,
    Memory,
}

impl FromStr for Backend {
    type Err = Report<KernelError>;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "postgres" => Ok(Backend::Postgres),
            "memory" => Ok(Backend::Memory),
            other => Err(Report::new(KernelError::Internal)
                .attach_printable(format!("Unknown database backend: {other}"))),
        }
    }
}

/// Page size applied to collections when the client does not pick one, and its upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    pub items_per_page: i64,
    pub maximum_items_per_page: i64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            items_per_page: 30,
            maximum_items_per_page: 100,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub backend: Backend,
    pub pagination: PaginationConfig,
    pub log_directory: PathBuf,
}

impl ServerConfig {
    pub fn from_env() -> error_stack::Result<Self, KernelError> {
        Self::load(|key| dotenvy::var(key).ok())
    }

    pub fn load<F>(lookup: F) -> error_stack::Result<Self, KernelError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse = |key: &str| -> error_stack::Result<Option<i64>, KernelError> {
            lookup(key)
                .map(|value| {
                    value
                        .parse::<i64>()
                        .change_context_lazy(|| KernelError::Internal)
                        .attach_printable_lazy(|| format!("{key} must be an integer: {value}"))
                })
                .transpose()
        };

        let bind = lookup(BIND_ADDRESS)
            .unwrap_or_else(|| "0.0.0.0:8080".to_string())
            .parse::<SocketAddr>()
            .change_context_lazy(|| KernelError::Internal)
            .attach_printable_lazy(|| format!("{BIND_ADDRESS} is not a socket address"))?;
        let backend = lookup(DATABASE_BACKEND)
            .map(|value| value.parse::<Backend>())
            .transpose()?
            .unwrap_or(Backend::Postgres);

        let defaults = PaginationConfig::default();
        let pagination = PaginationConfig {
            items_per_page: parse(PAGINATION_ITEMS_PER_PAGE)?.unwrap_or(defaults.items_per_page),
            maximum_items_per_page: parse(PAGINATION_MAXIMUM_ITEMS_PER_PAGE)?
                .unwrap_or(defaults.maximum_items_per_page),
        };
        if pagination.items_per_page < 1
            || pagination.maximum_items_per_page < pagination.items_per_page
        {
            return Err(Report::new(KernelError::Internal).attach_printable(format!(
                "Pagination requires 1 <= {PAGINATION_ITEMS_PER_PAGE} <= {PAGINATION_MAXIMUM_ITEMS_PER_PAGE}"
            )));
        }

        let log_directory = lookup(LOG_DIRECTORY)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./logs/"));

        Ok(Self {
            bind,
            backend,
            pagination,
            log_directory,
        })
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use super::{Backend, ServerConfig};

    fn load(pairs: &[(&str, &str)]) -> error_stack::Result<ServerConfig, kernel::KernelError> {
        let env = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect::<HashMap<_, _>>();
        ServerConfig::load(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults() -> error_stack::Result<(), kernel::KernelError> {
        let config = load(&[])?;
        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.backend, Backend::Postgres);
        assert_eq!(config.pagination.items_per_page, 30);
        assert_eq!(config.pagination.maximum_items_per_page, 100);
        Ok(())
    }

    #[test]
    fn overrides() -> error_stack::Result<(), kernel::KernelError> {
        let config = load(&[
            ("BIND_ADDRESS", "127.0.0.1:3000"),
            ("DATABASE_BACKEND", "memory"),
            ("PAGINATION_ITEMS_PER_PAGE", "10"),
            ("PAGINATION_MAXIMUM_ITEMS_PER_PAGE", "20"),
        ])?;
        assert_eq!(config.bind.port(), 3000);
        assert_eq!(config.backend, Backend::Memory);
        assert_eq!(config.pagination.items_per_page, 10);
        assert_eq!(config.pagination.maximum_items_per_page, 20);
        Ok(())
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(load(&[("DATABASE_BACKEND", "redis")]).is_err());
        assert!(load(&[("PAGINATION_ITEMS_PER_PAGE", "many")]).is_err());
        assert!(load(&[("PAGINATION_ITEMS_PER_PAGE", "0")]).is_err());
        assert!(load(&[("PAGINATION_MAXIMUM_ITEMS_PER_PAGE", "5")]).is_err());
    }
}
