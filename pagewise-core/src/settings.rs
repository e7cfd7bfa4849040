//! Environment-driven settings.

use std::env;
use std::str::FromStr;

use crate::error::ConfigurationError;
use crate::source::Credential;

/// Default page size for cursor fetches.
pub const DEFAULT_PAGE_SIZE: usize = 2;
/// Default number of skeleton rows shown while a fetch is in flight.
pub const DEFAULT_PLACEHOLDER_ROWS: usize = 2;
/// Default "items per page" choices for the local navigator.
pub const DEFAULT_PAGE_SIZES: [usize; 7] = [5, 10, 15, 20, 30, 50, 100];
/// Default requested navigator page size.
pub const DEFAULT_LIMIT: usize = 5;
/// Default PostgreSQL pool size.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Which pagination strategy backs the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BrowseMode {
    /// Cursor-based incremental "load more".
    #[default]
    LoadMore,
    /// Fixed-size local pages over the fully loaded result set.
    Paged,
}

impl FromStr for BrowseMode {
    type Err = ConfigurationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "load-more" | "loadmore" => Ok(Self::LoadMore),
            "paged" => Ok(Self::Paged),
            _ => Err(ConfigurationError::InvalidValue {
                key: "PAGEWISE_MODE".to_owned(),
                value: raw.to_owned(),
            }),
        }
    }
}

/// Runtime settings for the pagewise binary and its sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_url: Option<String>,
    pub db_password: Option<Credential>,
    pub max_connections: u32,
    pub page_size: usize,
    pub placeholder_rows: usize,
    pub page_sizes: Vec<usize>,
    pub limit: usize,
    pub mode: BrowseMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: None,
            db_password: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            page_size: DEFAULT_PAGE_SIZE,
            placeholder_rows: DEFAULT_PLACEHOLDER_ROWS,
            page_sizes: DEFAULT_PAGE_SIZES.to_vec(),
            limit: DEFAULT_LIMIT,
            mode: BrowseMode::default(),
        }
    }
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// Callers load `.env` first if they want it honoured.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigurationError> {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let page_sizes = match non_empty("PAGEWISE_PAGE_SIZES") {
            Some(raw) => parse_list("PAGEWISE_PAGE_SIZES", &raw)?,
            None => defaults.page_sizes,
        };

        let settings = Self {
            database_url: non_empty("DATABASE_URL"),
            db_password: non_empty("PAGEWISE_DB_PASSWORD").map(Credential::new),
            max_connections: parse_setting(
                &non_empty,
                "PAGEWISE_MAX_CONNECTIONS",
                defaults.max_connections,
            )?,
            page_size: parse_setting(&non_empty, "PAGEWISE_PAGE_SIZE", defaults.page_size)?,
            placeholder_rows: parse_setting(
                &non_empty,
                "PAGEWISE_PLACEHOLDER_ROWS",
                defaults.placeholder_rows,
            )?,
            page_sizes,
            limit: parse_setting(&non_empty, "PAGEWISE_LIMIT", defaults.limit)?,
            mode: match non_empty("PAGEWISE_MODE") {
                Some(raw) => raw.parse()?,
                None => defaults.mode,
            },
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Check the invariants the paginators rely on.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.page_size == 0 {
            return Err(ConfigurationError::NonPositivePageSize("PAGEWISE_PAGE_SIZE"));
        }
        if self.page_sizes.is_empty() {
            return Err(ConfigurationError::EmptyPageSizes);
        }
        if self.page_sizes.contains(&0) {
            return Err(ConfigurationError::NonPositivePageSize("PAGEWISE_PAGE_SIZES"));
        }
        if self.max_connections == 0 {
            return Err(ConfigurationError::InvalidValue {
                key: "PAGEWISE_MAX_CONNECTIONS".to_owned(),
                value: "0".to_owned(),
            });
        }
        Ok(())
    }
}

fn parse_setting<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigurationError> {
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigurationError::InvalidValue {
            key: key.to_owned(),
            value: raw,
        }),
        None => Ok(default),
    }
}

fn parse_list(key: &str, raw: &str) -> Result<Vec<usize>, ConfigurationError> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<usize>().map_err(|_| ConfigurationError::InvalidValue {
                key: key.to_owned(),
                value: raw.to_owned(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.page_size, 2);
        assert_eq!(settings.mode, BrowseMode::LoadMore);
    }

    #[test]
    fn reads_overrides() {
        let settings = Settings::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/pins"),
            ("PAGEWISE_DB_PASSWORD", "secret"),
            ("PAGEWISE_PAGE_SIZE", "10"),
            ("PAGEWISE_PAGE_SIZES", "5, 25,50"),
            ("PAGEWISE_MODE", "paged"),
        ]))
        .unwrap();

        assert_eq!(settings.database_url.as_deref(), Some("postgres://localhost/pins"));
        assert_eq!(settings.db_password.as_ref().map(Credential::expose), Some("secret"));
        assert_eq!(settings.page_size, 10);
        assert_eq!(settings.page_sizes, vec![5, 25, 50]);
        assert_eq!(settings.mode, BrowseMode::Paged);
    }

    #[test]
    fn zero_page_size_fails_fast() {
        let err = Settings::from_lookup(lookup(&[("PAGEWISE_PAGE_SIZE", "0")])).unwrap_err();
        assert_eq!(err, ConfigurationError::NonPositivePageSize("PAGEWISE_PAGE_SIZE"));
    }

    #[test]
    fn empty_page_size_list_fails_fast() {
        let err = Settings::from_lookup(lookup(&[("PAGEWISE_PAGE_SIZES", " , ")])).unwrap_err();
        assert_eq!(err, ConfigurationError::EmptyPageSizes);
    }

    #[test]
    fn garbage_is_rejected() {
        let err = Settings::from_lookup(lookup(&[("PAGEWISE_LIMIT", "five")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::InvalidValue { ref key, .. } if key == "PAGEWISE_LIMIT"
        ));

        let err = Settings::from_lookup(lookup(&[("PAGEWISE_MODE", "infinite")])).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidValue { .. }));
    }
}
