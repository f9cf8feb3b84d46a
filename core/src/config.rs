use crate::error::ConfigError;


pub const DEFAULT_STATUSES: [&str; 5] = ["Queue", "In Progress", "Past Due", "Blocked", "Completed"];
pub const DEFAULT_STATUS_PROP: &str = "Status";
pub const DEFAULT_API_URL: &str = "https://api.notion.com";
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";
pub const MAX_PAGE_SIZE: usize = 100;
pub const DEFAULT_MAX_PAGES: usize = 100;


/// Process-wide settings, read once at startup and shared read-only between requests.
///
/// `notion_token` and `database_id` are optional here on purpose: a deployment
/// without them still boots and answers every request with a 500, after the
/// shared key check has run.
#[derive(Debug, Clone)]
pub struct Config {
    pub notion_token: Option<String>,
    pub database_id: Option<String>,
    pub status_prop: String,
    pub shared_key: Option<String>,
    pub statuses: Vec<String>,
    pub api_url: String,
    pub notion_version: String,
    pub page_size: usize,
    pub max_pages: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notion_token: None,
            database_id: None,
            status_prop: DEFAULT_STATUS_PROP.to_string(),
            shared_key: None,
            statuses: DEFAULT_STATUSES.iter().map(|s| s.to_string()).collect(),
            api_url: DEFAULT_API_URL.to_string(),
            notion_version: DEFAULT_NOTION_VERSION.to_string(),
            page_size: MAX_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from any variable source. Empty values count as unset;
    /// whitespace is kept as given.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let page_size = parse_positive("PAGE_SIZE", get("PAGE_SIZE"), defaults.page_size)?
            .min(MAX_PAGE_SIZE);
        let max_pages = parse_positive("MAX_PAGES", get("MAX_PAGES"), defaults.max_pages)?;

        Ok(Self {
            notion_token: get("NOTION_TOKEN"),
            database_id: get("DATABASE_ID"),
            status_prop: get("STATUS_PROP").unwrap_or(defaults.status_prop),
            shared_key: get("SHARED_KEY"),
            statuses: get("STATUSES")
                .map(|raw| parse_statuses(&raw))
                .filter(|list| !list.is_empty())
                .unwrap_or(defaults.statuses),
            api_url: get("NOTION_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_url),
            notion_version: get("NOTION_VERSION").unwrap_or(defaults.notion_version),
            page_size,
            max_pages,
        })
    }

    /// Both credentials, or `None` if either is missing.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.notion_token, &self.database_id) {
            (Some(token), Some(id)) => Some((token.as_str(), id.as_str())),
            _ => None,
        }
    }
}

/// Comma separated, order kept, blanks and repeats dropped.
pub fn parse_statuses(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for label in raw.split(',').map(str::trim).filter(|l| !l.is_empty()) {
        if !out.iter().any(|existing| existing == label) {
            out.push(label.to_string());
        }
    }
    out
}

fn parse_positive(var: &'static str, value: Option<String>, default: usize) -> Result<usize, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };
    let n: usize = value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber { var, value: value.clone() })?;
    if n == 0 {
        return Err(ConfigError::Zero(var));
    }
    Ok(n)
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.status_prop, "Status");
        assert_eq!(config.statuses, DEFAULT_STATUSES);
        assert_eq!(config.page_size, 100);
        assert_eq!(config.max_pages, DEFAULT_MAX_PAGES);
        assert!(config.shared_key.is_none());
        assert!(config.credentials().is_none());
    }

    #[test]
    fn empty_values_are_unset() {
        let config = config_from(&[("SHARED_KEY", ""), ("NOTION_TOKEN", ""), ("DATABASE_ID", "db")]).unwrap();

        assert!(config.shared_key.is_none());
        assert!(config.credentials().is_none());
    }

    #[test]
    fn whitespace_shared_key_is_still_a_key() {
        let config = config_from(&[("SHARED_KEY", "   ")]).unwrap();
        assert_eq!(config.shared_key.as_deref(), Some("   "));
    }

    #[test]
    fn credentials_need_both_values() {
        let config = config_from(&[("NOTION_TOKEN", "secret"), ("DATABASE_ID", "db")]).unwrap();
        assert_eq!(config.credentials(), Some(("secret", "db")));
    }

    #[test]
    fn overrides_are_applied() {
        let config = config_from(&[
            ("STATUS_PROP", "Stage"),
            ("STATUSES", "Todo, Done ,,Todo"),
            ("NOTION_API_URL", "http://localhost:9000/"),
            ("PAGE_SIZE", "500"),
            ("MAX_PAGES", "3"),
        ])
        .unwrap();

        assert_eq!(config.status_prop, "Stage");
        assert_eq!(config.statuses, vec!["Todo", "Done"]);
        assert_eq!(config.api_url, "http://localhost:9000");
        assert_eq!(config.page_size, MAX_PAGE_SIZE);
        assert_eq!(config.max_pages, 3);
    }

    #[test]
    fn bad_numbers_fail_startup() {
        assert!(matches!(
            config_from(&[("MAX_PAGES", "lots")]),
            Err(ConfigError::InvalidNumber { var: "MAX_PAGES", .. })
        ));
        assert!(matches!(config_from(&[("PAGE_SIZE", "0")]), Err(ConfigError::Zero("PAGE_SIZE"))));
    }

    #[test]
    fn blank_status_list_falls_back_to_defaults() {
        let config = config_from(&[("STATUSES", " , ,")]).unwrap();
        assert_eq!(config.statuses, DEFAULT_STATUSES);
    }
}
