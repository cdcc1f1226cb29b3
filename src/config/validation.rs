use crate::config::types::{AuthConfig, Config, Filters, JobConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_job(&config.job)?;
    if let Some(auth) = &config.auth {
        validate_auth(auth)?;
    }
    validate_filters(&config.filters)?;
    Ok(())
}

/// Validates the job table
fn validate_job(job: &JobConfig) -> Result<(), ConfigError> {
    if job.url.is_empty() {
        return Err(ConfigError::Validation("url cannot be empty".to_string()));
    }

    let url = Url::parse(&job.url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid url '{}': {}", job.url, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "url must use http or https, got '{}'",
            url.scheme()
        )));
    }

    if job.directory.is_empty() {
        return Err(ConfigError::Validation(
            "directory cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the auth table
fn validate_auth(auth: &AuthConfig) -> Result<(), ConfigError> {
    if auth.username.is_empty() {
        return Err(ConfigError::Validation(
            "auth username cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates the filter lists
///
/// An empty string is a substring of every name, so an empty entry would
/// match everything and silently break classification.
fn validate_filters(filters: &Filters) -> Result<(), ConfigError> {
    let lists = [
        ("include-extensions", &filters.include_extensions),
        ("exclude-extensions", &filters.exclude_extensions),
        ("folder-markers", &filters.folder_markers),
        ("skip-substrings", &filters.skip_substrings),
    ];

    for (name, values) in lists {
        if values.iter().any(|v| v.is_empty()) {
            return Err(ConfigError::Validation(format!(
                "{} entries cannot be empty strings",
                name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> Config {
        Config {
            job: JobConfig {
                url: "https://example.com/data/".to_string(),
                directory: "./mirror".to_string(),
            },
            auth: None,
            filters: Filters::default(),
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&create_test_config()).is_ok());
    }

    #[test]
    fn test_empty_url_rejected() {
        let mut config = create_test_config();
        config.job.url = String::new();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_unparseable_url_rejected() {
        let mut config = create_test_config();
        config.job.url = "not a url".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_non_http_scheme_rejected() {
        let mut config = create_test_config();
        config.job.url = "ftp://example.com/data/".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_http_scheme_accepted() {
        let mut config = create_test_config();
        config.job.url = "http://example.com/data/".to_string();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_directory_rejected() {
        let mut config = create_test_config();
        config.job.directory = String::new();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_auth_username_rejected() {
        let mut config = create_test_config();
        config.auth = Some(AuthConfig {
            username: String::new(),
            password: "secret".to_string(),
        });
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_empty_auth_password_accepted() {
        let mut config = create_test_config();
        config.auth = Some(AuthConfig {
            username: "user".to_string(),
            password: String::new(),
        });
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_empty_filter_entry_rejected() {
        let mut config = create_test_config();
        config.filters.exclude_extensions.push(String::new());
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }
}
