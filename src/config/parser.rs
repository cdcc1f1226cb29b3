use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// The built-in filter values (parent-directory marker, skip defaults) are
/// folded into the parsed filter lists before the config is returned.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use dirmirror::config::load_config;
///
/// let config = load_config(Path::new("mirror.toml")).unwrap();
/// println!("Mirroring: {}", config.job.url);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let mut config: Config = toml::from_str(&content)?;

    // Validate the configuration
    validate(&config)?;

    config.filters = config.filters.with_builtins();

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_valid_config() {
        let config_content = r#"
[job]
url = "https://example.com/datasets/v1.0/"
directory = "./mirror"

[auth]
username = "user"
password = "pass"

[filters]
include-extensions = [".edf"]
exclude-extensions = [".html"]
folder-markers = ["v1.0"]
skip-substrings = ["/?"]
download-html = false
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.job.url, "https://example.com/datasets/v1.0/");
        assert_eq!(config.job.directory, "./mirror");
        assert_eq!(config.auth.as_ref().unwrap().username, "user");
        assert_eq!(config.filters.include_extensions, vec![".edf"]);
        assert_eq!(config.filters.folder_markers, vec!["../", "v1.0"]);
        assert_eq!(config.filters.skip_substrings, vec!["../", "mailto:", "/?"]);
        assert!(!config.filters.download_html);
    }

    #[test]
    fn test_load_minimal_config_applies_defaults() {
        let config_content = r#"
[job]
url = "https://example.com/data/"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.job.directory, "./");
        assert!(config.auth.is_none());
        assert!(config.filters.is_catch_all());
        assert_eq!(config.filters.folder_markers, vec!["../"]);
        assert_eq!(config.filters.skip_substrings, vec!["../", "mailto:"]);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/mirror.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let config_content = "this is not valid TOML {{{";
        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_missing_url() {
        let config_content = r#"
[job]
directory = "./mirror"
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = r#"
[job]
url = "ftp://example.com/data/"
"#;

        let file = create_temp_config(config_content);
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
