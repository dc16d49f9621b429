use std::path::Path;

use figkit_lib::{extract_file_key, extract_node_id};
use figkit_lib::{Config, FigmaAuth, FigmaClient, FigmaError};

pub fn load_config(path: Option<&Path>) -> Result<Config, FigmaError> {
    let cfg = if let Some(p) = path {
        Config::from_toml_file(p).map_err(|e| {
            FigmaError::Config(format!("Failed to read config {}: {}", p.display(), e))
        })?
    } else {
        Config::default()
    };

    cfg.validate()
        .map_err(|e| FigmaError::Config(format!("Invalid config: {}", e)))?;
    Ok(cfg)
}

/// `--token` first, then the environment.
pub fn resolve_auth(flag: Option<&str>) -> Result<FigmaAuth, FigmaError> {
    if let Some(token) = flag.filter(|t| !t.trim().is_empty()) {
        return Ok(FigmaAuth::PersonalToken(token.to_string()));
    }
    FigmaAuth::from_env().ok_or_else(|| {
        FigmaError::Config(
            "No Figma token: pass --token or set FIGMA_TOKEN / FIGMA_OAUTH_TOKEN".to_string(),
        )
    })
}

pub fn build_client(
    config_path: Option<&Path>,
    token: Option<&str>,
) -> Result<FigmaClient, FigmaError> {
    let config = load_config(config_path)?;
    let auth = resolve_auth(token)?;
    FigmaClient::new(config.client_config(auth)?)
}

/// File key and optional node id from a Figma link or a bare key.
pub fn resolve_target(target: &str) -> Result<(String, Option<String>), FigmaError> {
    let trimmed = target.trim();
    if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Ok((trimmed.to_string(), None));
    }
    let key = extract_file_key(trimmed)?;
    Ok((key, extract_node_id(trimmed)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn bare_keys_and_links_resolve() {
        assert_eq!(resolve_target("AbC123").unwrap(), ("AbC123".to_string(), None));
        assert_eq!(
            resolve_target("https://www.figma.com/design/AbC123/Site?node-id=4-5").unwrap(),
            ("AbC123".to_string(), Some("4:5".to_string()))
        );
        assert!(matches!(
            resolve_target("https://example.com/nope"),
            Err(FigmaError::InvalidFigmaUrl(_))
        ));
    }

    #[test]
    fn token_flag_wins() {
        let auth = resolve_auth(Some("figd_flag")).unwrap();
        assert_eq!(auth, FigmaAuth::PersonalToken("figd_flag".into()));
    }

    #[test]
    fn load_config_reports_invalid_values() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("figkit.toml");
        std::fs::write(&path, "[retry]\nmax_retries = 0\n").expect("write config");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Invalid config"));

        let missing = dir.path().join("absent.toml");
        let err = load_config(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("Failed to read config"));
    }
}
