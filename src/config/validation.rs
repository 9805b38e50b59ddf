use crate::config::types::{Config, CrawlerConfig, SelectorConfig, UserAgentConfig};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
///
/// Every check here runs before the first node is visited; a failure halts
/// the process.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_selectors(&config.selectors)?;
    validate_user_agent_config(&config.user_agent)?;

    if config.output.root_path.is_empty() {
        return Err(ConfigError::Validation(
            "root_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates crawl behavior settings
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let seed = Url::parse(&config.seed_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed-url: {}", e)))?;

    if seed.scheme() != "http" && seed.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "seed-url must be http or https, got scheme '{}'",
            seed.scheme()
        )));
    }

    if seed.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(
            "seed-url has no host".to_string(),
        ));
    }

    // max_depth >= 0 is always true for u32, so no check needed

    if config.request_delay_ms > 60_000 {
        return Err(ConfigError::Validation(format!(
            "request_delay_ms must be <= 60000, got {}",
            config.request_delay_ms
        )));
    }

    if let Some(section_id) = &config.section_id {
        if section_id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "section-id cannot be blank when set".to_string(),
            ));
        }
    }

    for id in &config.target_ids {
        if id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "target-ids entries cannot be blank".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates that every configured CSS selector compiles
fn validate_selectors(config: &SelectorConfig) -> Result<(), ConfigError> {
    for (name, selector) in [
        ("link", &config.link),
        ("item-list", &config.item_list),
        ("item", &config.item),
        ("content", &config.content),
    ] {
        Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
            selector: format!("{} = {}", name, selector),
            message: e.to_string(),
        })?;
    }
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Basic shape check for the contact email
fn validate_email(email: &str) -> Result<(), ConfigError> {
    let valid = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
    });
    if valid {
        Ok(())
    } else {
        Err(ConfigError::Validation(format!(
            "contact_email is not a valid email address: '{}'",
            email
        )))
    }
}
