use anyhow::{anyhow, Result};

pub fn validate_redis_url(value: &str) -> Result<()> {
    let value = value.trim();
    if !(value.starts_with("redis://")
        || value.starts_with("rediss://")
        || value.starts_with("unix://")
        || value.starts_with("redis+unix://"))
    {
        return Err(anyhow!("redis_url must use redis://, rediss:// or unix://"));
    }
    Ok(())
}

/// Slack channel names: lowercase, no leading `#`, at most 80 characters.
pub fn validate_channel_name(value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(anyhow!("channel_name must not be empty"));
    }
    if value.starts_with('#') {
        return Err(anyhow!("channel_name must not start with '#'"));
    }
    if value.chars().count() > 80 {
        return Err(anyhow!("channel_name is longer than 80 characters"));
    }
    if value
        .chars()
        .any(|ch| ch.is_whitespace() || ch.is_uppercase())
    {
        return Err(anyhow!("channel_name must be lowercase without spaces"));
    }
    Ok(())
}

pub fn validate_base_url(name: &str, value: &str) -> Result<()> {
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return Err(anyhow!("{} must be an http(s) URL", name));
    }
    Ok(())
}
