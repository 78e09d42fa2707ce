//! Parsing of Kubernetes duration strings.

use anyhow::{anyhow, Result};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

static DURATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<number>\d+)(?P<unit>[smhd])$")
        .expect("Failed to compile duration regex - this should never happen")
});

/// Parse a duration such as `30s`, `1m`, `5m`, `1h` or `1d`
///
/// # Errors
/// Returns an error for empty input, an unknown unit, or a zero amount.
pub fn parse_kubernetes_duration(duration_str: &str) -> Result<Duration> {
    let trimmed = duration_str.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("Duration string cannot be empty"));
    }

    let lower = trimmed.to_lowercase();
    let captures = DURATION_REGEX.captures(&lower).ok_or_else(|| {
        anyhow!(
            "Invalid duration format '{trimmed}'. Expected format: <number><unit> (e.g., '30s', '1m', '1h')"
        )
    })?;

    let number: u64 = captures["number"]
        .parse()
        .map_err(|e| anyhow!("Invalid duration number in '{trimmed}': {e}"))?;
    if number == 0 {
        return Err(anyhow!(
            "Duration number must be greater than 0, got '{trimmed}'"
        ));
    }

    let multiplier = match &captures["unit"] {
        "s" => 1,
        "m" => 60,
        "h" => 3600,
        _ => 86400,
    };
    let seconds = number
        .checked_mul(multiplier)
        .ok_or_else(|| anyhow!("Duration '{trimmed}' is too large"))?;

    Ok(Duration::from_secs(seconds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_kubernetes_duration("30s").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_kubernetes_duration("1m").unwrap(), Duration::from_secs(60));
        assert_eq!(parse_kubernetes_duration(" 2H ").unwrap(), Duration::from_secs(7200));
        assert_eq!(parse_kubernetes_duration("1d").unwrap(), Duration::from_secs(86400));
    }

    #[test]
    fn test_parse_rejects_invalid() {
        for input in ["", "0s", "1w", "m", "1.5m", "-1m"] {
            assert!(
                parse_kubernetes_duration(input).is_err(),
                "expected '{input}' to be rejected"
            );
        }
    }
}
