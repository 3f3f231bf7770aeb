//! Version comparison for locally installed tools

use anyhow::Result;
use semver::Version;

/// Compare an installed tool version against the minimum the target expects
/// Returns a warning message if the installed version is older
pub fn check_minimum(tool: &str, installed: &str, required: &str) -> Option<String> {
    let installed_ver = match parse_version(installed) {
        Ok(v) => v,
        Err(_) => return None, // Can't compare, skip warning
    };

    let required_ver = match parse_version(required) {
        Ok(v) => v,
        Err(_) => return None, // Can't compare, skip warning
    };

    if installed_ver < required_ver {
        Some(format!(
            "Warning: The build hook deploys {} {}.\n\
             You are running version {} locally.\n\
             Generated code may not match the deployed runtime.",
            tool, required, installed
        ))
    } else {
        None
    }
}

/// Parse version string, handling various formats
///
/// Accepts a leading `v` and two-component versions such as `1.6`.
pub fn parse_version(version_str: &str) -> Result<Version> {
    let cleaned = version_str.trim();
    let cleaned = cleaned.strip_prefix('v').unwrap_or(cleaned);
    let padded = match cleaned.matches('.').count() {
        0 => format!("{}.0.0", cleaned),
        1 => format!("{}.0", cleaned),
        _ => cleaned.to_string(),
    };
    Version::parse(&padded).map_err(|e| anyhow::anyhow!("Invalid version '{}': {}", version_str, e))
}

/// Pull the first version-looking token out of `--version` output
///
/// `jruby 1.6.5 (ruby-1.8.7-p330) ...` yields `1.6.5`,
/// `Bundler version 1.0.21` yields `1.0.21`.
pub fn extract_version(output: &str) -> Option<String> {
    output
        .split_whitespace()
        .map(|token| token.trim_start_matches('v'))
        .find(|token| token.starts_with(|c: char| c.is_ascii_digit()))
        .map(|token| {
            token
                .chars()
                .take_while(|c| c.is_ascii_digit() || *c == '.')
                .collect::<String>()
                .trim_end_matches('.')
                .to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_installed_older_than_required() {
        let warning = check_minimum("JRuby", "1.6.4", "1.6.5");
        assert!(warning.is_some());
        assert!(warning.unwrap().contains("1.6.5"));
    }

    #[test]
    fn test_installed_same_as_required() {
        assert!(check_minimum("JRuby", "1.6.5", "1.6.5").is_none());
    }

    #[test]
    fn test_installed_newer_than_required() {
        assert!(check_minimum("JRuby", "1.7.0", "1.6.5").is_none());
    }

    #[test]
    fn test_invalid_versions() {
        // Should return None (no warning) for invalid versions
        assert!(check_minimum("JRuby", "dev", "1.6.5").is_none());
    }

    #[test]
    fn test_parse_short_versions() {
        assert_eq!(parse_version("1.6").unwrap(), Version::new(1, 6, 0));
        assert_eq!(parse_version("v2").unwrap(), Version::new(2, 0, 0));
    }

    #[test]
    fn test_extract_version_from_tool_output() {
        assert_eq!(
            extract_version("jruby 1.6.5 (ruby-1.8.7-p330) (2011-10-25 9dcd388) (Java HotSpot(TM))"),
            Some("1.6.5".to_string())
        );
        assert_eq!(
            extract_version("Bundler version 1.0.21"),
            Some("1.0.21".to_string())
        );
        assert_eq!(
            extract_version("git version 2.39.2."),
            Some("2.39.2".to_string())
        );
        assert_eq!(extract_version("no digits here"), None);
    }
}
