//! Detection of the command-line tools the conversion shells out to

use super::version::extract_version;
use anyhow::Result;
use std::fmt;
use std::process::Command;

/// External tools used by the version-control and Rails steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Git,
    JRuby,
    Bundler,
}

impl Tool {
    pub fn display_name(&self) -> &'static str {
        match self {
            Tool::Git => "Git",
            Tool::JRuby => "JRuby",
            Tool::Bundler => "Bundler",
        }
    }

    /// Executable looked up on `PATH`
    pub fn program(&self) -> &'static str {
        match self {
            Tool::Git => "git",
            Tool::JRuby => "jruby",
            Tool::Bundler => "bundle",
        }
    }

    fn install_hint(&self) -> &'static str {
        match self {
            Tool::Git => "Git (install from https://git-scm.com)",
            Tool::JRuby => "JRuby (install from https://www.jruby.org)",
            Tool::Bundler => "Bundler (jruby -S gem install bundler)",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Tool detection result
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

/// Check whether `tool --version` runs successfully
pub fn check_tool(tool: Tool) -> RuntimeInfo {
    let output = Command::new(tool.program()).arg("--version").output();

    match output {
        Ok(out) if out.status.success() => {
            let text = String::from_utf8_lossy(&out.stdout);
            RuntimeInfo {
                name: tool.display_name(),
                version: extract_version(&text).or_else(|| Some(text.trim().to_string())),
                available: true,
            }
        }
        _ => RuntimeInfo {
            name: tool.display_name(),
            version: None,
            available: false,
        },
    }
}

/// Check tools with no advisory entries (strict mode - fail on any missing).
pub fn check_runtimes(tools: &[Tool]) -> Result<Vec<RuntimeInfo>> {
    check_runtimes_with_advisory(tools, &[])
}

/// Check tools; tools in `advisory` get availability reported but don't cause failure.
pub fn check_runtimes_with_advisory(
    tools: &[Tool],
    advisory: &[Tool],
) -> Result<Vec<RuntimeInfo>> {
    check_with(tools, advisory, check_tool)
}

fn check_with(
    tools: &[Tool],
    advisory: &[Tool],
    probe: impl Fn(Tool) -> RuntimeInfo,
) -> Result<Vec<RuntimeInfo>> {
    let mut results = Vec::new();
    let mut missing = Vec::new();

    for tool in tools {
        let info = probe(*tool);
        if info.available || advisory.contains(tool) {
            results.push(info);
        } else {
            missing.push(tool.install_hint());
        }
    }

    if !missing.is_empty() {
        anyhow::bail!(
            "Missing required tools:\n{}",
            missing
                .iter()
                .map(|m| format!("  - {}", m))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    Ok(results)
}
