//! java-to-ruby - Convert an OpenShift JBoss AS7 application to TorqueBox

use anyhow::Result;
use clap::Parser;
use convert_core::config::ExtensionSet;
use convert_core::templates::{Template, WritePolicy};
use convert_core::tui::ConvertArgs;
use convert_core::TargetConfig;
use std::ffi::OsString;
use std::path::Path;

/// Name used when the executable's own file name can't be determined
const DEFAULT_BIN_NAME: &str = "java-to-ruby";

/// TorqueBox on OpenShift target configuration
#[derive(Clone)]
pub struct TorqueBoxTarget;

impl TargetConfig for TorqueBoxTarget {
    fn display_name(&self) -> &'static str {
        "java-to-ruby (TorqueBox on OpenShift)"
    }

    fn extension_set(&self) -> ExtensionSet {
        ExtensionSet::torquebox()
    }

    fn build_script(&self) -> Template {
        Template {
            path: ".openshift/action_hooks/build",
            contents: include_str!("../templates/build"),
            policy: WritePolicy::Always,
            executable: true,
        }
    }

    fn web_entry(&self) -> Template {
        Template {
            path: "config.ru",
            contents: include_str!("../templates/config.ru"),
            policy: WritePolicy::IfAbsent,
            executable: false,
        }
    }

    fn ignore_entry(&self) -> String {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.file_name().map(|name| name.to_string_lossy().into_owned()))
            .unwrap_or_else(|| DEFAULT_BIN_NAME.to_string())
    }

    fn commit_message(&self) -> &'static str {
        "converted to torquebox."
    }

    fn home_env(&self) -> &'static str {
        "TORQUEBOX_HOME"
    }

    fn min_jruby_version(&self) -> &'static str {
        "1.6.5"
    }

    fn next_steps(&self, dir: &Path, rails_app: bool) -> Vec<String> {
        let mut steps = Vec::new();
        let current = std::env::current_dir().ok();

        if current.as_deref() != Some(dir) {
            steps.push(format!("cd {}", dir.display()));
        }

        if rails_app {
            steps.push("Review the generated Rails application".to_string());
        } else {
            steps.push("Add your Rack application to config.ru".to_string());
        }

        steps.push("git push to deploy on OpenShift".to_string());

        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "java-to-ruby")]
#[command(about = "Convert an OpenShift JBoss AS7 application into a TorqueBox Ruby application")]
#[command(version)]
pub struct Args {
    /// Don't stage or commit the converted files
    #[arg(long = "no-git")]
    pub no_git: bool,

    /// Generate a Rails application after converting (requires TORQUEBOX_HOME)
    #[arg(short = 'r', long = "setup-rails")]
    pub setup_rails: bool,
}

impl From<Args> for ConvertArgs {
    fn from(args: Args) -> Self {
        ConvertArgs {
            git: !args.no_git,
            setup_rails: args.setup_rails,
        }
    }
}

/// Accept the historical `-ng` spelling of `--no-git`
fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            if arg == "-ng" {
                OsString::from("--no-git")
            } else {
                arg
            }
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse_from(normalize_args(std::env::args_os()));
    let config = TorqueBoxTarget;

    let result = convert_core::run(&config, args.into()).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}
