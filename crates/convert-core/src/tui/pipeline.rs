//! Console-driven conversion pipeline using cliclack

use crate::cleanup;
use crate::config::{transform_file, TransformOutcome};
use crate::ignore_list;
use crate::rails::RailsSetup;
use crate::runtime::check::{self, Tool};
use crate::runtime::process::describe;
use crate::runtime::version;
use crate::target::TargetConfig;
use crate::templates::{self, Emitted};
use crate::vcs::Git;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

/// Options for one conversion run
#[derive(Debug, Clone)]
pub struct ConvertArgs {
    /// Stage and commit the converted application
    pub git: bool,

    /// Generate a Rails application after converting
    pub setup_rails: bool,
}

impl Default for ConvertArgs {
    fn default() -> Self {
        Self {
            git: true,
            setup_rails: false,
        }
    }
}

/// Convert the application in the current directory
pub async fn run<C: TargetConfig>(config: &C, args: ConvertArgs) -> Result<()> {
    let root = std::env::current_dir().context("Failed to determine the current directory")?;
    run_in(config, &root, args).await
}

/// Convert the application rooted at `root`
pub async fn run_in<C: TargetConfig>(config: &C, root: &Path, args: ConvertArgs) -> Result<()> {
    cliclack::intro(config.display_name())?;
    cliclack::log::info(format!("Converting {}", root.display()))?;

    // Step 1: Remove the Java build
    remove_java_artifacts(config, root)?;

    // Step 2: Server modules directory
    let modules = cleanup::ensure_modules_dir(root, config.modules_dir())?;
    cliclack::log::success(format!("Prepared {}", relative(root, &modules)))?;

    // Step 3: Server configuration
    transform_config(config, root)?;

    // Step 4: Build hook and web entrypoint
    emit_payloads(config, root).await?;

    // Step 5: Keep the converter out of version control
    let ignore_path = root.join(config.ignore_file());
    if ignore_list::ensure_listed(&ignore_path, &config.ignore_entry())? {
        cliclack::log::success(format!(
            "Added {} to {}",
            config.ignore_entry(),
            config.ignore_file()
        ))?;
    }

    // Step 6: Conversion commit
    let git = if args.git {
        commit_conversion(config, root).await?
    } else {
        None
    };

    // Step 7: Rails application
    if args.setup_rails {
        setup_rails(config, root, git.as_ref()).await?;
    }

    print_next_steps(config, root, args.setup_rails)?;

    Ok(())
}

fn remove_java_artifacts<C: TargetConfig>(config: &C, root: &Path) -> Result<()> {
    let removed = cleanup::remove_java_artifacts(root, config.java_artifacts())?;

    if removed.is_empty() {
        cliclack::log::info("No Java build files to remove")?;
    } else {
        let names: Vec<String> = removed.iter().map(|p| relative(root, p)).collect();
        cliclack::log::success(format!("Removed {}", names.join(", ")))?;
    }

    Ok(())
}

fn transform_config<C: TargetConfig>(config: &C, root: &Path) -> Result<()> {
    let path = root.join(config.standalone_xml());
    let spinner = cliclack::spinner();
    spinner.start(format!("Updating {}...", config.standalone_xml()));

    match transform_file(&path, &config.extension_set()) {
        Ok(TransformOutcome::AlreadyConverted) => {
            spinner.stop(format!("{} already converted", config.standalone_xml()));
            Ok(())
        }
        Ok(TransformOutcome::Mutated {
            extensions_added,
            profiles_updated,
        }) => {
            spinner.stop(format!(
                "Added {} extensions to {} ({} profiles updated)",
                extensions_added,
                config.standalone_xml(),
                profiles_updated
            ));
            Ok(())
        }
        Err(e) => {
            spinner.error(format!("Failed to update {}", config.standalone_xml()));
            Err(e.into())
        }
    }
}

async fn emit_payloads<C: TargetConfig>(config: &C, root: &Path) -> Result<()> {
    let payloads = [config.build_script(), config.web_entry()];
    let emitted = templates::emit_templates(root, &payloads).await?;

    for (path, outcome) in emitted {
        match outcome {
            Emitted::Written => cliclack::log::success(format!("Wrote {}", path))?,
            Emitted::Skipped => cliclack::log::info(format!("Kept existing {}", path))?,
        }
    }

    Ok(())
}

/// Stage and commit the conversion; `None` when git is unavailable
async fn commit_conversion<C: TargetConfig>(config: &C, root: &Path) -> Result<Option<Git>> {
    let git_info = check::check_runtimes_with_advisory(&[Tool::Git], &[Tool::Git])?;
    if !git_info.iter().all(|info| info.available) {
        cliclack::log::warning("Git is not installed, skipping commit")?;
        return Ok(None);
    }

    let git = Git::new(root);
    for (path, status) in git.stage(config.staged_paths().as_slice()).await? {
        warn_on_failure(&format!("git add {}", path.display()), &status)?;
    }

    let status = git.commit_all(config.commit_message()).await?;
    if status.success() {
        cliclack::log::success(format!("Committed \"{}\"", config.commit_message()))?;
    } else {
        warn_on_failure("git commit", &status)?;
    }

    Ok(Some(git))
}

async fn setup_rails<C: TargetConfig>(config: &C, root: &Path, git: Option<&Git>) -> Result<()> {
    let home = std::env::var_os(config.home_env())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .with_context(|| {
            format!(
                "{} must be set to set up a Rails application",
                config.home_env()
            )
        })?;
    cliclack::log::info(format!("{}: {}", config.home_env(), home.display()))?;

    check_runtimes(config, git.is_some())?;

    let rails = RailsSetup::new(root, &home, &config.ignore_entry())?;

    let status = rails.install_rails().await?;
    warn_on_failure("gem install rails", &status)?;

    let status = rails.generate().await?;
    warn_on_failure("rails new", &status)?;

    let status = rails.bundle().await?;
    warn_on_failure("bundle install", &status)?;

    if let Some(git) = git {
        let entries = rails.stageable_entries()?;
        for (path, status) in git.stage(entries.as_slice()).await? {
            warn_on_failure(&format!("git add {}", path.display()), &status)?;
        }

        let status = git.commit_all(&rails.commit_message()).await?;
        warn_on_failure("git commit", &status)?;
    }

    cliclack::log::success(format!("Rails application {} ready", rails.app_name()))?;

    Ok(())
}

fn check_runtimes<C: TargetConfig>(config: &C, with_git: bool) -> Result<()> {
    let mut tools = vec![Tool::JRuby, Tool::Bundler];
    if with_git {
        tools.push(Tool::Git);
    }

    let spinner = cliclack::spinner();
    spinner.start("Checking runtimes...");

    match check::check_runtimes(&tools) {
        Ok(runtimes) => {
            let runtime_info: Vec<String> = runtimes
                .iter()
                .map(|r| {
                    format!("{} ({})", r.name, r.version.as_deref().unwrap_or("unknown"))
                })
                .collect();
            spinner.stop(format!("Detected runtimes: {}", runtime_info.join(", ")));

            let jruby = runtimes.iter().find(|r| r.name == Tool::JRuby.display_name());
            if let Some(installed) = jruby.and_then(|r| r.version.as_deref()) {
                if let Some(warning) =
                    version::check_minimum("JRuby", installed, config.min_jruby_version())
                {
                    cliclack::log::warning(warning)?;
                }
            }
            Ok(())
        }
        Err(e) => {
            spinner.stop("Missing runtimes");
            cliclack::log::error(format!("{}", e))?;
            anyhow::bail!("Please install the missing runtimes and try again.");
        }
    }
}

fn warn_on_failure(action: &str, status: &ExitStatus) -> Result<()> {
    if !status.success() {
        cliclack::log::warning(format!("`{}` failed ({})", action, describe(status)))?;
    }
    Ok(())
}

fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

fn print_next_steps<C: TargetConfig>(config: &C, root: &Path, rails_app: bool) -> Result<()> {
    let steps = config.next_steps(root, rails_app);

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Conversion complete")?;

    Ok(())
}
