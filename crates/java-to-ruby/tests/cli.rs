use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command as StdCommand;

const STANDALONE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<server xmlns="urn:jboss:domain:1.0">
    <extensions>
        <extension module="org.jboss.as.logging"/>
    </extensions>
    <profile>
        <subsystem xmlns="urn:jboss:domain:logging:1.0"/>
        <subsystem xmlns="urn:jboss:domain:deployment-scanner:1.0">
            <deployment-scanner name="default" path="deployments" scan-interval="5000" deployment-timeout="300"/>
        </subsystem>
    </profile>
</server>
"#;

fn jboss_app(root: &Path) {
    fs::create_dir_all(root.join(".openshift/config")).unwrap();
    fs::create_dir_all(root.join("src/main/java")).unwrap();
    fs::create_dir_all(root.join("deployments")).unwrap();
    fs::write(root.join("pom.xml"), "<project/>").unwrap();
    fs::write(root.join(".openshift/config/standalone.xml"), STANDALONE).unwrap();
    fs::write(root.join(".gitignore"), "target/").unwrap();
}

fn convert(root: &Path) -> assert_cmd::assert::Assert {
    Command::cargo_bin("java-to-ruby")
        .unwrap()
        .current_dir(root)
        .arg("-ng")
        .assert()
}

#[test]
fn test_converts_jboss_app() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    jboss_app(root);

    convert(root).success();

    assert!(!root.join("pom.xml").exists());
    assert!(!root.join("src").exists());
    assert!(!root.join("deployments").exists());
    assert!(root.join(".openshift/config/modules/.gitkeep").is_file());

    let xml = fs::read_to_string(root.join(".openshift/config/standalone.xml")).unwrap();
    assert!(xml.contains(r#"<extension module="org.torquebox.bootstrap"/>"#));
    assert!(xml.contains(r#"<subsystem xmlns="urn:jboss:domain:torquebox-web:1.0"/>"#));
    assert!(xml.contains(r#"deployment-timeout="1200""#));

    let build = fs::read_to_string(root.join(".openshift/action_hooks/build")).unwrap();
    assert!(build.contains("TORQUEBOX_BUILD=\"614\""));
    assert!(root.join("config.ru").is_file());

    let ignore = fs::read_to_string(root.join(".gitignore")).unwrap();
    assert!(ignore.starts_with("target/\njava-to-ruby"));
}

#[test]
fn test_second_run_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    jboss_app(root);
    fs::write(root.join("config.ru"), "run MyApp").unwrap();

    convert(root).success();
    let xml_first = fs::read(root.join(".openshift/config/standalone.xml")).unwrap();
    let ignore_first = fs::read(root.join(".gitignore")).unwrap();

    convert(root).success();

    assert_eq!(
        fs::read(root.join(".openshift/config/standalone.xml")).unwrap(),
        xml_first
    );
    assert_eq!(fs::read(root.join(".gitignore")).unwrap(), ignore_first);
    assert_eq!(fs::read_to_string(root.join("config.ru")).unwrap(), "run MyApp");
}

#[test]
fn test_missing_standalone_xml_fails() {
    let dir = tempfile::tempdir().unwrap();

    convert(dir.path())
        .failure()
        .stderr(predicate::str::contains("standalone.xml"));
}

#[test]
fn test_missing_extensions_leaves_file_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join(".openshift/config")).unwrap();
    let original = "<server>\n  <profile/>\n</server>\n";
    fs::write(root.join(".openshift/config/standalone.xml"), original).unwrap();

    convert(root).failure();

    assert_eq!(
        fs::read_to_string(root.join(".openshift/config/standalone.xml")).unwrap(),
        original
    );
}

#[test]
fn test_rails_requires_torquebox_home() {
    let dir = tempfile::tempdir().unwrap();
    jboss_app(dir.path());

    Command::cargo_bin("java-to-ruby")
        .unwrap()
        .current_dir(dir.path())
        .env_remove("TORQUEBOX_HOME")
        .args(["--no-git", "--setup-rails"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TORQUEBOX_HOME"));
}

fn git(root: &Path, args: &[&str]) -> String {
    let output = StdCommand::new("git")
        .args(args)
        .current_dir(root)
        .output()
        .unwrap();
    assert!(output.status.success(), "git {:?} failed", args);
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_default_run_commits_conversion() {
    let git_available = StdCommand::new("git")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false);
    if !git_available {
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    jboss_app(root);
    git(root, &["init", "-q"]);
    git(root, &["config", "user.email", "dev@example.com"]);
    git(root, &["config", "user.name", "Dev"]);

    Command::cargo_bin("java-to-ruby")
        .unwrap()
        .current_dir(root)
        .assert()
        .success();

    assert_eq!(
        git(root, &["log", "-1", "--format=%s"]).trim(),
        "converted to torquebox."
    );

    let tracked = git(root, &["ls-files"]);
    assert!(tracked.lines().any(|line| line == "config.ru"));
    assert!(tracked.lines().any(|line| line == ".openshift/config/standalone.xml"));
    assert!(tracked.lines().any(|line| line == ".openshift/action_hooks/build"));
    assert!(tracked.lines().any(|line| line == ".openshift/config/modules/.gitkeep"));
}
