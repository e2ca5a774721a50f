use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use expectrl::{spawn, Eof};
use std::fs;
use tempfile::TempDir;

/// Command with the config pointed at an empty temp dir so the user's own
/// settings never leak into a run.
fn portfolio(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("portfolio").unwrap();
    cmd.env("PORTFOLIO_CONFIG", dir.path().join("config.toml"));
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{output:?}");
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn print_renders_every_section() {
    let dir = TempDir::new().unwrap();
    let out = stdout_of(portfolio(&dir).args(["print", "--width", "100"]));

    for heading in [
        "Prathamesh Jadhav",
        "Skills & Expertise",
        "Combined Experience",
        "Projects & Case Studies",
        "Certifications",
    ] {
        assert!(out.contains(heading), "missing {heading}");
    }
    let dots = out
        .lines()
        .find(|line| line.contains('●'))
        .expect("indicator row");
    assert_eq!(dots.matches('●').count(), 14);
}

#[test]
fn view_without_tty_falls_back_to_print() {
    let dir = TempDir::new().unwrap();
    let out = stdout_of(portfolio(&dir).env("COLUMNS", "80"));
    assert!(out.contains("Combined Experience"));
}

#[test]
fn content_file_replaces_builtin_page() {
    let dir = TempDir::new().unwrap();
    let content = dir.path().join("me.toml");
    fs::write(
        &content,
        r#"
name = "Ada Lovelace"
initials = "AL"
role = "Analyst"
tagline = "writes programs."
footer = "(c) Ada"

[employment]
title = "Engines"
experiences = ["Notes on the engine", "First program", "Bernoulli numbers"]
"#,
    )
    .unwrap();

    let out = stdout_of(portfolio(&dir).arg("print").arg("--content").arg(&content));
    assert!(out.contains("Ada Lovelace"));
    assert!(!out.contains("Prathamesh"));
    let dots = out.lines().find(|line| line.contains('●')).unwrap();
    assert_eq!(dots.matches('●').count(), 3);
}

#[test]
fn content_without_experiences_is_rejected() {
    let dir = TempDir::new().unwrap();
    let content = dir.path().join("broken.toml");
    fs::write(
        &content,
        "name = \"x\"\ninitials = \"x\"\nrole = \"x\"\ntagline = \"x\"\nfooter = \"x\"\n\n[employment]\ntitle = \"x\"\n",
    )
    .unwrap();

    let output = portfolio(&dir)
        .arg("print")
        .arg("--content")
        .arg(&content)
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("experiences"), "{stderr}");
}

#[test]
fn config_json_reports_path_and_overrides() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("custom.toml");
    fs::write(&config, "card_width = 30\nsnap = false\n").unwrap();

    let out = stdout_of(
        portfolio(&dir)
            .arg("config")
            .arg("--json")
            .arg("--config")
            .arg(&config)
            .arg("--light"),
    );
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["path"], config.display().to_string());
    assert_eq!(value["settings"]["card_width"], 30);
    assert_eq!(value["settings"]["snap"], false);
    assert_eq!(value["settings"]["nudge_increment"], 44);
    assert_eq!(value["settings"]["theme"], "light");
}

#[test]
fn invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("config.toml"), "card_width = 0\n").unwrap();
    let output = portfolio(&dir).arg("print").output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("card_width"), "{stderr}");
}

#[test]
fn tui_quits_on_q() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    std::env::set_var("PORTFOLIO_CONFIG", dir.path().join("config.toml"));

    let bin = cargo_bin("portfolio");
    let cmd_str = format!("{} view", bin.display());

    let mut p = spawn(cmd_str.as_str())?;

    // Give program moment then send 'q'
    p.send("q")?;
    p.expect(Eof)?;

    Ok(())
}
