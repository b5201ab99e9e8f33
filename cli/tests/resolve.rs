use std::path::Path;

use anyhow::Result;
use pretty_assertions::assert_eq;
use serde_json::Value;
use serde_json::json;
use tempfile::TempDir;

fn oj_command(home: &Path) -> Result<assert_cmd::Command> {
    let mut cmd = assert_cmd::Command::cargo_bin("oj")?;
    cmd.env("OJ_HOME", home);
    Ok(cmd)
}

fn resolve(home: &Path, args: &[&str]) -> Result<Value> {
    let output = oj_command(home)?.arg("resolve").args(args).output()?;
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    Ok(serde_json::from_slice(&output.stdout)?)
}

#[test]
fn anonymous_visitor_is_sent_to_login() -> Result<()> {
    let home = TempDir::new()?;
    let value = resolve(home.path(), &["/user", "--anonymous"])?;
    assert_eq!(value["rule"], json!("auth-gate"));
    assert_eq!(value["outcome"], json!({"kind": "redirect", "path": "/login"}));
    assert_eq!(value["route"], json!("UserHome"));
    Ok(())
}

#[test]
fn student_problem_link_is_virtualized() -> Result<()> {
    let home = TempDir::new()?;
    let value = resolve(home.path(), &["/problems/42", "--role", "0", "--from", "/user"])?;
    assert_eq!(value["rule"], json!("virtualize"));
    assert_eq!(
        value["outcome"],
        json!({
            "kind": "redirect",
            "path": "/user",
            "query": {"component": "problem-detail", "problemId": "42"},
        })
    );
    Ok(())
}

#[test]
fn embedded_detail_origin_cancels() -> Result<()> {
    let home = TempDir::new()?;
    let value = resolve(
        home.path(),
        &[
            "/problems/42",
            "--role",
            "2",
            "--from",
            "/admin?component=problem-detail&problemId=42",
        ],
    )?;
    assert_eq!(value["rule"], json!("loop-breaker"));
    assert_eq!(value["outcome"], json!({"kind": "cancel"}));
    Ok(())
}

#[test]
fn role_and_anonymous_conflict() -> Result<()> {
    let home = TempDir::new()?;
    oj_command(home.path())?
        .args(["resolve", "/admin", "--role", "2", "--anonymous"])
        .assert()
        .failure();
    Ok(())
}

#[test]
fn routes_lists_default_table() -> Result<()> {
    let home = TempDir::new()?;
    let output = oj_command(home.path())?.arg("routes").output()?;
    assert!(output.status.success());
    let table: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(table["fallback"], json!("/login"));
    let names: Vec<&str> = table["routes"]
        .as_array()
        .map(|routes| routes.iter().filter_map(|r| r["name"].as_str()).collect())
        .unwrap_or_default();
    assert!(names.contains(&"AdminProblemTestcases"));
    Ok(())
}
