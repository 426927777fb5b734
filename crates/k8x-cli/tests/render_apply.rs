//! Integration tests for `k8x render`.
//!
//! A shell script stands in for kubectl: it appends its arguments and the
//! manifest file it was given to `calls.log`, then prints a kubectl-like line.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

const CONFIGMAP_CHART: &str = "\
components:
  - apiVersion: v1
    kind: ConfigMap
    metadata:
      name: app
  - null
";

struct Fixture {
    home: TempDir,
    work: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            home: TempDir::new().unwrap(),
            work: TempDir::new().unwrap(),
        }
    }

    fn calls_log(&self) -> PathBuf {
        self.home.path().join("calls.log")
    }

    fn write_chart(&self, name: &str, contents: &str) {
        fs::write(self.work.path().join(name), contents).unwrap();
    }

    fn cmd(&self) -> assert_cmd::Command {
        let mut cmd = cargo_bin_cmd!("k8x");
        cmd.env("K8X_HOME", self.home.path())
            .env_remove("K8X_ENV")
            .env_remove("K8X_LOG")
            .current_dir(self.work.path());
        cmd
    }
}

#[cfg(unix)]
fn write_script(path: &Path, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    fs::write(path, format!("#!/bin/sh\n{body}")).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

/// Installs the fake kubectl and points the config at it.
#[cfg(unix)]
fn install_fake_kubectl(fixture: &Fixture, extra_config: &str) {
    let script = fixture.home.path().join("kubectl");
    let log = fixture.calls_log();
    write_script(
        &script,
        &format!(
            r#"for last; do :; done
echo "ARGS: $*" >> '{log}'
cat "$last" >> '{log}'
echo "=== END" >> '{log}'
if grep -q "kind: Namespace" "$last"; then
  echo "namespace/demo created"
else
  echo "configmap/app created"
fi
"#,
            log = log.display()
        ),
    );

    fs::write(
        fixture.home.path().join("config.toml"),
        format!(
            "[kubectl]\nbinary = '{}'\nreadiness_delay_ms = 0\n{extra_config}",
            script.display()
        ),
    )
    .unwrap();
}

/// Splits the fake kubectl log into one entry per invocation.
fn calls(fixture: &Fixture) -> Vec<String> {
    let log = fs::read_to_string(fixture.calls_log()).unwrap_or_default();
    log.split("=== END\n")
        .filter(|call| !call.is_empty())
        .map(str::to_string)
        .collect()
}

#[test]
fn test_render_without_chart_prints_help_and_exits_255() {
    let fixture = Fixture::new();

    fixture
        .cmd()
        .arg("render")
        .assert()
        .code(255)
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("--interactive"));
}

#[test]
fn test_render_missing_chart_file_fails() {
    let fixture = Fixture::new();

    fixture
        .cmd()
        .args(["render", "nope.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to load chart"));
}

#[test]
fn test_render_without_evaluator_command_fails() {
    let fixture = Fixture::new();
    fixture.write_chart("chart.k8x", "anything");

    fixture
        .cmd()
        .args(["render", "chart.k8x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("evaluator.command"));
}

#[test]
fn test_interactive_requires_terminal() {
    let fixture = Fixture::new();
    fixture.write_chart("chart.yaml", CONFIGMAP_CHART);

    fixture
        .cmd()
        .args(["render", "--interactive", "chart.yaml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("could not run program"))
        .stderr(predicate::str::contains("requires a terminal"));
}

#[cfg(unix)]
#[test]
fn test_render_applies_manifests_once_without_namespace() {
    let fixture = Fixture::new();
    install_fake_kubectl(&fixture, "");
    fixture.write_chart("chart.yaml", CONFIGMAP_CHART);

    fixture
        .cmd()
        .args(["render", "chart.yaml"])
        .assert()
        .success()
        .stdout("configmap/app created\n\n");

    let calls = calls(&fixture);
    assert_eq!(calls.len(), 1);
    assert!(calls[0].starts_with("ARGS: apply -f "));
    assert!(calls[0].contains("---\napiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: app\n"));
    assert!(!calls[0].contains("kind: Namespace"));
}

#[cfg(unix)]
#[test]
fn test_render_applies_namespace_first() {
    let fixture = Fixture::new();
    install_fake_kubectl(&fixture, "");
    fixture.write_chart("chart.yaml", &format!("namespace: demo\n{CONFIGMAP_CHART}"));

    fixture
        .cmd()
        .args(["render", "chart.yaml"])
        .assert()
        .success()
        .stdout("namespace/demo created\nconfigmap/app created\n\n");

    let calls = calls(&fixture);
    assert_eq!(calls.len(), 2);
    assert!(calls[0].ends_with(
        "\napiVersion: v1\nkind: Namespace\nmetadata:\n  name: demo\n  labels:\n    name: demo\n"
    ));
    assert!(calls[1].contains("kind: ConfigMap"));
    assert!(!calls[1].contains("kind: Namespace"));
}

#[cfg(unix)]
#[test]
fn test_render_passes_extra_args() {
    let fixture = Fixture::new();
    install_fake_kubectl(&fixture, "extra_args = ['--context', 'dev']\n");
    fixture.write_chart("chart.yaml", CONFIGMAP_CHART);

    fixture.cmd().args(["render", "chart.yaml"]).assert().success();

    let calls = calls(&fixture);
    assert!(calls[0].starts_with("ARGS: apply --context dev -f "));
}

#[cfg(unix)]
#[test]
fn test_render_uses_evaluator_command_and_dotenv() {
    let fixture = Fixture::new();

    let evaluator = fixture.home.path().join("evaluate");
    write_script(
        &evaluator,
        r#"printf '{"components":[{"kind":"ConfigMap","metadata":{"name":"%s"}}]}' "$APP_NAME"
"#,
    );
    install_fake_kubectl(
        &fixture,
        &format!("[evaluator]\ncommand = ['{}']\n", evaluator.display()),
    );
    fixture.write_chart("chart.k8x", "# evaluated externally\n");
    fs::write(
        fixture.work.path().join(".env.staging"),
        "K8X_APP_NAME=\"from-dotenv\"\nOTHER=ignored\n",
    )
    .unwrap();

    fixture
        .cmd()
        .env("K8X_ENV", "staging")
        .args(["render", "chart.k8x"])
        .assert()
        .success();

    let calls = calls(&fixture);
    assert_eq!(calls.len(), 1);
    assert!(calls[0].contains("name: from-dotenv"));
}
