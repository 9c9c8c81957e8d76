#![cfg(unix)]

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

const KUBECTL: &str = r#"#!/bin/sh
echo "kubectl $*" >> "$CALLS_LOG"
case "$*" in
  *"get service "*jsonpath*) echo "127.0.0.1:9" ;;
  *"wait "*) [ -n "$FAIL_WAIT" ] && exit 1; echo "condition met" ;;
  *) echo "NAME READY STATUS" ;;
esac
"#;

const ANSIBLE_PLAYBOOK: &str = r#"#!/bin/sh
echo "ansible-playbook $*" >> "$CALLS_LOG"
[ -n "$SLOW_PLAYBOOK" ] && exec sleep 30
case "$*" in
  *deploy-k8s.yml*)
    if [ -n "$FAIL_DEPLOY" ]; then
      echo "fatal: [localhost]: FAILED!" >&2
      exit 2
    fi
    ;;
esac
echo "PLAY RECAP *********"
echo "localhost : ok=3 changed=1 failed=0"
"#;

const ANSIBLE_GALAXY: &str = r#"#!/bin/sh
echo "ansible-galaxy $*" >> "$CALLS_LOG"
case "$*" in
  *"collection list"*) echo "kubernetes.core 2.4.0" ;;
esac
"#;

const GENERIC: &str = r#"#!/bin/sh
echo "$(basename "$0") $*" >> "$CALLS_LOG"
"#;

const CONFIG: &str = r#"[project]
name = "fullstack-app"
namespace = "fullstack-app"

[health]
readiness_timeout_secs = 30
probe_timeout_secs = 2
"#;

struct Workspace {
    tmp: tempfile::TempDir,
}

impl Workspace {
    fn new() -> Self {
        let tmp = tempfile::tempdir().expect("tempdir");
        let bin = tmp.path().join("bin");
        fs::create_dir(&bin).expect("bin dir");

        write_tool(&bin, "kubectl", KUBECTL);
        write_tool(&bin, "ansible-playbook", ANSIBLE_PLAYBOOK);
        write_tool(&bin, "ansible-galaxy", ANSIBLE_GALAXY);
        write_tool(&bin, "docker", GENERIC);
        write_tool(&bin, "helm", GENERIC);

        fs::write(tmp.path().join("config.toml"), CONFIG).expect("write config");

        Self { tmp }
    }

    fn root(&self) -> &Path {
        self.tmp.path()
    }

    fn calls_log(&self) -> PathBuf {
        self.root().join("calls.log")
    }

    fn command(&self) -> Command {
        let path = format!(
            "{}:{}",
            self.root().join("bin").display(),
            std::env::var("PATH").unwrap_or_default()
        );
        let mut cmd = Command::cargo_bin("stack-deploy").unwrap();
        cmd.current_dir(self.root())
            .env("PATH", path)
            .env("CALLS_LOG", self.calls_log())
            .env_remove("STACK_DEPLOY_CONFIG")
            .env_remove("STACK_DEPLOY_LOG_FILE")
            .env_remove("FAIL_DEPLOY")
            .env_remove("FAIL_WAIT")
            .env_remove("SLOW_PLAYBOOK");
        cmd
    }

    fn log(&self) -> String {
        fs::read_to_string(self.root().join("deployment.log")).unwrap_or_default()
    }

    fn calls(&self) -> String {
        fs::read_to_string(self.calls_log()).unwrap_or_default()
    }
}

fn scratch_dirs(dir: &Path) -> usize {
    fs::read_dir(dir)
        .expect("read tmpdir")
        .filter_map(Result::ok)
        .filter(|e| e.file_name().to_string_lossy().starts_with("stack-scratch-"))
        .count()
}

fn write_tool(bin: &Path, name: &str, script: &str) {
    let path = bin.join(name);
    fs::write(&path, script).expect("write tool");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod");
}

#[test]
fn full_run_succeeds_and_writes_log() {
    let ws = Workspace::new();

    ws.command()
        .args(["-e", "staging"])
        .assert()
        .success()
        .stdout(predicate::str::contains("СТАТУС РАЗВЕРТЫВАНИЯ"))
        .stdout(predicate::str::contains("SERVICES"));

    let calls = ws.calls();
    assert!(calls.contains("docker info"));
    assert!(calls.contains("kubectl cluster-info"));
    assert!(calls.contains("build-images.yml"));
    assert!(calls.contains("deploy-k8s.yml"));
    assert!(calls.contains("kubectl wait"));
    assert!(calls.contains("kubectl get services -n fullstack-app"));

    let build = calls.find("build-images.yml").unwrap();
    let deploy = calls.find("deploy-k8s.yml").unwrap();
    let wait = calls.find("kubectl wait").unwrap();
    assert!(build < deploy && deploy < wait);

    let log = fs::read_to_string(ws.root().join("deployment.log")).expect("log file");
    assert!(!log.is_empty());
}

#[test]
fn deploy_failure_without_force_stops_before_health_check() {
    let ws = Workspace::new();

    ws.command()
        .env("FAIL_DEPLOY", "1")
        .args(["-e", "production"])
        .assert()
        .code(5)
        .stdout(predicate::str::contains("DeployError"));

    let calls = ws.calls();
    assert!(calls.contains("deploy-k8s.yml"));
    assert!(!calls.contains("kubectl wait"));
    assert!(!calls.contains("get services"));
}

#[test]
fn deploy_failure_with_force_continues() {
    let ws = Workspace::new();

    ws.command()
        .env("FAIL_DEPLOY", "1")
        .args(["-e", "staging", "-f"])
        .assert()
        .success();

    assert!(ws.calls().contains("kubectl wait"));
}

#[test]
fn skip_build_never_runs_build_playbook() {
    let ws = Workspace::new();

    ws.command()
        .args(["-e", "development", "-s"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Сборка образов пропущена"));

    let calls = ws.calls();
    assert!(!calls.contains("build-images.yml"));
    assert!(calls.contains("deploy-k8s.yml"));
    assert!(ws.log().contains("Сборка образов пропущена"));
}

#[test]
fn skip_deploy_never_runs_deploy_playbook() {
    let ws = Workspace::new();

    ws.command()
        .args(["-e", "staging", "-k"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Развертывание пропущено"));

    let calls = ws.calls();
    assert!(calls.contains("build-images.yml"));
    assert!(!calls.contains("deploy-k8s.yml"));
    assert!(calls.contains("kubectl wait"));
    assert!(ws.log().contains("Развертывание пропущено"));
}

#[test]
fn production_skip_build_with_failing_deploy_halts() {
    let ws = Workspace::new();

    ws.command()
        .env("FAIL_DEPLOY", "1")
        .args(["-e", "production", "-s"])
        .assert()
        .code(5)
        .stdout(predicate::str::contains("Сборка образов пропущена"))
        .stdout(predicate::str::contains("DeployError"));

    let calls = ws.calls();
    assert!(!calls.contains("build-images.yml"));
    assert!(calls.contains("deploy-k8s.yml"));
    assert!(!calls.contains("kubectl wait"));

    let log = ws.log();
    assert!(log.contains("Сборка образов пропущена"));
    assert!(log.contains("DeployError"));
}

#[test]
fn termination_signal_removes_scratch_dir() {
    let ws = Workspace::new();
    let tmpdir = ws.root().join("tmp");
    fs::create_dir(&tmpdir).expect("tmp dir");

    let mut child = ws
        .command()
        .env("TMPDIR", &tmpdir)
        .env("SLOW_PLAYBOOK", "1")
        .args(["-e", "development"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn");

    // Ждем запуска первого playbook: к этому моменту extra-vars уже записаны
    let deadline = Instant::now() + Duration::from_secs(30);
    while !ws.calls().contains("ansible-playbook") {
        assert!(Instant::now() < deadline, "playbook was not started");
        std::thread::sleep(Duration::from_millis(100));
    }
    assert_eq!(scratch_dirs(&tmpdir), 1);

    let killed = Command::new("kill")
        .args(["-TERM", &child.id().to_string()])
        .status()
        .expect("kill");
    assert!(killed.success());

    let status = child.wait().expect("wait");
    assert_eq!(status.code(), Some(143));
    assert_eq!(scratch_dirs(&tmpdir), 0);
    assert!(ws.log().contains("прервано сигналом"));
}

#[test]
fn readiness_failure_exits_with_timeout_code() {
    let ws = Workspace::new();

    ws.command()
        .env("FAIL_WAIT", "1")
        .args(["-e", "development", "-s", "-k"])
        .assert()
        .code(6)
        .stdout(predicate::str::contains("ReadinessTimeoutError"));

    assert!(!ws.calls().contains("get services"));
}
