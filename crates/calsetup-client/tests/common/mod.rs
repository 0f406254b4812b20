#![allow(dead_code)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const CLIENT_ID: &str = "104857392018475629384";
pub const EMAIL: &str = "calendar-reader@calendar-meetings-reader.iam.gserviceaccount.com";

/// An isolated home directory with a key file location and an optional
/// scripted `gcloud`.
pub struct TestEnv {
    _tmp: TempDir,
    pub home: PathBuf,
    pub key_file: PathBuf,
    pub mutations: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let home = tmp.path().join("home");
        fs::create_dir_all(&home).expect("create isolated home");

        let key_file = tmp.path().join("google_sa_key.json");
        let mutations = tmp.path().join("mutations.log");

        Self {
            _tmp: tmp,
            home,
            key_file,
            mutations,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("calsetup");
        cmd.env("HOME", &self.home)
            .env("XDG_CONFIG_HOME", self.home.join(".config"))
            .env_remove("RUST_LOG")
            .env_remove("CALSETUP_CONFIG")
            .env_remove("CALSETUP_PROJECT_ID")
            .env_remove("CALSETUP_SERVICE_ACCOUNT")
            .env_remove("CALSETUP_GCLOUD")
            .env_remove("CALSETUP_KEY_FILE")
            .arg("--key-file")
            .arg(&self.key_file);
        cmd
    }

    pub fn write_key(&self, client_id: &str) {
        let key = serde_json::json!({
            "type": "service_account",
            "project_id": "calendar-meetings-reader",
            "private_key_id": "3f2a9c",
            "client_email": EMAIL,
            "client_id": client_id,
        });
        fs::write(&self.key_file, key.to_string()).expect("write key file");
    }

    /// Writes a `gcloud` stand-in that reports every resource as present.
    ///
    /// Any create, enable or login call is appended to `mutations` and
    /// fails with `mutation_status`.
    #[cfg(unix)]
    pub fn fake_gcloud(&self, project_exists: bool, mutation_status: i32) -> PathBuf {
        let describe_status = if project_exists { 0 } else { 1 };
        let script = format!(
            r#"#!/bin/sh
mutate() {{
    echo "$*" >> "{mutations}"
    echo "ERROR: refusing to change anything" >&2
    exit {mutation_status}
}}
case "$1 $2" in
    "auth list") echo "ops@example.com" ;;
    "auth login") mutate "$@" ;;
    "projects describe")
        if [ {describe_status} -ne 0 ]; then echo "NOT_FOUND" >&2; exit {describe_status}; fi
        echo "$3" ;;
    "services list") echo "calendar-json.googleapis.com" ;;
    "iam service-accounts")
        if [ "$3" = "describe" ]; then echo "$4"; else mutate "$@"; fi ;;
    *) mutate "$@" ;;
esac
"#,
            mutations = self.mutations.display(),
        );
        let path = self.home.join("gcloud");
        write_executable(&path, &script);
        path
    }

    pub fn mutation_log(&self) -> String {
        fs::read_to_string(&self.mutations).unwrap_or_default()
    }
}

#[cfg(unix)]
fn write_executable(path: &Path, content: &str) {
    use std::os::unix::fs::PermissionsExt;
    fs::write(path, content).expect("write script");
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).expect("chmod script");
}
