#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[allow(dead_code)]
pub const CMD_TIMEOUT: Duration = Duration::from_secs(15);

#[allow(dead_code)]
pub const CAREER_PAGE: &str = r#"<!DOCTYPE html>
<html><body><div class="main-content">
  <blz-section class="Profile-masthead">
    <img class="Profile-player--portrait" src="https://cdn.example/portrait/p1.png">
    <h1 class="Profile-player--name">Racer</h1>
    <h2 class="Profile-player--title">Speedy</h2>
    <img class="Profile-playerSummary--endorsement" src="https://cdn.example/endorsement/3-x.svg">
  </blz-section>
  <div class="mouseKeyboard-view Profile-playerSummary--rankWrapper">
    <div class="Profile-playerSummary--roleWrapper">
      <div class="Profile-playerSummary--role"><img src="https://cdn.example/role/support-1.svg"></div>
      <img class="Profile-playerSummary--rank" src="https://cdn.example/rank/Master-9">
      <img class="Profile-playerSummary--rank" src="https://cdn.example/rank/TierDivision_1-0">
    </div>
  </div>
  <div class="mouseKeyboard-view Profile-view">
    <blz-section class="Profile-heroSummary">
      <div class="Profile-heroSummary--view quickPlay-view">
        <div class="Profile-progressBars" data-category-id="0x0860000000000039">
          <div class="Profile-progressBar">
            <div class="Profile-progressBar-title">Tracer</div>
            <div class="Profile-progressBar-description">14</div>
          </div>
          <div class="Profile-progressBar">
            <div class="Profile-progressBar-title">Ana</div>
            <div class="Profile-progressBar-description">6</div>
          </div>
        </div>
      </div>
    </blz-section>
  </div>
</div></body></html>"#;

#[allow(dead_code)]
pub const MISSING_PAGE: &str =
    r#"<html><body><div class="error-contain">Profile Not Found</div></body></html>"#;

/// A mock upstream plus a config file pointing the CLI at it.
#[allow(dead_code)]
pub struct Env {
    pub server: MockServer,
    pub dir: TempDir,
}

#[allow(dead_code)]
impl Env {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().expect("failed to create temp dir for tests");
        let config = format!(
            r#"[cache]
dir = "{cache}"
ttl_hours = 12
cleanup_interval_hours = 24

[source]
data_source = "{uri}/en-us/career/"
name_search = "{uri}/en-us/search/account-by-name/"
timeout_secs = 5
"#,
            cache = dir.path().join("profiles").display().to_string().replace('\\', "/"),
            uri = server.uri(),
        );
        std::fs::write(dir.path().join("config.toml"), config).unwrap();
        Self { server, dir }
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.dir.path().join("profiles")
    }

    /// Point `source.heroes_file` at a catalog holding `json`.
    pub fn use_heroes(&self, json: &str) {
        let heroes = self.dir.path().join("heroes.json");
        std::fs::write(&heroes, json).unwrap();
        let mut config = std::fs::read_to_string(self.config_path()).unwrap();
        config.push_str(&format!(
            "heroes_file = \"{}\"\n",
            heroes.display().to_string().replace('\\', "/")
        ));
        std::fs::write(self.config_path(), config).unwrap();
    }

    /// `ower` with this environment's config.
    pub fn cmd(&self) -> Command {
        ower_cmd(&self.config_path())
    }

    pub async fn mount_player(&self, name: &str, battle_tag: &str, page: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/en-us/search/account-by-name/{name}/")))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!(
                r#"[{{"battleTag": "{battle_tag}", "namecard": "0x0250000000000A01", "portrait": "0x0250000000000B02"}}]"#
            )))
            .mount(&self.server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/en-us/career/{}/", battle_tag.replace('#', "-"))))
            .respond_with(ResponseTemplate::new(200).set_body_string(page.to_string()))
            .mount(&self.server)
            .await;
    }
}

/// Create a configured `ower` command suitable for integration tests.
#[allow(dead_code)]
pub fn ower_cmd(config: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ower"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.env("OWER_CONFIG", config);
    cmd.env_remove("OWER_DATA_DIR");
    cmd.env("NO_COLOR", "1");
    cmd
}
