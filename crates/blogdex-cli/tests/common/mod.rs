#![allow(clippy::expect_used, clippy::unwrap_used, dead_code)]

use assert_cmd::Command;
use std::path::Path;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CMD_TIMEOUT: Duration = Duration::from_secs(15);

/// Create a configured `blogdex` command suitable for integration tests.
///
/// The command runs inside `workdir` so neither a stray `blogdex.toml` nor the
/// default output path leaks between tests, and it talks to `server` only.
pub fn blogdex_cmd(workdir: &Path, server: &MockServer) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("blogdex"));
    cmd.timeout(CMD_TIMEOUT);
    cmd.current_dir(workdir);
    cmd.env_remove("BLOGDEX_CONFIG");
    cmd.env_remove("BLOGDEX_OUTPUT");
    cmd.env("BLOGDEX_RAW_BASE_URL", format!("{}/raw/master", server.uri()));
    cmd.env("BLOGDEX_BLOG_URL", "https://blog.example");
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Front matter document for a post.
pub fn post(title: &str, date: &str, image: &str) -> String {
    format!(
        "---\ntitle: {title}\ndescription: Notes on {title}\ndate: {date}\nimage: {image}\n---\n\n# {title}\n"
    )
}

/// Serve `body` with `status` at `route`.
pub async fn mount(server: &MockServer, route: &str, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

/// Serve a manifest plus one post per `(source path, title, date)`.
pub async fn mount_site(server: &MockServer, manifest: &str, posts: &[(&str, &str, &str)]) {
    mount(server, "/raw/master/mkdocs.yaml", 200, manifest).await;
    for (source_path, title, date) in posts {
        mount(
            server,
            &format!("/raw/master/docs/{source_path}"),
            200,
            &post(title, date, "img/cover.png"),
        )
        .await;
    }
}
