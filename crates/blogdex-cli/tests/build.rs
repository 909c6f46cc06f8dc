#![allow(
    missing_docs,
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::needless_raw_string_hashes
)]

mod common;

use std::fs;

use common::{blogdex_cmd, mount, mount_site};
use predicates::prelude::*;
use tempfile::tempdir;
use wiremock::MockServer;

const MANIFEST: &str = r"site_name: Blog
nav:
  - swift:
      - swift/index.md
      - swift/sort-arrays.md
      - Deep dives:
          - swift/deep/generics.md
  - kotlin:
      - kotlin/coroutines.md
";

const POSTS: &[(&str, &str, &str)] = &[
    ("swift/sort-arrays.md", "Sorting arrays", "2024-01-01"),
    ("swift/deep/generics.md", "Generics", "2024-05-20"),
    ("kotlin/coroutines.md", "Coroutines", "2023-11-02"),
];

#[tokio::test]
async fn build_writes_index_to_default_location() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_site(&server, MANIFEST, POSTS).await;
    let tmp = tempdir()?;

    blogdex_cmd(tmp.path(), &server)
        .assert()
        .success()
        .stdout(predicate::str::contains("/ 3] Generics"))
        .stdout(predicate::str::contains("[3 / 3]"));

    let written = fs::read_to_string(tmp.path().join("config/blog.yml"))?;
    assert!(written.starts_with("HEADER:\n  label: \"Blog\"\n\nPOSTS:\n"));

    let generics = written.find("\"Generics\"").expect("generics listed");
    let sorting = written.find("\"Sorting arrays\"").expect("sorting listed");
    let coroutines = written.find("\"Coroutines\"").expect("coroutines listed");
    assert!(generics < sorting && sorting < coroutines);

    assert!(written.contains("    url: \"https://blog.example/swift/deep/generics\"\n"));
    assert!(written.contains(&format!(
        "    image: \"{}/raw/master/docs/img/cover.png\"\n",
        server.uri()
    )));
    assert!(written.contains("    category: \"kotlin\"\n"));
    Ok(())
}

#[tokio::test]
async fn build_honors_output_flag() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_site(&server, MANIFEST, POSTS).await;
    let tmp = tempdir()?;
    let destination = tmp.path().join("site/data/posts.yml");

    blogdex_cmd(tmp.path(), &server)
        .args(["build", "--output"])
        .arg(&destination)
        .args(["--concurrency", "1"])
        .assert()
        .success();

    assert!(destination.exists());
    assert!(!tmp.path().join("config/blog.yml").exists());
    Ok(())
}

#[tokio::test]
async fn failed_post_reports_errors_and_writes_nothing() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_site(&server, MANIFEST, &POSTS[..2]).await;
    mount(&server, "/raw/master/docs/kotlin/coroutines.md", 500, "boom").await;
    let tmp = tempdir()?;
    let destination = tmp.path().join("config/blog.yml");
    fs::create_dir_all(destination.parent().expect("parent"))?;
    fs::write(&destination, "previous index\n")?;

    blogdex_cmd(tmp.path(), &server)
        .arg("build")
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Error: Fetch failed for"))
        .stderr(predicate::str::contains("kotlin/coroutines.md"))
        .stderr(predicate::str::contains("1 of 3 posts failed"));

    assert_eq!(fs::read_to_string(&destination)?, "previous index\n");
    Ok(())
}

#[tokio::test]
async fn invalid_front_matter_fails_the_batch() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_site(&server, MANIFEST, &POSTS[..2]).await;
    mount(
        &server,
        "/raw/master/docs/kotlin/coroutines.md",
        200,
        "---\ntitle: Coroutines\ndate: 2023-11-02\n---\nbody\n",
    )
    .await;
    let tmp = tempdir()?;

    blogdex_cmd(tmp.path(), &server)
        .assert()
        .code(5)
        .stderr(predicate::str::contains("`description` is missing"))
        .stderr(predicate::str::contains("`image` is missing"));

    assert!(!tmp.path().join("config/blog.yml").exists());
    Ok(())
}

#[tokio::test]
async fn dry_run_prints_document_only() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_site(&server, MANIFEST, POSTS).await;
    let tmp = tempdir()?;

    let output = blogdex_cmd(tmp.path(), &server)
        .args(["build", "--dry-run"])
        .assert()
        .success()
        .get_output()
        .clone();

    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.starts_with("HEADER:\n"));
    assert!(!stdout.contains("[1 / 3]"), "progress belongs on stderr");
    assert!(String::from_utf8(output.stderr)?.contains("[3 / 3]"));
    assert!(!tmp.path().join("config").exists());
    Ok(())
}

#[tokio::test]
async fn missing_manifest_exits_with_network_code() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let tmp = tempdir()?;

    blogdex_cmd(tmp.path(), &server)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("mkdocs.yaml"));
    Ok(())
}

#[tokio::test]
async fn invalid_base_url_is_a_usage_error() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    let tmp = tempdir()?;

    blogdex_cmd(tmp.path(), &server)
        .args(["--raw-base-url", "ftp://example.com/raw"])
        .assert()
        .code(2);
    Ok(())
}

#[tokio::test]
async fn config_file_sets_label_and_output() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    mount_site(&server, MANIFEST, POSTS).await;
    let tmp = tempdir()?;
    fs::write(
        tmp.path().join("blogdex.toml"),
        "[output]\npath = \"out/index.yml\"\nlabel = \"Articles\"\n",
    )?;

    blogdex_cmd(tmp.path(), &server).arg("-q").assert().success();

    let written = fs::read_to_string(tmp.path().join("out/index.yml"))?;
    assert!(written.starts_with("HEADER:\n  label: \"Articles\"\n"));
    Ok(())
}
