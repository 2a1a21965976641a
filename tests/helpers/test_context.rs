//! Test context for unified test setup
//!
//! Points the settings at a temporary data directory, shortens the reel
//! animations and opens a library there.

use std::path::PathBuf;
use tempfile::TempDir;
use tokio::io::BufReader;

use lucky_draw::config::Settings;
use lucky_draw::handlers::{handle_command, Command};
use lucky_draw::storage::Library;
use lucky_draw::Result;

pub struct TestContext {
    pub temp_dir: TempDir,
    pub settings: Settings,
    pub library: Library,
}

impl TestContext {
    pub async fn new() -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let temp_dir = TempDir::new().expect("temp dir");
        let mut settings = Settings::default();
        settings.storage.data_dir = temp_dir.path().join("data").to_string_lossy().into_owned();
        for reel in [
            &mut settings.animation.group,
            &mut settings.animation.pool,
            &mut settings.animation.student,
            &mut settings.animation.question,
        ] {
            reel.duration_ms = 300;
        }
        settings.validate().expect("test settings are valid");

        let library = Library::from_settings(&settings).await.expect("library opens");
        Self { temp_dir, settings, library }
    }

    /// Write a file under the temp dir and return its path
    pub async fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        tokio::fs::write(&path, content).await.expect("write fixture file");
        path
    }

    /// Run a command line with `input` as stdin, returning what it printed
    pub async fn run(&mut self, args: &[&str], input: &str) -> (Result<()>, String) {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        let command = match Command::parse(&args) {
            Ok(command) => command,
            Err(e) => return (Err(e), String::new()),
        };

        let mut out = Vec::new();
        let result = handle_command(
            command,
            &mut self.library,
            &self.settings,
            BufReader::new(input.as_bytes()),
            &mut out,
        )
        .await;
        (result, String::from_utf8_lossy(&out).into_owned())
    }

    /// A fresh library over the same files
    pub async fn reopen(&self) -> Library {
        Library::from_settings(&self.settings).await.expect("library reopens")
    }
}
