//! The `tilemark` binary: exit codes and flag handling.

use super::fixtures::{solid_rgb, write_corrupt, write_image};
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn tilemark(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tilemark"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run tilemark")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 temp path")
}

#[test]
fn test_batch_with_failures_exits_zero() {
    let dir = TempDir::new().unwrap();
    write_image(dir.path(), "a.png", &solid_rgb(64, 64, [0, 0, 0]));
    write_image(dir.path(), "b.jpg", &solid_rgb(64, 64, [0, 0, 0]));
    write_corrupt(dir.path(), "c.png");

    let output = tilemark(&[path_arg(dir.path()), "--text", "© CLI", "-r", "-30"]);
    assert!(output.status.success(), "{:?}", output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Watermarked 2 of 3"), "stdout: {}", stdout);
    assert!(dir.path().join("watermarked/a.png").is_file());
    assert!(dir.path().join("watermarked/b.jpg").is_file());
    assert!(!dir.path().join("watermarked/c.png").exists());
}

#[test]
fn test_missing_text_exits_one() {
    let dir = TempDir::new().unwrap();
    write_image(dir.path(), "a.png", &solid_rgb(16, 16, [0, 0, 0]));

    let output = tilemark(&[path_arg(dir.path())]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("text is required"));
    assert!(!dir.path().join("watermarked").exists());
}

#[test]
fn test_empty_text_exits_one() {
    let dir = TempDir::new().unwrap();
    write_image(dir.path(), "a.png", &solid_rgb(16, 16, [0, 0, 0]));

    let output = tilemark(&[path_arg(dir.path()), "--text", ""]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!dir.path().join("watermarked").exists());
}

#[test]
fn test_missing_input_exits_one() {
    let output = tilemark(&["/no/such/tilemark/input", "--text", "x"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}

#[test]
fn test_out_of_range_opacity_is_usage_error() {
    let dir = TempDir::new().unwrap();
    let output = tilemark(&[path_arg(dir.path()), "--text", "x", "--opacity", "300"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_rows_without_cols_is_config_error() {
    let dir = TempDir::new().unwrap();
    let output = tilemark(&[path_arg(dir.path()), "--text", "x", "--rows", "3"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("rows and cols"));
}

#[test]
fn test_rows_override_with_cols_from_config() {
    let dir = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_image(dir.path(), "a.png", &solid_rgb(64, 64, [0, 0, 0]));

    let config_path = out.path().join("tilemark.yaml");
    std::fs::write(&config_path, "text: grid
rows: 2
cols: 2
").unwrap();

    let output = tilemark(&[
        path_arg(dir.path()),
        "-c",
        path_arg(&config_path),
        "--rows",
        "3",
    ]);
    assert!(output.status.success(), "{:?}", output);
    assert!(dir.path().join("watermarked/a.png").is_file());
}

#[test]
fn test_oversized_grid_and_font_are_config_errors() {
    let dir = TempDir::new().unwrap();
    write_image(dir.path(), "a.png", &solid_rgb(16, 16, [0, 0, 0]));

    let grid = tilemark(&[
        path_arg(dir.path()),
        "--text",
        "x",
        "--rows",
        "65536",
        "--cols",
        "65536",
    ]);
    assert_eq!(grid.status.code(), Some(1));

    let font = tilemark(&[path_arg(dir.path()), "--text", "x", "--font-size", "100000"]);
    assert_eq!(font.status.code(), Some(1));
    assert!(!dir.path().join("watermarked").exists());
}

#[test]
fn test_config_file_with_cli_override() {
    let dir = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    write_image(dir.path(), "a.png", &solid_rgb(200, 200, [0, 0, 0]));

    let config_path = out.path().join("tilemark.yaml");
    std::fs::write(
        &config_path,
        "text: from file\nopacity: 255\ncolor: \"#000\"\nfont_size: 40\nrows: 2\ncols: 2\n",
    )
    .unwrap();
    let target = out.path().join("marked");

    let output = tilemark(&[
        path_arg(dir.path()),
        "-c",
        path_arg(&config_path),
        "--color",
        "white",
        "-o",
        path_arg(&target),
    ]);
    assert!(output.status.success(), "{:?}", output);

    // White text on black: the override won over the file's black
    let marked = image::open(target.join("a.png")).unwrap().to_rgb8();
    assert!(marked.pixels().any(|p| p.0 == [255, 255, 255]));
}

#[test]
fn test_invalid_color_exits_one() {
    let dir = TempDir::new().unwrap();
    write_image(dir.path(), "a.png", &solid_rgb(16, 16, [0, 0, 0]));

    let output = tilemark(&[path_arg(dir.path()), "--text", "x", "--color", "#12"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_json_log_format() {
    let dir = TempDir::new().unwrap();

    // Empty directory: a single warning event, emitted as JSON on stderr
    let output = tilemark(&[path_arg(dir.path()), "--text", "x", "--log-format", "json"]);
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    let line = stderr.lines().find(|l| l.contains("No image files found")).unwrap();
    assert!(line.trim_start().starts_with('{'), "not JSON: {}", line);
}
