use polydraw_cli::{ReplayOptions, Script, replay};
use polydraw_core::{DrawingSurface, RasterImage, Rgba};
use polydraw_render::{decode_png, encode_png};
use std::process::Command;

const RED: Rgba = Rgba::new(255, 0, 0, 255);
const GREEN: Rgba = Rgba::new(0, 255, 0, 255);

fn script_with_stamp() -> &'static str {
    r##"{
        "width": 80,
        "height": 60,
        "stamp": "stamp.png",
        "steps": [
            { "op": "color", "primary": "#ff0000" },
            { "op": "tool", "tool": "pencil" },
            { "op": "down", "x": 5, "y": 50 },
            { "op": "move", "x": 40, "y": 50 },
            { "op": "up", "x": 40, "y": 50 },
            { "op": "tool", "tool": "stamp" },
            { "op": "down", "x": 60, "y": 15 },
            { "op": "tool", "tool": "selection" },
            { "op": "down", "x": 0, "y": 40 },
            { "op": "move", "x": 45, "y": 58 },
            { "op": "up", "x": 45, "y": 58 },
            { "op": "key", "key": "Delete" }
        ]
    }"##
}

fn write_stamp(dir: &std::path::Path) {
    let stamp = RasterImage::filled(10, 10, GREEN);
    std::fs::write(dir.join("stamp.png"), encode_png(&stamp).unwrap()).unwrap();
}

#[test]
fn test_replay_stamp_and_delete_selection() {
    let dir = tempfile::tempdir().unwrap();
    write_stamp(dir.path());
    let script = Script::from_json(script_with_stamp()).unwrap();
    let options = ReplayOptions {
        base_dir: dir.path().to_path_buf(),
        ..ReplayOptions::default()
    };
    let out = replay(&script, &options).unwrap();

    // The stamp is centred on the click.
    assert_eq!(out.pixel(60, 15), Some(GREEN));
    assert_eq!(out.pixel(50, 15), Some(Rgba::white()));
    // The pencil stroke sat inside the deleted selection.
    assert_eq!(out.pixel(20, 50), Some(Rgba::white()));
}

#[test]
fn test_replay_without_delete_keeps_stroke() {
    let dir = tempfile::tempdir().unwrap();
    write_stamp(dir.path());
    let mut script = Script::from_json(script_with_stamp()).unwrap();
    script.steps.pop();
    let options = ReplayOptions {
        base_dir: dir.path().to_path_buf(),
        ..ReplayOptions::default()
    };
    let out = replay(&script, &options).unwrap();
    assert_eq!(out.pixel(20, 50), Some(RED));
}

#[test]
fn test_binary_writes_png() {
    let dir = tempfile::tempdir().unwrap();
    write_stamp(dir.path());
    let script_path = dir.path().join("script.json");
    std::fs::write(&script_path, script_with_stamp()).unwrap();
    let output = dir.path().join("out.png");

    let status = Command::new(env!("CARGO_BIN_EXE_polydraw"))
        .arg("replay")
        .arg(&script_path)
        .arg("-o")
        .arg(&output)
        .status()
        .unwrap();
    assert!(status.success());

    let image = decode_png(&std::fs::read(&output).unwrap()).unwrap();
    assert_eq!((image.width(), image.height()), (80, 60));
    assert_eq!(image.pixel(60, 15), Some(GREEN));
}

#[test]
fn test_binary_rejects_missing_script() {
    let dir = tempfile::tempdir().unwrap();
    let status = Command::new(env!("CARGO_BIN_EXE_polydraw"))
        .arg("replay")
        .arg(dir.path().join("missing.json"))
        .arg("-o")
        .arg(dir.path().join("out.png"))
        .status()
        .unwrap();
    assert!(!status.success());
}
