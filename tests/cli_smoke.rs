use std::path::PathBuf;

fn exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_flipbook")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "flipbook.exe"
            } else {
                "flipbook"
            });
            p
        })
}

#[test]
fn cli_new_then_export_writes_gif() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();

    let doc_path = dir.join("doc.json");
    let gif_path = dir.join("anim.gif");
    let _ = std::fs::remove_file(&gif_path);

    let size = ["--width", "32", "--height", "24"];

    let status = std::process::Command::new(exe())
        .args(size)
        .args(["new", "--frames", "3", "--out"])
        .arg(&doc_path)
        .status()
        .unwrap();
    assert!(status.success());

    let stack = flipbook::load_file(&doc_path, flipbook::Canvas::new(32, 24).unwrap()).unwrap();
    assert_eq!(stack.len(), 3);

    let status = std::process::Command::new(exe())
        .args(size)
        .arg("export")
        .arg("--in")
        .arg(&doc_path)
        .arg("--out")
        .arg(&gif_path)
        .status()
        .unwrap();
    assert!(status.success());

    let bytes = std::fs::read(&gif_path).unwrap();
    assert_eq!(&bytes[..6], b"GIF89a");
}

#[test]
fn cli_frame_writes_png() {
    let dir = PathBuf::from("target").join("cli_smoke_frame");
    std::fs::create_dir_all(&dir).unwrap();

    let canvas = flipbook::Canvas::new(20, 10).unwrap();
    let mut stack = flipbook::FrameStack::new(canvas);
    stack.create_frame();
    stack.create_frame();
    let (a, b) = (flipbook::Point::new(2.0, 5.0), flipbook::Point::new(17.0, 5.0));
    flipbook::PaintEngine::stroke_segment(&mut stack, a, b, 2, false);

    let doc_path = dir.join("doc.json");
    let png_path = dir.join("frame1.png");
    let _ = std::fs::remove_file(&png_path);
    flipbook::save_file(&stack, &doc_path).unwrap();

    let status = std::process::Command::new(exe())
        .args(["--width", "20", "--height", "10", "frame", "--index", "1"])
        .args(["--onion", "above", "--in"])
        .arg(&doc_path)
        .arg("--out")
        .arg(&png_path)
        .status()
        .unwrap();
    assert!(status.success());

    let img = image::open(&png_path).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (20, 10));
    // Black stroke under a white ghost of the blank first frame.
    assert_eq!(img.get_pixel(10, 5).0, [100, 100, 100]);
    assert_eq!(img.get_pixel(10, 0).0, [255, 255, 255]);

    let status = std::process::Command::new(exe())
        .args(["--width", "20", "--height", "10", "frame", "--index", "5", "--in"])
        .arg(&doc_path)
        .arg("--out")
        .arg(&png_path)
        .status()
        .unwrap();
    assert!(!status.success());
}
