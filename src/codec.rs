//! Save/load of a whole frame stack.
//!
//! The document is JSON with a single field:
//!
//! ```json
//! { "frames": ["<base64>", "<base64>", ...] }
//! ```
//!
//! Each string is the standard (padded) base64 encoding of one frame's raw
//! pixels: row-major RGB8, 3 bytes per pixel, no header, no compression. The
//! format is fixed and unversioned. Width and height are not stored; the
//! loader must be given the same [`Canvas`] the frames were saved with.

use std::{
    fs::File,
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use anyhow::Context as _;
use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::{
    foundation::{
        core::Canvas,
        error::{FlipbookError, FlipbookResult},
    },
    frame::RasterFrame,
    stack::FrameStack,
};

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
struct FrameDocument {
    frames: Vec<String>,
}

/// Encode every frame of `stack` into a document.
#[tracing::instrument(skip(stack), fields(frames = stack.len()))]
pub fn save(stack: &FrameStack) -> FlipbookResult<Vec<u8>> {
    let mut out = Vec::new();
    save_to_writer(stack, &mut out)?;
    Ok(out)
}

pub fn save_to_writer<W: Write>(stack: &FrameStack, writer: W) -> FlipbookResult<()> {
    let doc = FrameDocument {
        frames: stack.iter().map(|f| STANDARD.encode(f.as_raw())).collect(),
    };
    serde_json::to_writer(writer, &doc).context("write frame document")?;
    Ok(())
}

/// Decode a document into a new stack of `canvas`-sized frames.
///
/// Every frame is decoded before anything is returned, so a failure never
/// yields a partially loaded stack.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn load(bytes: &[u8], canvas: Canvas) -> FlipbookResult<FrameStack> {
    let doc: FrameDocument = serde_json::from_slice(bytes)
        .map_err(|e| FlipbookError::malformed(format!("frame document: {e}")))?;
    decode_document(doc, canvas)
}

pub fn load_from_reader<R: Read>(reader: R, canvas: Canvas) -> FlipbookResult<FrameStack> {
    let doc: FrameDocument = serde_json::from_reader(reader)
        .map_err(|e| FlipbookError::malformed(format!("frame document: {e}")))?;
    decode_document(doc, canvas)
}

fn decode_document(doc: FrameDocument, canvas: Canvas) -> FlipbookResult<FrameStack> {
    canvas.validate()?;

    let mut frames = Vec::with_capacity(doc.frames.len());
    for (index, encoded) in doc.frames.iter().enumerate() {
        let raw = STANDARD
            .decode(encoded)
            .map_err(|e| FlipbookError::malformed(format!("frame {index}: invalid base64: {e}")))?;
        frames.push(RasterFrame::from_raw(index, canvas, raw)?);
    }

    tracing::debug!(frames = frames.len(), "decoded frame document");
    Ok(FrameStack::from_frames(canvas, frames))
}

/// Write `stack` to `path`, creating missing parent directories.
pub fn save_file(stack: &FrameStack, path: &Path) -> FlipbookResult<()> {
    ensure_parent_dir(path)?;
    let f = File::create(path).with_context(|| format!("create '{}'", path.display()))?;
    let mut w = BufWriter::new(f);
    save_to_writer(stack, &mut w)?;
    w.flush()
        .with_context(|| format!("flush '{}'", path.display()))?;
    tracing::info!(path = %path.display(), frames = stack.len(), "saved frames");
    Ok(())
}

pub fn load_file(path: &Path, canvas: Canvas) -> FlipbookResult<FrameStack> {
    let f = File::open(path).with_context(|| format!("open '{}'", path.display()))?;
    let stack = load_from_reader(BufReader::new(f), canvas)?;
    tracing::info!(path = %path.display(), frames = stack.len(), "loaded frames");
    Ok(stack)
}

pub fn ensure_parent_dir(path: &Path) -> FlipbookResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::{FOREGROUND, Point};

    fn canvas() -> Canvas {
        Canvas::new(6, 4).unwrap()
    }

    #[test]
    fn document_has_one_base64_string_per_frame() {
        let mut s = FrameStack::new(canvas());
        s.create_frame();
        s.create_frame();
        let bytes = save(&s).unwrap();

        let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let frames = v["frames"].as_array().unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(v.as_object().unwrap().len(), 1);

        let raw = STANDARD.decode(frames[0].as_str().unwrap()).unwrap();
        assert_eq!(raw, vec![255u8; canvas().raw_len()]);
    }

    #[test]
    fn raw_layout_is_row_major_rgb() {
        let mut s = FrameStack::new(canvas());
        s.create_frame();
        // Single pixel at (x=2, y=1).
        s.current_mut()
            .unwrap()
            .draw_line(Point::new(2.0, 1.0), Point::new(2.0, 1.0), 1, FOREGROUND);
        let bytes = save(&s).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let raw = STANDARD.decode(v["frames"][0].as_str().unwrap()).unwrap();

        let (x, y, width) = (2, 1, 6);
        let offset = (y * width + x) * 3;
        assert_eq!(&raw[offset..offset + 3], &[0, 0, 0]);
        assert_eq!(raw.iter().filter(|&&b| b == 0).count(), 3);
    }

    #[test]
    fn empty_stack_saves_empty_list_and_loads_empty() {
        let s = FrameStack::new(canvas());
        let bytes = save(&s).unwrap();
        assert_eq!(bytes, br#"{"frames":[]}"#);
        let loaded = load(&bytes, canvas()).unwrap();
        assert!(loaded.is_empty());
        assert_eq!(loaded.current_index(), None);
    }

    #[test]
    fn missing_frames_field_is_malformed() {
        let err = load(br#"{"pictures":[]}"#, canvas()).unwrap_err();
        assert!(matches!(err, FlipbookError::MalformedDocument(_)));

        let err = load(b"not json", canvas()).unwrap_err();
        assert!(matches!(err, FlipbookError::MalformedDocument(_)));
    }

    #[test]
    fn bad_base64_is_malformed() {
        let err = load(br#"{"frames":["***"]}"#, canvas()).unwrap_err();
        assert!(matches!(err, FlipbookError::MalformedDocument(_)));
    }

    #[test]
    fn wrong_length_names_the_frame() {
        let good = STANDARD.encode(vec![255u8; canvas().raw_len()]);
        let short = STANDARD.encode(vec![255u8; canvas().raw_len() - 1]);
        let doc = format!(r#"{{"frames":["{good}","{short}"]}}"#);
        match load(doc.as_bytes(), canvas()).unwrap_err() {
            FlipbookError::PixelLengthMismatch {
                frame,
                expected,
                actual,
            } => {
                assert_eq!(frame, 1);
                assert_eq!(expected, 72);
                assert_eq!(actual, 71);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn file_roundtrip_creates_parent_dirs() {
        let dir = std::path::PathBuf::from("target")
            .join("codec_tests")
            .join("nested");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("frames.json");

        let mut s = FrameStack::new(canvas());
        s.create_frame();
        save_file(&s, &path).unwrap();
        let loaded = load_file(&path, canvas()).unwrap();
        assert_eq!(loaded, s);
    }
}
