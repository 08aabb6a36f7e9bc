use tempfile::TempDir;

/// The signature and header chunk of a 1x1 PNG.
pub(crate) const PNG_BYTES: &[u8] =
    b"\x89PNG\r\n\x1a\n\x00\x00\x00\rIHDR\x00\x00\x00\x01\x00\x00\x00\x01\x08\x06\x00\x00\x00";

/// The start of a JPEG file.
pub(crate) const JPEG_BYTES: &[u8] = b"\xff\xd8\xff\xe0\x00\x10JFIF\x00\x01";

/// A fresh directory for uploads that is deleted when dropped.
#[track_caller]
pub(crate) fn temp_dir(name: &str) -> TempDir {
    tempfile::Builder::new()
        .prefix(&format!("expense_tracker_{name}_"))
        .tempdir()
        .expect("Could not create temp dir")
}
