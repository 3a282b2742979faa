// Error type tests through the public API

use anyhow::Context;
use std::path::PathBuf;
use tilemark::error::WatermarkError;

#[test]
fn test_converts_into_anyhow() {
    fn fails() -> anyhow::Result<()> {
        Err(WatermarkError::config("no text"))?;
        Ok(())
    }
    let err = fails().unwrap_err();
    assert_eq!(err.to_string(), "Configuration error: no text");
    assert!(err.downcast_ref::<WatermarkError>().unwrap().is_fatal());
}

#[test]
fn test_context_chain_keeps_io_source() {
    let result: Result<(), WatermarkError> = Err(WatermarkError::Io {
        path: PathBuf::from("out/dir"),
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    });

    let err = result.context("Failed to watermark photos").unwrap_err();
    let chain = format!("{:#}", err);
    assert!(chain.starts_with("Failed to watermark photos: I/O error on out/dir"));
    assert!(chain.ends_with("denied"));
}
