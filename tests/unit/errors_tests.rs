/*!
 * Tests for error types and conversions
 */

use prepapyri::errors::{AppError, PipelineError};
use prepapyri::normalization::DotCounter;

#[test]
fn test_pipelineError_invalidPattern_shouldDisplayPatternAndMessage() {
    let error = DotCounter::new(&["[a-"]).unwrap_err();
    let display = format!("{}", error);
    assert!(display.starts_with("Invalid pattern '[a-'"));
    assert!(matches!(error, PipelineError::InvalidPattern { .. }));
}

#[test]
fn test_appError_fromPipelineError_shouldWrapIt() {
    let pipeline_error = PipelineError::InvalidPattern {
        pattern: "(".to_string(),
        message: "unclosed group".to_string(),
    };
    let error: AppError = pipeline_error.into();
    let display = format!("{}", error);
    assert!(display.contains("Pipeline error"));
    assert!(display.contains("unclosed group"));
}

#[test]
fn test_appError_fromIoError_shouldBeFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "page.txt missing");
    let error: AppError = io_error.into();
    assert!(matches!(error, AppError::File(_)));
    assert!(error.to_string().contains("page.txt missing"));
}

#[test]
fn test_appError_fromAnyhow_shouldKeepContextChain() {
    let source = anyhow::anyhow!("disk full").context("Failed to write output");
    let error: AppError = source.into();
    let display = format!("{}", error);
    assert!(display.contains("Failed to write output"));
    assert!(display.contains("disk full"));
}
