use crate::markup::Span;

/// Errors from reading or classifying a present document.
///
/// Every variant is fatal for the document it came from: there is no
/// partially classified [`Doc`](crate::Doc).
#[derive(Debug, thiserror::Error)]
pub enum SlideError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("source is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
    #[error("unexpected node type in metadata: {kind}")]
    UnexpectedNode { kind: &'static str, span: Span },
    #[error("unexpected header line: {line:?}")]
    UnexpectedHeaderLine { line: String },
}
