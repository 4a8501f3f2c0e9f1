use crate::span::Span;
use thiserror::Error;

/// Everything that can go wrong compiling a DHDL program.
///
/// All variants are fatal: the first one encountered aborts compilation.
/// There is no partial-output or error-recovery semantics.
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("parse error at {span}: {message}")]
    Parse { span: Span, message: String },

    #[error("slice configuration error at {span}: {message}")]
    SliceConfiguration { span: Span, message: String },

    #[error("slice invocation error: {message}")]
    SliceInvocation { message: String },
}

impl CompileError {
    pub fn parse(span: Span, message: impl Into<String>) -> Self {
        CompileError::Parse {
            span,
            message: message.into(),
        }
    }

    pub fn slice_configuration(span: Span, message: impl Into<String>) -> Self {
        CompileError::SliceConfiguration {
            span,
            message: message.into(),
        }
    }

    pub fn slice_invocation(message: impl Into<String>) -> Self {
        CompileError::SliceInvocation {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CompileError>;
