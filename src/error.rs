use std::fmt::Display;

use anyhow::{anyhow, Context, Result};
use thiserror::Error;

/// Failures surfaced by the call pipeline. Functions return
/// `crate::Result`, callers downcast to this type to tell them apart.
#[derive(Error, Debug)]
pub enum CallError {
    /// A declaration is inconsistent. Raised while building the registry or
    /// loading configuration, and at call time when a call site passes more
    /// arguments than its declaration binds or names an undeclared operation.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Missing argument: {0}")]
    MissingArgument(String),
    /// Network failure or a non successful HTTP status.
    #[error("Transport error: {0}")]
    TransportError(String),
    #[error("Decode error: {0}")]
    DecodeError(String),
}

pub trait AddContext<T, E>: Context<T, E> {
    fn err_context<C: Display + Send + Sync + 'static>(self, msg: C) -> Result<T, anyhow::Error>
    where
        Self: Sized,
    {
        self.with_context(|| msg.to_string())
    }
}

impl<U, T, E> AddContext<T, E> for U where U: Context<T, E> {}

pub fn gen<T: AsRef<str>>(msg: T) -> anyhow::Error {
    anyhow!(msg.as_ref().to_string())
}

pub fn configuration<T: Into<String>>(msg: T) -> anyhow::Error {
    CallError::ConfigurationError(msg.into()).into()
}

/// Returns the `CallError` behind an `anyhow::Error`, if there is one.
pub fn kind(err: &anyhow::Error) -> Option<&CallError> {
    err.downcast_ref::<CallError>()
}
