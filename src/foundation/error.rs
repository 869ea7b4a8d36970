/// Convenience result type used across canvasfx.
pub type CanvasFxResult<T> = Result<T, CanvasFxError>;

/// Top-level error taxonomy used by engine, registry and surface APIs.
#[derive(thiserror::Error, Debug)]
pub enum CanvasFxError {
    /// A drawing surface could not yield a drawing context. Fatal for the caller.
    #[error("construction error: {0}")]
    Construction(String),

    /// An animation loader failed to produce a module.
    #[error("load error: {0}")]
    Load(String),

    /// An animation module failed inside `update` or `render`.
    #[error("module error: {0}")]
    Module(String),

    /// Invalid user-provided configuration or parameters.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CanvasFxError {
    /// Build a [`CanvasFxError::Construction`] value.
    pub fn construction(msg: impl Into<String>) -> Self {
        Self::Construction(msg.into())
    }

    /// Build a [`CanvasFxError::Load`] value.
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    /// Build a [`CanvasFxError::Module`] value.
    pub fn module(msg: impl Into<String>) -> Self {
        Self::Module(msg.into())
    }

    /// Build a [`CanvasFxError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CanvasFxError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for errors that must stop the caller from building around the object.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Construction(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
