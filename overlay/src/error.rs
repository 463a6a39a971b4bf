//! Error types for the ruler window

use crate::platform::PlatformError;

#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error("no system fonts available for text measurement")]
    NoFonts,
}

/// Errors that prevent the ruler window from starting
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    #[error(transparent)]
    Platform(#[from] PlatformError),
    #[error(transparent)]
    Renderer(#[from] RendererError),
}
