//! Fog system error types.

/// Lifecycle and registration errors.
///
/// None of these occur in normal operation; each one signals misuse by the
/// host.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FogError {
    /// `update` was called before `start`.
    #[error("fog of war system updated before start")]
    NotStarted,

    /// `start` was called on a system that is already running.
    #[error("fog of war system already started")]
    AlreadyStarted,

    /// A registration was sent after the fog system was dropped.
    #[error("fog of war system is gone; registration dropped")]
    Disconnected,
}
