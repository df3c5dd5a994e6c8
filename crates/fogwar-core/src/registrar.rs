//! Cross-thread registration queue applied between ticks.
//!
//! Spawn and despawn logic running off the simulation thread sends commands
//! through a [`FogRegistrar`]; the fog system drains them at the start of
//! the next tick, before the detector snapshot is built.

use crossbeam_channel::{Receiver, Sender};

use crate::error::FogError;
use crate::host::{PositionSource, ScalarParamSink};

/// A deferred registry mutation.
pub enum FogCommand {
    /// Register a detector.
    AddDetector {
        /// Unique detector name.
        name: String,
        /// Live position of the detector.
        source: Box<dyn PositionSource + Send>,
    },
    /// Unregister a detector.
    RemoveDetector(String),
    /// Register a subscriber.
    AddSubscriber {
        /// Unique subscriber name.
        name: String,
        /// Live position of the subscriber.
        source: Box<dyn PositionSource + Send>,
        /// Material alpha target, if one is bound.
        target: Option<Box<dyn ScalarParamSink + Send>>,
    },
    /// Unregister a subscriber.
    RemoveSubscriber(String),
}

impl std::fmt::Debug for FogCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AddDetector { name, .. } => f.debug_tuple("AddDetector").field(name).finish(),
            Self::RemoveDetector(name) => f.debug_tuple("RemoveDetector").field(name).finish(),
            Self::AddSubscriber { name, target, .. } => f
                .debug_struct("AddSubscriber")
                .field("name", name)
                .field("targeted", &target.is_some())
                .finish(),
            Self::RemoveSubscriber(name) => {
                f.debug_tuple("RemoveSubscriber").field(name).finish()
            }
        }
    }
}

/// Cloneable, `Send` handle for queueing registrations.
#[derive(Clone, Debug)]
pub struct FogRegistrar {
    sender: Sender<FogCommand>,
}

impl FogRegistrar {
    /// Queues a detector registration.
    pub fn add_detector(
        &self,
        name: impl Into<String>,
        source: impl PositionSource + Send + 'static,
    ) -> Result<(), FogError> {
        self.send(FogCommand::AddDetector {
            name: name.into(),
            source: Box::new(source),
        })
    }

    /// Queues a detector removal.
    pub fn remove_detector(&self, name: impl Into<String>) -> Result<(), FogError> {
        self.send(FogCommand::RemoveDetector(name.into()))
    }

    /// Queues a subscriber registration with a material target.
    pub fn add_subscriber(
        &self,
        name: impl Into<String>,
        source: impl PositionSource + Send + 'static,
        target: impl ScalarParamSink + Send + 'static,
    ) -> Result<(), FogError> {
        self.send(FogCommand::AddSubscriber {
            name: name.into(),
            source: Box::new(source),
            target: Some(Box::new(target)),
        })
    }

    /// Queues a subscriber removal.
    pub fn remove_subscriber(&self, name: impl Into<String>) -> Result<(), FogError> {
        self.send(FogCommand::RemoveSubscriber(name.into()))
    }

    /// Queues an arbitrary command.
    pub fn send(&self, command: FogCommand) -> Result<(), FogError> {
        self.sender.send(command).map_err(|_| FogError::Disconnected)
    }
}

/// Receiving end owned by the fog system.
pub(crate) struct CommandQueue {
    sender: Sender<FogCommand>,
    receiver: Receiver<FogCommand>,
}

impl CommandQueue {
    pub(crate) fn new() -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        Self { sender, receiver }
    }

    pub(crate) fn registrar(&self) -> FogRegistrar {
        FogRegistrar {
            sender: self.sender.clone(),
        }
    }

    /// Commands queued so far, in send order.
    pub(crate) fn drain(&self) -> impl Iterator<Item = FogCommand> + '_ {
        self.receiver.try_iter()
    }
}
