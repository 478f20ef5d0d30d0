//! Command queue feeding the player.
//!
//! Gesture handlers, listeners and loader threads hold a [`CommandSender`] and
//! post [`PlayerCommand`]s; the owning context applies them in send order at
//! the start of the next `tick()` (or on `apply_pending()`), so every mutation
//! of playback state happens on one thread.

use crossbeam_channel::{Receiver, Sender, TryRecvError};
use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::ids::LoadGeneration;
use crate::settings::{AnimationSettings, Color, Direction, PlayMode, Segment};

/// Token identifying one in-flight load.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadTicket {
    pub generation: LoadGeneration,
}

/// Every public playback mutation, as a message.
#[derive(Clone, Debug, PartialEq)]
pub enum PlayerCommand {
    Play,
    Pause,
    Stop,
    SetFrame(f32),
    SetSpeed(u32),
    SetDirection(Direction),
    SetLoop(bool),
    SetPlayMode(PlayMode),
    SetSegments(Option<Segment>),
    SetBackgroundColor(Option<Color>),
    Resize {
        width: u32,
        height: u32,
    },
    Freeze,
    Unfreeze,
    /// Result of an off-thread fetch started with `begin_load`.
    CompleteLoad {
        ticket: LoadTicket,
        result: Result<Vec<u8>, FetchError>,
        settings: Option<AnimationSettings>,
    },
}

/// Cloneable, `Send` handle for posting commands.
#[derive(Clone, Debug)]
pub struct CommandSender {
    tx: Sender<PlayerCommand>,
}

impl CommandSender {
    /// Post a command. Returns false when the player has been dropped.
    pub fn send(&self, cmd: PlayerCommand) -> bool {
        self.tx.send(cmd).is_ok()
    }
}

/// Receiving side, owned by the player.
#[derive(Debug)]
pub struct CommandQueue {
    tx: Sender<PlayerCommand>,
    rx: Receiver<PlayerCommand>,
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandQueue {
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx }
    }

    pub fn sender(&self) -> CommandSender {
        CommandSender {
            tx: self.tx.clone(),
        }
    }

    /// Take up to `limit` queued commands in send order.
    pub fn drain(&self, limit: usize) -> Vec<PlayerCommand> {
        let mut out = Vec::new();
        while out.len() < limit {
            match self.rx.try_recv() {
                Ok(cmd) => out.push(cmd),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        out
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
