//! Transition handles - the seam between the engine and the animation layer
//!
//! The engine never inspects animation parameters. It asks an [`Animator`] to
//! play a [`Transition`] and gets back a [`TransitionHandle`] it can await.
//! A handle resolves when the animation finishes; if the animation side is torn
//! down first (the completer is dropped), the handle resolves as
//! [`TransitionStatus::Interrupted`] and the engine treats the element as if it
//! had arrived, so no in-flight bookkeeping can hang.

use tokio::sync::oneshot;

use crate::core::ElementId;
use crate::types::{Anchor, Coord, RocketDirection};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// Matched cube flies into the cell where a special item will appear.
    Converge {
        element: ElementId,
        from: Coord,
        to: Anchor,
    },
    /// Existing element falls to a lower cell.
    Fall {
        element: ElementId,
        to: Coord,
        anchor: Anchor,
    },
    /// Refilled element drops in from above the grid.
    Spawn {
        element: ElementId,
        to: Coord,
        from: Anchor,
        anchor: Anchor,
    },
    /// Rocket launch and its sweep along a lane. `element` is `None` for the
    /// virtual rockets of a combo.
    RocketLaunch {
        element: Option<ElementId>,
        origin: Coord,
        direction: RocketDirection,
        anchor: Anchor,
    },
}

impl Transition {
    /// Element being animated, if any.
    pub fn element(&self) -> Option<ElementId> {
        match *self {
            Transition::Converge { element, .. }
            | Transition::Fall { element, .. }
            | Transition::Spawn { element, .. } => Some(element),
            Transition::RocketLaunch { element, .. } => element,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionStatus {
    Completed,
    Interrupted,
}

/// Awaitable completion of one transition.
#[derive(Debug)]
pub struct TransitionHandle {
    rx: Option<oneshot::Receiver<()>>,
}

/// Animation-side half of a pending transition.
#[derive(Debug)]
pub struct TransitionDone {
    tx: oneshot::Sender<()>,
}

impl TransitionDone {
    pub fn complete(self) {
        let _ = self.tx.send(());
    }
}

impl TransitionHandle {
    /// A handle that is already finished.
    pub fn ready() -> Self {
        Self { rx: None }
    }

    /// A pending handle and the completer that finishes it.
    pub fn pending() -> (Self, TransitionDone) {
        let (tx, rx) = oneshot::channel();
        (Self { rx: Some(rx) }, TransitionDone { tx })
    }

    pub async fn finished(self) -> TransitionStatus {
        match self.rx {
            None => TransitionStatus::Completed,
            Some(rx) => match rx.await {
                Ok(()) => TransitionStatus::Completed,
                Err(_) => TransitionStatus::Interrupted,
            },
        }
    }
}

/// Presentation layer hook.
pub trait Animator {
    fn play(&mut self, transition: Transition) -> TransitionHandle;
}

impl<A: Animator + ?Sized> Animator for &mut A {
    fn play(&mut self, transition: Transition) -> TransitionHandle {
        (**self).play(transition)
    }
}

/// Completes every transition immediately (headless play, tests).
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantAnimator;

impl Animator for InstantAnimator {
    fn play(&mut self, _transition: Transition) -> TransitionHandle {
        TransitionHandle::ready()
    }
}

/// Completes immediately and remembers everything it was asked to play.
#[derive(Debug, Clone, Default)]
pub struct RecordingAnimator {
    pub played: Vec<Transition>,
}

impl RecordingAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.played.clear();
    }

    pub fn count(&self, mut filter: impl FnMut(&Transition) -> bool) -> usize {
        self.played.iter().filter(|t| filter(t)).count()
    }
}

impl Animator for RecordingAnimator {
    fn play(&mut self, transition: Transition) -> TransitionHandle {
        self.played.push(transition);
        TransitionHandle::ready()
    }
}
