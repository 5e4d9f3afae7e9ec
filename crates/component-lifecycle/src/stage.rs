//! # Stage Machine
//!
//! A component moves through a fixed, totally ordered sequence of stages:
//!
//! ```text
//! Unborn -> Constructed -> Running -> NotifiedPeersStopping -> TornDown
//! ```
//!
//! The orchestrator advances a cell one stage at a time and never backward. Because
//! [`ComponentCell::wait_stage`](crate::ComponentCell::wait_stage) matches the target
//! stage exactly, every waiter must target a stage the cell is guaranteed to stop at
//! (or cancellation must fire first).

use std::fmt;

/// A point in a component's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LifetimeStage {
    /// Registered, nothing constructed yet.
    #[default]
    Unborn,
    /// The factory finished and the instance sits in the cell.
    Constructed,
    /// `on_all_components_loaded` completed.
    Running,
    /// `on_all_components_are_stopping` completed.
    NotifiedPeersStopping,
    /// The instance was extracted and stopped.
    TornDown,
}

impl LifetimeStage {
    /// All stages in lifecycle order.
    pub const ALL: [LifetimeStage; 5] = [
        LifetimeStage::Unborn,
        LifetimeStage::Constructed,
        LifetimeStage::Running,
        LifetimeStage::NotifiedPeersStopping,
        LifetimeStage::TornDown,
    ];

    /// The stage that directly follows this one, if any.
    pub fn next(self) -> Option<LifetimeStage> {
        match self {
            LifetimeStage::Unborn => Some(LifetimeStage::Constructed),
            LifetimeStage::Constructed => Some(LifetimeStage::Running),
            LifetimeStage::Running => Some(LifetimeStage::NotifiedPeersStopping),
            LifetimeStage::NotifiedPeersStopping => Some(LifetimeStage::TornDown),
            LifetimeStage::TornDown => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LifetimeStage::Unborn => "unborn",
            LifetimeStage::Constructed => "constructed",
            LifetimeStage::Running => "running",
            LifetimeStage::NotifiedPeersStopping => "notified_peers_stopping",
            LifetimeStage::TornDown => "torn_down",
        }
    }
}

impl fmt::Display for LifetimeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
