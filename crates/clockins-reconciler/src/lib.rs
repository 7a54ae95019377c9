//! `clockins-reconciler` — turns job/duty changes into shift rows.
//!
//! # Overview
//!
//! The [`Reconciler`] polls a [`PlayerRegistry`] on a fixed interval and
//! compares each player's job against the last state it saw:
//!
//! | Change                          | Writes                               |
//! |---------------------------------|--------------------------------------|
//! | none                            | nothing                              |
//! | onto an on-duty job             | close open shift, open a new one     |
//! | off duty / onto `unemployed`    | close open shift                     |
//! | disconnect                      | close open shift (immediately)       |
//! | process start                   | close every open shift, then re-poll |

pub mod cache;
pub mod engine;
pub mod error;
pub mod registry;

pub use cache::JobCache;
pub use engine::{Reconciler, TickReport};
pub use error::{ReconcileError, Result};
pub use registry::{JobInfo, PlayerData, PlayerRegistry, PlayerSnapshot};
