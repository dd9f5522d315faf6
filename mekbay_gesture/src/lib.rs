// Copyright 2025 the MekBay Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=mekbay_gesture --heading-base-level=0

//! MekBay Gesture: pointer gesture recognition for the record-sheet viewers.
//!
//! This crate turns raw pointer and wheel samples into normalized gesture
//! events. It is split into small, focused pieces:
//!
//! - [`PointerSet`]: per-pointer movement deltas and total offsets for the (at
//!   most two) pointers of the current gesture.
//! - [`TapState`]: double-tap recognition with spatial/temporal tolerance.
//! - [`VelocityTracker`]: exponentially smoothed horizontal velocity.
//! - [`GestureRecognizer`]: the state machine classifying a gesture as a pan,
//!   a swipe, or a pinch.
//!
//! The recognizer does not know about transforms, pages, or the DOM. Each call
//! receives a [`GestureContext`] describing what the viewer currently allows,
//! and returns [`GestureEvent`]s for the caller to apply.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Point;
//! use mekbay_gesture::{
//!     GestureConfig, GestureContext, GestureEvent, GestureRecognizer, PointerId, PointerInput,
//! };
//!
//! let mut recognizer = GestureRecognizer::new(GestureConfig::default());
//! let ctx = GestureContext { at_min_zoom: true, swipe_enabled: true, ..Default::default() };
//! let id = PointerId(7);
//!
//! recognizer.pointer_down(PointerInput::new(id, Point::new(300.0, 200.0), 0), &ctx);
//! // A mostly-horizontal drag at minimum zoom becomes a swipe once it passes
//! // the swipe threshold.
//! let events = recognizer.pointer_move(PointerInput::new(id, Point::new(260.0, 204.0), 40), &ctx);
//! assert_eq!(events[0], GestureEvent::SwipeStart);
//!
//! let events = recognizer.pointer_up(PointerInput::new(id, Point::new(250.0, 204.0), 60), &ctx);
//! assert!(matches!(events[1], GestureEvent::SwipeEnd { total_dx, .. } if total_dx == -50.0));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod config;
mod pointers;
mod recognizer;
mod tap;
mod types;
mod velocity;

pub use config::GestureConfig;
pub use pointers::{PointerId, PointerSet, TrackedPointer};
pub use recognizer::{GesturePhase, GestureRecognizer};
pub use tap::{TapResult, TapState};
pub use types::{
    GestureContext, GestureEvent, GestureEvents, GestureLocks, PointerInput, TargetFlags,
    WheelInput,
};
pub use velocity::VelocityTracker;
