#![forbid(unsafe_code)]

//! Core: animation curves, keyframe interpolation, springs, scroll geometry,
//! and host input events.
//!
//! Everything in this crate is pure and deterministic. Time only advances
//! when the caller ticks an animation with an explicit [`std::time::Duration`].

pub mod animation;
pub mod event;
pub mod exposure;
pub mod geometry;
