//! ECS resources made available to systems.
//!
//! This module groups the long-lived data the tick schedule and the render
//! pass share. Each submodule documents the semantics and intended usage of
//! its resource(s).
//!
//! Overview
//! - `debugmode` – presence toggles the debug overlay
//! - `imagestore` – shared immutable source images and sheet cropping
//! - `layoutrefresh` – layout refresh requests raised on corner arrival
//! - `motionstate` – the motion state machine
//! - `petconfig` – construction-time constants loaded from INI
//! - `petwindow` – position and size of the movable pet window
//! - `screensize` – dimensions of the screen the pet walks on
//! - `transformcache` – memoized scale/mirror/rotate variants of images
pub mod debugmode;
pub mod imagestore;
pub mod layoutrefresh;
pub mod motionstate;
pub mod petconfig;
pub mod petwindow;
pub mod screensize;
pub mod transformcache;
