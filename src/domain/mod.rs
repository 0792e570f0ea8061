//! Domain layer containing business entities and logic.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`click_event`] - Click tracking event model
//! - [`click_recorder`] - Best-effort click persistence
//! - [`click_worker`] - Asynchronous click processing worker
//!
//! # Click Processing Flow
//!
//! 1. The redirect resolver builds a [`click_event::ClickEvent`]
//! 2. Cache hit: the event is sent to the bounded click channel and the
//!    redirect is answered immediately
//! 3. Cache miss: the event is recorded inline, single attempt
//! 4. [`click_worker::run_click_worker`] drains the channel with retries
//! 5. Both paths persist through [`click_recorder::ClickRecorder`]

pub mod click_event;
pub mod click_recorder;
pub mod click_worker;
pub mod entities;
pub mod repositories;
