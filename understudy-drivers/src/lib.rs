//! Driver layer for WebDriver-based browser automation.
//!
//! This crate exposes the session factory plus the interaction helpers that
//! step-definition layers call when driving a browser through `fantoccini`.
//!
//! - [`session`]: connect to / close a WebDriver session
//! - [`interact`]: tab switching, clickable waits, alerts, presence checks,
//!   retry-on-staleness clicking, text-appearance waits
//! - [`wait`]: the bounded poll-with-timeout primitive behind every wait
pub mod interact;
pub mod session;
pub mod wait;
