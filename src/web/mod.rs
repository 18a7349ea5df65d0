//! HTTP front end for the simulator.
//!
//! Serves a small form, the default configuration and a JSON simulation
//! endpoint. All simulation work happens in [`crate::simulator`].
//!
//! ## Usage
//!
//! Build with web feature:
//! ```sh
//! cargo build --features web
//! ```
//!
//! Run with web server:
//! ```sh
//! ./target/debug/taloon-sim --serve        # Default port 3000
//! ./target/debug/taloon-sim --serve=8080   # Custom port
//! ```
//!
//! Then open http://localhost:3000 in your browser.

mod server;

pub use server::{form_defaults, router, start_web_server, Constraints, FormDefaults};
