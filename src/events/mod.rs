//! # Events Module
//!
//! Progress reporting for the cleaner.
//!
//! ## Design
//! The pipeline emits events through a channel so the CLI can draw a
//! progress bar on its own thread while groups are processed in order.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         if let Event::Group(GroupEvent::Completed { index }) = event {
//!             println!("Group {} done", index);
//!         }
//!     }
//! });
//!
//! cleaner.run_with_events(&sender)?;
//! ```

mod channel;
mod types;

pub use channel::{null_sender, EventChannel, EventReceiver, EventSender};
pub use types::*;
