//! A concurrent key-value map whose readers can wait for a key to be written.
//!
//! `wait-map` provides a [`WaitMap`] storing `i64` keys and values where a
//! `get` on a missing key blocks, up to a caller-supplied deadline, until
//! some other task `put`s the value. This covers the "wait for a result, but
//! not forever" shape of memoized or in-flight computations where many
//! callers want the same answer once a single producer finishes.
//!
//! # Features
//!
//! - Immediate, non-blocking reads when the value is already present
//! - Bounded waits: a missing read fails with [`Error::WaitTimeout`] rather
//!   than hanging
//! - One shared signal per key, so any number of concurrent waiters are all
//!   released by the single `put` that supplies the value
//! - Writes never block and never fail; later writes are plain overwrites
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use wait_map::WaitMap;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), wait_map::Error> {
//!     let map = Arc::new(WaitMap::new());
//!
//!     let waiter = tokio::spawn({
//!         let map = Arc::clone(&map);
//!         async move { map.get(2, Duration::from_secs(5)).await }
//!     });
//!
//!     map.put(2, 42);
//!     assert_eq!(waiter.await.unwrap()?, 42);
//!     Ok(())
//! }
//! ```

mod error;
mod map;
mod signal;

pub use error::Error;
pub use map::WaitMap;
