//! Battery charge threshold hardware layer
//!
//! Locates the charge-limit control file exposed under `/sys/class/power_supply`,
//! reads its current value and rewrites it through an elevation helper
//! (`pkexec` by default) so that only the single write runs privileged.
//!
//! # Example
//!
//! ```no_run
//! use chargelimit_hal::{ElevatedWriter, ThresholdWriter, DEFAULT_PATTERN, read_threshold, resolve, validate};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let path = resolve(DEFAULT_PATTERN)?;
//!     println!("{}", read_threshold(&path).label());
//!
//!     let value = validate("80")?;
//!     ElevatedWriter::new().write(&path, value)?;
//!     Ok(())
//! }
//! ```

pub mod mock;
pub mod resolver;
pub mod threshold;
pub mod validate;
pub mod writer;

pub use resolver::{ControlPath, DEFAULT_PATTERN, ResolveError, resolve, resolve_all};
pub use threshold::{DisplayState, read_threshold};
pub use validate::{MAX_THRESHOLD, MIN_THRESHOLD, Threshold, ValidationError, validate};
pub use writer::{ElevatedWriter, ThresholdWriter, WriteError};

