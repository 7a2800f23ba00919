//! profbin - self-describing binary files for collections of profile records
//!
//! A collection file is a count followed by that many records; each record
//! is its dimension header followed by arrays sized from those dimensions.
//!
//! ```ignore
//! use profbin::object::Cloud;
//! use profbin::session::{FileSession, ReadOptions, WriteOptions};
//!
//! let session = FileSession::new();
//! session.write("clouds.bin", &clouds, WriteOptions::default())?;
//! let mut destination = vec![Cloud::default(); 10];
//! let outcome = session.read("clouds.bin", &mut destination, ReadOptions::default())?;
//! ```

pub mod cli;
pub mod codec;
pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod object;
pub mod session;
