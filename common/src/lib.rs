//! Wire types shared by the AgênciaOS backend and its clients.
//!
//! - `model`: tenant-owned entities as they are returned by the API.
//! - `requests`: JSON payloads accepted by the API.
//! - `jobs`: the public view of a pipeline job.

#[macro_use]
mod macros;

pub mod jobs;
pub mod model;
pub mod requests;
