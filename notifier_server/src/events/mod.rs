//! Job status events.
//!
//! The decision engine never mutates state itself; it returns a
//! `StatusUpdate` that the caller applies to the job's `JobStatus`.

pub mod status;
