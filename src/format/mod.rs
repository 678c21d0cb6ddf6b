//! Format parsers for Whole Slide Image containers.
//!
//! Only the generic TIFF layer lives here. Vendor interpretation of the
//! directories it produces is left to callers.

pub mod tiff;
