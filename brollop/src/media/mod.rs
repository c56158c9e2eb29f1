//! Guest photo processing.
//!
//! Every uploaded photo is re-encoded by [`normalize`] into a bounded-size JPEG before it is
//! stored, and [`upload`] drives a multi-file upload one file at a time through normalization,
//! object storage and the `photos` table.

pub mod normalize;
pub mod upload;
