mod hash;

pub use hash::short_digest;
