mod stats;

pub(crate) use stats::*;
