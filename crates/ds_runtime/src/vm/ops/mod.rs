//! VM operation implementations.

pub(crate) mod access;
pub(crate) mod call;
pub(crate) mod collection;
pub(crate) mod compare;
pub(crate) mod dice;
pub(crate) mod math;
pub(crate) mod names;
