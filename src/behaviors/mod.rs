pub(crate) mod seek;
pub(crate) mod separation;
