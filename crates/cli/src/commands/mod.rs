pub(crate) mod diagnose;
pub(crate) mod label;
pub(crate) mod rules;
