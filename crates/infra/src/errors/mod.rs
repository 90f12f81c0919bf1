//! Error conversions between infrastructure libraries and the domain error

pub(crate) mod conversions;

pub use conversions::InfraError;
