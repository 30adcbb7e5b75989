//! modpanel library exports for testing

pub mod core;
pub mod fixture;
pub mod panel;
pub mod transport;

#[cfg(test)]
pub mod test_support;
