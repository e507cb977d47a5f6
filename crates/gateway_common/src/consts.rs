//! Connector boundary const declarations.

/// Accepted response format
pub const ACCEPT_HEADER: &str = "application/json";

/// User agent sent with every outbound request
pub const USER_AGENT: &str = "Paymentwall-Gateway-Rust";
