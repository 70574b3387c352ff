//! HTTP gateway for the CV evidence assessor (used by the `assessor` binary and tests).

pub mod gateway;
