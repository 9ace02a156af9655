//! Cross-platform Firebase Authentication bridge.
//!
//! The crate's core is a request/response correlation protocol over an
//! in-process, name-addressed notification hub: the shared authentication
//! API posts requests carrying a fresh correlation identifier, a native
//! executor answers on a response channel, and the bridge delivers each
//! result to exactly the caller that issued it — under any interleaving of
//! concurrent operations, cancellations, and duplicate or stray responses.
//! A separate unkeyed broadcast keeps an observable current-user cell in
//! sync with the native SDK.

pub mod auth;
pub mod bus;
pub mod logger;
pub mod util;
