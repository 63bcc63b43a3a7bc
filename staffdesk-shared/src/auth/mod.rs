//! Authentication primitives
//!
//! - `password`: Argon2id hashing and constant-time verification
//! - `session`: the session cookie payload carried through each request

pub mod password;
pub mod session;
