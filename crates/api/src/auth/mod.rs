//! Credentials: password hashes ([`password`]) and access tokens ([`jwt`]).

pub mod jwt;
pub mod password;
