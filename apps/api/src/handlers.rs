pub mod auth;
pub mod health;
pub mod scores;
pub mod tracking;
pub mod users;

#[cfg(test)]
pub(crate) mod test_support;
