#[cfg(test)]
mod memory;
mod user_repository;

#[cfg(test)]
pub use memory::InMemoryUserRepository;
pub use user_repository::{PgUserRepository, UserRepository};
