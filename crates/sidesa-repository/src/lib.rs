//! # Sidesa Repository
//!
//! Data access for the `users` table.
//!
//! ```text
//! Service
//!   ↓  Transactional::begin / commit / rollback
//!   ↓  UserRepository (every call takes &mut Tx)
//! MySqlUserRepository  |  InMemoryUserRepository
//!   ↓                      ↓
//! MySQL (sqlx)           InMemoryDatabase
//! ```

pub mod memory;
pub mod mysql;
pub mod pool;
pub mod traits;

pub use memory::{InMemoryDatabase, InMemoryUserRepository, MemoryTransaction};
pub use mysql::*;
pub use pool::*;
pub use traits::*;
