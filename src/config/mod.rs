pub mod traits;
pub mod evolution;
pub mod persistence;
pub mod pool;
pub mod manager;

pub use manager::{ConfigManager, AppConfig};
pub use evolution::EvolutionConfig;
pub use persistence::PersistenceConfig;
pub use pool::PoolConfig;
