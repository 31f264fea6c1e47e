pub mod builders;
pub mod executor;
pub mod payload;
pub mod resolver;
pub mod services;
