pub mod cli;
pub mod correlator;
pub mod integration;
pub mod types;


pub use cli::{GitHubCli, GitHubCliImpl};
pub use integration::{Outcome, PrunerIntegration};
