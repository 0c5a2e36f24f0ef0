use crate::{
    config::Config,
    errors::Result,
    github::{GitHubCliImpl, Outcome, PrunerIntegration},
};
use chrono::Utc;
use clap::Args;

#[derive(Debug, Args)]
pub struct Scan {
    /// Print the summary instead of writing it to the issue
    #[arg(long)]
    pub dry_run: bool,
}

impl Scan {
    pub fn execute(&self, config: Config) -> Result<()> {
        let github_cli = GitHubCliImpl::new(config.repository.clone());
        let integration = PrunerIntegration::new(github_cli, config);

        match integration.reconcile(Utc::now(), self.dry_run)? {
            Outcome::DryRun(body) => println!("{}", body),
            Outcome::NoInactiveBranches => println!("No inactive branches found"),
            Outcome::Created(number) => println!("Created summary issue #{}", number),
            Outcome::Updated(number) => println!("Updated summary issue #{}", number),
            Outcome::Unchanged(number) => println!("Summary issue #{} is up to date", number),
        }

        Ok(())
    }
}
