//! CLI runner - executes commands

use crate::assignments::Course;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::cli::prompt::StdinPrompt;
use crate::client::CanvasClient;
use crate::config::ClientConfig;
use crate::error::{Result, ResultExt};
use crate::types::OptionStringExt;
use serde::Serialize;
use std::future::Future;
use tracing::{debug, info};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config(|key| std::env::var(key).ok())?;
        debug!("Using Canvas API at {}", config.base_url);

        let client = CanvasClient::new(&config)?;
        let prompt = StdinPrompt::stdin();
        let client = &client;

        match &self.cli.command {
            Commands::User => {
                self.guarded(client, &prompt, || async move {
                    client.current_user().await.into_result()
                })
                .await
            }
            Commands::Courses => {
                self.guarded(client, &prompt, || async move {
                    client.courses().await.into_result()
                })
                .await
            }
            command @ Commands::Assignments { .. } => {
                let selector = command.range_selector();
                info!("Fetching planner items for {}", selector.unwrap_or_default());
                self.guarded(client, &prompt, || async move {
                    client.assignments_in_window(selector).await.into_result()
                })
                .await
            }
            Commands::CourseAssignments { courses } => {
                self.guarded(client, &prompt, || async move {
                    let courses = if courses.is_empty() {
                        client.courses().await.into_result()?
                    } else {
                        courses.iter().copied().map(Course::new).collect()
                    };
                    client
                        .assignments_for_courses(&courses)
                        .await
                        .into_result()
                })
                .await
            }
            Commands::Complete { id, undo } => {
                let (id, complete) = (*id, !*undo);
                self.guarded(client, &prompt, || async move {
                    client.mark_complete(id, complete).await.into_result()
                })
                .await
            }
        }
    }

    /// Resolve configuration: file, then environment, then flags
    pub fn load_config(&self, env: impl Fn(&str) -> Option<String>) -> Result<ClientConfig> {
        let mut config = match self.cli.config {
            Some(ref path) => ClientConfig::from_file(path)?,
            None => ClientConfig::default(),
        }
        .apply_env_from(env);

        if let Some(base_url) = self.cli.base_url.clone().none_if_empty() {
            config.base_url = base_url;
        }
        if let Some(token) = self.cli.token.clone().none_if_empty() {
            config.token = Some(token);
        }

        config.validate()?;
        Ok(config)
    }

    /// Run one operation under the credential guard and print its result
    async fn guarded<T, F, Fut>(
        &self,
        client: &CanvasClient,
        prompt: &StdinPrompt,
        operation: F,
    ) -> Result<()>
    where
        T: Serialize,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let value = client.run_guarded(prompt, operation).await.into_result()?;
        println!("{}", render(&value, self.cli.format)?);
        Ok(())
    }
}

/// Serialize a result for stdout
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string(value),
        OutputFormat::Pretty => serde_json::to_string_pretty(value),
    };
    rendered.context("Failed to serialize output")
}
