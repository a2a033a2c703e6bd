//! Human-readable terminal renderer.

use datacats_common::CreateReport;
use owo_colors::OwoColorize as _;

use crate::application::services::purge::PurgeOutcome;
use crate::domain::DatacatsConfig;
use crate::output::OutputContext;

/// Renders command results as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        if self.ctx.quiet {
            return;
        }
        println!("datacats {version}");
    }

    /// Render the summary of a finished `create`.
    ///
    /// The final line is printed even in quiet mode since scripts depend on it.
    pub fn render_create(&self, report: &CreateReport) {
        if !self.ctx.quiet {
            println!();
            self.ctx.kv("Project:", &report.project);
            self.ctx.kv("Source:", &report.target);
            self.ctx.kv("Data:", &report.datadir);
            if !report.containers.is_empty() {
                self.ctx.kv("Containers:", &report.containers.join(", "));
            }
            println!();
        }
        match &report.url {
            Some(url) => println!("Site available at {}", url.style(self.ctx.styles.url)),
            None => println!("Image state prepared"),
        }
    }

    /// Render the summary of a finished `purge`.
    pub fn render_purge(&self, project: &str, outcome: &PurgeOutcome) {
        if outcome.removed_containers.is_empty() && !outcome.datadir_removed {
            self.ctx
                .info(&format!("Nothing to remove for project \"{project}\""));
            return;
        }
        self.ctx.success(&format!("Project \"{project}\" purged"));
    }

    /// Render the effective configuration.
    pub fn render_config(&self, config: &DatacatsConfig, path: &str) {
        self.ctx.header("Configuration");
        self.ctx.kv("File:", path);
        println!();
        self.ctx.kv("images.web:", &config.images.web);
        self.ctx.kv("images.data:", &config.images.data);
        self.ctx.kv("images.search:", &config.images.search);
        self.ctx.kv("runtime.program:", &config.runtime.program);
        self.ctx.kv(
            "runtime.timeout_secs:",
            &config
                .runtime
                .timeout_secs
                .map_or_else(|| "none".to_owned(), |s| s.to_string()),
        );
        self.ctx
            .kv("provision.rollback:", &config.provision.rollback.to_string());
    }
}
