//! Version command

use anyhow::Result;

use crate::output::{OutputContext, human::HumanRenderer, json};

/// Run the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(ctx: &OutputContext, as_json: bool) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");

    if as_json {
        json::print(&serde_json::json!({ "version": version }))
    } else {
        HumanRenderer::new(ctx).render_version(version);
        Ok(())
    }
}
