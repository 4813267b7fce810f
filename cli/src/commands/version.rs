//! Version command

use anyhow::Result;

use crate::app::AppContext;
use crate::output::json;

/// Run the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(app: &AppContext) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");

    if app.is_json() {
        println!("{}", json::to_pretty(&serde_json::json!({ "version": version }))?);
    } else {
        app.renderer().render_version(version);
    }
    Ok(())
}
