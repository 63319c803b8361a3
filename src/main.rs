//! Kodegen Distribute - package and publish every distribution of a project.

use kodegen_bundler_distribute::cli;
use kodegen_bundler_distribute::cli::OutputManager;
use std::process;

#[tokio::main]
async fn main() {
    match cli::run().await {
        Ok(exit_code) => process::exit(exit_code),
        Err(e) => {
            let output = OutputManager::new(false);
            output.error(&format!("Fatal error: {e}"));

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                let _ = output.println("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    let _ = output.indent(&suggestion);
                }
            }
            process::exit(1);
        }
    }
}
