//! Doctor command - check environment setup.

use crate::api::Environment;
use crate::config::{CiPlatform, API_KEY_VAR, ENVIRONMENT_VAR, FAIL_ON_VAR, PROJECT_ID_VAR};
use anyhow::Result;
use console::style;

fn check_var(name: &str) {
    let set = std::env::var(name).map(|v| !v.trim().is_empty()).unwrap_or(false);
    if set {
        println!("    {} {}", style("[OK]").green(), name);
    } else {
        println!("    {} {}", style("[--]").dim(), name);
    }
}

pub fn run() -> Result<()> {
    println!("\npentest-ci doctor\n");

    println!("  Environment variables:");
    check_var(API_KEY_VAR);
    check_var(PROJECT_ID_VAR);
    check_var(ENVIRONMENT_VAR);
    check_var(FAIL_ON_VAR);

    println!();
    match CiPlatform::detect() {
        Some(platform) => {
            println!("  {} CI platform: {}", style("[OK]").green(), platform);
            match platform.branch() {
                Some(branch) => println!("      branch: {}", style(branch).cyan()),
                None => println!("      branch: {}", style("not detected").dim()),
            }
            match platform.repo_id() {
                Some(id) => println!("      repo id: {}", style(id).cyan()),
                None => println!("      repo id: {}", style("not detected").dim()),
            }
        }
        None => println!(
            "  {} CI platform: none detected (pass --project-id or --repo-id explicitly)",
            style("[--]").dim()
        ),
    }

    let environment = std::env::var(ENVIRONMENT_VAR)
        .ok()
        .as_deref()
        .and_then(Environment::parse);
    println!();
    println!(
        "  Endpoint: {}",
        style(Environment::base_url(environment)).cyan()
    );

    println!();
    Ok(())
}
