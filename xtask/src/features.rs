use std::process::Command;

use anyhow::{Context, Result};

/// `vpnrest-common` is feature-gated per tier; every tier must build alone.
const FEATURE_COMBINATIONS: &[&[&str]] = &[
    &[], // default (empty)
    &["foundation"],
    &["storage"],
    &["foundation", "storage"],
];

/// Check that every feature combination of `vpnrest-common` compiles and
/// passes its tests.
pub fn test_feature_matrix() -> Result<()> {
    println!("Testing {} vpnrest-common feature combinations...", FEATURE_COMBINATIONS.len());

    for (index, features) in FEATURE_COMBINATIONS.iter().enumerate() {
        let joined = features.join(",");
        let label = if features.is_empty() { "none" } else { joined.as_str() };

        println!(
            "\n[{}/{}] cargo test -p vpnrest-common ({label})",
            index + 1,
            FEATURE_COMBINATIONS.len()
        );

        let mut command = Command::new("cargo");
        command.args(["test", "-p", "vpnrest-common", "--no-default-features"]);
        if !features.is_empty() {
            command.arg("--features").arg(&joined);
        }

        let status = command
            .status()
            .with_context(|| format!("Failed to run cargo test for '{label}'"))?;

        if !status.success() {
            anyhow::bail!("Feature combination '{label}' failed");
        }

        println!("✅ Features '{label}' passed");
    }

    println!("\n✅ All {} feature combinations pass!", FEATURE_COMBINATIONS.len());

    Ok(())
}
