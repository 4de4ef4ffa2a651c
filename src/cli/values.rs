//! Resolver-backed commands: set, get, list.

use tracing::info;

use super::{output, Context};
use crate::core::resolver::SetOutcome;
use crate::error::Result;

/// Encrypt and store a value.
pub fn set(ctx: &Context, name: &str, value: &str) -> Result<()> {
    info!("Setting value: {}", name);
    match ctx.resolver.set(name, value)? {
        SetOutcome::Stored => output::success(&format!(
            "stored {}",
            output::key(&ctx.resolver.full_name(name))
        )),
        SetOutcome::Suppressed => output::warn(&format!(
            "not stored: {} is overridden by {}",
            name,
            output::key(&ctx.resolver.override_id(name))
        )),
    }
    Ok(())
}

/// Resolve a value.
pub fn get(ctx: &Context, name: &str, default: &str, json: bool) -> Result<()> {
    let resolved = ctx.resolver.get_with_provenance(name, default);
    if json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
    } else {
        println!("{}", resolved.value);
    }
    Ok(())
}

/// List stored keys with their encryption state.
pub fn list(ctx: &Context, json: bool) -> Result<()> {
    let entries = ctx.store.inner().load()?;

    if json {
        let keys: Vec<serde_json::Value> = entries
            .iter()
            .map(|(key, value)| {
                serde_json::json!({
                    "key": key,
                    "encrypted": ctx.resolver.is_encrypted(value),
                })
            })
            .collect();
        let result = serde_json::json!({
            "keys": keys,
            "count": entries.len(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if entries.is_empty() {
        output::dimmed("no values stored");
    } else {
        for (key, value) in &entries {
            let state = if ctx.resolver.is_encrypted(value) {
                "encrypted"
            } else {
                "plaintext"
            };
            output::list_item(&format!("{} ({})", key, state));
        }
        output::kv("total", entries.len());
    }

    Ok(())
}
