//! Models command handler.

use anyhow::Result;

use scanbrief::config::Config;
use scanbrief::providers::{family_spec, ModelCatalog};

/// Print the capability table.
pub(crate) fn cmd_models(config: &Config) -> Result<()> {
    let catalog = ModelCatalog::new(&config.analysis.default_model)?;

    println!(
        "  {:<32} {:<14} {:<38} {:<8} {:<22} {}",
        "KEY", "PROVIDER", "WIRE NAME", "SYSTEM", "TOKEN FIELD", "SAMPLING"
    );
    for m in catalog.models() {
        let marker = if m.key == catalog.default_key() { "*" } else { " " };
        let caps = m.capabilities;
        println!(
            "{} {:<32} {:<14} {:<38} {:<8} {:<22} {}",
            marker,
            m.key,
            family_spec(m.family).display_name,
            m.wire_name,
            if caps.uses_system_role { "yes" } else { "no" },
            caps.token_limit_kind.field_name(),
            if caps.supports_sampling_params { "yes" } else { "no" },
        );
    }
    println!();
    println!("* default model");

    Ok(())
}
