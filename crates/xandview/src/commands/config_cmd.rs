//! Config subcommand handlers.

use std::fmt::Write as _;
use std::io::IsTerminal;

use dialoguer::Input;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Defaults, Profile};
use crate::error::CliError;
use crate::output::{self, OutputOpts};

use super::util;

// ── Helpers ─────────────────────────────────────────────────────────

/// TOML-like listing of the resolved config.
fn format_config(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let d = &cfg.defaults;
    let _ = writeln!(out, "\n[defaults]");
    let _ = writeln!(out, "output = \"{}\"", d.output);
    let _ = writeln!(out, "color = \"{}\"", d.color);
    let _ = writeln!(out, "node_count = {}", d.node_count);
    let _ = writeln!(out, "refresh_interval_secs = {}", d.refresh_interval_secs);
    let _ = writeln!(out, "cache_ttl_secs = {}", d.cache_ttl_secs);
    let _ = writeln!(out, "latency_ms = {}", d.latency_ms);
    let _ = writeln!(out, "retry_attempts = {}", d.retry_attempts);
    let _ = writeln!(out, "retry_delay_ms = {}", d.retry_delay_ms);

    for (name, p) in &cfg.profiles {
        let _ = writeln!(out, "\n[profiles.{name}]");
        let fields: [(&str, Option<String>); 7] = [
            ("seed", p.seed.map(|v| v.to_string())),
            ("node_count", p.node_count.map(|v| v.to_string())),
            ("high_uptime_fraction", p.high_uptime_fraction.map(|v| v.to_string())),
            ("high_success_fraction", p.high_success_fraction.map(|v| v.to_string())),
            ("recent_activity_fraction", p.recent_activity_fraction.map(|v| v.to_string())),
            ("refresh_interval_secs", p.refresh_interval_secs.map(|v| v.to_string())),
            ("latency_ms", p.latency_ms.map(|v| v.to_string())),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                let _ = writeln!(out, "{key} = {value}");
            }
        }
    }

    out.trim_end().to_owned()
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Ask for the profile name and its optional overrides.
fn prompt_profile() -> Result<(String, Profile), CliError> {
    let name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    let node_count: usize = Input::new()
        .with_prompt("Nodes to synthesize")
        .default(Defaults::default().node_count)
        .validate_with(|n: &usize| if *n >= 1 { Ok(()) } else { Err("must be at least 1") })
        .interact_text()
        .map_err(prompt_err)?;

    let seed: String = Input::new()
        .with_prompt("Seed for reproducible data (blank for random)")
        .allow_empty(true)
        .validate_with(|s: &String| {
            if s.trim().is_empty() || s.trim().parse::<u64>().is_ok() {
                Ok(())
            } else {
                Err("must be a non-negative integer")
            }
        })
        .interact_text()
        .map_err(prompt_err)?;

    let profile = Profile {
        seed: seed.trim().parse().ok(),
        node_count: Some(node_count),
        ..Profile::default()
    };
    Ok((name, profile))
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts, out: &OutputOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: guided setup ──────────────────────────────────────
        ConfigCommand::Init => {
            if !out.yes && !std::io::stdin().is_terminal() {
                return Err(CliError::NonInteractiveRequiresYes {
                    action: "config init".into(),
                });
            }

            let config_path = config::config_path();
            if config_path.exists()
                && !util::confirm(
                    &format!("Overwrite existing config at {}?", config_path.display()),
                    out.yes,
                )?
            {
                eprintln!("Aborted; existing config left unchanged.");
                return Ok(());
            }

            let (profile_name, profile) = if out.yes {
                ("default".to_owned(), Profile::default())
            } else {
                eprintln!("xandview configuration");
                eprintln!("   Config path: {}\n", config_path.display());
                prompt_profile()?
            };

            let mut cfg = Config {
                default_profile: Some(profile_name.clone()),
                ..Config::default()
            };
            cfg.profiles.insert(profile_name.clone(), profile);

            let path = config::save_config(&cfg)?;
            if !out.quiet {
                eprintln!("✓ Configuration written to {}", path.display());
                eprintln!("  Active profile: {profile_name}");
                eprintln!("\n  Try it: xandview network");
            }
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let rendered = output::render_single(out.format, &cfg, format_config, |c| {
                config::active_profile_name(global, c)
            })?;
            output::print_output(&rendered, out.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), out.quiet);
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: xandview config init");
                return Ok(());
            }
            let active = config::active_profile_name(global, &cfg);
            let listing = cfg
                .profiles
                .keys()
                .map(|name| {
                    if *name == active {
                        format!("{name} *")
                    } else {
                        name.clone()
                    }
                })
                .collect::<Vec<_>>()
                .join("\n");
            output::print_output(&listing, out.quiet);
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            if !out.quiet {
                eprintln!("✓ Default profile set to '{name}'");
            }
            Ok(())
        }
    }
}
