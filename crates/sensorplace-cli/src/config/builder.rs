use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::PlaceArgs;
use crate::error::{CliError, Result};
use sensorplace::engine::config as core_config;
use std::str::FromStr;

/// Resolves every parameter with precedence flag > `-S` override > file > default.
pub fn build_config(args: &PlaceArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = if let Some(config_path) = &args.config {
        FileConfig::from_file(config_path)?
    } else {
        FileConfig::default()
    };

    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let domain = file_config.domain.take().unwrap_or_default();
    let objective = file_config.objective.take().unwrap_or_default();
    let descent = file_config.descent.take().unwrap_or_default();
    let convergence = file_config.convergence.take().unwrap_or_default();
    let output = file_config.output.take().unwrap_or_default();

    let restart_on_stall = if args.no_restart {
        false
    } else {
        descent.restart_on_stall.unwrap_or(defaults.restart_on_stall)
    };
    let require_convergence = if args.strict {
        true
    } else {
        convergence
            .require_convergence
            .unwrap_or(defaults.require_convergence)
    };

    let mut builder = core_config::PlacementConfigBuilder::new()
        .nx(args.nx.or(domain.nx).unwrap_or(defaults.nx))
        .ny(args.ny.or(domain.ny).unwrap_or(defaults.ny))
        .fraction(args.fraction.or(domain.fraction).unwrap_or(defaults.fraction))
        .initial_step(descent.initial_step.unwrap_or(defaults.initial_step))
        .max_backtracks(descent.max_backtracks.unwrap_or(defaults.max_backtracks))
        .restart_on_stall(restart_on_stall)
        .relative_tolerance(
            convergence
                .relative_tolerance
                .unwrap_or(defaults.relative_tolerance),
        )
        .max_iterations(
            args.max_iterations
                .or(convergence.max_iterations)
                .unwrap_or(defaults.max_iterations),
        )
        .require_convergence(require_convergence);

    if let Some(weight) = args
        .weight
        .or(objective.repulsion_weight)
        .or(defaults.repulsion_weight)
    {
        builder = builder.repulsion_weight(weight);
    }
    if let Some(seed) = args.seed.or(file_config.seed) {
        builder = builder.seed(seed);
    }

    let core_config = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig {
        output_dir: args
            .output_dir
            .clone()
            .or(output.directory)
            .unwrap_or(defaults.output_dir),
        format: args.format.or(output.format).unwrap_or(defaults.format),
        core_config,
    })
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let key = key.trim();

        match key {
            "seed" => config.seed = Some(parse_value(key, value_str, "integer")?),
            "domain.nx" => {
                config.domain.get_or_insert_with(Default::default).nx =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "domain.ny" => {
                config.domain.get_or_insert_with(Default::default).ny =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "domain.fraction" => {
                config.domain.get_or_insert_with(Default::default).fraction =
                    Some(parse_value(key, value_str, "float")?);
            }
            "objective.repulsion-weight" => {
                config
                    .objective
                    .get_or_insert_with(Default::default)
                    .repulsion_weight = Some(parse_value(key, value_str, "float")?);
            }
            "descent.initial-step" => {
                config
                    .descent
                    .get_or_insert_with(Default::default)
                    .initial_step = Some(parse_value(key, value_str, "float")?);
            }
            "descent.max-backtracks" => {
                config
                    .descent
                    .get_or_insert_with(Default::default)
                    .max_backtracks = Some(parse_value(key, value_str, "integer")?);
            }
            "descent.restart-on-stall" => {
                config
                    .descent
                    .get_or_insert_with(Default::default)
                    .restart_on_stall = Some(parse_value(key, value_str, "boolean")?);
            }
            "convergence.relative-tolerance" => {
                config
                    .convergence
                    .get_or_insert_with(Default::default)
                    .relative_tolerance = Some(parse_value(key, value_str, "float")?);
            }
            "convergence.max-iterations" => {
                config
                    .convergence
                    .get_or_insert_with(Default::default)
                    .max_iterations = Some(parse_value(key, value_str, "integer")?);
            }
            "convergence.require-convergence" => {
                config
                    .convergence
                    .get_or_insert_with(Default::default)
                    .require_convergence = Some(parse_value(key, value_str, "boolean")?);
            }
            "output.format" => {
                config.output.get_or_insert_with(Default::default).format =
                    Some(value_str.parse().map_err(|e| {
                        CliError::Config(format!("Invalid value for {}: {}", key, e))
                    })?);
            }
            "output.directory" => {
                config.output.get_or_insert_with(Default::default).directory =
                    Some(value_str.trim().into());
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}
