use crate::cli::ScoreArgs;
use crate::error::{CliError, Result};
use sensorplace::core::io::sensors::SensorFile;
use sensorplace::core::models::domain::Domain;
use sensorplace::core::models::sensor::SensorSet;
use sensorplace::core::objective::evaluator::{ObjectiveEvaluator, self_pair_offset};
use sensorplace::core::objective::term::EnergyTerm;
use sensorplace::engine::config::ObjectiveConfig;
use std::fmt;
use tracing::{info, warn};

/// Energy breakdown of an existing sensor layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreReport {
    pub sensors: usize,
    pub repulsion_weight: f64,
    pub outside: usize,
    pub energy: EnergyTerm,
    pub mutual_without_self_pairs: f64,
    pub min_distance: Option<f64>,
}

impl fmt::Display for ScoreReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  Sensors:              {}", self.sensors)?;
        writeln!(f, "  Pair weight W:        {}", self.repulsion_weight)?;
        if self.outside > 0 {
            writeln!(f, "  Outside the domain:   {}", self.outside)?;
        }
        writeln!(f, "  Energy:               {:.9e}", self.energy.total())?;
        writeln!(f, "  Boundary part:        {:.9e}", self.energy.boundary)?;
        writeln!(
            f,
            "  Mutual part:          {:.9e} (excluding self pairs: {:.9e})",
            self.energy.mutual, self.mutual_without_self_pairs
        )?;
        match self.min_distance {
            Some(d) => write!(f, "  Closest sensor pair:  {:.6}", d),
            None => write!(f, "  Closest sensor pair:  n/a"),
        }
    }
}

pub fn run(args: ScoreArgs) -> Result<()> {
    let report = score_file(&args)?;
    if report.outside > 0 {
        warn!(
            outside = report.outside,
            "Some sensors lie outside the unit square."
        );
    }
    println!("{}", report);
    Ok(())
}

/// Reads the layout named by `args` and scores it. Without `--weight` every
/// pair gets unit weight, i.e. `W` equals the sensor count.
pub fn score_file(args: &ScoreArgs) -> Result<ScoreReport> {
    let domain = Domain::new(args.nx, args.ny)?;
    info!("Loading sensor layout from {:?}", &args.input);
    let sensors = SensorFile::read_from_path(&args.input, &domain, args.format).map_err(|e| {
        CliError::FileParsing {
            path: args.input.clone(),
            source: e.into(),
        }
    })?;

    let objective = ObjectiveConfig {
        repulsion_weight: args.weight,
    };
    score(&sensors, objective.weight_for(sensors.len()))
}

pub fn score(sensors: &SensorSet, repulsion_weight: f64) -> Result<ScoreReport> {
    if sensors.is_empty() {
        return Err(CliError::Argument(
            "the sensor file contains no sensors".to_string(),
        ));
    }
    if !repulsion_weight.is_finite() || repulsion_weight < 0.0 {
        return Err(CliError::Argument(format!(
            "repulsion weight must be finite and non-negative, got {}",
            repulsion_weight
        )));
    }

    let evaluation = ObjectiveEvaluator::new(repulsion_weight).evaluate(sensors);
    let outside = sensors
        .iter()
        .filter(|p| !(0.0..=1.0).contains(&p.x) || !(0.0..=1.0).contains(&p.y))
        .count();

    Ok(ScoreReport {
        sensors: sensors.len(),
        repulsion_weight,
        outside,
        energy: evaluation.energy,
        mutual_without_self_pairs: evaluation.energy.mutual - self_pair_offset(repulsion_weight),
        min_distance: sensors.min_pairwise_distance(),
    })
}
