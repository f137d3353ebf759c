use std::path::Path;

use chrono::{DateTime, Utc};
use lightplane_ai::Strategy;
use serde::{Deserialize, Serialize};

use crate::util;

/// A trained strategy as written by `lightplane train`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StrategyModel {
    pub name: String,
    pub trained_at: DateTime<Utc>,
    pub final_fitness: f32,
    pub strategy: Strategy,
}

/// The strategy from `path`, or the balanced default when no model was given.
pub fn load_strategy(path: Option<&Path>) -> anyhow::Result<Strategy> {
    let Some(path) = path else {
        return Ok(Strategy::BALANCED);
    };
    let model = util::read_model_file(path)?;
    tracing::info!(
        name = %model.name,
        fitness = model.final_fitness,
        style = %model.strategy.combat_style(),
        "strategy model loaded"
    );
    let mut strategy = model.strategy;
    strategy.clamp();
    Ok(strategy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_json_shape() {
        let model = StrategyModel {
            name: "berserker".to_owned(),
            trained_at: DateTime::from_timestamp(0, 0).unwrap(),
            final_fitness: 0.5,
            strategy: Strategy {
                aggression: 0.9,
                ..Strategy::BALANCED
            },
        };
        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["name"], "berserker");
        assert_eq!(json["trained_at"], "1970-01-01T00:00:00Z");
        assert!(json["strategy"]["aggression"].as_f64().unwrap() > 0.89);

        let back: StrategyModel = serde_json::from_value(json).unwrap();
        assert_eq!(back.strategy, model.strategy);
    }

    #[test]
    fn test_no_model_flies_balanced() {
        assert_eq!(load_strategy(None).unwrap(), Strategy::BALANCED);
    }
}
