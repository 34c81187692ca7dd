use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Read a JSON parameter file; fields it leaves out keep their defaults.
/// Without a file the defaults are used as they are.
pub fn load<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    let Some(path) = path else {
        return Ok(T::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading parameters from {}", path.display()))?;
    let params = serde_json::from_str(&text).with_context(|| format!("parsing parameters in {}", path.display()))?;
    tracing::info!(path = %path.display(), "loaded parameters");
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use vertexlp_models::{InvestmentParams, PlanningStrategy, ProductionParams};

    #[test]
    fn test_missing_path_uses_defaults() {
        let params: InvestmentParams = load(None).unwrap();
        assert_eq!(params, InvestmentParams::default());
    }

    #[test]
    fn test_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "total_capital": 50000, "min_return": 400 }}"#).unwrap();

        let params: InvestmentParams = load(Some(file.path())).unwrap();
        assert_eq!(params.total_capital, 50_000.0);
        assert_eq!(params.min_return, 400.0);
        assert_eq!(params.return_rates, [0.05, 0.10]);

        let plan = params.solve().unwrap();
        assert_eq!(plan.allocation, [25_000.0, 25_000.0]);
    }

    #[test]
    fn test_nested_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workshop.json");
        fs::write(
            &path,
            r#"{ "available": { "wood": 400, "carpentry": 480, "finishing": 80, "hardware": 720 } }"#,
        )
        .unwrap();

        let params: ProductionParams = load(Some(&path)).unwrap();
        assert_eq!(params.available.finishing, 80.0);
        assert_eq!(params.chair_profit, 75.0);
        let plan = params.plan(PlanningStrategy::BaselineScaling).unwrap();
        assert_eq!((plan.chairs, plan.tables), (60.0, 20.0));
    }

    #[test]
    fn test_bad_json_names_the_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = load::<InvestmentParams>(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("parsing parameters"));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load::<InvestmentParams>(Some(&dir.path().join("absent.json"))).unwrap_err();
        assert!(err.to_string().contains("reading parameters"));
    }
}
