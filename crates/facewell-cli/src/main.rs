use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use facewell_core::{
    symmetry, AnalysisResult, Dimension, HealthIndexCalculator, HealthReport, MeshPoint,
    RecommendationEngine, Weights,
};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "facewell", about = "Facewell face health index toolkit")]
struct Cli {
    /// TOML file with a [weights] table (defaults to the built-in weights)
    #[arg(long, global = true)]
    weights: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score an analysis result JSON document (reads stdin when no path is given)
    Score {
        path: Option<PathBuf>,
        /// Pretty-print the JSON report
        #[arg(long)]
        pretty: bool,
    },
    /// Validate and show the health-index weights
    Weights,
    /// Measure facial symmetry from a JSON array of face-mesh landmarks
    Symmetry {
        path: PathBuf,
        /// Image width in pixels
        #[arg(long)]
        width: u32,
        /// Image height in pixels
        #[arg(long)]
        height: u32,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let weights = load_weights(cli.weights.as_deref())?;

    match cli.command {
        Commands::Score { path, pretty } => {
            let src = read_input(path.as_deref())?;
            let report = score_document(&src, weights)?;
            let json = if pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            println!("{json}");
        }
        Commands::Weights => {
            for dimension in Dimension::ALL {
                println!("{dimension:<10} {:.2}", weights.weight(dimension));
            }
            println!("{:<10} {:.2}", "total", weights.sum());
        }
        Commands::Symmetry {
            path,
            width,
            height,
        } => {
            let src = read_input(Some(path.as_path()))?;
            let landmarks: Vec<MeshPoint> =
                serde_json::from_str(&src).context("landmark file must be a JSON array of {x, y}")?;
            let result = symmetry::measure(&landmarks, width, height);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

fn load_weights(path: Option<&Path>) -> Result<Weights> {
    let Some(path) = path else {
        return Ok(Weights::default());
    };
    let src = std::fs::read_to_string(path)
        .with_context(|| format!("reading weights file {}", path.display()))?;
    Weights::from_toml_str(&src).with_context(|| format!("invalid weights in {}", path.display()))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            Ok(buf)
        }
    }
}

fn score_document(src: &str, weights: Weights) -> Result<HealthReport> {
    let result: AnalysisResult =
        serde_json::from_str(src).context("parsing analysis result JSON")?;
    tracing::debug!(?result, "scoring analysis result");
    Ok(HealthReport::assess(
        &HealthIndexCalculator::new(weights),
        &RecommendationEngine,
        &result,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use facewell_core::Rating;

    #[test]
    fn test_score_document_with_legacy_labels() {
        let src = r#"{
            "age_gender": {"age": 45, "gender": "Female", "age_confidence": 0.85, "gender_confidence": 0.6},
            "fatigue": {"status": "Fatigued", "confidence": 0.7},
            "emotion": {"label": "Happy", "confidence": 0.75},
            "symmetry": {"asymmetry_score": 0.0123, "predicted_condition": "Very Symmetrical", "confidence": 0.88},
            "skin": {"label": "Normal", "confidence": 0.6}
        }"#;
        let report = score_document(src, Weights::default()).unwrap();
        // 0.25*100 + 0.25*40 + 0.30*100 + 0.20*100
        assert!((report.index.overall_score - 85.0).abs() < 1e-9);
        assert_eq!(report.index.rating, Rating::Good);
        assert_eq!(report.recommendations.len(), 3);
    }

    #[test]
    fn test_score_document_fills_missing_fields() {
        let src = r#"{
            "fatigue": {"confidence": 0.5},
            "emotion": {"confidence": 0.5},
            "symmetry": {},
            "skin": {"label": "Acne", "confidence": null}
        }"#;
        let report = score_document(src, Weights::default()).unwrap();
        let scores = report.index.component_scores;
        assert_eq!(
            (scores.symmetry, scores.fatigue, scores.skin, scores.emotion),
            (50.0, 60.0, 70.0, 75.0)
        );
    }

    #[test]
    fn test_score_document_rejects_invalid_json() {
        assert!(score_document("not json", Weights::default()).is_err());
    }

    #[test]
    fn test_default_weights_without_file() {
        assert_eq!(load_weights(None).unwrap(), Weights::default());
    }
}
