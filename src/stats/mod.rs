use crate::catalog::ActivationModel;
use crate::Result;
use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Stimulus dataset a run computes statistics over. `ImageNet21kLarge` is the
/// same implementation as `ImageNet21k` with a wider sampling plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    ImageNet,
    ImageNet21k,
    ImageNet21kLarge,
    Object2Vec,
    MajajHong2015,
}

impl Dataset {
    pub const ALL: [Dataset; 5] = [
        Dataset::ImageNet,
        Dataset::ImageNet21k,
        Dataset::ImageNet21kLarge,
        Dataset::Object2Vec,
        Dataset::MajajHong2015,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Dataset::ImageNet => "imagenet",
            Dataset::ImageNet21k => "imagenet21k",
            Dataset::ImageNet21kLarge => "imagenet21klarge",
            Dataset::Object2Vec => "object2vec",
            Dataset::MajajHong2015 => "majajhong2015",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Dataset {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        for dataset in Dataset::ALL {
            if s == dataset.as_str() {
                return Ok(dataset);
            }
        }
        bail!("unknown manifold dataset: {}", s)
    }
}

/// How activation maps are reduced before statistics are computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Pooling {
    Max,
    Avg,
    None,
}

impl Pooling {
    pub fn as_str(self) -> &'static str {
        match self {
            Pooling::Max => "max",
            Pooling::Avg => "avg",
            Pooling::None => "none",
        }
    }
}

impl Default for Pooling {
    fn default() -> Self {
        Pooling::Avg
    }
}

impl fmt::Display for Pooling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Pooling {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "max" => Ok(Pooling::Max),
            "avg" => Ok(Pooling::Avg),
            "none" => Ok(Pooling::None),
            other => bail!("unknown pooling mode: {}", other),
        }
    }
}

/// Override for how many classes and exemplars a stimulus set samples. When
/// absent, the statistics implementation applies its own defaults.
#[derive(Debug, Clone, Serialize)]
pub struct Sampling {
    pub stimuli: String,
    pub classes: usize,
    pub per_class: usize,
}

impl Sampling {
    pub fn imagenet21k_large() -> Self {
        Self {
            stimuli: "imagenet21klarge".to_string(),
            classes: 725,
            per_class: 725,
        }
    }
}

/// Tabular export of one fitted statistics object. Column names are decided
/// by the statistics implementation, not by this crate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One statistics computation bound to a single model. `fit` walks the given
/// Layer Set; `table` exports the per-layer results.
pub trait ManifoldStatistics {
    fn fit(&mut self, layers: &[String]) -> Result<()>;
    fn table(&self) -> Table;
}

/// The four statistics implementations, each consuming the model it is bound
/// to. They differ in which stimulus set they present and how many
/// classes/exemplars they sample from it.
pub trait StatisticsSuite {
    fn imagenet(
        &self,
        model: ActivationModel,
        pooling: Pooling,
    ) -> Result<Box<dyn ManifoldStatistics>>;

    fn imagenet21k(
        &self,
        data_dir: Option<&Path>,
        model: ActivationModel,
        pooling: Pooling,
        sampling: Option<Sampling>,
    ) -> Result<Box<dyn ManifoldStatistics>>;

    fn object2vec(
        &self,
        data_dir: Option<&Path>,
        model: ActivationModel,
        pooling: Pooling,
    ) -> Result<Box<dyn ManifoldStatistics>>;

    fn majajhong2015(
        &self,
        model: ActivationModel,
        pooling: Pooling,
    ) -> Result<Box<dyn ManifoldStatistics>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_roundtrip() {
        for dataset in Dataset::ALL {
            assert_eq!(dataset.as_str().parse::<Dataset>().unwrap(), dataset);
        }
    }

    #[test]
    fn test_unknown_dataset_rejected() {
        let err = "not_a_real_dataset".parse::<Dataset>().unwrap_err();
        assert!(err.to_string().contains("unknown manifold dataset"));
    }

    #[test]
    fn test_pooling_parse() {
        assert_eq!("max".parse::<Pooling>().unwrap(), Pooling::Max);
        assert_eq!(Pooling::default(), Pooling::Avg);
        assert!("mean".parse::<Pooling>().is_err());
    }

    #[test]
    fn test_large_sampling_plan() {
        let sampling = Sampling::imagenet21k_large();
        assert_eq!(sampling.stimuli, "imagenet21klarge");
        assert_eq!(sampling.classes, 725);
        assert_eq!(sampling.per_class, 725);
    }
}
