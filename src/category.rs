// Artifact categories served by the results box.
// The box stores every algorithm output as a named result; the three names
// below are the ones this client knows how to ask for.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// One kind of result artifact attached to a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactCategory {
    /// Diagnostic scores.
    Scores,
    /// The normalized image.
    Normalized,
    /// Texture overlay (heatmap).
    Heatmap,
}

impl ArtifactCategory {
    /// All categories, in the order the box expects them in a multi-name filter.
    pub const ALL: [ArtifactCategory; 3] = [
        ArtifactCategory::Scores,
        ArtifactCategory::Normalized,
        ArtifactCategory::Heatmap,
    ];

    /// The `name` label the box uses for this category.
    pub fn result_name(self) -> &'static str {
        match self {
            ArtifactCategory::Scores => "CAD4TB 7",
            ArtifactCategory::Normalized => "Original",
            ArtifactCategory::Heatmap => "Texture Overlay",
        }
    }

    /// The `--algotype` spelling for this category.
    pub fn cli_name(self) -> &'static str {
        match self {
            ArtifactCategory::Scores => "scores",
            ArtifactCategory::Normalized => "normalized",
            ArtifactCategory::Heatmap => "heatmap",
        }
    }
}

/// Which artifacts to request for each series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlgoType {
    Only(ArtifactCategory),
    /// Every category at once.
    #[default]
    All,
}

impl AlgoType {
    /// Values of the `name` query filter, one entry per repeated parameter.
    pub fn result_names(self) -> Vec<&'static str> {
        match self {
            AlgoType::Only(category) => vec![category.result_name()],
            AlgoType::All => ArtifactCategory::ALL
                .iter()
                .map(|c| c.result_name())
                .collect(),
        }
    }
}

impl From<ArtifactCategory> for AlgoType {
    fn from(category: ArtifactCategory) -> Self {
        AlgoType::Only(category)
    }
}

impl fmt::Display for AlgoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlgoType::Only(category) => f.write_str(category.cli_name()),
            AlgoType::All => f.write_str("all"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid choice: '{0}' (choose from 'scores', 'normalized', 'heatmap')")]
pub struct InvalidCategory(pub String);

impl FromStr for ArtifactCategory {
    type Err = InvalidCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ArtifactCategory::ALL
            .into_iter()
            .find(|c| c.cli_name() == s)
            .ok_or_else(|| InvalidCategory(s.to_string()))
    }
}
