mod phrases;

pub use phrases::{
    FixedPhrasePicker, PhraseBook, PhraseBookError, PhrasePicker, RandomPhrasePicker,
};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Three-band classification of achievement against a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    Green,
    Yellow,
    Red,
    NoTarget,
}

impl Tier {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Green => "Excellent",
            Self::Yellow => "Average",
            Self::Red => "Poor",
            Self::NoTarget => "No Target",
        }
    }

    pub const fn color_class(self) -> &'static str {
        match self {
            Self::Green => "text-green-500 bg-green-100",
            Self::Yellow => "text-yellow-500 bg-yellow-100",
            Self::Red => "text-red-500 bg-red-100",
            Self::NoTarget => "text-gray-500 bg-gray-100",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inclusive lower bounds of the green and yellow bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreThresholds {
    pub green: f64,
    pub yellow: f64,
}

impl ScoreThresholds {
    pub const fn standard() -> Self {
        Self {
            green: 1.00,
            yellow: 0.70,
        }
    }
}

impl Default for ScoreThresholds {
    fn default() -> Self {
        Self::standard()
    }
}

/// Score for one metric. Recomputed on every read and never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusResult {
    pub ratio: f64,
    /// `ratio * 100`, for display.
    pub percentage: f64,
    pub tier: Tier,
    pub label: &'static str,
    pub color_class: &'static str,
    pub phrase: String,
}

/// Maps achieved values onto tiers and picks encouragement copy.
pub struct ScoreEngine {
    thresholds: ScoreThresholds,
    phrases: PhraseBook,
    picker: Arc<dyn PhrasePicker>,
}

impl ScoreEngine {
    pub fn new(
        thresholds: ScoreThresholds,
        phrases: PhraseBook,
        picker: Arc<dyn PhrasePicker>,
    ) -> Self {
        Self {
            thresholds,
            phrases,
            picker,
        }
    }

    pub fn standard() -> Self {
        Self::with_picker(Arc::new(RandomPhrasePicker))
    }

    pub fn with_picker(picker: Arc<dyn PhrasePicker>) -> Self {
        Self::new(ScoreThresholds::standard(), PhraseBook::standard(), picker)
    }

    pub fn thresholds(&self) -> ScoreThresholds {
        self.thresholds
    }

    /// Ratio and tier without phrase selection. A zero or non-finite target
    /// yields `(0.0, NoTarget)` before any division.
    pub fn classify(&self, actual: f64, target: f64) -> (f64, Tier) {
        if target == 0.0 || !target.is_finite() {
            return (0.0, Tier::NoTarget);
        }

        let ratio = actual / target;
        let tier = if ratio >= self.thresholds.green {
            Tier::Green
        } else if ratio >= self.thresholds.yellow {
            Tier::Yellow
        } else {
            Tier::Red
        };

        (ratio, tier)
    }

    pub fn score(&self, actual: f64, target: f64) -> StatusResult {
        let (ratio, tier) = self.classify(actual, target);
        let phrase = self.phrases.choose(tier, self.picker.as_ref()).to_string();

        StatusResult {
            ratio,
            percentage: ratio * 100.0,
            tier,
            label: tier.label(),
            color_class: tier.color_class(),
            phrase,
        }
    }
}

impl Default for ScoreEngine {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for ScoreEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoreEngine")
            .field("thresholds", &self.thresholds)
            .finish_non_exhaustive()
    }
}
