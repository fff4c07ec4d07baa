use rand::Rng;

use super::Tier;

/// Chooses which encouragement phrase to show. Injected so callers can pin
/// the choice.
pub trait PhrasePicker: Send + Sync {
    /// Returns an index in `0..candidates`; `candidates` is never zero.
    fn pick(&self, candidates: usize) -> usize;
}

/// Uniform choice backed by the thread-local RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPhrasePicker;

impl PhrasePicker for RandomPhrasePicker {
    fn pick(&self, candidates: usize) -> usize {
        rand::thread_rng().gen_range(0..candidates)
    }
}

/// Always returns the same index (wrapped to the candidate count).
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedPhrasePicker(pub usize);

impl PhrasePicker for FixedPhrasePicker {
    fn pick(&self, candidates: usize) -> usize {
        self.0 % candidates
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PhraseBookError {
    #[error("no encouragement phrases configured for the {0} tier")]
    EmptyTier(&'static str),
}

/// Encouragement copy for each scored tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseBook {
    green: Vec<String>,
    yellow: Vec<String>,
    red: Vec<String>,
    no_target: String,
}

impl PhraseBook {
    pub fn new(
        green: Vec<String>,
        yellow: Vec<String>,
        red: Vec<String>,
        no_target: impl Into<String>,
    ) -> Result<Self, PhraseBookError> {
        for (tier, phrases) in [
            (Tier::Green, &green),
            (Tier::Yellow, &yellow),
            (Tier::Red, &red),
        ] {
            if phrases.is_empty() {
                return Err(PhraseBookError::EmptyTier(tier.label()));
            }
        }

        Ok(Self {
            green,
            yellow,
            red,
            no_target: no_target.into(),
        })
    }

    pub fn standard() -> Self {
        let owned = |phrases: &[&str]| phrases.iter().map(|p| p.to_string()).collect::<Vec<_>>();
        Self {
            green: owned(&[
                "Great work! Keep hitting your targets and beyond.",
                "Outstanding performance that beats expectations. You are a real star!",
            ]),
            yellow: owned(&[
                "Good job! You are a few steps from the target, you can do it.",
                "Keep moving forward. A little extra effort makes a big difference.",
            ]),
            red: owned(&[
                "Start strong today! The targets are within reach.",
                "Every day is a fresh start. Focus on hitting the target!",
            ]),
            no_target: "Waiting for targets to be defined.".to_string(),
        }
    }

    pub fn candidates(&self, tier: Tier) -> &[String] {
        match tier {
            Tier::Green => &self.green,
            Tier::Yellow => &self.yellow,
            Tier::Red => &self.red,
            Tier::NoTarget => std::slice::from_ref(&self.no_target),
        }
    }

    pub(crate) fn choose(&self, tier: Tier, picker: &dyn PhrasePicker) -> &str {
        let candidates = self.candidates(tier);
        if candidates.len() == 1 {
            return &candidates[0];
        }
        let index = picker.pick(candidates.len()).min(candidates.len() - 1);
        &candidates[index]
    }
}

impl Default for PhraseBook {
    fn default() -> Self {
        Self::standard()
    }
}
