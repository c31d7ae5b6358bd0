//! Per-link classification results and per-pass tallies.

use std::fmt;
use std::ops::AddAssign;

/// What a pass decided for one candidate link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Target is not a navigable URL ending in an image extension.
    SkippedNonImage,
    /// Link sits inside a framework gallery or slider.
    SkippedGalleryMember,
    /// Link already carries a lightbox marker.
    SkippedAlreadyHandled,
    /// Native lightbox class added.
    TreatedAsBuilderLightbox,
    /// Standalone overlay bound.
    TreatedAsStandalonePopup,
}

impl Outcome {
    pub const ALL: [Self; 5] = [
        Self::SkippedNonImage,
        Self::SkippedGalleryMember,
        Self::SkippedAlreadyHandled,
        Self::TreatedAsBuilderLightbox,
        Self::TreatedAsStandalonePopup,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::SkippedNonImage => "skipped-non-image",
            Self::SkippedGalleryMember => "skipped-gallery-member",
            Self::SkippedAlreadyHandled => "skipped-already-handled",
            Self::TreatedAsBuilderLightbox => "treated-as-builder-lightbox",
            Self::TreatedAsStandalonePopup => "treated-as-standalone-popup",
        }
    }

    /// Whether the link was modified.
    pub const fn is_treated(self) -> bool {
        matches!(
            self,
            Self::TreatedAsBuilderLightbox | Self::TreatedAsStandalonePopup
        )
    }

    const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome counts for one or more passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessCounts {
    counts: [usize; 5],
}

impl ProcessCounts {
    #[inline]
    pub fn record(&mut self, outcome: Outcome) {
        self.counts[outcome.index()] += 1;
    }

    #[inline]
    pub fn get(&self, outcome: Outcome) -> usize {
        self.counts[outcome.index()]
    }

    /// Links examined.
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Links modified.
    pub fn treated(&self) -> usize {
        Outcome::ALL
            .iter()
            .filter(|o| o.is_treated())
            .map(|o| self.get(*o))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

impl AddAssign for ProcessCounts {
    fn add_assign(&mut self, rhs: Self) {
        for (lhs, rhs) in self.counts.iter_mut().zip(rhs.counts) {
            *lhs += rhs;
        }
    }
}

impl fmt::Display for ProcessCounts {
    /// `4 links (2 treated-as-builder-lightbox, 2 skipped-non-image)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", crate::utils::plural_count(self.total(), "link"))?;
        let parts: Vec<String> = Outcome::ALL
            .iter()
            .filter(|o| self.get(**o) > 0)
            .map(|o| format!("{} {}", self.get(*o), o.label()))
            .collect();
        if !parts.is_empty() {
            write!(f, " ({})", parts.join(", "))?;
        }
        Ok(())
    }
}
