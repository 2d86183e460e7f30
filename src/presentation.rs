use crate::pager::{Pager, DEFAULT_PAGE_SIZE};
use crate::types::{Recommender, Song};
use std::fmt;

/// Which presentation a recommendation gets.
///
/// The variant follows the backend's `isRandom` flag only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendationView<'a> {
    /// None of the user's songs were in the dataset; no justification shown
    Random { recommended: &'a Song },
    /// A recommendation justified by one page of the listening history
    Personalized {
        recommended: &'a Song,
        from_songs: &'a [Song],
        pager: Pager,
    },
}

impl<'a> RecommendationView<'a> {
    /// View of the first page.
    pub fn new(recommender: &'a Recommender) -> Self {
        Self::with_pager(
            recommender,
            Pager::new(recommender.from_songs.len(), DEFAULT_PAGE_SIZE),
        )
    }

    pub fn with_pager(recommender: &'a Recommender, pager: Pager) -> Self {
        if recommender.is_random {
            Self::Random {
                recommended: &recommender.recommended,
            }
        } else {
            Self::Personalized {
                recommended: &recommender.recommended,
                from_songs: &recommender.from_songs,
                pager,
            }
        }
    }

    pub fn recommended(&self) -> &Song {
        match self {
            Self::Random { recommended } | Self::Personalized { recommended, .. } => recommended,
        }
    }

    /// The justification songs on the current page; empty for random picks.
    pub fn visible_songs(&self) -> &[Song] {
        match self {
            Self::Random { .. } => &[],
            Self::Personalized {
                from_songs, pager, ..
            } => pager.slice(from_songs),
        }
    }
}

impl fmt::Display for RecommendationView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random { recommended } => {
                writeln!(
                    f,
                    "You're a real outsider! Your last songs don't appear on our dataset!"
                )?;
                writeln!(f, "Anyway, we recommend you this random song:")?;
                write!(f, "  {recommended}  ({})", recommended.artwork())
            }
            Self::Personalized {
                recommended, pager, ..
            } => {
                writeln!(f, "Our Recommendation:")?;
                writeln!(f, "  {recommended}  ({})", recommended.artwork())?;
                writeln!(f, "Because you listened the following songs:")?;
                let offset = pager.range().start;
                for (index, song) in self.visible_songs().iter().enumerate() {
                    writeln!(f, "  {}. {song}  ({})", offset + index + 1, song.artwork())?;
                }
                write!(
                    f,
                    "Page {} of {}",
                    pager.page() + 1,
                    pager.total_pages().max(1)
                )
            }
        }
    }
}
