use std::fmt;

/// Counts for one import phase.
///
/// `unlinked` counts references dropped from records that were still
/// inserted, so it never overlaps `skipped`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhaseCount {
    pub inserted: u64,
    pub skipped: u64,
    pub unlinked: u64,
}

impl PhaseCount {
    pub const fn new(inserted: u64, skipped: u64) -> Self {
        Self {
            inserted,
            skipped,
            unlinked: 0,
        }
    }

    pub const fn with_unlinked(mut self, unlinked: u64) -> Self {
        self.unlinked = unlinked;
        self
    }
}

/// Outcome of a seed import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub teams: PhaseCount,
    pub players: PhaseCount,
    pub news: PhaseCount,
    pub users: PhaseCount,
    pub comments: PhaseCount,
}

impl SeedSummary {
    pub fn total_skipped(&self) -> u64 {
        self.teams.skipped
            + self.players.skipped
            + self.news.skipped
            + self.users.skipped
            + self.comments.skipped
    }
}

impl fmt::Display for SeedSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = [
            ("teams", self.teams),
            ("players", self.players),
            ("news", self.news),
            ("users", self.users),
            ("comments", self.comments),
        ];
        for (name, count) in rows {
            writeln!(
                f,
                "{name:<9} {:>5} inserted {:>5} skipped {:>5} unlinked",
                count.inserted, count.skipped, count.unlinked
            )?;
        }
        Ok(())
    }
}
