use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifiers for the bonus conditions evaluated at completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    /// At least one scan was attempted.
    FirstScan,
    /// Every attempt in the run was correct.
    PerfectRun,
    /// The run finished in under two minutes.
    SpeedDemon,
    /// Five or more images were captured during the run.
    Photographer,
}

impl AchievementId {
    pub const ALL: [AchievementId; 4] = [
        AchievementId::FirstScan,
        AchievementId::PerfectRun,
        AchievementId::SpeedDemon,
        AchievementId::Photographer,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AchievementId::FirstScan => "first_scan",
            AchievementId::PerfectRun => "perfect_run",
            AchievementId::SpeedDemon => "speed_demon",
            AchievementId::Photographer => "photographer",
        }
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable catalog entry describing a badge and its bonus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: AchievementId,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub points: u32,
}

impl Achievement {
    #[must_use]
    pub fn new(
        id: AchievementId,
        title: impl Into<String>,
        description: impl Into<String>,
        icon: impl Into<String>,
        points: u32,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            icon: icon.into(),
            points,
        }
    }
}

/// The static set of achievements a session can earn.
///
/// Lookups go by id; an id with no catalog entry is simply never awarded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AchievementCatalog {
    entries: Vec<Achievement>,
}

impl AchievementCatalog {
    /// Builds a catalog, keeping the first entry for any duplicated id.
    #[must_use]
    pub fn new(entries: Vec<Achievement>) -> Self {
        let mut unique: Vec<Achievement> = Vec::with_capacity(entries.len());
        for entry in entries {
            if !unique.iter().any(|existing| existing.id == entry.id) {
                unique.push(entry);
            }
        }
        Self { entries: unique }
    }

    #[must_use]
    pub fn get(&self, id: AchievementId) -> Option<&Achievement> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Achievement> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_in_snake_case() {
        let json = serde_json::to_string(&AchievementId::SpeedDemon).unwrap();
        assert_eq!(json, "\"speed_demon\"");
        for id in AchievementId::ALL {
            let text = serde_json::to_string(&id).unwrap();
            assert_eq!(text.trim_matches('"'), id.as_str());
        }
    }

    #[test]
    fn catalog_drops_duplicate_ids() {
        let catalog = AchievementCatalog::new(vec![
            Achievement::new(AchievementId::FirstScan, "A", "", "", 5),
            Achievement::new(AchievementId::FirstScan, "B", "", "", 99),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(AchievementId::FirstScan).unwrap().points, 5);
        assert!(catalog.get(AchievementId::Photographer).is_none());
    }
}
