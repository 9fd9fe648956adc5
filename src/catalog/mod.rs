//! The tappable vocabulary: which labels exist, their emoji, and how they
//! are grouped on screen.

use std::collections::HashSet;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emotion {
    pub label: String,
    pub emoji: String,
}

impl Emotion {
    pub fn new(label: &str, emoji: &str) -> Self {
        Self {
            label: label.to_string(),
            emoji: emoji.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionGroup {
    pub title: String,
    pub emotions: Vec<Emotion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionCatalog {
    pub groups: Vec<EmotionGroup>,
}

impl Default for EmotionCatalog {
    fn default() -> Self {
        let group = |title: &str, emotions: [(&str, &str); 3]| EmotionGroup {
            title: title.to_string(),
            emotions: emotions
                .iter()
                .map(|(label, emoji)| Emotion::new(label, emoji))
                .collect(),
        };

        Self {
            groups: vec![
                group(
                    "Negaciones",
                    [("Miedo", "😱"), ("Vergüenza", "😳"), ("Orgullo", "😤")],
                ),
                group(
                    "Emociones",
                    [("Rechazo", "🚫"), ("Abandono", "🏚️"), ("Culpa", "😔")],
                ),
                group(
                    "Roles",
                    [("Víctima", "🎭"), ("Perseguidor", "👿"), ("Salvador", "🦸")],
                ),
            ],
        }
    }
}

impl EmotionCatalog {
    /// All emotions in display order.
    pub fn emotions(&self) -> impl Iterator<Item = &Emotion> {
        self.groups.iter().flat_map(|group| group.emotions.iter())
    }

    pub fn labels(&self) -> Vec<String> {
        self.emotions().map(|emotion| emotion.label.clone()).collect()
    }

    /// Emoji for `label`, or an empty string for labels no longer in the catalog.
    pub fn emoji_for(&self, label: &str) -> &str {
        self.emotions()
            .find(|emotion| emotion.label == label)
            .map(|emotion| emotion.emoji.as_str())
            .unwrap_or("")
    }

    /// Resolve user input to a catalog label: exact label, then
    /// case-insensitive label, then 1-based button position.
    pub fn resolve(&self, input: &str) -> Option<&Emotion> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }

        if let Some(emotion) = self.emotions().find(|e| e.label == input) {
            return Some(emotion);
        }

        let lowered = input.to_lowercase();
        if let Some(emotion) = self.emotions().find(|e| e.label.to_lowercase() == lowered) {
            return Some(emotion);
        }

        input
            .parse::<usize>()
            .ok()
            .and_then(|position| position.checked_sub(1))
            .and_then(|index| self.emotions().nth(index))
    }

    pub fn validate(&self) -> Result<()> {
        if self.groups.is_empty() {
            bail!("emotion catalog has no groups");
        }

        let mut seen = HashSet::new();
        for group in &self.groups {
            if group.emotions.is_empty() {
                bail!("emotion group '{}' is empty", group.title);
            }
            for emotion in &group.emotions {
                if emotion.label.trim().is_empty() {
                    bail!("emotion group '{}' contains an empty label", group.title);
                }
                if !seen.insert(emotion.label.as_str()) {
                    bail!("duplicate emotion label '{}'", emotion.label);
                }
            }
        }

        Ok(())
    }
}
