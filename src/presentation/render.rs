use std::fmt;

use serde::Serialize;

use crate::catalog::EmotionCatalog;

use super::ViewState;

/// Scale applied to buttons that already have records.
pub const LOGGED_SCALE: f32 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Indicator {
    Logged,
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonView {
    /// 1-based position across all groups.
    pub position: usize,
    pub label: String,
    pub emoji: String,
    pub count: i64,
    pub indicator: Indicator,
    pub scale: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupView {
    pub title: String,
    pub buttons: Vec<ButtonView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowView {
    pub id: i64,
    pub title: String,
    pub relative_time: String,
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Screen {
    pub groups: Vec<GroupView>,
    pub rows: Vec<RowView>,
    pub empty_message: &'static str,
}

pub fn render(state: &ViewState, catalog: &EmotionCatalog) -> Screen {
    let mut position = 0;
    let groups = catalog
        .groups
        .iter()
        .map(|group| GroupView {
            title: group.title.clone(),
            buttons: group
                .emotions
                .iter()
                .map(|emotion| {
                    position += 1;
                    let count = state.count_for(&emotion.label);
                    let logged = count > 0;
                    ButtonView {
                        position,
                        label: emotion.label.clone(),
                        emoji: emotion.emoji.clone(),
                        count,
                        indicator: if logged {
                            Indicator::Logged
                        } else {
                            Indicator::Empty
                        },
                        scale: if logged { LOGGED_SCALE } else { 1.0 },
                    }
                })
                .collect(),
        })
        .collect();

    let rows = state
        .records
        .iter()
        .map(|listed| {
            let emoji = catalog.emoji_for(&listed.record.label);
            RowView {
                id: listed.id(),
                title: format!("{emoji} {}", listed.record.label)
                    .trim_start()
                    .to_string(),
                relative_time: listed.relative_time.clone(),
                comment: state.comment_for(listed).to_string(),
            }
        })
        .collect();

    Screen {
        groups,
        rows,
        empty_message: state.locale.empty_list(),
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for group in &self.groups {
            writeln!(f, "{}", group.title)?;
            let buttons: Vec<String> = group
                .buttons
                .iter()
                .map(|button| {
                    let marker = match button.indicator {
                        Indicator::Logged => '●',
                        Indicator::Empty => '○',
                    };
                    format!(
                        "[{}] {}{} {}{}",
                        button.position, button.emoji, button.label, marker, button.count
                    )
                })
                .collect();
            writeln!(f, "  {}", buttons.join("   "))?;
        }

        writeln!(f)?;
        if self.rows.is_empty() {
            return writeln!(f, "  {}", self.empty_message);
        }

        for row in &self.rows {
            writeln!(f, "#{:<4} {}  ·  {}", row.id, row.title, row.relative_time)?;
            if !row.comment.is_empty() {
                for line in row.comment.lines() {
                    writeln!(f, "       {line}")?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{
        db::{EmotionRecord, ListedRecord},
        locale::Locale,
    };

    fn listed(id: i64, label: &str, comment: &str) -> ListedRecord {
        ListedRecord {
            record: EmotionRecord {
                id,
                label: label.to_string(),
                timestamp: NaiveDate::from_ymd_opt(2024, 2, 1)
                    .and_then(|d| d.and_hms_opt(8, 0, 0))
                    .expect("valid datetime"),
                comment: comment.to_string(),
            },
            relative_time: "hace 2 horas".to_string(),
        }
    }

    fn state() -> ViewState {
        let catalog = EmotionCatalog::default();
        let counts = catalog
            .labels()
            .into_iter()
            .map(|label| {
                let count = if label == "Culpa" { 2 } else { 0 };
                (label, count)
            })
            .collect();

        ViewState {
            locale: Locale::Es,
            records: vec![listed(4, "Culpa", "stored"), listed(3, "Culpa", ""), listed(1, "Retirada", "")],
            counts,
            drafts: [(3, "typing…".to_string())].into_iter().collect(),
        }
    }

    #[test]
    fn buttons_follow_catalog_and_counts() {
        let screen = render(&state(), &EmotionCatalog::default());

        assert_eq!(screen.groups.len(), 3);
        let culpa = &screen.groups[1].buttons[2];
        assert_eq!(culpa.label, "Culpa");
        assert_eq!(culpa.position, 6);
        assert_eq!(culpa.count, 2);
        assert_eq!(culpa.indicator, Indicator::Logged);
        assert_eq!(culpa.scale, LOGGED_SCALE);

        let miedo = &screen.groups[0].buttons[0];
        assert_eq!((miedo.position, miedo.count), (1, 0));
        assert_eq!(miedo.indicator, Indicator::Empty);
        assert_eq!(miedo.scale, 1.0);
    }

    #[test]
    fn rows_prefer_drafts_over_stored_comments() {
        let screen = render(&state(), &EmotionCatalog::default());

        let ids: Vec<_> = screen.rows.iter().map(|row| row.id).collect();
        assert_eq!(ids, [4, 3, 1]);
        assert_eq!(screen.rows[0].title, "😔 Culpa");
        assert_eq!(screen.rows[0].comment, "stored");
        assert_eq!(screen.rows[1].comment, "typing…");
        // Labels missing from the catalog still render, without emoji.
        assert_eq!(screen.rows[2].title, "Retirada");
    }

    #[test]
    fn render_is_pure() {
        let state = state();
        let catalog = EmotionCatalog::default();
        assert_eq!(render(&state, &catalog), render(&state, &catalog));
    }

    #[test]
    fn text_output_lists_groups_and_rows() {
        let text = render(&state(), &EmotionCatalog::default()).to_string();

        assert!(text.starts_with("Negaciones\n"));
        assert!(text.contains("[6] 😔Culpa ●2"));
        assert!(text.contains("[1] 😱Miedo ○0"));
        assert!(text.contains("#4    😔 Culpa  ·  hace 2 horas"));
        assert!(text.contains("       typing…"));
    }

    #[test]
    fn empty_list_shows_localized_message() {
        let state = ViewState {
            locale: Locale::En,
            ..ViewState::default()
        };
        let text = render(&state, &EmotionCatalog::default()).to_string();
        assert!(text.contains("Nothing logged yet"));
    }
}
