use super::palette::PaletteEntry;
use super::poem::Poem;
use super::settings::FontChoice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    ResolvingToken,
    FetchingPoem,
    Displayed,
}

impl Phase {
    /// True while a resolution cycle is running.
    pub fn is_busy(self) -> bool {
        matches!(self, Self::ResolvingToken | Self::FetchingPoem)
    }
}

/// Poem formatted for display, paired with the wave colour drawn for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayedPoem {
    /// Headline sentence
    pub content: String,
    /// `「title」`
    pub title: String,
    pub author: String,
    /// `(dynasty)`
    pub dynasty: String,
    /// Every origin line followed by a newline
    pub body: String,
    pub colour: PaletteEntry,
}

impl DisplayedPoem {
    /// Format `poem` for display. When the poem carries no origin lines the
    /// body of `previous` is kept.
    pub fn compose(poem: &Poem, colour: PaletteEntry, previous: Option<&DisplayedPoem>) -> Self {
        let body = if poem.origin.content.is_empty() {
            previous.map(|p| p.body.clone()).unwrap_or_default()
        } else {
            poem.origin
                .content
                .iter()
                .fold(String::new(), |mut acc, line| {
                    acc.push_str(line);
                    acc.push('\n');
                    acc
                })
        };

        Self {
            content: poem.content.clone(),
            title: format!("「{}」", poem.origin.title),
            author: poem.origin.author.clone(),
            dynasty: format!("({})", poem.origin.dynasty),
            body,
            colour,
        }
    }
}

/// Immutable snapshot of what the screen should show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub phase: Phase,
    pub font: FontChoice,
    /// Auto-refresh delay in seconds, always positive
    pub delay_secs: u32,
    /// Token the current cycle resolved to, if any
    pub token: Option<String>,
    pub poem: Option<DisplayedPoem>,
}

impl ViewState {
    pub fn new(delay_secs: u32) -> Self {
        Self {
            phase: Phase::Idle,
            font: FontChoice::default(),
            delay_secs: delay_secs.max(1),
            token: None,
            poem: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain::poem::PoemOrigin;

    fn colour() -> PaletteEntry {
        PaletteEntry {
            name: "月白".to_string(),
            hex: "#d6ecf0".to_string(),
            dark_suitable: true,
        }
    }

    fn poem(lines: &[&str]) -> Poem {
        Poem {
            content: "c".to_string(),
            origin: PoemOrigin {
                title: "t".to_string(),
                dynasty: "d".to_string(),
                author: "a".to_string(),
                content: lines.iter().map(|l| l.to_string()).collect(),
            },
        }
    }

    #[test]
    fn test_compose_formats_fields() {
        let shown = DisplayedPoem::compose(&poem(&["l1", "l2"]), colour(), None);
        assert_eq!(shown.content, "c");
        assert_eq!(shown.title, "「t」");
        assert_eq!(shown.author, "a");
        assert_eq!(shown.dynasty, "(d)");
        assert_eq!(shown.body, "l1\nl2\n");
    }

    #[test]
    fn test_compose_keeps_previous_body_without_lines() {
        let first = DisplayedPoem::compose(&poem(&["l1"]), colour(), None);
        let second = DisplayedPoem::compose(&poem(&[]), colour(), Some(&first));
        assert_eq!(second.body, "l1\n");

        let fresh = DisplayedPoem::compose(&poem(&[]), colour(), None);
        assert!(fresh.body.is_empty());
    }

    #[test]
    fn test_new_state_clamps_delay() {
        assert_eq!(ViewState::new(0).delay_secs, 1);
        assert_eq!(ViewState::new(12).phase, Phase::Idle);
    }
}
