use crate::app::domain::palette::{Palette, Rgb};
use crate::app::domain::view_state::ViewState;

use super::theme::TerminalTheme;

const WAVE: &str = "∿∿∿∿∿∿∿∿∿∿∿∿∿∿∿∿∿∿∿∿∿∿∿∿";

/// Render the displayed poem, or a placeholder when nothing has been published.
pub fn render_view(state: &ViewState, theme: &TerminalTheme) -> String {
    let Some(poem) = &state.poem else {
        return theme.paint(theme.muted, "(no poem yet)\n");
    };
    let wave_colour = poem.colour.rgb().unwrap_or(theme.muted);

    let mut out = String::new();
    out.push_str(&theme.paint(wave_colour, WAVE));
    out.push_str("\n\n");
    out.push_str(&theme.paint(theme.text, &poem.content));
    out.push('\n');
    out.push_str(&theme.paint(theme.muted, &format!("—— {} {}", poem.author, poem.title)));
    out.push_str("\n\n");

    out.push_str(&theme.paint(
        theme.text,
        &format!("{} {} {}", poem.title, poem.author, poem.dynasty),
    ));
    out.push('\n');
    out.push_str(&poem.body);
    out.push('\n');

    out.push_str(&theme.paint(wave_colour, &format!("{} {}", poem.colour.name, poem.colour.hex)));
    out.push_str(&theme.paint(
        theme.muted,
        &format!(" · {} · refresh {}s", state.font.display_name(), state.delay_secs),
    ));
    out.push('\n');
    out
}

/// One line per palette entry, each painted in its own colour.
pub fn render_palette(palette: &Palette, theme: &TerminalTheme) -> String {
    palette
        .entries()
        .iter()
        .map(|entry| {
            let colour = entry.rgb().unwrap_or(Rgb(128, 128, 128));
            format!("{} {}\n   {}\n", theme.paint(colour, "██"), entry.name, entry.hex)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain::palette::PaletteEntry;
    use crate::app::domain::view_state::{DisplayedPoem, Phase};

    fn plain() -> TerminalTheme {
        TerminalTheme::new(false, false)
    }

    #[test]
    fn test_placeholder_before_publication() {
        assert_eq!(render_view(&ViewState::new(30), &plain()), "(no poem yet)\n");
    }

    #[test]
    fn test_renders_poem_fields() {
        let state = ViewState {
            phase: Phase::Displayed,
            poem: Some(DisplayedPoem {
                content: "c".to_string(),
                title: "「t」".to_string(),
                author: "a".to_string(),
                dynasty: "(d)".to_string(),
                body: "l1\nl2\n".to_string(),
                colour: PaletteEntry {
                    name: "月白".to_string(),
                    hex: "#d6ecf0".to_string(),
                    dark_suitable: false,
                },
            }),
            ..ViewState::new(30)
        };

        let text = render_view(&state, &plain());
        assert!(text.contains("「t」 a (d)\nl1\nl2\n"));
        assert!(text.contains("月白 #d6ecf0"));
        assert!(text.contains("江西拙楷"));
        assert!(text.contains("refresh 30s"));
    }

    #[test]
    fn test_palette_listing() {
        let palette = Palette::load(None, true).unwrap();
        let text = render_palette(&palette, &plain());
        assert_eq!(text.lines().count(), palette.len() * 2);
        assert!(text.contains("月白"));
    }
}
