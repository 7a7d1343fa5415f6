//! Narration markup: `**bold**` nouns and `"quoted"` dialogue, as the
//! generation prompt instructs the model to write them.

use ratatui::prelude::*;

/// Split narration text into styled lines.
///
/// `**` toggles bold; double quotes mark dialogue (the quotes themselves are
/// kept and styled with the dialogue). Styling state carries across line
/// breaks within one block of narration.
pub fn narration_lines(text: &str, base: Style) -> Vec<Line<'static>> {
    let dialogue = base.fg(Color::Green).add_modifier(Modifier::ITALIC);

    let mut lines = Vec::new();
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut buf = String::new();
    let mut bold = false;
    let mut quoted = false;

    let style_for = |bold: bool, quoted: bool| {
        let style = if quoted { dialogue } else { base };
        if bold {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    };

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' if chars.peek() == Some(&'*') => {
                chars.next();
                flush(&mut spans, &mut buf, style_for(bold, quoted));
                bold = !bold;
            }
            '"' => {
                if quoted {
                    buf.push('"');
                    flush(&mut spans, &mut buf, style_for(bold, true));
                    quoted = false;
                } else {
                    flush(&mut spans, &mut buf, style_for(bold, false));
                    quoted = true;
                    buf.push('"');
                }
            }
            '\n' => {
                flush(&mut spans, &mut buf, style_for(bold, quoted));
                lines.push(Line::from(std::mem::take(&mut spans)));
            }
            _ => buf.push(c),
        }
    }
    flush(&mut spans, &mut buf, style_for(bold, quoted));
    lines.push(Line::from(spans));
    lines
}

fn flush(spans: &mut Vec<Span<'static>>, buf: &mut String, style: Style) {
    if !buf.is_empty() {
        spans.push(Span::styled(std::mem::take(buf), style));
    }
}
