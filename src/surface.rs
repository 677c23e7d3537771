//! Boundary types between the autocomplete controller and whatever hosts it.

/// A run of suggestion text; emphasized runs matched the typed query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub emphasized: bool,
}

impl Segment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasized: false,
        }
    }

    pub fn emphasized(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            emphasized: true,
        }
    }

    /// Concatenates segments into HTML-escaped text with `<strong>` emphasis.
    pub fn to_markup(segments: &[Segment]) -> String {
        let mut out = String::new();
        for segment in segments {
            if segment.emphasized {
                out.push_str("<strong>");
                escape_html_into(&segment.text, &mut out);
                out.push_str("</strong>");
            } else {
                escape_html_into(&segment.text, &mut out);
            }
        }
        out
    }
}

fn escape_html_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

/// One rendered row of the suggestion list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionItem {
    pub value: String,
    pub segments: Vec<Segment>,
}

impl SuggestionItem {
    pub fn markup(&self) -> String {
        Segment::to_markup(&self.segments)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextEdit {
    Insert(char),
    InsertStr(String),
    Backspace,
    Replace(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowDown,
    ArrowUp,
    Enter,
    Tab,
    Escape,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    Input,
    Suggestion(usize),
    Outside,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Edit(TextEdit),
    Paste(String),
    Key(Key),
    PointerDown(PointerTarget),
}

/// Whether the controller consumed an event; hosts suppress the default action on `Handled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Handled,
    Ignored,
}

pub trait InputSurface {
    fn value(&self) -> String;
    fn set_value(&mut self, value: &str);
    fn apply(&mut self, edit: TextEdit);
    /// Generic "value changed" signal, raised after a programmatic commit.
    fn notify_changed(&mut self);
}

pub trait OutputSurface {
    fn clear(&mut self);
    fn append(&mut self, item: SuggestionItem);
    fn len(&self) -> usize;
    fn item(&self, index: usize) -> Option<&SuggestionItem>;
    fn set_highlighted(&mut self, index: usize, highlighted: bool);
    fn set_visible(&mut self, visible: bool);
    fn is_visible(&self) -> bool;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_escapes_and_emphasizes() {
        let segments = vec![
            Segment::plain("A&B "),
            Segment::emphasized("<MA>"),
            Segment::plain("NIJA"),
        ];
        assert_eq!(
            Segment::to_markup(&segments),
            "A&amp;B <strong>&lt;MA&gt;</strong>NIJA"
        );
    }
}
