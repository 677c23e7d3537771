use crate::surface::{InputSurface, TextEdit};
use ropey::Rope;

/// Single-line text field backed by a rope, with the cursor kept at a char index.
pub struct TextInput {
    pub buffer: Rope,
    pub cursor: usize,
    change_events: usize,
}

impl Default for TextInput {
    fn default() -> Self {
        Self::new()
    }
}

impl TextInput {
    pub fn new() -> Self {
        Self {
            buffer: Rope::new(),
            cursor: 0,
            change_events: 0,
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.buffer.insert_char(self.cursor, c);
        self.cursor += 1;
    }

    pub fn insert_str(&mut self, text: &str) {
        self.buffer.insert(self.cursor, text);
        self.cursor += text.chars().count();
    }

    pub fn delete_back(&mut self) {
        if self.cursor > 0 {
            self.buffer.remove(self.cursor - 1..self.cursor);
            self.cursor -= 1;
        }
    }

    pub fn get_text(&self) -> String {
        self.buffer.to_string()
    }

    /// How many change notifications the field has raised.
    pub fn change_events(&self) -> usize {
        self.change_events
    }
}

impl InputSurface for TextInput {
    fn value(&self) -> String {
        self.get_text()
    }

    fn set_value(&mut self, value: &str) {
        self.buffer = Rope::from_str(value);
        self.cursor = self.buffer.len_chars();
    }

    fn apply(&mut self, edit: TextEdit) {
        match edit {
            TextEdit::Insert(c) => self.insert_char(c),
            TextEdit::InsertStr(text) => self.insert_str(&text),
            TextEdit::Backspace => self.delete_back(),
            TextEdit::Replace(text) => self.set_value(&text),
        }
    }

    fn notify_changed(&mut self) {
        self.change_events += 1;
    }
}
