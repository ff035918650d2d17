/// Key press as seen by a controlled input, stripped of platform types.
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyInput<'a> {
    pub key: &'a str,
    pub key_char: Option<&'a str>,
    pub shift: bool,
    pub command: bool,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EditOutcome {
    Changed,
    Moved,
    Submit,
    FocusNext,
    FocusPrevious,
    Ignored,
}

/// Caret-based editing over a value owned elsewhere. Positions are in chars.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TextEditState {
    value: String,
    caret: usize,
}

impl TextEditState {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let caret = value.chars().count();
        Self { value, caret }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn len(&self) -> usize {
        self.value.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Adopts an externally changed value, keeping the caret in range.
    pub fn sync(&mut self, value: &str) {
        if self.value != value {
            self.value = value.to_string();
            self.caret = self.caret.min(self.len());
        }
    }

    pub fn move_to(&mut self, caret: usize) {
        self.caret = caret.min(self.len());
    }

    pub fn move_left(&mut self) -> bool {
        let moved = self.caret > 0;
        self.caret = self.caret.saturating_sub(1);
        moved
    }

    pub fn move_right(&mut self) -> bool {
        let moved = self.caret < self.len();
        self.caret = (self.caret + 1).min(self.len());
        moved
    }

    pub fn insert_text(&mut self, text: &str) -> bool {
        if text.is_empty() {
            return false;
        }
        let at = byte_index(&self.value, self.caret);
        self.value.insert_str(at, text);
        self.caret += text.chars().count();
        true
    }

    pub fn delete_backward(&mut self) -> bool {
        if self.caret == 0 {
            return false;
        }
        let start = byte_index(&self.value, self.caret - 1);
        let end = byte_index(&self.value, self.caret);
        self.value.replace_range(start..end, "");
        self.caret -= 1;
        true
    }

    pub fn delete_forward(&mut self) -> bool {
        if self.caret >= self.len() {
            return false;
        }
        let start = byte_index(&self.value, self.caret);
        let end = byte_index(&self.value, self.caret + 1);
        self.value.replace_range(start..end, "");
        true
    }

    /// Splits the value around the caret for rendering.
    pub fn split_at_caret(&self) -> (&str, &str) {
        self.value.split_at(byte_index(&self.value, self.caret))
    }

    pub fn apply_key(&mut self, input: KeyInput<'_>, multiline: bool) -> EditOutcome {
        match input.key {
            "tab" if input.shift => return EditOutcome::FocusPrevious,
            "tab" => return EditOutcome::FocusNext,
            "enter" if !multiline || input.command => return EditOutcome::Submit,
            "enter" => return changed(self.insert_text("\n")),
            "backspace" => return changed(self.delete_backward()),
            "delete" => return changed(self.delete_forward()),
            "left" => return moved(self.move_left()),
            "right" => return moved(self.move_right()),
            "home" => {
                self.move_to(0);
                return EditOutcome::Moved;
            }
            "end" => {
                self.move_to(self.len());
                return EditOutcome::Moved;
            }
            _ => {}
        }

        if input.command {
            return EditOutcome::Ignored;
        }

        let typed = input
            .key_char
            .filter(|text| !text.is_empty())
            .or_else(|| (input.key.chars().count() == 1).then_some(input.key));
        match typed {
            Some(text) => changed(self.insert_text(text)),
            None => EditOutcome::Ignored,
        }
    }
}

fn changed(did_change: bool) -> EditOutcome {
    if did_change {
        EditOutcome::Changed
    } else {
        EditOutcome::Ignored
    }
}

fn moved(did_move: bool) -> EditOutcome {
    if did_move {
        EditOutcome::Moved
    } else {
        EditOutcome::Ignored
    }
}

fn byte_index(value: &str, char_index: usize) -> usize {
    value
        .char_indices()
        .nth(char_index)
        .map(|(index, _)| index)
        .unwrap_or(value.len())
}
