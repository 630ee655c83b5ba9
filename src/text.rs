use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Wrap a label into lines of at most `max_width` display columns, breaking
/// at word boundaries. Words wider than the budget are split into chunks.
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = word.width();

        if word_width > max_width {
            if !current_line.is_empty() {
                lines.push(std::mem::take(&mut current_line));
            }
            let mut chunks = split_word(word, max_width);
            // The tail chunk stays open so following words can pack onto it
            current_line = chunks.pop().unwrap_or_default();
            current_width = current_line.width();
            lines.extend(chunks);
            continue;
        }

        let space_width = usize::from(!current_line.is_empty());
        if current_width > 0 && current_width + space_width + word_width > max_width {
            lines.push(std::mem::take(&mut current_line));
            current_line.push_str(word);
            current_width = word_width;
        } else {
            if space_width > 0 {
                current_line.push(' ');
            }
            current_line.push_str(word);
            current_width += space_width + word_width;
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

fn split_word(word: &str, max_width: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut chunk = String::new();
    let mut chunk_width = 0;

    for ch in word.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if chunk_width + ch_width > max_width && !chunk.is_empty() {
            chunks.push(std::mem::take(&mut chunk));
            chunk_width = 0;
        }
        chunk.push(ch);
        chunk_width += ch_width;
    }

    if !chunk.is_empty() {
        chunks.push(chunk);
    }

    chunks
}
