//! Code fence tracking.
//!
//! Directive markers inside fenced code blocks are literal text, so the block
//! splitter asks this tracker before looking at a line.

/// Open fence marker: the fence character and the opening run length.
type Marker = (char, usize);

/// Tracks whether the current line is inside a fenced code block.
///
/// A closing fence uses the same character as the opener, is at least as
/// long, and carries nothing but whitespace after the run.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    open: Option<Marker>,
}

impl FenceTracker {
    /// Inside a fenced code block.
    pub(crate) fn in_fence(&self) -> bool {
        self.open.is_some()
    }

    /// Feed one line. Returns `true` when the line opens or closes a fence.
    pub(crate) fn update(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();

        match self.open {
            Some((ch, len)) => {
                let run = run_of(trimmed, ch);
                if run >= len && trimmed[run..].trim().is_empty() {
                    self.open = None;
                    return true;
                }
                false
            }
            None => match opening_marker(trimmed) {
                Some(marker) => {
                    self.open = Some(marker);
                    true
                }
                None => false,
            },
        }
    }
}

fn opening_marker(trimmed: &str) -> Option<Marker> {
    let ch = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let run = run_of(trimmed, ch);
    // Backtick info strings may not contain backticks.
    if ch == '`' && trimmed[run..].contains('`') {
        return None;
    }
    (run >= 3).then_some((ch, run))
}

/// Byte length of the leading run of `ch` (fence characters are ASCII).
fn run_of(s: &str, ch: char) -> usize {
    s.chars().take_while(|&c| c == ch).count()
}
