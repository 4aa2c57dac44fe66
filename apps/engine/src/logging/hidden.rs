use std::fmt;

/// Mask used in place of a secret while the round is still live.
pub const HIDDEN_MARK: &str = "[HIDDEN]";

/// Masks a secret (the round's word) when formatted; only the character
/// count survives. Use it for anything logged before the result screen.
pub struct Hidden<'a>(pub &'a str);

impl<'a> fmt::Display for Hidden<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{HIDDEN_MARK}({} chars)", self.0.chars().count())
    }
}

impl<'a> fmt::Debug for Hidden<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
