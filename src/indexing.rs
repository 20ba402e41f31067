use core::ops;
use memchr::memmem;

/// A subject string and helpers for stepping through it by character.
/// Positions are byte offsets which always lie on char boundaries.
#[derive(Debug, Copy, Clone)]
pub struct Input<'t> {
    s: &'t str,
}

impl<'t> Input<'t> {
    #[inline(always)]
    pub fn new(s: &'t str) -> Self {
        Input { s }
    }

    /// \return the length of the contents, in bytes.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.s.len()
    }

    #[inline(always)]
    pub fn contents(&self) -> &'t [u8] {
        self.s.as_bytes()
    }

    /// \return a slice of the contents.
    #[inline(always)]
    pub fn slice(&self, range: ops::Range<usize>) -> &'t str {
        &self.s[range]
    }

    /// \return the char to the right (starting at) \p pos, or None if we are
    /// at the end. Advance the position by the char's length.
    #[inline(always)]
    pub fn next_right(&self, pos: &mut usize) -> Option<char> {
        let c = self.peek_right(*pos)?;
        *pos += c.len_utf8();
        Some(c)
    }

    /// \return the char to the left (ending just before) \p pos, or None if
    /// we are at the start. Retreat the position by the char's length.
    #[inline(always)]
    pub fn next_left(&self, pos: &mut usize) -> Option<char> {
        let c = self.peek_left(*pos)?;
        *pos -= c.len_utf8();
        Some(c)
    }

    /// \return the char starting at \p pos.
    #[inline(always)]
    pub fn peek_right(&self, pos: usize) -> Option<char> {
        let b = *self.contents().get(pos)?;
        if b < 0x80 {
            return Some(b as char);
        }
        self.s.get(pos..)?.chars().next()
    }

    /// \return the char ending just before \p pos.
    #[inline(always)]
    pub fn peek_left(&self, pos: usize) -> Option<char> {
        if pos == 0 {
            return None;
        }
        let b = *self.contents().get(pos - 1)?;
        if b < 0x80 {
            return Some(b as char);
        }
        self.s.get(..pos)?.chars().next_back()
    }

    /// Like next_right, but does not decode the char.
    #[inline(always)]
    pub fn next_right_pos(&self, pos: usize) -> Option<usize> {
        self.peek_right(pos).map(|c| pos + c.len_utf8())
    }

    /// Like next_left, but does not decode the char.
    #[inline(always)]
    pub fn next_left_pos(&self, pos: usize) -> Option<usize> {
        self.peek_left(pos).map(|c| pos - c.len_utf8())
    }

    /// \return the offset of the first byte at or after \p start which is
    /// one of \p bytes. Only the first 1 to 3 bytes are used.
    #[inline]
    pub fn find_byte_set(&self, start: usize, bytes: &[u8]) -> Option<usize> {
        let hay = self.contents().get(start..)?;
        let found = match *bytes {
            [a] => memchr::memchr(a, hay),
            [a, b] => memchr::memchr2(a, b, hay),
            [a, b, c, ..] => memchr::memchr3(a, b, c, hay),
            [] => None,
        };
        found.map(|off| start + off)
    }

    /// \return the offset of the first occurrence of \p finder's needle at
    /// or after \p start.
    #[inline]
    pub fn find_seq(&self, start: usize, finder: &memmem::Finder) -> Option<usize> {
        let hay = self.contents().get(start..)?;
        finder.find(hay).map(|off| start + off)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_over_multibyte_chars() {
        let input = Input::new("a\u{00E9}\u{1F600}z");
        let mut pos = 0;
        let mut seen = Vec::new();
        while let Some(c) = input.next_right(&mut pos) {
            seen.push(c);
        }
        assert_eq!(seen, vec!['a', '\u{00E9}', '\u{1F600}', 'z']);
        assert_eq!(pos, input.len());

        let mut back = Vec::new();
        while let Some(c) = input.next_left(&mut pos) {
            back.push(c);
        }
        back.reverse();
        assert_eq!(back, seen);
        assert_eq!(pos, 0);
    }

    #[test]
    fn finds_bytes() {
        let input = Input::new("hello world");
        assert_eq!(input.find_byte_set(0, b"o"), Some(4));
        assert_eq!(input.find_byte_set(5, b"ow"), Some(6));
        assert_eq!(input.find_byte_set(0, b"xyz"), None);
        let finder = memmem::Finder::new("world");
        assert_eq!(input.find_seq(0, &finder), Some(6));
        assert_eq!(input.find_seq(7, &finder), None);
    }
}
