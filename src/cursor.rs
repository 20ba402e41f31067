use crate::indexing::Input;

#[derive(Debug, Copy, Clone)]
pub struct Forward;

#[derive(Debug, Copy, Clone)]
pub struct Backward;

pub trait Direction: core::fmt::Debug + Copy + Clone {
    const FORWARD: bool;
    fn new() -> Self;
}

impl Direction for Forward {
    const FORWARD: bool = true;
    #[inline(always)]
    fn new() -> Self {
        Forward {}
    }
}

impl Direction for Backward {
    const FORWARD: bool = false;
    #[inline(always)]
    fn new() -> Self {
        Backward {}
    }
}

/// \return the next character, updating the position.
#[inline(always)]
pub fn next<Dir: Direction>(input: &Input, _dir: Dir, pos: &mut usize) -> Option<char> {
    if Dir::FORWARD {
        input.next_right(pos)
    } else {
        input.next_left(pos)
    }
}

/// \return whether the text in \p start..end equals the text at \p pos in
/// the direction \p Dir. If so, update the position.
#[inline(always)]
pub fn subrange_eq<Dir: Direction>(
    input: &Input,
    _dir: Dir,
    pos: &mut usize,
    start: usize,
    end: usize,
) -> bool {
    let len = end - start;
    let bytes = input.contents();
    if Dir::FORWARD {
        let Some(target) = bytes.get(*pos..*pos + len) else {
            return false;
        };
        if target == &bytes[start..end] {
            *pos += len;
            return true;
        }
    } else {
        if *pos < len {
            return false;
        }
        if bytes[*pos - len..*pos] == bytes[start..end] {
            *pos -= len;
            return true;
        }
    }
    false
}
