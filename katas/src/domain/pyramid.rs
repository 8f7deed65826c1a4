//! Number pyramid: rows of consecutive numbers joined by `*`, growing to
//! `width` numbers and then mirrored back down.
//!
//! ```text
//! 1
//! 2*3
//! 4*5*6
//! 4*5*6
//! 2*3
//! 1
//! ```

use itertools::Itertools;
use tracing::instrument;

fn render_row(start: u64, len: u32) -> String {
    (start..start + u64::from(len)).join("*")
}

/// Builds the ascending half, then appends it reversed.
#[instrument(level = "debug")]
pub fn pyramid(width: u32) -> Vec<String> {
    let mut rows = Vec::new();
    let mut start = 1u64;
    for len in 1..=width {
        rows.push(render_row(start, len));
        start += u64::from(len);
    }
    let descending: Vec<String> = rows.iter().rev().cloned().collect();
    rows.extend(descending);
    rows
}

/// Single pass over the rows with an ascending/descending state and no buffer.
#[derive(Debug, Clone)]
pub struct Pyramid {
    width: u32,
    row: u32,
    start: u64,
    ascending: bool,
    done: bool,
}

impl Pyramid {
    pub fn new(width: u32) -> Self {
        Self {
            width,
            row: 1,
            start: 1,
            ascending: true,
            done: width == 0,
        }
    }
}

impl Iterator for Pyramid {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let line = render_row(self.start, self.row);

        if self.ascending {
            if self.row == self.width {
                // the widest row is printed twice
                self.ascending = false;
            } else {
                self.start += u64::from(self.row);
                self.row += 1;
            }
        } else if self.row == 1 {
            self.done = true;
        } else {
            self.row -= 1;
            self.start -= u64::from(self.row);
        }
        Some(line)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn given_width_four_when_building_then_matches_hand_drawn_pyramid() {
        let expected = vec!["1", "2*3", "4*5*6", "7*8*9*10", "7*8*9*10", "4*5*6", "2*3", "1"];
        assert_eq!(pyramid(4), expected);
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(2)]
    #[case(7)]
    fn given_width_when_streaming_then_matches_buffered(#[case] width: u32) {
        assert_eq!(Pyramid::new(width).collect::<Vec<_>>(), pyramid(width));
    }

    #[test]
    fn given_huge_width_when_streaming_then_rows_come_lazily() {
        let rows: Vec<String> = Pyramid::new(u32::MAX).take(3).collect();
        assert_eq!(rows, vec!["1", "2*3", "4*5*6"]);
        assert_eq!(pyramid(3).len(), 6);
    }
}
