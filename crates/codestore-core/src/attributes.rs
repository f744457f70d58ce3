//! Display attributes and the attribute runs stored alongside the text.
//!
//! Runs are kept as a sorted, gap-free vector covering `[0, len)`; lookups binary search by start
//! offset.

use crate::range::TextRange;
use crate::theme::{Colour, Font};

/// A set of display attributes.
///
/// Unset fields mean "inherit from the renderer's defaults".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Attributes {
    /// Foreground (text) colour.
    pub foreground: Option<Colour>,
    /// Background colour.
    pub background: Option<Colour>,
    /// Font override.
    pub font: Option<Font>,
    /// Underline flag.
    pub underline: bool,
}

impl Attributes {
    /// Attributes with only a foreground colour.
    pub fn with_foreground(colour: Colour) -> Self {
        Self {
            foreground: Some(colour),
            ..Self::default()
        }
    }

    /// Overlay every field set in `other` onto `self`.
    pub fn merge(&mut self, other: &Attributes) {
        if other.foreground.is_some() {
            self.foreground = other.foreground;
        }
        if other.background.is_some() {
            self.background = other.background;
        }
        if other.font.is_some() {
            self.font = other.font.clone();
        }
        self.underline |= other.underline;
    }
}

/// A maximal stretch of text sharing one attribute set.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeRun {
    /// Covered range.
    pub range: TextRange,
    /// Attributes of every code unit in `range`.
    pub attributes: Attributes,
}

/// Attribute runs covering a buffer.
#[derive(Debug, Clone, Default)]
pub struct AttributeRuns {
    runs: Vec<AttributeRun>,
}

impl AttributeRuns {
    /// Runs for a buffer of `len` code units, all with default attributes.
    pub fn new(len: usize) -> Self {
        let mut runs = Self::default();
        runs.reset(len);
        runs
    }

    /// Drop all runs and cover `len` units with default attributes.
    pub fn reset(&mut self, len: usize) {
        self.runs.clear();
        if len > 0 {
            self.runs.push(AttributeRun {
                range: TextRange::new(0, len),
                attributes: Attributes::default(),
            });
        }
    }

    /// All runs in order.
    pub fn runs(&self) -> &[AttributeRun] {
        &self.runs
    }

    /// Attributes at `offset` and the run's range.
    pub fn at(&self, offset: usize) -> Option<&AttributeRun> {
        self.index_of(offset).map(|idx| &self.runs[idx])
    }

    /// Track a text replacement of `range` by `inserted` units.
    ///
    /// Inserted text takes the attributes of the first replaced unit, or of the preceding unit
    /// for pure insertions.
    pub fn replace(&mut self, range: TextRange, inserted: usize) {
        let inherit_from = if range.is_empty() {
            range.start.checked_sub(1)
        } else {
            Some(range.start)
        };
        let inherited = inherit_from
            .and_then(|offset| self.at(offset))
            .or_else(|| self.runs.first())
            .map(|run| run.attributes.clone())
            .unwrap_or_default();

        self.split_at(range.start);
        self.split_at(range.end);

        let first = self.runs.partition_point(|run| run.range.start < range.start);
        let last = self.runs.partition_point(|run| run.range.start < range.end);
        let replacement = (inserted > 0).then(|| AttributeRun {
            range: TextRange::at(range.start, inserted),
            attributes: inherited,
        });
        self.runs.splice(first..last, replacement);

        let shift = inserted as isize - range.len() as isize;
        let resume = first + usize::from(inserted > 0);
        for run in &mut self.runs[resume..] {
            run.range = TextRange::new(
                run.range.start.saturating_add_signed(shift),
                run.range.end.saturating_add_signed(shift),
            );
        }

        self.coalesce();
    }

    /// Set `attributes` on `range` (clamped to the covered text).
    pub fn set(&mut self, range: TextRange, attributes: Attributes) {
        let covered = self.runs.last().map_or(0, |run| run.range.end);
        let range = TextRange::new(range.start.min(covered), range.end.min(covered));
        if range.is_empty() {
            return;
        }

        self.split_at(range.start);
        self.split_at(range.end);
        let first = self.runs.partition_point(|run| run.range.start < range.start);
        let last = self.runs.partition_point(|run| run.range.start < range.end);
        self.runs
            .splice(first..last, [AttributeRun { range, attributes }]);
        self.coalesce();
    }

    fn index_of(&self, offset: usize) -> Option<usize> {
        let idx = self
            .runs
            .partition_point(|run| run.range.start <= offset)
            .checked_sub(1)?;
        self.runs[idx].range.contains(offset).then_some(idx)
    }

    /// Ensure a run boundary at `offset`.
    fn split_at(&mut self, offset: usize) {
        let Some(idx) = self.index_of(offset) else {
            return;
        };
        let run = &self.runs[idx];
        if run.range.start == offset {
            return;
        }
        let right = AttributeRun {
            range: TextRange::new(offset, run.range.end),
            attributes: run.attributes.clone(),
        };
        self.runs[idx].range.end = offset;
        self.runs.insert(idx + 1, right);
    }

    fn coalesce(&mut self) {
        self.runs.dedup_by(|next, prev| {
            if prev.attributes == next.attributes && prev.range.end == next.range.start {
                prev.range.end = next.range.end;
                true
            } else {
                false
            }
        });
    }
}
