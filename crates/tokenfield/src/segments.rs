//! Segmented multi-value input.
//!
//! A multi-select term shows its whole selection as one string inside a single
//! input, labels joined by [`JOINER`]. The caret position decides which
//! segment an edit applies to, so inserting or removing a value never disturbs
//! the other segments.
//!
//! Removing an interior run of values leaves a *hole*: an empty segment that
//! keeps the following segments where they were. The next insertion with the
//! caret in that hole fills it in place instead of shifting later values.
//!
//! All offsets in this module are in chars, not bytes.

use std::ops::Range;

/// Separator between segments.
pub const JOINER: char = ',';

/// What a segment (slot) index refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotTarget {
    /// The slot shows the selected value at this index.
    Value(usize),
    /// The slot is a hole; inserting here puts a value at this index.
    Hole(usize),
    /// The slot is past the last value; inserting appends at this index.
    Append(usize),
}

impl SlotTarget {
    /// The selection index an insertion at this slot lands on.
    pub fn insertion_index(self) -> usize {
        match self {
            Self::Value(index) | Self::Hole(index) | Self::Append(index) => index,
        }
    }
}

/// Outcome of removing a run of slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovedSlots {
    /// Selection indices that were removed, ascending.
    pub value_indices: Vec<usize>,
    /// Slot left behind as a hole, if the run was interior.
    pub hole: Option<usize>,
}

/// Text, caret and holes of a segmented input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentBuffer {
    text: String,
    caret: (usize, usize),
    holes: Vec<usize>,
}

impl SegmentBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// The full input text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the input text is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Length of the text in chars.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Caret selection as `(start, end)` char offsets.
    pub fn caret(&self) -> (usize, usize) {
        self.caret
    }

    /// Replace the text and put the caret at its end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        let end = self.char_len();
        self.caret = (end, end);
    }

    /// Move the caret, clamped to the text.
    pub fn set_caret(&mut self, start: usize, end: usize) {
        let len = self.char_len();
        let start = start.min(len);
        let end = end.min(len).max(start);
        self.caret = (start, end);
    }

    /// Char offsets of every joiner in the text.
    fn joiner_offsets(&self) -> Vec<usize> {
        self.text
            .chars()
            .enumerate()
            .filter(|(_, ch)| *ch == JOINER)
            .map(|(i, _)| i)
            .collect()
    }

    /// Segment containing char `offset`: the number of joiners before it.
    pub fn segment_at(&self, offset: usize) -> usize {
        self.joiner_offsets()
            .into_iter()
            .take_while(|&joiner| joiner < offset)
            .count()
    }

    /// Segments spanned by the caret, as `(start, end)` segment indices.
    pub fn segments_in_input(&self) -> (usize, usize) {
        let (start, end) = self.caret;
        (self.segment_at(start), self.segment_at(end))
    }

    /// Char range of segment `index`; an empty range at the end if it does
    /// not exist yet.
    pub fn segment_bounds(&self, index: usize) -> Range<usize> {
        let joiners = self.joiner_offsets();
        if index > joiners.len() {
            let end = self.char_len();
            return end..end;
        }
        let start = if index == 0 { 0 } else { joiners[index - 1] + 1 };
        let end = joiners.get(index).copied().unwrap_or_else(|| self.char_len());
        start..end
    }

    /// Text of segment `index`, empty if it does not exist.
    pub fn segment_text(&self, index: usize) -> String {
        let range = self.segment_bounds(index);
        self.text
            .chars()
            .skip(range.start)
            .take(range.end - range.start)
            .collect()
    }

    /// Text of the segment under the start of the caret.
    pub fn current_segment_text(&self) -> String {
        self.segment_text(self.segments_in_input().0)
    }

    /// Replace the text of the segment under the caret, leaving every other
    /// segment untouched. The caret ends up after the replacement.
    pub fn replace_current_segment(&mut self, replacement: &str) {
        let range = self.segment_bounds(self.segments_in_input().0);
        let mut text: String = self.text.chars().take(range.start).collect();
        text.push_str(replacement);
        text.extend(self.text.chars().skip(range.end));
        self.text = text;

        let caret = range.start + replacement.chars().count();
        self.caret = (caret, caret);
    }

    /// Char offset where segment `slot` starts.
    pub fn caret_at_segment(&self, slot: usize) -> usize {
        self.segment_bounds(slot).start
    }

    /// Remembered hole slots, ascending.
    pub fn holes(&self) -> &[usize] {
        &self.holes
    }

    /// Forget every hole.
    pub fn clear_holes(&mut self) {
        self.holes.clear();
    }

    /// Number of slots for a selection of `len` values.
    pub fn slot_count(&self, len: usize) -> usize {
        len + self.holes.len()
    }

    fn holes_before(&self, slot: usize) -> usize {
        self.holes.iter().filter(|&&hole| hole < slot).count()
    }

    /// Resolve slot `slot` against a selection of `len` values.
    pub fn slot_to_value(&self, slot: usize, len: usize) -> SlotTarget {
        let index = slot - self.holes_before(slot);
        if self.holes.contains(&slot) {
            SlotTarget::Hole(index)
        } else if index < len {
            SlotTarget::Value(index)
        } else {
            SlotTarget::Append(len)
        }
    }

    /// Account for a value inserted at `slot`.
    ///
    /// Filling a hole consumes it; inserting anywhere else shifts later holes.
    pub fn record_insert(&mut self, slot: usize) {
        if let Some(pos) = self.holes.iter().position(|&hole| hole == slot) {
            self.holes.remove(pos);
        } else {
            for hole in self.holes.iter_mut().filter(|hole| **hole >= slot) {
                *hole += 1;
            }
        }
    }

    /// Slot showing the selected value at `index`.
    pub fn slot_of_value(&self, index: usize) -> usize {
        let mut slot = index;
        for &hole in &self.holes {
            if hole <= slot {
                slot += 1;
            }
        }
        slot
    }

    /// Account for the value at `slot` being removed without leaving a hole.
    pub fn record_remove(&mut self, slot: usize) {
        self.holes.retain(|&hole| hole != slot);
        for hole in self.holes.iter_mut().filter(|hole| **hole > slot) {
            *hole -= 1;
        }
    }

    /// Remove the inclusive run of slots `start..=end` from a selection of
    /// `len` values.
    ///
    /// An interior run (slots remain on both sides) leaves a hole at `start`.
    pub fn remove_slots(&mut self, start: usize, end: usize, len: usize) -> RemovedSlots {
        let total = self.slot_count(len);
        if end < start || start >= total {
            return RemovedSlots::default();
        }
        let end = end.min(total - 1);
        let run = end - start + 1;

        let value_indices = (start..=end)
            .filter(|slot| !self.holes.contains(slot))
            .map(|slot| slot - self.holes_before(slot))
            .collect();

        let interior = start > 0 && end < total - 1;
        let shift = if interior { run - 1 } else { run };
        let mut holes: Vec<usize> = self
            .holes
            .iter()
            .filter(|&&hole| hole < start || hole > end)
            .map(|&hole| if hole > end { hole - shift } else { hole })
            .collect();
        if interior {
            holes.push(start);
        }
        holes.sort_unstable();
        holes.dedup();
        self.holes = holes;

        RemovedSlots {
            value_indices,
            hole: interior.then_some(start),
        }
    }

    /// Text with the inclusive run of segments `start..=end` cut out, and the
    /// char offset where the cut happened.
    ///
    /// With `leave_hole` the run collapses to one empty segment. Otherwise it
    /// goes together with one neighbouring joiner. Every other segment keeps
    /// its text as typed.
    pub fn without_segments(&self, start: usize, end: usize, leave_hole: bool) -> (String, usize) {
        let last = self.joiner_offsets().len();
        if end < start || start > last {
            return (self.text.clone(), self.caret.0);
        }
        let end = end.min(last);
        let from = self.segment_bounds(start).start;
        let to = self.segment_bounds(end).end;

        let (from, to) = if leave_hole {
            (from, to)
        } else if end < last {
            (from, to + 1)
        } else if start > 0 {
            (from - 1, to)
        } else {
            (from, to)
        };

        let mut text: String = self.text.chars().take(from).collect();
        text.extend(self.text.chars().skip(to));
        (text, from)
    }

    /// Text for `labels`, with an empty segment at every hole.
    pub fn render(&self, labels: &[String]) -> String {
        let mut labels = labels.iter();
        (0..self.slot_count(labels.len()))
            .map(|slot| {
                if self.holes.contains(&slot) {
                    ""
                } else {
                    labels.next().map(String::as_str).unwrap_or("")
                }
            })
            .collect::<Vec<_>>()
            .join(JOINER.to_string().as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(text: &str, caret: usize) -> SegmentBuffer {
        let mut buffer = SegmentBuffer::new();
        buffer.set_text(text);
        buffer.set_caret(caret, caret);
        buffer
    }

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_segment_mapping() {
        let b = buffer("a,b,c", 0);
        assert_eq!(b.segment_at(0), 0);
        assert_eq!(b.segment_at(1), 0);
        assert_eq!(b.segment_at(2), 1);
        assert_eq!(b.segment_at(3), 1);
        assert_eq!(b.segment_at(5), 2);
    }

    #[test]
    fn test_caret_range_spans_segments() {
        let mut b = buffer("alpha,beta,gamma", 0);
        b.set_caret(2, 12);
        assert_eq!(b.segments_in_input(), (0, 2));
    }

    #[test]
    fn test_caret_defaults_to_end() {
        let b = buffer("a,b", 3);
        assert_eq!(b.caret(), (3, 3));
        assert_eq!(b.segments_in_input(), (1, 1));
        assert_eq!(b.current_segment_text(), "b");
    }

    #[test]
    fn test_replace_only_touches_caret_segment() {
        let mut b = buffer("a,b,c", 3);
        b.replace_current_segment("bee");

        assert_eq!(b.text(), "a,bee,c");
        assert_eq!(b.segment_text(0), "a");
        assert_eq!(b.segment_text(2), "c");
        assert_eq!(b.caret(), (5, 5));
    }

    #[test]
    fn test_segment_text_multibyte() {
        let b = buffer("é,ü", 3);
        assert_eq!(b.current_segment_text(), "ü");
        assert_eq!(b.segment_bounds(1), 2..3);
    }

    #[test]
    fn test_interior_removal_leaves_hole() {
        let mut b = buffer("a,b,c", 3);
        let removed = b.remove_slots(1, 1, 3);

        assert_eq!(removed.value_indices, vec![1]);
        assert_eq!(removed.hole, Some(1));
        assert_eq!(b.render(&labels(&["a", "c"])), "a,,c");
        assert_eq!(b.slot_to_value(1, 2), SlotTarget::Hole(1));
        assert_eq!(b.slot_to_value(2, 2), SlotTarget::Value(1));
    }

    #[test]
    fn test_edge_removal_leaves_no_hole() {
        let mut b = buffer("a,b,c", 0);
        assert_eq!(b.remove_slots(0, 0, 3).hole, None);
        assert_eq!(b.remove_slots(1, 1, 2).hole, None);
        assert!(b.holes().is_empty());
    }

    #[test]
    fn test_hole_fill_and_shift() {
        let mut b = SegmentBuffer::new();
        b.remove_slots(1, 1, 4);
        assert_eq!(b.holes(), &[1]);

        // Inserting before the hole pushes it right.
        b.record_insert(0);
        assert_eq!(b.holes(), &[2]);

        // Filling it consumes it.
        b.record_insert(2);
        assert!(b.holes().is_empty());
    }

    #[test]
    fn test_removal_across_holes() {
        let mut b = SegmentBuffer::new();
        b.remove_slots(1, 1, 5); // a,_,c,d,e
        b.remove_slots(3, 3, 4); // a,_,c,_,e
        assert_eq!(b.holes(), &[1, 3]);

        let removed = b.remove_slots(1, 2, 3);
        assert_eq!(removed.value_indices, vec![1]);
        assert_eq!(b.holes(), &[1, 2]);
        assert_eq!(b.render(&labels(&["a", "e"])), "a,,,e");
    }

    #[test]
    fn test_slot_of_value_skips_holes() {
        let mut b = SegmentBuffer::new();
        b.remove_slots(1, 1, 5); // a,_,c,d,e
        b.remove_slots(2, 2, 4); // a,_,_,d,e
        assert_eq!(b.holes(), &[1, 2]);
        assert_eq!(b.slot_of_value(0), 0);
        assert_eq!(b.slot_of_value(1), 3);

        // Dropping "a" without a hole pulls the holes left.
        b.record_remove(0);
        assert_eq!(b.holes(), &[0, 1]);
    }

    #[test]
    fn test_append_past_end() {
        let b = buffer("a,b,", 4);
        assert_eq!(b.segments_in_input(), (2, 2));
        assert_eq!(b.slot_to_value(2, 2), SlotTarget::Append(2));
    }

    #[test]
    fn test_cut_keeps_other_segments_as_typed() {
        let b = buffer("Alphx,Beta,Gamma", 16);
        assert_eq!(b.without_segments(2, 2, false), ("Alphx,Beta".to_string(), 10));
        assert_eq!(b.without_segments(1, 1, true), ("Alphx,,Gamma".to_string(), 6));
        assert_eq!(b.without_segments(0, 0, false), ("Beta,Gamma".to_string(), 0));
        assert_eq!(b.without_segments(0, 2, false), (String::new(), 0));
    }

    #[test]
    fn test_out_of_range_removal_is_noop() {
        let mut b = SegmentBuffer::new();
        assert_eq!(b.remove_slots(3, 4, 2), RemovedSlots::default());
        assert_eq!(b.remove_slots(2, 1, 5), RemovedSlots::default());
    }
}
