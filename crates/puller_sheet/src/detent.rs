//! Detents - the rest positions of a sheet
//!
//! A detent names a fraction of screen height at which the sheet can
//! stably rest. The synthetic zero detent stands for "fully dismissed"
//! and never appears in a user-declared detent list.

use smallvec::SmallVec;

/// A named or fractional rest position
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Detent {
    /// Arbitrary fraction of screen height, clamped to `[0, 1]`
    Fraction(f32),
    /// Half the screen
    Medium,
    /// Nearly full screen, leaving the presenting view visible
    Large,
    /// The entire screen
    Full,
    /// Resolved at presentation time from the content's intrinsic height
    FitsContent,
}

impl Detent {
    /// Synthetic detent representing the dismissed position
    pub const ZERO: Detent = Detent::Fraction(0.0);

    /// Fraction of screen height this detent occupies
    pub fn value(self) -> f32 {
        match self {
            Detent::Fraction(v) => v.clamp(0.0, 1.0),
            Detent::Medium => 0.5,
            Detent::Large => 0.92,
            Detent::Full => 1.0,
            Detent::FitsContent => 1.0,
        }
    }

    /// Build a detent from a raw fraction, snapping to the named cases
    pub fn from_value(raw: f32) -> Self {
        if raw == Detent::Medium.value() {
            Detent::Medium
        } else if raw == Detent::Large.value() {
            Detent::Large
        } else if raw == Detent::Full.value() {
            Detent::Full
        } else {
            Detent::Fraction(raw)
        }
    }

    pub fn is_full(self) -> bool {
        self.value() == 1.0
    }

    pub fn is_zero(self) -> bool {
        self.value() == 0.0
    }

    pub fn is_fits_content(self) -> bool {
        matches!(self, Detent::FitsContent)
    }

    /// Whether this detent sits at the Large or Full height
    pub fn is_expanded(self) -> bool {
        let v = self.value();
        v == Detent::Large.value() || v == Detent::Full.value()
    }

    /// Pixel y of this detent's rest position
    pub fn position(self, screen_height: f32) -> f32 {
        screen_height * (1.0 - self.value())
    }

    /// Pixel height of the sheet at this detent
    pub fn height(self, screen_height: f32) -> f32 {
        screen_height * self.value()
    }
}

/// An ordered, normalized set of detents
///
/// Normalization drops zero-valued entries, deduplicates by value
/// (first declared wins), and sorts ascending. An input with no non-zero
/// entries collapses to a single fits-content detent so the list is never
/// empty.
#[derive(Clone, Debug, Default)]
pub struct DetentList {
    items: SmallVec<[Detent; 4]>,
}

impl DetentList {
    pub fn normalized(input: &[Detent]) -> Self {
        let mut items: SmallVec<[Detent; 4]> = input
            .iter()
            .copied()
            .filter(|d| d.value() > 0.0)
            .collect();
        if items.is_empty() {
            items.push(Detent::FitsContent);
        }
        items.sort_by(|a, b| a.value().total_cmp(&b.value()));
        items.dedup_by(|a, b| a.value() == b.value());
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<Detent> {
        self.items.first().copied()
    }

    pub fn last(&self) -> Option<Detent> {
        self.items.last().copied()
    }

    /// The detent below the last one, if any
    pub fn second_to_last(&self) -> Option<Detent> {
        if self.items.len() > 1 {
            Some(self.items[self.items.len() - 2])
        } else {
            None
        }
    }

    pub fn contains(&self, detent: Detent) -> bool {
        self.items.contains(&detent)
    }

    pub fn iter(&self) -> impl Iterator<Item = Detent> + '_ {
        self.items.iter().copied()
    }

    /// Insert a detent keeping the list sorted; equal values keep the
    /// existing entry
    pub fn insert_sorted(&mut self, detent: Detent) {
        if self.items.iter().any(|d| d.value() == detent.value()) {
            return;
        }
        self.items.push(detent);
        self.items.sort_by(|a, b| a.value().total_cmp(&b.value()));
    }
}
