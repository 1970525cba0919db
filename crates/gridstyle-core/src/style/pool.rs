//! Style pool for hash-consing
//!
//! Spreadsheets overwhelmingly reuse a handful of styles, so every style that
//! enters a sheet's grid goes through [`StylePool::intern`], which returns the
//! one canonical [`SharedStyle`] for its content. Ownership is carried by the
//! `SharedStyle` handles stored in the grid; the pool only holds weak
//! references, so a style disappears as soon as the last cell stops using it.

use std::fmt;
use std::ops::Deref;
use std::sync::{Arc, Weak};

use ahash::AHashMap;

use super::{Color, Style};

/// Per-sheet data a style is resolved against when it enters the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SheetLink {
    auto_pattern_color: Color,
}

impl SheetLink {
    pub fn new(auto_pattern_color: Color) -> Self {
        Self { auto_pattern_color }
    }

    /// Color automatic pattern and border colors resolve to
    pub fn auto_pattern_color(&self) -> Color {
        self.auto_pattern_color
    }
}

impl Default for SheetLink {
    fn default() -> Self {
        Self::new(Color::BLACK)
    }
}

/// An interned, immutable style
///
/// Cloning is cheap and shares the same allocation. There is no way to get a
/// `&mut Style` back out; build a new [`Style`] and intern it instead.
#[derive(Clone)]
pub struct SharedStyle(Arc<Style>);

impl SharedStyle {
    /// Whether both handles refer to the same pooled style
    #[inline]
    pub fn ptr_eq(&self, other: &SharedStyle) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the pooled style, stable for as long as a handle is alive
    #[inline]
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    /// Owned copy of the style, for building a modified variant
    pub fn to_style(&self) -> Style {
        (*self.0).clone()
    }

    /// Number of live handles to this style
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.0)
    }
}

impl Deref for SharedStyle {
    type Target = Style;

    #[inline]
    fn deref(&self) -> &Style {
        &self.0
    }
}

impl PartialEq for SharedStyle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.0 == *other.0
    }
}

impl Eq for SharedStyle {}

impl fmt::Debug for SharedStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedStyle({:#x}) ", self.addr())?;
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// Pool occupancy, for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PoolStats {
    /// Styles still referenced from outside the pool
    pub live: usize,
    /// Bucket entries, dead ones included
    pub entries: usize,
    /// Distinct hash buckets
    pub buckets: usize,
}

/// Hash-consing set of sheet styles
#[derive(Default)]
pub struct StylePool {
    buckets: AHashMap<u64, Vec<Weak<Style>>>,
    /// Total weak entries across buckets
    entries: usize,
    /// Live count observed by the last purge
    live_at_purge: usize,
}

impl StylePool {
    /// Create an empty pool
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the canonical pooled style equal to `candidate` once linked.
    ///
    /// Linking resolves automatic pattern and border colors against `link`
    /// and happens before the lookup, since it changes what is compared.
    pub fn intern(&mut self, candidate: Style, link: &SheetLink) -> SharedStyle {
        let style = candidate.linked(link.auto_pattern_color());
        let hash = style.hash_value();
        let bucket = self.buckets.entry(hash).or_default();

        for weak in bucket.iter() {
            if let Some(existing) = weak.upgrade() {
                if *existing == style {
                    return SharedStyle(existing);
                }
            }
        }

        let before = bucket.len();
        bucket.retain(|weak| weak.strong_count() > 0);
        let pruned = before - bucket.len();

        let shared = Arc::new(style);
        bucket.push(Arc::downgrade(&shared));
        self.entries = self.entries - pruned + 1;

        if self.entries > 2 * self.live_at_purge + 64 {
            self.purge();
        }
        SharedStyle(shared)
    }

    /// Remove `style` from the pool.
    ///
    /// Outstanding handles stay valid but the style stops being canonical.
    /// Unlinking a style that is not pooled is a no-op, so this is safe while
    /// the pool is being torn down.
    pub fn unlink(&mut self, style: &SharedStyle) {
        let hash = style.hash_value();
        let Some(bucket) = self.buckets.get_mut(&hash) else {
            return;
        };
        let target = Arc::as_ptr(&style.0);
        let before = bucket.len();
        bucket.retain(|weak| weak.as_ptr() != target);
        self.entries -= before - bucket.len();
        if bucket.is_empty() {
            self.buckets.remove(&hash);
        }
    }

    /// Drop one handle, unlinking the style if it was the last one
    pub fn release(&mut self, style: SharedStyle) {
        if style.ref_count() == 1 {
            self.unlink(&style);
        }
    }

    /// Forget bucket entries whose styles have been dropped.
    ///
    /// Returns the number of entries removed.
    pub fn purge(&mut self) -> usize {
        let before = self.entries;
        self.buckets.retain(|_, bucket| {
            bucket.retain(|weak| weak.strong_count() > 0);
            !bucket.is_empty()
        });
        self.entries = self.buckets.values().map(Vec::len).sum();
        self.live_at_purge = self.entries;
        let removed = before - self.entries;
        if removed > 0 {
            log::debug!("style pool purge: {removed} dead, {} live", self.entries);
        }
        removed
    }

    /// Whether `style` is the canonical pooled instance
    pub fn contains(&self, style: &SharedStyle) -> bool {
        let target = Arc::as_ptr(&style.0);
        self.buckets
            .get(&style.hash_value())
            .map_or(false, |bucket| bucket.iter().any(|weak| weak.as_ptr() == target))
    }

    /// Number of live pooled styles
    pub fn len(&self) -> usize {
        self.buckets
            .values()
            .flatten()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over the live pooled styles, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = SharedStyle> + '_ {
        self.buckets
            .values()
            .flatten()
            .filter_map(|weak| weak.upgrade().map(SharedStyle))
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            live: self.len(),
            entries: self.entries,
            buckets: self.buckets.len(),
        }
    }

    /// Forget every entry
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.entries = 0;
        self.live_at_purge = 0;
    }
}

impl fmt::Debug for StylePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StylePool")
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Border;

    #[test]
    fn test_deduplication() {
        let mut pool = StylePool::new();
        let link = SheetLink::default();

        let a = pool.intern(Style::new().with_bold(true), &link);
        let b = pool.intern(Style::new().with_bold(true), &link);
        let c = pool.intern(Style::new().with_italic(true), &link);

        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
        assert_eq!(pool.len(), 2);
        assert!(pool.contains(&a));
    }

    #[test]
    fn test_link_before_lookup() {
        let mut pool = StylePool::new();
        let link = SheetLink::new(Color::BLUE);

        let resolved = Style::new().with_border_top(Border::new(
            crate::style::BorderLineStyle::Thin,
            Color::AutoRgb { r: 0, g: 0, b: 255 },
        ));
        let auto = Style::new().with_border_top(Border::thin());

        let a = pool.intern(resolved, &link);
        let b = pool.intern(auto, &link);
        assert!(a.ptr_eq(&b));
        assert_eq!(
            b.border_top().map(|border| border.color),
            Some(Color::AutoRgb { r: 0, g: 0, b: 255 })
        );
    }

    #[test]
    fn test_styles_die_with_last_handle() {
        let mut pool = StylePool::new();
        let link = SheetLink::default();

        let a = pool.intern(Style::new().with_indent(3), &link);
        let b = a.clone();
        assert_eq!(pool.len(), 1);

        pool.release(a);
        assert_eq!(pool.len(), 1);
        assert!(pool.contains(&b));

        pool.release(b);
        assert_eq!(pool.len(), 0);
        assert_eq!(pool.stats().entries, 0);
    }

    #[test]
    fn test_purge_drops_dead_entries() {
        let mut pool = StylePool::new();
        let link = SheetLink::default();

        let keep = pool.intern(Style::new().with_indent(0), &link);
        for indent in 1..10u8 {
            drop(pool.intern(Style::new().with_indent(indent), &link));
        }
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.purge(), 9);
        assert_eq!(pool.stats().entries, 1);
        assert!(pool.contains(&keep));
    }

    #[test]
    fn test_unlink_is_idempotent() {
        let mut pool = StylePool::new();
        let link = SheetLink::default();

        let a = pool.intern(Style::new().with_strike(true), &link);
        pool.unlink(&a);
        pool.unlink(&a);
        assert!(!pool.contains(&a));

        // a fresh intern creates a new canonical instance
        let b = pool.intern(Style::new().with_strike(true), &link);
        assert!(!a.ptr_eq(&b));
        assert_eq!(a, b);
    }
}
