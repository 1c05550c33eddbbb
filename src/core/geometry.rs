//! Deterministic slot lattice for the sphere surface.
//!
//! Slots are fixed angular positions; which image sits in which slot is
//! decided once per `(images, segments)` pair and never mutated afterwards.
//! There is no randomness anywhere in this module.

/// Rows of tiles per lattice column.
pub const ROWS_PER_COLUMN: usize = 5;

// Vertical offsets per column, staggered by one half-step on odd columns so
// neighbouring columns interleave instead of forming horizontal bands.
const EVEN_ROW_OFFSETS: [i32; ROWS_PER_COLUMN] = [-4, -2, 0, 2, 4];
const ODD_ROW_OFFSETS: [i32; ROWS_PER_COLUMN] = [-3, -1, 1, 3, 5];

/// One entry of the host-supplied image pool.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageRef {
    pub url: String,
    pub alt: Option<String>,
    /// Opaque identity used only for highlighted-set membership and for
    /// handing tap events back to the host.
    pub id: Option<String>,
}

/// Fixed angular lattice coordinate, assigned at build time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AngularSlot {
    pub offset_x: i32,
    pub offset_y: i32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GalleryItem {
    pub image: ImageRef,
    /// Index into the original pool, `None` for placeholder slots. Survives
    /// the duplicate-repair pass so hosts can recover their own payloads.
    pub source_index: Option<usize>,
    pub slot: AngularSlot,
}

/// Per-tile base orientation derived analytically from the slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotRotation {
    pub rot_x_deg: f64,
    pub rot_y_deg: f64,
}

/// All slots of the lattice, in scan order (column-major, top to bottom).
pub fn lattice_slots(segments: u32) -> Vec<AngularSlot> {
    let mut slots = Vec::with_capacity(segments as usize * ROWS_PER_COLUMN);
    for col in 0..segments {
        let rows = if col % 2 == 0 {
            &EVEN_ROW_OFFSETS
        } else {
            &ODD_ROW_OFFSETS
        };
        for &offset_y in rows {
            slots.push(AngularSlot {
                offset_x: col as i32,
                offset_y,
            });
        }
    }
    slots
}

/// Map a lattice coordinate to the tile's base rotation in degrees.
///
/// Columns are spread evenly around the full circle; rows step by half a
/// column's angular width. Pure function of `(slot, segments)`.
#[inline]
pub fn base_rotation(slot: AngularSlot, segments: u32) -> SlotRotation {
    let segs = segments.max(1) as f64;
    let row_unit = 360.0 / (segs * 2.0);
    SlotRotation {
        rot_x_deg: -(slot.offset_y as f64) * row_unit,
        rot_y_deg: slot.offset_x as f64 * (360.0 / segs),
    }
}

/// Assign images to the lattice.
///
/// An empty pool yields placeholder items; otherwise the pool is cycled
/// across all slots and a single repair pass reduces (without guaranteeing
/// to eliminate) adjacent duplicates. Deterministic for a given input.
pub fn build_items(images: &[ImageRef], segments: u32) -> Vec<GalleryItem> {
    let slots = lattice_slots(segments);
    if images.is_empty() {
        return slots
            .into_iter()
            .map(|slot| GalleryItem {
                image: ImageRef::default(),
                source_index: None,
                slot,
            })
            .collect();
    }

    let mut assignment: Vec<usize> = (0..slots.len()).map(|i| i % images.len()).collect();
    repair_adjacent_duplicates(&mut assignment, images);

    slots
        .into_iter()
        .zip(assignment)
        .map(|(slot, idx)| GalleryItem {
            image: images[idx].clone(),
            source_index: Some(idx),
            slot,
        })
        .collect()
}

/// Count of consecutive slots showing the same image. Placeholders are
/// skipped. Diagnostic, logged after builds and checked by tests.
pub fn adjacent_duplicate_pairs(items: &[GalleryItem]) -> usize {
    items
        .windows(2)
        .filter(|w| !w[0].image.url.is_empty() && w[0].image.url == w[1].image.url)
        .count()
}

// Scan in slot order; whenever two consecutive slots hold the same image,
// swap the later one with the nearest later slot holding a different image.
// One pass only: monotonic improvement, not a guarantee of zero pairs.
fn repair_adjacent_duplicates(assignment: &mut [usize], images: &[ImageRef]) {
    for i in 1..assignment.len() {
        if images[assignment[i]].url != images[assignment[i - 1]].url {
            continue;
        }
        let dup = images[assignment[i]].url.clone();
        if let Some(j) = (i + 1..assignment.len()).find(|&j| images[assignment[j]].url != dup) {
            assignment.swap(i, j);
        }
    }
}
