//! Stamp and stamp palette events.

id_body! {
    /// Body of `STAMP_CREATED`.
    StampCreated;
    /// Body of `STAMP_UPDATED`.
    StampUpdated;
    /// Body of `STAMP_DELETED`.
    StampDeleted;
    /// Body of `STAMP_PALETTE_CREATED`.
    StampPaletteCreated;
    /// Body of `STAMP_PALETTE_UPDATED`.
    StampPaletteUpdated;
    /// Body of `STAMP_PALETTE_DELETED`.
    StampPaletteDeleted;
}
