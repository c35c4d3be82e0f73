//! Clip folder events.

id_body! {
    /// Body of `CLIP_FOLDER_CREATED`.
    ClipFolderCreated;
    /// Body of `CLIP_FOLDER_UPDATED`.
    ClipFolderUpdated;
    /// Body of `CLIP_FOLDER_DELETED`.
    ClipFolderDeleted;
}
