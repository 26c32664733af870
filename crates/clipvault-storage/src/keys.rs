//! Shared key construction for stored objects.

/// Key for a plain upload addressed by `{path}/{file}`.
pub fn object_key(path: &str, file: &str) -> String {
    format!("{}/{}", path, file)
}

/// Key of a clip's video payload.
pub fn clip_video_key(clip_id: &str) -> String {
    clip_asset_key(clip_id, "video")
}

/// Key of a sidecar asset stored next to a clip's video (thumbnail, captions).
pub fn clip_asset_key(clip_id: &str, name: &str) -> String {
    format!("{}/{}", clip_id, name)
}
