pub mod clip_get;
pub mod clip_update;
pub mod clip_upload;
pub mod object_get;
pub mod object_upload;
