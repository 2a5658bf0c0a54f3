pub mod overlay_timeline_use_case;
pub mod timeline_logger;
