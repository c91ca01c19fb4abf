//! HTML parsers for cda.pl
//!
//! Contains modules for parsing the two page types the crawler understands.

pub mod folder;
pub mod video;

pub use folder::{parse_folder_title, parse_subfolder_links, parse_video_links};
pub use video::{parse_encoded_media_reference, parse_player_data, parse_resolution_labels};
