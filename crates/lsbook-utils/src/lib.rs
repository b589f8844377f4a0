pub mod assets;
pub mod html;
pub mod output;

pub use assets::{copy_external_images, write_assets};
pub use html::{output_path, root_relative_path};
pub use output::{CopyOptions, copy_sources, prepare_output_dir};
