//! Local file output.
//!
//! # Submodules
//!
//! - [`text`]: writes the flattened article text under `articles/`
//!
//! # Output Structure
//!
//! ```text
//! ./
//! ├── articles/
//! │   └── {name}.txt   # "{title}\n\n{body}"
//! └── {name}.mp3       # written by the narrator
//! ```

pub mod text;
