//! mdreader Tags
//!
//! Tag extraction and release assembly for mdreader.
//!
//! This crate provides:
//! - Container sniffing by extension and signature (MP3, FLAC, WavPack, DSF)
//! - Binary tag readers for ID3v2, Vorbis comments, APEv2 and DSF chunks
//! - Normalization of format-native keys into canonical fields
//! - Assembly of one release per directory, with per-file diagnostics
//! - A bounded worker pool for parallel extraction
//!
//! # Example
//!
//! ```rust,no_run
//! use mdreader_tags::{Assembler, ExtractLimits, ExtractionPool};
//! use std::path::Path;
//! use std::sync::Arc;
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = Arc::new(ExtractionPool::with_default_workers()?);
//! let assembler = Assembler::new(pool, ExtractLimits::default());
//!
//! let assembled = assembler.assemble(Path::new("/music/Kind of Blue"))?;
//! println!("{} tracks", assembled.release.tracks.len());
//! for diagnostic in &assembled.diagnostics {
//!     eprintln!("{}: {}", diagnostic.kind, diagnostic.message);
//! }
//! # Ok(())
//! # }
//! ```

mod assembler;
mod bag;
mod binary;
mod error;
mod extract;
mod normalize;
mod pool;
mod sniffer;

pub use assembler::{Assembled, Assembler};
pub use bag::RawTagBag;
pub use error::{AssemblyError, Result, TagReadError};
pub use extract::{extract, extract_from, ExtractLimits, DEFAULT_MAX_FILE_SIZE};
pub use normalize::{normalize, AlbumFields, NormalizedTrack};
pub use pool::ExtractionPool;
pub use sniffer::{classify, classify_signature};
