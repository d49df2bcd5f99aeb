//! docperm - document text as a big integer, and that integer as a permutation
//!
//! Each input document is reduced to plain text, the text is read as one
//! base-256 number, and that number is used as the rank of a permutation of
//! a fixed-size index set.
//!
//! ## Pipeline
//!
//! ```text
//! Document → Extract text → Encode → Write artifact → Unrank → (discarded)
//! ```
//!
//! - **Extract**: `pdftotext` for PDF, LibreOffice for doc/docx, direct read for txt
//! - **Encode**: bytes as big-endian base-256 digits, line endings stripped by default
//! - **Write artifact**: `decode(encode(text))` to `outputfile_<name>.txt`
//! - **Unrank**: the value (reduced modulo `n!` if needed) as a rank in `[0, n!)`
//!
//! The permutation is computed and dropped; nothing about it is persisted.
//!
//! ## Example
//!
//! ```
//! use docperm::{decode, encode, rank, unrank, Permutation};
//! use num_bigint::BigUint;
//!
//! let value = encode(b"ABC");
//! assert_eq!(value, BigUint::from(0x414243u32));
//! assert_eq!(decode(&value), b"ABC");
//!
//! let p = Permutation::new(vec![3, 0, 2, 1]).unwrap();
//! let r = rank(&p);
//! assert_eq!(unrank(&r, 4).unwrap(), p);
//! ```

pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod permutation;
pub mod pipeline;

pub use codec::{decode, encode, encode_reader, encode_with, Encoder, LineEndings};
pub use config::{ConverterConfig, PipelineConfig, RankOverflow};
pub use error::{DocpermError, Result};
pub use permutation::{
    factorial, rank, rank_lexicographic, unrank, unrank_lexicographic, Permutation, RankOrder,
};
pub use pipeline::{process_all, process_file, FileOutcome, FileReport, TextExtractor};
