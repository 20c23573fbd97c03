//! Night segmentation and per-sample attributes for Sky Quality Meter (SQM) brightness logs.
//!
//! The crate reads a time-ordered stream of SQM samples, cuts it into nights at local 15:00
//! (or at data gaps), and annotates every sample with a night-average brightness, a
//! sliding-window roughness score, a night index, and the zenith's right ascension, galactic
//! coordinates and J2000 day number.
//!
//! ```rust,no_run
//! use camino::Utf8Path;
//! use skyglow::{
//!     params::RunParams,
//!     pipeline::Pipeline,
//!     sqm_csv::{default_output_path, SqmCsvWriter, SqmReader},
//! };
//!
//! let input = Utf8Path::new("Sunriver.csv");
//! let params = RunParams::builder()
//!     .latitude(43.8842)
//!     .longitude(-121.4382)
//!     .half_range(9)
//!     .build()?;
//!
//! let reader = SqmReader::from_path(input)?;
//! let writer = SqmCsvWriter::create(&default_output_path(input), &params)?;
//! let (summary, writer) = Pipeline::new(params, writer).run_reader(reader)?;
//! writer.into_inner()?;
//! println!("{summary}");
//! # Ok::<(), skyglow::SkyglowError>(())
//! ```
pub mod aggregate;
pub mod annotate;
pub mod constants;
pub mod geometry;
pub mod night;
pub mod params;
pub mod pipeline;
pub mod roughness;
pub mod sample;
pub mod segmenter;
pub mod skyglow_errors;
pub mod sqm_csv;
pub mod time;

pub use skyglow_errors::SkyglowError;
