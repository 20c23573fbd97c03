use thiserror::Error;

use crate::sqm_csv::ParseRowError;

#[derive(Error, Debug)]
pub enum SkyglowError {
    #[error(
        "Night #{night} already holds {cap} samples, cannot accept the sample at {at}; \
         the data cadence is below one minute or the input is corrupt"
    )]
    NightOverflow { night: usize, cap: usize, at: String },

    #[error("Invalid run parameter: {0}")]
    InvalidRunParameter(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Malformed SQM row: {0}")]
    MalformedRow(#[from] ParseRowError),
}

impl PartialEq for SkyglowError {
    fn eq(&self, other: &Self) -> bool {
        use SkyglowError::*;
        match (self, other) {
            (
                NightOverflow {
                    night: a,
                    cap: b,
                    at: c,
                },
                NightOverflow {
                    night: x,
                    cap: y,
                    at: z,
                },
            ) => a == x && b == y && c == z,
            (InvalidRunParameter(a), InvalidRunParameter(b)) => a == b,
            (MalformedRow(a), MalformedRow(b)) => a == b,

            // I/O and CSV errors only compare by variant
            (IoError(_), IoError(_)) => true,
            (CsvError(_), CsvError(_)) => true,

            _ => false,
        }
    }
}
