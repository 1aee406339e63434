//! CSV-based bracket table loader
//!
//! Loads a replacement income-tax bracket table from a three-column CSV
//! (lower,upper,rate). The upper bound of the top bracket is written as
//! `inf` or left empty.

use std::path::Path;

use thiserror::Error;

use super::{TaxBracket, TaxConfig};

/// Errors raised while loading or validating a bracket table
#[derive(Debug, Error)]
pub enum TaxTableError {
    #[error("failed to read bracket table: {0}")]
    Csv(#[from] csv::Error),

    #[error("bracket {index}: could not parse {field} value {value:?}")]
    Parse {
        index: usize,
        field: &'static str,
        value: String,
    },

    #[error("bracket table is empty")]
    Empty,

    #[error("bracket {index}: expected lower bound {expected}, found {found}")]
    NotContiguous {
        index: usize,
        expected: f64,
        found: f64,
    },

    #[error("bracket {index}: upper bound {upper} does not exceed lower bound {lower}")]
    Inverted { index: usize, lower: f64, upper: f64 },

    #[error("final bracket must be open-ended (upper bound `inf`)")]
    BoundedTop,

    #[error("bracket {0}: only the final bracket may be open-ended")]
    OpenMidTable(usize),

    #[error("bracket {index}: rate {rate} is outside [0, 1]")]
    RateOutOfRange { index: usize, rate: f64 },
}

fn parse_field(index: usize, field: &'static str, raw: &str) -> Result<f64, TaxTableError> {
    raw.trim().parse().map_err(|_| TaxTableError::Parse {
        index,
        field,
        value: raw.to_string(),
    })
}

fn parse_upper(index: usize, raw: &str) -> Result<Option<f64>, TaxTableError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("inf") {
        return Ok(None);
    }
    parse_field(index, "upper", trimmed).map(Some)
}

/// Check that brackets ascend contiguously from 0 and end open-ended
pub fn validate_brackets(brackets: &[TaxBracket]) -> Result<(), TaxTableError> {
    if brackets.is_empty() {
        return Err(TaxTableError::Empty);
    }

    let mut expected_lower = 0.0;
    for (index, bracket) in brackets.iter().enumerate() {
        if (bracket.lower - expected_lower).abs() > 1e-6 {
            return Err(TaxTableError::NotContiguous {
                index,
                expected: expected_lower,
                found: bracket.lower,
            });
        }
        if !(0.0..=1.0).contains(&bracket.rate) {
            return Err(TaxTableError::RateOutOfRange {
                index,
                rate: bracket.rate,
            });
        }
        match bracket.upper {
            Some(upper) => {
                if upper <= bracket.lower {
                    return Err(TaxTableError::Inverted {
                        index,
                        lower: bracket.lower,
                        upper,
                    });
                }
                expected_lower = upper;
            }
            None => {
                if index != brackets.len() - 1 {
                    return Err(TaxTableError::OpenMidTable(index));
                }
            }
        }
    }

    if brackets.last().map(|b| b.upper.is_some()).unwrap_or(true) {
        return Err(TaxTableError::BoundedTop);
    }
    Ok(())
}

impl TaxConfig {
    /// Load the income-tax bracket table from a CSV file, keeping the
    /// default capital-gains parameters
    pub fn from_csv_path(path: &Path) -> Result<Self, TaxTableError> {
        let mut reader = csv::Reader::from_path(path)?;

        let mut brackets = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result?;
            let lower = parse_field(index, "lower", &record[0])?;
            let upper = parse_upper(index, &record[1])?;
            let rate = parse_field(index, "rate", &record[2])?;
            brackets.push(TaxBracket::new(lower, upper, rate));
        }

        validate_brackets(&brackets)?;

        Ok(Self {
            brackets,
            ..Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_table(name: &str, body: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn loads_a_two_bracket_table() {
        let path = write_table(
            "brackets_two.csv",
            "lower,upper,rate\n0,50000,0.10\n50000,inf,0.20\n",
        );
        let tax = TaxConfig::from_csv_path(&path).unwrap();
        assert_eq!(tax.brackets.len(), 2);
        assert_eq!(tax.brackets[1].upper, None);
        assert_eq!(tax.income_tax(60_000.0), 5_000.0 + 2_000.0);
    }

    #[test]
    fn default_table_validates() {
        let tax = TaxConfig::default();
        validate_brackets(&tax.brackets).unwrap();
    }

    #[test]
    fn rejects_gap_in_table() {
        let path = write_table(
            "brackets_gap.csv",
            "lower,upper,rate\n0,50000,0.10\n60000,inf,0.20\n",
        );
        let err = TaxConfig::from_csv_path(&path).unwrap_err();
        assert!(matches!(err, TaxTableError::NotContiguous { index: 1, .. }));
    }

    #[test]
    fn rejects_bounded_top_bracket() {
        let path = write_table(
            "brackets_bounded.csv",
            "lower,upper,rate\n0,50000,0.10\n50000,100000,0.20\n",
        );
        let err = TaxConfig::from_csv_path(&path).unwrap_err();
        assert!(matches!(err, TaxTableError::BoundedTop));
    }

    #[test]
    fn rejects_empty_table() {
        let path = write_table("brackets_empty.csv", "lower,upper,rate\n");
        let err = TaxConfig::from_csv_path(&path).unwrap_err();
        assert!(matches!(err, TaxTableError::Empty));
    }
}
