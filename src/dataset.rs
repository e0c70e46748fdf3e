use std::path::Path;

use anyhow::Context;

use crate::models::ProgramStats;

pub const REQUIRED_COLUMNS: [&str; 8] = [
    "UNIV",
    "JURUSAN",
    "PENDAFTAR SNBP",
    "DITERIMA SNBP",
    "PENDAFTAR SNBT",
    "DITERIMA SNBT",
    "SNBP",
    "SNBT",
];

#[derive(Debug)]
pub struct Dataset {
    rows: Vec<ProgramStats>,
}

impl Dataset {
    pub fn load(path: &Path) -> anyhow::Result<Dataset> {
        #[derive(serde::Deserialize)]
        struct RawRow {
            #[serde(rename = "UNIV")]
            university: String,
            #[serde(rename = "JURUSAN")]
            major: String,
            #[serde(rename = "PENDAFTAR SNBP")]
            snbp_applicants: Option<String>,
            #[serde(rename = "DITERIMA SNBP")]
            snbp_accepted: Option<String>,
            #[serde(rename = "PENDAFTAR SNBT")]
            snbt_applicants: Option<String>,
            #[serde(rename = "DITERIMA SNBT")]
            snbt_accepted: Option<String>,
            #[serde(rename = "SNBP")]
            snbp_reference: Option<String>,
            #[serde(rename = "SNBT")]
            snbt_reference: Option<String>,
            #[serde(rename = "KEKETATAN SNBP")]
            snbp_selectivity: Option<String>,
            #[serde(rename = "KEKETATAN SNBT")]
            snbt_selectivity: Option<String>,
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .trim(csv::Trim::All)
            .from_path(path)
            .with_context(|| format!("failed to open stats table {}", path.display()))?;

        let headers = reader
            .headers()
            .with_context(|| format!("failed to read headers from {}", path.display()))?
            .clone();
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|column| !headers.iter().any(|header| header == *column))
            .collect();
        if !missing.is_empty() {
            anyhow::bail!(
                "stats table {} is missing required columns: {}",
                path.display(),
                missing.join(", ")
            );
        }

        let mut rows = Vec::new();
        for result in reader.deserialize::<RawRow>() {
            let raw = result.with_context(|| format!("malformed row in {}", path.display()))?;
            rows.push(ProgramStats {
                university: raw.university,
                major: raw.major,
                snbp_applicants: parse_numeric(raw.snbp_applicants.as_deref(), 0.0) as u32,
                snbp_accepted: parse_numeric(raw.snbp_accepted.as_deref(), 0.0) as u32,
                snbt_applicants: parse_numeric(raw.snbt_applicants.as_deref(), 0.0) as u32,
                snbt_accepted: parse_numeric(raw.snbt_accepted.as_deref(), 0.0) as u32,
                snbp_reference: parse_numeric(raw.snbp_reference.as_deref(), 0.0),
                snbt_reference: parse_numeric(raw.snbt_reference.as_deref(), 0.0),
                snbp_selectivity: parse_ratio(raw.snbp_selectivity.as_deref()),
                snbt_selectivity: parse_ratio(raw.snbt_selectivity.as_deref()),
            });
        }

        Ok(Dataset { rows })
    }

    pub fn lookup(&self, university: &str, major: &str) -> Option<&ProgramStats> {
        self.rows
            .iter()
            .find(|row| row.university == university && row.major == major)
    }

    pub fn universities(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !names.contains(&row.university.as_str()) {
                names.push(row.university.as_str());
            }
        }
        names
    }

    pub fn majors(&self, university: &str) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for row in &self.rows {
            if row.university == university && !names.contains(&row.major.as_str()) {
                names.push(row.major.as_str());
            }
        }
        names
    }
}

/// Parses a cell using Indonesian locale conventions: `.` separates thousands,
/// `,` marks the decimal. Anything unparseable falls back to the default.
pub fn parse_numeric(value: Option<&str>, default: f64) -> f64 {
    let Some(raw) = value else {
        return default;
    };
    let normalized = raw.trim().replace('.', "").replace(',', ".");
    normalized.parse().unwrap_or(default)
}

/// Converts a selectivity string "A:B" to A/B. A zero denominator or any
/// non-matching format yields 0.0.
pub fn parse_ratio(value: Option<&str>) -> f64 {
    let Some(raw) = value else {
        return 0.0;
    };
    let Some((accepted, applicants)) = raw.trim().split_once(':') else {
        return 0.0;
    };
    let (Ok(accepted), Ok(applicants)) =
        (accepted.trim().parse::<u32>(), applicants.trim().parse::<u32>())
    else {
        return 0.0;
    };
    if applicants == 0 {
        0.0
    } else {
        f64::from(accepted) / f64::from(applicants)
    }
}
