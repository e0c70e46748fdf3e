use serde::Serialize;

#[derive(Debug, Clone, PartialEq)]
pub struct ProgramStats {
    pub university: String,
    pub major: String,
    pub snbp_applicants: u32,
    pub snbp_accepted: u32,
    pub snbt_applicants: u32,
    pub snbt_accepted: u32,
    pub snbp_reference: f64,
    pub snbt_reference: f64,
    pub snbp_selectivity: f64,
    pub snbt_selectivity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackSummary {
    pub chance_percent: f64,
    pub applicants: u32,
    pub accepted: u32,
    pub selectivity: f64,
    pub reference: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemesterTarget {
    pub semester: usize,
    pub target: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub average: f64,
    pub filled_semesters: usize,
    pub snbp: Option<TrackSummary>,
    pub snbt: Option<TrackSummary>,
    pub reference: Option<f64>,
    pub safe_target: Option<f64>,
    pub required_increase: Option<f64>,
    pub targets: Vec<SemesterTarget>,
}
