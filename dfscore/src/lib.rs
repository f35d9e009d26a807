// data module
pub mod data {
    pub mod spectrum;
    pub mod target;
    pub mod tolerance;
}

// algorithm module
pub mod algorithm {
    pub mod classify;
    pub mod chromatogram;
}
