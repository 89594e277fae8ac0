//! Quantum demos for Tally.
//!
//! Parses state labels and complex amplitudes, normalises them with the Born
//! rule and runs single or repeated weighted measurements against a caller
//! supplied random source. [`cloud`] holds a random point cloud drifting in
//! four or five dimensions, projected down to the plane.

pub mod cloud;
pub mod input;
pub mod system;
pub mod tally;

pub use cloud::PointCloud;
pub use input::{parse_amplitudes, parse_complex, parse_states, parse_trials, MAX_TRIALS};
pub use system::{QuantumBox, StateInfo};
pub use tally::{MeasurementTally, TallyRow};
