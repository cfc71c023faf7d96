//! Step definitions for daily task bucket scenarios.


mod given;
mod then;
