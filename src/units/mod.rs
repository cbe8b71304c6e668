//! 단위 정의 및 변환 모듈 모음.

pub mod flow;
pub mod length;

pub use flow::{convert_flow, lph_to_m3h, m3h_to_lph, FlowUnit};
pub use length::{convert_length, mm_to_m, LengthUnit};
