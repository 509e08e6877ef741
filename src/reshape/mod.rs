//! Reshaping of API payloads into normalized chart inputs.
//!
//! Everything here is pure: payload in, `ChartData`/`ScatterChart` out.
//!
//! - align heterogeneous date series onto one axis (`timeline`)
//! - deterministic series colors (`color`)
//! - multi-year division x quarter flattening (`quarters`)
//! - YoY request years and growth series (`yoy`)
//! - district scatter series (`scatter`)
//! - output vs GVA and money formatting (`summary`)
//! - actual vs forecast incidents (`forecast`)

pub mod color;
pub mod forecast;
pub mod quarters;
pub mod scatter;
pub mod summary;
pub mod timeline;
pub mod yoy;

pub use forecast::forecast_chart;
pub use quarters::flatten;
pub use scatter::group;
pub use summary::{format_millions, output_vs_gva_chart};
pub use timeline::{AlignedSeries, NamedPoints, align};
pub use yoy::{adjusted_request_years, yoy_chart};
