//! Route declarations shared by the navigation dispatcher and the access
//! resolver.

pub mod paths;
pub mod pattern;
pub mod table;

pub use pattern::ParamKind;
pub use pattern::PatternError;
pub use pattern::RouteParams;
pub use pattern::RoutePattern;
pub use pattern::Segment;
pub use table::APP_TITLE;
pub use table::RouteMeta;
pub use table::RouteRecord;
pub use table::RouteTable;
