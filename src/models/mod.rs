pub mod angle;
pub mod proposal;
pub mod semester;
pub mod table_filter;
