pub mod reading_queries;

pub use reading_queries::{
    available_range, build_readings_query, fetch_readings, QueryParam, ReadingQuery,
};
