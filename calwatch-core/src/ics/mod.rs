//! iCalendar feed parsing.

mod parse;

pub use parse::{RawEvent, parse_feed};
