//! Model of the djbdns `tinydns` data file.
//!
//! Each line of the file starts with a one-character marker followed by
//! colon-separated fields. See <http://cr.yp.to/djbdns/tinydns-data.html>.

mod data_line;
mod document;

pub use data_line::{DataLine, DataLineError, Marker};
pub use document::{AuthoritativeDns, Section};
