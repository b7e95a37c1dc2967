// Core types and pure logic shared by the API client, the orchestrators and
// the terminal front end. Nothing in this crate performs I/O.

pub mod card;
pub mod dates;
pub mod filter;
pub mod model;
